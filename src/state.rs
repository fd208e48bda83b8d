use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::db;
use axum::extract::FromRef;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self { db, config, jwt }
    }

    /// State backed by a private in-memory database, for tests.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        use sqlx::sqlite::SqlitePoolOptions;
        use std::time::Duration;

        // A single long-lived connection: each new in-memory connection is a fresh database.
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        db::init_schema(&db).await.expect("schema");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        });
        Self::from_parts(db, config)
    }
}
