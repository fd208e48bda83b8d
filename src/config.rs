use serde::Deserialize;
use tracing::warn;

/// Signing key used when `JWT_SECRET` is unset. Local development only:
/// anyone who knows it can mint tokens, so never run production without
/// `JWT_SECRET`.
pub const DEV_JWT_SECRET: &str = "dev-insecure-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

/// An unset or empty `JWT_SECRET` falls back to [`DEV_JWT_SECRET`].
fn jwt_secret(raw: Option<String>) -> String {
    match raw {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!("JWT_SECRET not set; using the development secret, do not use in production");
            DEV_JWT_SECRET.to_string()
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://schools.db".into());

        let jwt = JwtConfig {
            secret: jwt_secret(std::env::var("JWT_SECRET").ok()),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "school-list".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "school-list-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = match std::env::var("APP_PORT") {
            Ok(p) => p.parse::<u16>()?,
            Err(_) => 5000,
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_secret_uses_dev_default() {
        assert_eq!(jwt_secret(None), DEV_JWT_SECRET);
    }

    #[test]
    fn empty_secret_uses_dev_default() {
        assert_eq!(jwt_secret(Some(String::new())), DEV_JWT_SECRET);
    }

    #[test]
    fn configured_secret_is_kept() {
        assert_eq!(jwt_secret(Some("k".into())), "k");
    }
}
