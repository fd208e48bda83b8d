use crate::auth::repo_types::User;
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl User {
    /// Find a user by exact (case-sensitive) username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user and return its id.
    ///
    /// Uniqueness is left to the `UNIQUE` constraint rather than a prior lookup,
    /// so two concurrent registrations cannot both succeed.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, CreateUserError> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                CreateUserError::DuplicateUsername
            }
            other => CreateUserError::Storage(other),
        })?;
        Ok(res.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn create_then_find() {
        let state = AppState::in_memory().await;
        let id = User::create(&state.db, "alice", "hash").await.unwrap();
        let user = User::find_by_username(&state.db, "alice")
            .await
            .unwrap()
            .expect("user exists");
        assert_eq!(user.id, id);
        assert_eq!(user.password_hash, "hash");
    }

    #[tokio::test]
    async fn duplicate_username_is_reported() {
        let state = AppState::in_memory().await;
        User::create(&state.db, "alice", "h1").await.unwrap();
        let err = User::create(&state.db, "alice", "h2").await.unwrap_err();
        assert!(matches!(err, CreateUserError::DuplicateUsername));
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let state = AppState::in_memory().await;
        User::create(&state.db, "alice", "h1").await.unwrap();
        User::create(&state.db, "Alice", "h2").await.unwrap();
        assert!(User::find_by_username(&state.db, "ALICE")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "secret".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("secret"));
    }
}
