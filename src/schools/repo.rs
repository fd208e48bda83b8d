use anyhow::Context;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::schools::repo_types::SchoolListRecord;

impl SchoolListRecord {
    /// `None` when the user never saved a list.
    pub async fn find_by_user(
        db: &SqlitePool,
        user_id: i64,
    ) -> anyhow::Result<Option<SchoolListRecord>> {
        let row = sqlx::query_as::<_, SchoolListRecord>(
            r#"
            SELECT user_id, school_list, last_modified
            FROM user_schools
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Insert the user's list, or overwrite both fields if one exists. Last writer wins.
    pub async fn upsert(
        db: &SqlitePool,
        user_id: i64,
        school_list: &Value,
        last_modified: &str,
    ) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(school_list).context("serialize school_list")?;
        sqlx::query(
            r#"
            INSERT INTO user_schools (user_id, school_list, last_modified)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (user_id) DO UPDATE
            SET school_list = excluded.school_list,
                last_modified = excluded.last_modified
            "#,
        )
        .bind(user_id)
        .bind(serialized)
        .bind(last_modified)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::repo_types::User, state::AppState};
    use serde_json::json;

    #[tokio::test]
    async fn missing_record_is_none() {
        let state = AppState::in_memory().await;
        let id = User::create(&state.db, "alice", "h").await.unwrap();
        assert!(SchoolListRecord::find_by_user(&state.db, id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn upsert_inserts_then_overwrites() {
        let state = AppState::in_memory().await;
        let id = User::create(&state.db, "alice", "h").await.unwrap();

        SchoolListRecord::upsert(&state.db, id, &json!(["A", "B"]), "t1")
            .await
            .unwrap();
        SchoolListRecord::upsert(&state.db, id, &json!({"reach": ["C"]}), "t0")
            .await
            .unwrap();

        let rec = SchoolListRecord::find_by_user(&state.db, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rec.school_list_json().unwrap(), json!({"reach": ["C"]}));
        assert_eq!(rec.last_modified.as_deref(), Some("t0"));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_schools")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn records_are_per_user() {
        let state = AppState::in_memory().await;
        let alice = User::create(&state.db, "alice", "h").await.unwrap();
        let bob = User::create(&state.db, "bob", "h").await.unwrap();

        SchoolListRecord::upsert(&state.db, alice, &json!(["A"]), "t")
            .await
            .unwrap();

        assert!(SchoolListRecord::find_by_user(&state.db, bob)
            .await
            .unwrap()
            .is_none());
    }
}
