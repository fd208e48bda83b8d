use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await
        .context("connect to database")?;
    init_schema(&db).await?;
    Ok(db)
}

/// Creates both tables if they do not exist yet. Safe to run on every start.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT    NOT NULL UNIQUE,
            password_hash TEXT    NOT NULL
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_schools (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL UNIQUE REFERENCES users(id),
            school_list   TEXT    NOT NULL,
            last_modified TEXT
        )
        "#,
    )
    .execute(db)
    .await
    .context("create user_schools table")?;

    Ok(())
}
