//! Fixtures shared by the database integration tests.
#![allow(dead_code)]

use chrono::{TimeDelta, Utc};
use echo_break_db::{Database, DbConfig};
use tempfile::TempDir;

/// A file-backed SQLite database inside `dir`.
pub async fn temp_database(dir: &TempDir) -> Database {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("activity.db").display());
    Database::connect(DbConfig::new(url))
        .await
        .expect("should open temp database")
}

/// One `user_activity` row; `age_days` is how long ago it was posted.
pub struct Activity<'a> {
    pub bias_label: Option<&'a str>,
    pub user_id: &'a str,
    pub subreddit: Option<&'a str>,
    pub title: &'a str,
    pub age_days: i64,
}

pub fn activity<'a>(bias_label: &'a str, user_id: &'a str, subreddit: &'a str) -> Activity<'a> {
    Activity {
        bias_label: Some(bias_label),
        user_id,
        subreddit: Some(subreddit),
        title: "a title",
        age_days: 1,
    }
}

pub async fn create_activity_table(db: &Database) {
    sqlx::query(
        r#"
        CREATE TABLE user_activity (
            bias_label TEXT,
            user_id TEXT NOT NULL,
            subreddit TEXT,
            title TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(&db.pool().await.unwrap())
    .await
    .expect("should create user_activity");
}

pub async fn seed_activity(db: &Database, rows: &[Activity<'_>]) {
    let pool = db.pool().await.unwrap();
    for row in rows {
        let timestamp = (Utc::now() - TimeDelta::days(row.age_days))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        sqlx::query(
            "INSERT INTO user_activity (bias_label, user_id, subreddit, title, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(row.bias_label.map(str::to_owned))
        .bind(row.user_id.to_owned())
        .bind(row.subreddit.map(str::to_owned))
        .bind(row.title.to_owned())
        .bind(timestamp)
        .execute(&pool)
        .await
        .expect("should insert activity row");
    }
}
