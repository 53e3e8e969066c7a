mod common;

use common::TempDb;
use emotion_tracker::db::{self, ConnectionManager, NewUser, TrackerStorage};
use emotion_tracker::TrackerError;

async fn snapshot(pool: &db::SqlitePool) -> Vec<(String, String)> {
    sqlx::query_as("SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool)
        .await
        .expect("failed to read sqlite_master")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Ada".to_string(),
        password: "digest".to_string(),
    }
}

#[tokio::test]
async fn ensure_schema_twice_is_a_no_op() {
    let tmp = TempDb::new("idempotent");
    let mut conn = ConnectionManager::new();
    let pool = conn.connect(&tmp.config()).await.expect("connect").clone();

    db::ensure_schema(&pool).await.expect("first ensure_schema");
    let first = snapshot(&pool).await;
    db::ensure_schema(&pool).await.expect("second ensure_schema");
    let second = snapshot(&pool).await;

    assert_eq!(first, second);
    let names: Vec<&str> = first.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"users"));
    assert!(names.contains(&"emotions"));

    conn.disconnect().await.expect("disconnect");
}

#[tokio::test]
async fn deleting_a_user_cascades_to_emotions() {
    let tmp = TempDb::new("cascade");
    let mut conn = ConnectionManager::new();
    let pool = conn.connect(&tmp.config()).await.expect("connect").clone();
    db::ensure_schema(&pool).await.expect("ensure_schema");
    let storage = TrackerStorage::new(pool);

    let keep = storage.create_user(new_user("keep@example.com")).await.unwrap();
    let gone = storage.create_user(new_user("gone@example.com")).await.unwrap();
    storage.record_emotion(keep.id, "happy").await.unwrap();
    storage.record_emotion(gone.id, "sad").await.unwrap();
    storage.record_emotion(gone.id, "angry").await.unwrap();
    assert_eq!(storage.count_emotions(gone.id).await.unwrap(), 2);

    storage.delete_user(gone.id).await.unwrap();

    assert_eq!(storage.count_emotions(gone.id).await.unwrap(), 0);
    assert_eq!(storage.count_emotions(keep.id).await.unwrap(), 1);

    conn.disconnect().await.expect("disconnect");
}

#[tokio::test]
async fn emotion_for_unknown_user_is_rejected() {
    let tmp = TempDb::new("fk");
    let mut conn = ConnectionManager::new();
    let pool = conn.connect(&tmp.config()).await.expect("connect").clone();
    db::ensure_schema(&pool).await.expect("ensure_schema");
    let storage = TrackerStorage::new(pool.clone());

    let err = storage.record_emotion(999, "happy").await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));

    let raw = sqlx::query("INSERT INTO emotions (user_id, emotion) VALUES (?, ?)")
        .bind(12345_i64)
        .bind("happy")
        .execute(&pool)
        .await;
    assert!(raw.is_err());

    conn.disconnect().await.expect("disconnect");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let tmp = TempDb::new("unique");
    let mut conn = ConnectionManager::new();
    let pool = conn.connect(&tmp.config()).await.expect("connect").clone();
    db::ensure_schema(&pool).await.expect("ensure_schema");
    let storage = TrackerStorage::new(pool);

    let user = storage.create_user(new_user("dup@example.com")).await.unwrap();
    assert!(!user.is_admin);
    assert!(user.account_created.is_some());
    assert!(user.last_login.is_none());

    let err = storage.create_user(new_user("dup@example.com")).await.unwrap_err();
    assert!(matches!(err, TrackerError::Conflict(_)));

    conn.disconnect().await.expect("disconnect");
}
