use crate::db::models::{DbEmotion, DbUser, NewUser};
use crate::error::TrackerError;
use sqlx::{Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

const USER_COLUMNS: &str =
    "id, email, name, password, isAdmin, account_created, face_data_path, last_login";

/// Row access for the user and emotion routers.
#[derive(Clone)]
pub struct TrackerStorage {
    pool: SqlitePool,
}

impl TrackerStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. A taken email maps to `Conflict`.
    pub async fn create_user(&self, user: NewUser) -> Result<DbUser, TrackerError> {
        let result = sqlx::query("INSERT INTO users (email, name, password) VALUES (?, ?, ?)")
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password)
            .execute(&self.pool)
            .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(TrackerError::Conflict(format!(
                    "email {} is already registered",
                    user.email
                )));
            }
            Err(e) => return Err(e.into()),
        };
        self.get_user(id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<DbUser, TrackerError> {
        sqlx::query_as::<_, DbUser>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("user {id}")))
    }

    /// Delete a user; its emotions go with it through the cascade.
    pub async fn delete_user(&self, id: i64) -> Result<(), TrackerError> {
        let done = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(TrackerError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    /// Insert an emotion for `user_id`. The foreign key rejects unknown users.
    pub async fn record_emotion(
        &self,
        user_id: i64,
        emotion: &str,
    ) -> Result<DbEmotion, TrackerError> {
        let result = sqlx::query("INSERT INTO emotions (user_id, emotion) VALUES (?, ?)")
            .bind(user_id)
            .bind(emotion)
            .execute(&self.pool)
            .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(TrackerError::NotFound(format!("user {user_id}")));
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_check_violation() => {
                return Err(TrackerError::BadRequest(
                    "emotion label violates length constraint".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let row = sqlx::query_as::<_, DbEmotion>(
            "SELECT id, user_id, emotion, timestamp FROM emotions WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Emotions for `user_id`, newest first.
    pub async fn list_emotions(&self, user_id: i64) -> Result<Vec<DbEmotion>, TrackerError> {
        let rows = sqlx::query_as::<_, DbEmotion>(
            r#"SELECT id, user_id, emotion, timestamp
               FROM emotions WHERE user_id = ?
               ORDER BY timestamp DESC, id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_emotions(&self, user_id: i64) -> Result<i64, TrackerError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM emotions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}
