use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[sqlx(rename = "isAdmin")]
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub account_created: Option<NaiveDateTime>,
    pub face_data_path: Option<String>,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbEmotion {
    pub id: i64,
    pub user_id: i64,
    pub emotion: String,
    pub timestamp: Option<NaiveDateTime>,
}

/// Insert payload for `users`; `password` is already digested.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}
