use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::TrackerError;
use crate::db::{DbUser, NewUser};
use crate::router::AppState;
use crate::types::user::RegisterUserRequest;

/// POST /user/register
pub async fn register_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<DbUser>), TrackerError> {
    let email = req.email.trim().to_ascii_lowercase();
    let name = req.name.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(TrackerError::BadRequest("a valid email is required".to_string()));
    }
    if name.is_empty() {
        return Err(TrackerError::BadRequest("name is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(TrackerError::BadRequest("password is required".to_string()));
    }

    let password = password_digest(&email, &req.password);
    let user = state
        .storage
        .create_user(NewUser {
            email,
            name,
            password,
        })
        .await?;
    info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /user/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<DbUser>, TrackerError> {
    Ok(Json(state.storage.get_user(user_id).await?))
}

/// DELETE /user/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, TrackerError> {
    state.storage.delete_user(user_id).await?;
    info!(user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Hex SHA-256 over `email:password`.
fn password_digest(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
