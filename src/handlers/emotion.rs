use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::TrackerError;
use crate::db::DbEmotion;
use crate::db::schema::EMOTION_LABEL_MAX;
use crate::router::AppState;
use crate::types::emotion::{AddEmotionRequest, EmotionHistory};

/// POST /emotion/add
pub async fn add_emotion(
    State(state): State<AppState>,
    Json(req): Json<AddEmotionRequest>,
) -> Result<(StatusCode, Json<DbEmotion>), TrackerError> {
    let label = req.emotion.trim();
    if label.is_empty() {
        return Err(TrackerError::BadRequest("emotion is required".to_string()));
    }
    if label.chars().count() > EMOTION_LABEL_MAX {
        return Err(TrackerError::BadRequest(format!(
            "emotion must be at most {EMOTION_LABEL_MAX} characters"
        )));
    }

    let row = state.storage.record_emotion(req.user_id, label).await?;
    info!(user_id = row.user_id, emotion = %row.emotion, "emotion recorded");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /emotion/{user_id}
pub async fn get_emotions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<EmotionHistory>, TrackerError> {
    // 404 for unknown users rather than an empty history.
    state.storage.get_user(user_id).await?;
    let emotion = state.storage.list_emotions(user_id).await?;
    Ok(Json(EmotionHistory { emotion }))
}
