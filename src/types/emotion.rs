use serde::{Deserialize, Serialize};

use crate::db::DbEmotion;

#[derive(Debug, Deserialize)]
pub struct AddEmotionRequest {
    pub user_id: i64,
    pub emotion: String,
}

/// `{"emotion": [...]}`, the shape the dashboard reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmotionHistory {
    pub emotion: Vec<DbEmotion>,
}
