use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::startup::Phase;

#[derive(Debug, ThisError)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to database `{url}`: {source}")]
    Connection {
        url: String,
        #[source]
        source: SqlxError,
    },

    #[error("Database connection is not open")]
    ConnectionClosed,

    #[error("Schema object `{object}` failed to apply: {source}")]
    SchemaBootstrap {
        object: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("Schema object `{object}` depends on `{dependency}`, which is not declared before it")]
    SchemaOrder {
        object: &'static str,
        dependency: &'static str,
    },

    #[error("Failed to load route module `{module}`: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("Failed to mount router under `/{prefix}`: {reason}")]
    Mount { prefix: String, reason: String },

    #[error("Prefix `/{0}` is already mounted")]
    DuplicatePrefix(String),

    #[error("Invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<figment::Error> for TrackerError {
    fn from(e: figment::Error) -> Self {
        TrackerError::Config(Box::new(e))
    }
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            TrackerError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message,
                },
            ),
            TrackerError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message,
                },
            ),
            TrackerError::Conflict(message) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message,
                },
            ),
            other => {
                tracing::error!(error = %other, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
