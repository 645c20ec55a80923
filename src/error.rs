use std::io;

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::DecodeError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to call Jira: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Jira responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Maps a non-success status and its body to the matching error variant.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized,
            StatusCode::NOT_FOUND => AppError::NotFound,
            StatusCode::BAD_REQUEST => AppError::BadRequest(body),
            _ => AppError::Status { status, body },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
