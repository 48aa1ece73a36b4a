use std::collections::BTreeMap;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rejected fields: {}", format_field_errors(.0))]
    FieldErrors(BTreeMap<String, Vec<String>>),

    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Save aborted: {0}")]
    PartialSave(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::FieldErrors(_) => "FIELD_ERRORS",
            AppError::Api { .. } => "API_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::PartialSave(_) => "PARTIAL_SAVE",
        }
    }

    /// Maps a non-success status and its extracted message onto a variant.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if message.is_empty() => {
                AppError::Unauthorized(status.to_string())
            }
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn format_field_errors(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(format!("JSON error: {}", err))
    }
}
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Decode(format!("Invalid token: {}", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
