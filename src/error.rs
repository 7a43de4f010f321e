use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const SIGN_IN_MESSAGE: &str = "Please sign in to an account to perform this action.";
pub const INVALID_TOKEN_MESSAGE: &str =
    "Invalid authorization token. Sign in again before performing this action.";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save list. Please try again later.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete list. Please try again later.";
pub const NOT_OWNER_MESSAGE: &str = "Only the owner of this list can edit it.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("No credential supplied for a remote list operation")]
    MissingCredential,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0} does not own this list")]
    NotOwner(String),

    #[error("Local storage error: {0}")]
    LocalStorage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown to the user when a save fails with this error
    pub fn save_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::MissingCredential | AppError::Unauthorized(_) => SIGN_IN_MESSAGE.to_string(),
            AppError::Forbidden(_) => INVALID_TOKEN_MESSAGE.to_string(),
            _ => SAVE_FAILED_MESSAGE.to_string(),
        }
    }

    /// Message shown to the user when a delete fails with this error
    pub fn delete_message(&self) -> String {
        match self {
            AppError::MissingCredential | AppError::Unauthorized(_) => SIGN_IN_MESSAGE.to_string(),
            AppError::Forbidden(_) => INVALID_TOKEN_MESSAGE.to_string(),
            _ => DELETE_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::MissingCredential | AppError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, SIGN_IN_MESSAGE.to_string())
            }
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, INVALID_TOKEN_MESSAGE.to_string()),
            AppError::NotOwner(_) => (StatusCode::FORBIDDEN, NOT_OWNER_MESSAGE.to_string()),
            AppError::LocalStorage(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
