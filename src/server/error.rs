use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const USAGE: &str = "/api/download?url=https://vm.tiktok.com/xxxxx";

/// Everything the HTTP layer can answer with besides a success
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("URL parameter is required")]
    MissingUrl,
    /// Every resolver came back empty-handed
    #[error("{0}")]
    NotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// A handler panicked; carries the panic message
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingUrl => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "usage": USAGE }),
            ),
            ApiError::NotFound(reason) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": reason }),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": self.to_string() }),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error", "message": message }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
