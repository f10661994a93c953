use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a request can surface, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("invalid meal type '{0}', must be one of: breakfast, lunch, dinner, snack")]
    InvalidMealType(String),

    #[error("invalid message format: {0}")]
    InvalidFormat(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    BadDate(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("unknown food item: {0}")]
    FoodNotFound(String),

    #[error("endpoint not found")]
    RouteNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("user already exists: {0}")]
    DuplicateUser(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidMealType(_)
            | Self::InvalidFormat(_)
            | Self::BadDate(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) | Self::FoodNotFound(_) | Self::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::DuplicateUser(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // io/serde causes are logged, not echoed to clients
        let message = if let Self::Internal(e) = &self {
            error!(error = %e, "internal error");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
