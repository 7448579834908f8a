use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::error::TodoError;

/// JSON error body. `code` is one of `validation`, `not_found`, `storage`.
#[derive(Debug, Serialize)]
pub struct ApiError { pub code: String, pub message: String }

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { code: "validation".into(), message: message.into() }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "validation" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        let code = match &err {
            TodoError::Validation(_) => "validation",
            TodoError::NotFound(_) => "not_found",
            TodoError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                "storage"
            }
        };
        Self { code: code.into(), message: err.to_string() }
    }
}

// Malformed bodies and missing content-type are input errors like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::validation(rejection.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status(), axum::Json(self)).into_response() }
}
