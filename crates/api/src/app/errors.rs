//! Client-facing errors.
//!
//! Every failure ends the request with a status code and a plain-text body; there is
//! no structured error payload.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use coursebook_core::DomainError;

pub const NOT_FOUND_MESSAGE: &str = "Course with the given id was not found";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Lookup miss (unknown or unparseable id).
    #[error("Course with the given id was not found")]
    NotFound,

    /// Body failed the course schema. Carries the first violated rule's message.
    #[error("{0}")]
    Validation(String),

    /// Body could not be parsed at all.
    #[error("{0}")]
    BadRequest(String),

    /// Anything the client cannot act on. The detail is logged, not sent.
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound | DomainError::InvalidId(_) => ApiError::NotFound,
            DomainError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }
        (self.status(), self.to_string()).into_response()
    }
}
