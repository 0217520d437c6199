//! Application error type and its JSON envelope.
//!
//! Every failure leaving a handler is an [`AppError`]: an HTTP status plus the
//! underlying cause. The cause is logged; what reaches the client depends on
//! the status class. 401, 404 and 5xx answers carry fixed messages so that
//! nothing about the failed check leaks. Other client errors carry the cause
//! verbatim because the client can act on it.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Body of every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";
/// Body of every 404 response.
pub const NOT_FOUND_MESSAGE: &str = "not found";
/// Body of every 5xx response.
pub const INTERNAL_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn too_many_requests<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::TOO_MANY_REQUESTS, err)
    }

    /// The message written to the response body.
    pub fn public_message(&self) -> String {
        match self.status {
            StatusCode::UNAUTHORIZED => UNAUTHORIZED_MESSAGE.to_string(),
            StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE.to_string(),
            status if status.is_server_error() => INTERNAL_MESSAGE.to_string(),
            _ => self.error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), error = %format!("{:#}", self.error), "internal error");
        } else {
            warn!(status = %self.status.as_u16(), error = %self.error, "request rejected");
        }

        let body = Json(json!({
            "error": self.public_message()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
