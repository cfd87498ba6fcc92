use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::feed::FetchError;
use crate::storage::SubscribeError;

/// Errors surfaced by the HTTP handlers.
///
/// `Display` is the exact message sent to the client; the wrapped source is
/// only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch the words of the day")]
    Words(#[source] FetchError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("This email is already subscribed")]
    AlreadySubscribed,

    #[error("Failed to save email")]
    SaveFailed(#[source] sqlx::Error),

    #[error("Server error")]
    MalformedBody(#[source] serde_json::Error),

    /// The body parsed but is JSON `null`, which has no fields to read.
    #[error("Server error")]
    NullBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Words(_)
            | ApiError::SaveFailed(_)
            | ApiError::MalformedBody(_)
            | ApiError::NullBody => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidEmail | ApiError::AlreadySubscribed => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Words(err)
    }
}

impl From<SubscribeError> for ApiError {
    fn from(err: SubscribeError) -> Self {
        match err {
            SubscribeError::AlreadySubscribed => ApiError::AlreadySubscribed,
            SubscribeError::Database(e) => ApiError::SaveFailed(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Words(e) => tracing::error!(error = %e, "Word fetch failed"),
            ApiError::SaveFailed(e) => tracing::error!(error = %e, "Subscriber insert failed"),
            ApiError::MalformedBody(e) => tracing::warn!(error = %e, "Unparseable request body"),
            ApiError::NullBody => tracing::warn!("Request body is JSON null"),
            _ => tracing::debug!(status = %status, error = %self, "Request rejected"),
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
