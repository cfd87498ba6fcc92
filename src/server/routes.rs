use axum::{body::Bytes, extract::State, Json};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::error::ApiError;
use super::AppState;
use crate::feed::{fetch_words, WordsResponse};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Loose address check: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/words
pub(super) async fn words(State(state): State<AppState>) -> Result<Json<WordsResponse>, ApiError> {
    let response = fetch_words(&state.client, &state.feed_url).await?;
    Ok(Json(response))
}

/// POST /api/subscribe
///
/// The body is parsed by hand so that a non-string or missing `email`
/// is an invalid address rather than an extractor rejection. Unparseable
/// JSON and a bare `null` are server errors.
pub(super) async fn subscribe(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let payload: serde_json::Value =
        serde_json::from_slice(&body).map_err(ApiError::MalformedBody)?;
    if payload.is_null() {
        return Err(ApiError::NullBody);
    }

    let email = payload
        .get("email")
        .and_then(serde_json::Value::as_str)
        .filter(|email| is_valid_email(email))
        .ok_or(ApiError::InvalidEmail)?;

    state.db.add_subscriber(email).await?;

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Email subscribed successfully".to_string(),
    }))
}

pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("ana.silva+wotd@mail.example.pt"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b.com "));
        assert!(!is_valid_email(""));
    }
}
