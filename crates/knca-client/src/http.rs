//! Shared HTTP response helpers.
//!
//! Centralizes the non-success → [`BackendError::Api`] mapping so the
//! endpoint methods stay focused on request construction.

use knca_core::ApiErrorBody;

use crate::error::BackendError;

/// Return the response unchanged on success, or [`BackendError::Api`] with
/// the status code and the best available message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = error_field(&body).unwrap_or_else(|| body.trim().to_string());
    Err(BackendError::Api { status, message })
}

/// The `error` field of a JSON error body, if the body is one.
pub fn error_field(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|e| !e.is_empty())
}
