use super::types::HandlerError;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::warn;

pub const SECRET_HEADER: &str = "x-app-secret";

/// Rejects requests whose `X-App-Secret` header does not match the configured secret.
pub fn authorize(headers: &HeaderMap, expected_secret: &str) -> Result<(), HandlerError> {
    let provided = headers
        .get(SECRET_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();

    if secrets_match(provided, expected_secret.as_bytes()) {
        Ok(())
    } else {
        warn!(
            header_present = headers.contains_key(SECRET_HEADER),
            "Blocked request with missing or invalid app secret"
        );
        Err(HandlerError::Forbidden)
    }
}

/// Constant-time comparison. An empty expected secret never matches.
fn secrets_match(provided: &[u8], expected: &[u8]) -> bool {
    !expected.is_empty() && provided.len() == expected.len() && bool::from(provided.ct_eq(expected))
}
