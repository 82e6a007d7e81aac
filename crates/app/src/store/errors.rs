//! Parts store errors.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message shown when a rejection carries no usable `detail`.
pub const GENERIC_REJECTION: &str = "the store rejected the request";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store rejected the request ({status}): {detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("http error")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Value,
}

/// Pull the `detail` message out of an error body.
///
/// Anything other than a JSON object with a non-empty string `detail` falls
/// back to [`GENERIC_REJECTION`].
pub(crate) fn rejection_detail(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| match payload.detail {
            Value::String(detail) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        })
        .unwrap_or_else(|| GENERIC_REJECTION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_taken_verbatim() {
        assert_eq!(
            rejection_detail(br#"{"detail": "Part not found"}"#),
            "Part not found"
        );
    }

    #[test]
    fn missing_detail_falls_back() {
        assert_eq!(rejection_detail(br#"{"error": "nope"}"#), GENERIC_REJECTION);
    }

    #[test]
    fn structured_detail_falls_back() {
        assert_eq!(
            rejection_detail(br#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#),
            GENERIC_REJECTION
        );
    }

    #[test]
    fn non_json_body_falls_back() {
        assert_eq!(rejection_detail(b"Internal Server Error"), GENERIC_REJECTION);
        assert_eq!(rejection_detail(b""), GENERIC_REJECTION);
    }
}
