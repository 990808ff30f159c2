//! Error type for the Gemini REST client.

use thiserror::Error;

/// Failures talking to the `generateContent` endpoint.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP 429. `retry_after_ms` comes from the `retry-after` header when present.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Any other non-success status, with the message from the error body.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The prompt was refused (`promptFeedback.blockReason`) and no candidate came back.
    #[error("request blocked by Gemini: {reason}")]
    Blocked { reason: String },

    /// DNS, connection, TLS or timeout failure, or an undecodable body.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = GeminiError::RateLimited {
            retry_after_ms: 2000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 2000ms");
    }

    #[test]
    fn api_error_display() {
        let err = GeminiError::ApiError {
            status: 403,
            message: "API key not valid".into(),
        };
        assert_eq!(err.to_string(), "API error (status 403): API key not valid");
    }

    #[test]
    fn blocked_display_names_the_reason() {
        let err = GeminiError::Blocked {
            reason: "PROHIBITED_CONTENT".into(),
        };
        assert_eq!(
            err.to_string(),
            "request blocked by Gemini: PROHIBITED_CONTENT"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiError>();
    }
}
