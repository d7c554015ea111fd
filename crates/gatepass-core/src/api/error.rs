use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP status (DNS, connect, timeout, ...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the server-provided message out of an error body.
    ///
    /// The service answers errors either as JSON (`{"message": ...}` or
    /// `{"error": ...}`) or as a bare text body.
    fn extract_message(body: &str) -> Option<String> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Object(map)) => ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map(|s| s.to_string()),
            Ok(serde_json::Value::String(s)) => Some(s),
            Ok(_) => None,
            Err(_) => Some(Self::truncate_body(trimmed)),
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Rejected {
            status,
            message: Self::extract_message(body),
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Message text supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"message":"User not found"}"#);
        assert_eq!(err.server_message(), Some("User not found"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_message_from_error_field() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"Bad OTP"}"#);
        assert_eq!(err.server_message(), Some("Bad OTP"));
    }

    #[test]
    fn test_message_from_plain_text_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "Incorrect old password\n");
        assert_eq!(err.server_message(), Some("Incorrect old password"));
    }

    #[test]
    fn test_empty_body_has_no_message() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.server_message(), None);
        assert!(err.to_string().contains("no message"));
    }

    #[test]
    fn test_json_without_message_field() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"code":17}"#);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(!ApiError::from_status(StatusCode::FORBIDDEN, "").is_unauthorized());
        assert!(!ApiError::InvalidResponse("x".into()).is_unauthorized());
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "é".repeat(400);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        match err {
            ApiError::Rejected { body: kept, .. } => {
                assert!(kept.contains("truncated, 800 total bytes"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
