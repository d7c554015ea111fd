use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest<'a> {
    #[serde(rename = "oldPassword")]
    pub old_password: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryRequest<'a> {
    #[serde(rename = "emailOrUsername")]
    pub email_or_username: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest<'a> {
    #[serde(rename = "emailOrUsername")]
    pub email_or_username: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest<'a> {
    #[serde(rename = "emailOrUsername")]
    pub email_or_username: &'a str,
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

/// Successful login payload.
///
/// Only the token is interpreted; whatever else the server sends (profile
/// fields, roles, ...) is kept as-is in `extra`.
#[derive(Clone, Deserialize)]
pub struct LoginSession {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoginSession {
    /// Look up a string field the server sent alongside the token
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(|v| v.as_str())
    }
}

impl std::fmt::Debug for LoginSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginSession")
            .field("token", &"<redacted>")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Response of the confirmation-only endpoints (password change and recovery).
///
/// These answer with either a JSON document or a plain text line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acknowledgement {
    pub message: Option<String>,
    pub payload: Value,
}

impl Acknowledgement {
    pub fn from_payload(payload: Value) -> Self {
        let message = match &payload {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => map
                .get("message")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        };
        Self { message, payload }
    }

    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }
}
