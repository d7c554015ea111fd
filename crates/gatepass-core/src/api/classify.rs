//! Mapping from raw API failures to a small set of error kinds.
//!
//! The service reports most failures as free text, so the mapping is an
//! ordered rule table matched against the status code and the server
//! message. The first matching rule wins.

use std::fmt;

use super::{ApiError, Capability};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AccountNotFound,
    InvalidCredentials,
    AccountExists,
    IncorrectOldPassword,
    SessionExpired,
    Forbidden,
    RateLimited,
    ServerError,
    Network,
    InvalidResponse,
    Storage,
    /// Rejected for a reason the table does not know; show the server message.
    Rejected,
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Status(u16),
    StatusRange(u16, u16),
    Contains(&'static str),
    Equals(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    capability: Option<Capability>,
    matcher: Matcher,
    kind: ErrorKind,
}

const fn rule(capability: Option<Capability>, matcher: Matcher, kind: ErrorKind) -> Rule {
    Rule { capability, matcher, kind }
}

const RULES: &[Rule] = &[
    // Login screen
    rule(Some(Capability::Authenticate), Matcher::Contains("user not found"), ErrorKind::AccountNotFound),
    rule(Some(Capability::Authenticate), Matcher::Status(404), ErrorKind::AccountNotFound),
    rule(Some(Capability::Authenticate), Matcher::Contains("invalid credentials"), ErrorKind::InvalidCredentials),
    rule(Some(Capability::Authenticate), Matcher::Contains("invalid password"), ErrorKind::InvalidCredentials),
    rule(Some(Capability::Authenticate), Matcher::Status(401), ErrorKind::InvalidCredentials),
    rule(Some(Capability::Authenticate), Matcher::Contains("user already exists"), ErrorKind::AccountExists),
    // Password flows
    rule(Some(Capability::ChangePassword), Matcher::Contains("incorrect old password"), ErrorKind::IncorrectOldPassword),
    rule(
        Some(Capability::RequestRecovery),
        Matcher::Equals("Customer not found with the provided email or username"),
        ErrorKind::AccountNotFound,
    ),
    // Any capability
    rule(None, Matcher::Status(401), ErrorKind::SessionExpired),
    rule(None, Matcher::Status(403), ErrorKind::Forbidden),
    rule(None, Matcher::Status(429), ErrorKind::RateLimited),
    rule(None, Matcher::StatusRange(500, 599), ErrorKind::ServerError),
];

impl Matcher {
    fn matches(&self, status: u16, message: &str) -> bool {
        match *self {
            Matcher::Status(code) => status == code,
            Matcher::StatusRange(lo, hi) => (lo..=hi).contains(&status),
            Matcher::Contains(needle) => message.to_lowercase().contains(needle),
            Matcher::Equals(expected) => message == expected,
        }
    }
}

impl ErrorKind {
    /// Classify a failure of `capability` into an error kind
    pub fn classify(capability: Capability, error: &ApiError) -> Self {
        match error {
            ApiError::Transport(e) => match e.status() {
                Some(status) => Self::from_rules(capability, status.as_u16(), ""),
                None => ErrorKind::Network,
            },
            ApiError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ApiError::Store(_) => ErrorKind::Storage,
            ApiError::Rejected { status, message, .. } => {
                Self::from_rules(capability, status.as_u16(), message.as_deref().unwrap_or(""))
            }
        }
    }

    fn from_rules(capability: Capability, status: u16, message: &str) -> Self {
        RULES
            .iter()
            .filter(|r| r.capability.map_or(true, |c| c == capability))
            .find(|r| r.matcher.matches(status, message))
            .map(|r| r.kind)
            .unwrap_or(ErrorKind::Rejected)
    }

    /// Default user-facing text for this kind
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::AccountNotFound => "Account does not exist",
            ErrorKind::InvalidCredentials => "Username or password is incorrect",
            ErrorKind::AccountExists => "Account already exists",
            ErrorKind::IncorrectOldPassword => "Old password is incorrect",
            ErrorKind::SessionExpired => "Your session has expired. Please log in again.",
            ErrorKind::Forbidden => "You do not have access to this resource",
            ErrorKind::RateLimited => "Too many requests. Please wait and try again.",
            ErrorKind::ServerError => "The server encountered an error. Please try again later.",
            ErrorKind::Network => "Unable to connect to server. Check your internet connection.",
            ErrorKind::InvalidResponse => "The server returned an unexpected response",
            ErrorKind::Storage => "Unable to access saved login",
            ErrorKind::Rejected => "Something went wrong. Please try again.",
        }
    }

    /// Text to show for `error`, preferring the server message for unclassified rejections
    pub fn describe(capability: Capability, error: &ApiError) -> String {
        let kind = Self::classify(capability, error);
        match (kind, error.server_message()) {
            (ErrorKind::Rejected, Some(message)) => message.to_string(),
            _ => kind.user_message().to_string(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn rejected(status: u16, body: &str) -> ApiError {
        ApiError::from_status(StatusCode::from_u16(status).unwrap(), body)
    }

    #[test]
    fn test_login_rules() {
        let cap = Capability::Authenticate;
        assert_eq!(ErrorKind::classify(cap, &rejected(401, "")), ErrorKind::InvalidCredentials);
        assert_eq!(ErrorKind::classify(cap, &rejected(404, "")), ErrorKind::AccountNotFound);
        assert_eq!(
            ErrorKind::classify(cap, &rejected(400, r#"{"message":"User Not Found"}"#)),
            ErrorKind::AccountNotFound
        );
        assert_eq!(
            ErrorKind::classify(cap, &rejected(400, r#"{"message":"Invalid password"}"#)),
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            ErrorKind::classify(cap, &rejected(409, r#"{"message":"User already exists"}"#)),
            ErrorKind::AccountExists
        );
    }

    #[test]
    fn test_message_rules_take_precedence_over_status() {
        // "user not found" comes before the 401 rule
        let err = rejected(401, r#"{"message":"user not found"}"#);
        assert_eq!(ErrorKind::classify(Capability::Authenticate, &err), ErrorKind::AccountNotFound);
    }

    #[test]
    fn test_401_outside_login_is_session_expired() {
        let err = rejected(401, "");
        assert_eq!(ErrorKind::classify(Capability::FetchTickets, &err), ErrorKind::SessionExpired);
        assert_eq!(ErrorKind::classify(Capability::FetchProfile, &err), ErrorKind::SessionExpired);
    }

    #[test]
    fn test_change_password_rule() {
        let err = rejected(400, "Incorrect old password");
        assert_eq!(
            ErrorKind::classify(Capability::ChangePassword, &err),
            ErrorKind::IncorrectOldPassword
        );
        // Only applies to the change password capability
        assert_eq!(ErrorKind::classify(Capability::CompleteRecovery, &err), ErrorKind::Rejected);
    }

    #[test]
    fn test_forgot_password_requires_exact_message() {
        let exact = rejected(400, "Customer not found with the provided email or username");
        assert_eq!(
            ErrorKind::classify(Capability::RequestRecovery, &exact),
            ErrorKind::AccountNotFound
        );
        let other = rejected(400, "customer not found with the provided email or username");
        assert_eq!(ErrorKind::classify(Capability::RequestRecovery, &other), ErrorKind::Rejected);
    }

    #[test]
    fn test_generic_status_rules() {
        assert_eq!(ErrorKind::classify(Capability::FetchTickets, &rejected(403, "")), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::classify(Capability::FetchTickets, &rejected(429, "")), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::classify(Capability::FetchTickets, &rejected(503, "")), ErrorKind::ServerError);
        assert_eq!(ErrorKind::classify(Capability::FetchTickets, &rejected(418, "")), ErrorKind::Rejected);
    }

    #[test]
    fn test_non_http_errors() {
        let invalid = ApiError::InvalidResponse("missing token".into());
        assert_eq!(ErrorKind::classify(Capability::Authenticate, &invalid), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_describe_prefers_server_message_for_unknown_rejections() {
        let err = rejected(400, "OTP has expired");
        assert_eq!(ErrorKind::describe(Capability::VerifyRecoveryCode, &err), "OTP has expired");

        let err = rejected(401, "whatever");
        assert_eq!(
            ErrorKind::describe(Capability::Authenticate, &err),
            "Username or password is incorrect"
        );
    }
}
