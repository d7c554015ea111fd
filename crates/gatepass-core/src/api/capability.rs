use std::fmt;

use reqwest::Method;

/// One logical remote operation, mapped to a single HTTP method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Authenticate,
    ChangePassword,
    RequestRecovery,
    VerifyRecoveryCode,
    CompleteRecovery,
    FetchProfile,
    UpdateProfile,
    FetchTickets,
    FetchCheckInLogs,
}

impl Capability {
    pub fn method(&self) -> Method {
        match self {
            Capability::FetchProfile | Capability::FetchTickets | Capability::FetchCheckInLogs => {
                Method::GET
            }
            Capability::UpdateProfile => Method::PUT,
            _ => Method::POST,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Capability::Authenticate => "/auth/user-login",
            Capability::ChangePassword => "/auth/user-change-password",
            Capability::RequestRecovery => "/auth/user-forgot-password",
            Capability::VerifyRecoveryCode => "/auth/user-verify-otp",
            Capability::CompleteRecovery => "/auth/user-reset-password",
            Capability::FetchProfile | Capability::UpdateProfile => "/auth/user-profile",
            Capability::FetchTickets => "/tickets/my-tickets",
            Capability::FetchCheckInLogs => "/checkin/logs/customer",
        }
    }

    /// Whether this capability carries a JSON request body
    pub fn has_body(&self) -> bool {
        self.method() != Method::GET
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_capabilities_are_get_without_body() {
        for cap in [
            Capability::FetchProfile,
            Capability::FetchTickets,
            Capability::FetchCheckInLogs,
        ] {
            assert_eq!(cap.method(), Method::GET);
            assert!(!cap.has_body());
        }
    }

    #[test]
    fn test_profile_shares_path_with_distinct_methods() {
        assert_eq!(Capability::FetchProfile.path(), Capability::UpdateProfile.path());
        assert_eq!(Capability::UpdateProfile.method(), Method::PUT);
    }

    #[test]
    fn test_display() {
        assert_eq!(Capability::Authenticate.to_string(), "POST /auth/user-login");
        assert_eq!(Capability::FetchTickets.to_string(), "GET /tickets/my-tickets");
    }

    #[test]
    fn test_paths_are_rooted() {
        for cap in [
            Capability::Authenticate,
            Capability::ChangePassword,
            Capability::RequestRecovery,
            Capability::VerifyRecoveryCode,
            Capability::CompleteRecovery,
            Capability::FetchProfile,
            Capability::UpdateProfile,
            Capability::FetchTickets,
            Capability::FetchCheckInLogs,
        ] {
            assert!(cap.path().starts_with('/'), "{cap}");
            assert_eq!(cap.has_body(), cap.method() != Method::GET);
        }
    }
}
