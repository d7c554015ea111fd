//! Request and response schemas for the ticketing service.
//!
//! - `LoginRequest`, `LoginSession`, password flow requests, `Acknowledgement`
//! - `Profile`, `UpdateProfileRequest`
//! - `Ticket`, `TicketFilter`
//! - `CheckInLog`
//!
//! Response fields are optional and default when the server leaves them out.

pub mod auth;
pub mod checkin;
pub mod profile;
pub mod ticket;

pub use auth::{
    Acknowledgement, ChangePasswordRequest, LoginRequest, LoginSession, RecoveryRequest,
    ResetPasswordRequest, VerifyOtpRequest,
};
pub use checkin::CheckInLog;
pub use profile::{Profile, UpdateProfileRequest};
pub use ticket::{Ticket, TicketFilter};

/// Status value the service uses for a consumed ticket or a successful check-in
pub(crate) const STATUS_USED: &str = "used";

/// Accept a string or a bare number, yielding `None` for null or empty strings
pub(crate) fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}
