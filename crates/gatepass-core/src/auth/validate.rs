//! Client-side checks run on form input before any request is sent.

use thiserror::Error;

/// Minimum length for a newly chosen password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Number of digits in a recovery code
pub const OTP_LENGTH: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("New password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    #[error("Verification code must be {OTP_LENGTH} digits")]
    InvalidOtp,
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

pub fn new_password(value: &str) -> Result<(), ValidationError> {
    require("New password", value)?;
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn otp(value: &str) -> Result<(), ValidationError> {
    require("Verification code", value)?;
    if value.len() == OTP_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidOtp)
    }
}
