//! Utility functions for display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, ensure_valid_url, format_date, format_date_time, truncate};
