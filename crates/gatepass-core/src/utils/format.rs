use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown when a timestamp is missing
const UNKNOWN: &str = "Unknown";

/// Shown when a timestamp is present but unreadable
const INVALID: &str = "Invalid";

/// Parse the timestamp shapes the service emits: RFC 3339 with an offset,
/// naive ISO date-times (optionally fractional), or a bare date.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        // Keep the wall-clock time the server reported
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_with(value: Option<&str>, pattern: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => UNKNOWN.to_string(),
        Some(v) => parse_timestamp(v)
            .map(|dt| dt.format(pattern).to_string())
            .unwrap_or_else(|| INVALID.to_string()),
    }
}

/// Format a timestamp as `dd/mm/yyyy`
pub fn format_date(value: Option<&str>) -> String {
    format_with(value, "%d/%m/%Y")
}

/// Format a timestamp as `dd/mm/yyyy HH:MM`
pub fn format_date_time(value: Option<&str>) -> String {
    format_with(value, "%d/%m/%Y %H:%M")
}

/// Make a link loadable: keep an http(s) scheme, otherwise prepend `http://`.
/// Empty input yields `None`.
pub fn ensure_valid_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        None
    } else if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        Some(format!("http://{}", url))
    }
}

/// Case-insensitive substring check
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
