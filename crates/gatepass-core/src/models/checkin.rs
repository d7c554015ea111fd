use serde::{Deserialize, Serialize};

use super::STATUS_USED;
use crate::utils::{contains_ignore_case, format_date_time};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInLog {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i64>,
    /// Staff member who scanned the ticket
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    #[serde(rename = "ticketCode", default, deserialize_with = "super::deserialize_string_or_number")]
    pub ticket_code: Option<String>,
    #[serde(rename = "ticketType", default)]
    pub ticket_type: Option<String>,
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "checkinTime", alias = "checkInTime", default)]
    pub check_in_time: Option<String>,
}

impl CheckInLog {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_USED)
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_success() {
            "Succeeded"
        } else {
            "Failed"
        }
    }

    pub fn checked_in_at(&self) -> String {
        format_date_time(self.check_in_time.as_deref())
    }

    /// Case-insensitive ticket code search; an empty query matches everything
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.ticket_code
            .as_deref()
            .map(|code| contains_ignore_case(code, query))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_check_in_log() {
        let log: CheckInLog = serde_json::from_value(json!({
            "id": 3,
            "userId": 9,
            "userName": "staff01",
            "eventName": "Summer Fest",
            "ticketCode": "TK-0012",
            "ticketType": "VIP",
            "customerName": "Alice",
            "status": "used",
            "checkinTime": "2025-06-20T18:05:00Z"
        }))
        .unwrap();
        assert!(log.is_success());
        assert_eq!(log.status_display(), "Succeeded");
        assert_eq!(log.checked_in_at(), "20/06/2025 18:05");
    }

    #[test]
    fn test_accepts_camel_case_check_in_time() {
        let log: CheckInLog =
            serde_json::from_value(json!({"ticketCode": 1001, "checkInTime": "2025-06-20T18:05:00"})).unwrap();
        assert_eq!(log.ticket_code.as_deref(), Some("1001"));
        assert_eq!(log.check_in_time.as_deref(), Some("2025-06-20T18:05:00"));
        assert!(!log.is_success());
    }

    #[test]
    fn test_matches_ticket_code() {
        let log = CheckInLog {
            ticket_code: Some("TK-0012".into()),
            ..Default::default()
        };
        assert!(log.matches(""));
        assert!(log.matches("tk-00"));
        assert!(!log.matches("tk-99"));
        assert!(!CheckInLog::default().matches("tk"));
    }
}
