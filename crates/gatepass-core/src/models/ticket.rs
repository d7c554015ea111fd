use serde::{Deserialize, Serialize};

use super::STATUS_USED;
use crate::utils::{contains_ignore_case, ensure_valid_url, format_date};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "ticketType", default)]
    pub ticket_type: Option<String>,
    #[serde(rename = "qrCode", default)]
    pub qr_code: Option<String>,
    #[serde(rename = "ticketCode", default, deserialize_with = "super::deserialize_string_or_number")]
    pub ticket_code: Option<String>,
}

impl Ticket {
    pub fn is_used(&self) -> bool {
        self.status.as_deref() == Some(STATUS_USED)
    }

    /// Link to the QR image, with a scheme added when the server omits one
    pub fn qr_code_url(&self) -> Option<String> {
        self.qr_code.as_deref().and_then(ensure_valid_url)
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_used() {
            "Used"
        } else {
            "Not used"
        }
    }

    pub fn purchased_on(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}

/// Ticket list filtering: event name search plus a hide-used toggle
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub query: String,
    pub unused_only: bool,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.unused_only && ticket.is_used() {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        ticket
            .event_name
            .as_deref()
            .map(|name| contains_ignore_case(name, &self.query))
            .unwrap_or(false)
    }

    pub fn apply<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t)).collect()
    }
}
