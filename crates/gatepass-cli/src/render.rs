//! Plain-text output for profiles, tickets, and check-in history.

use gatepass_core::models::{CheckInLog, Profile, Ticket};
use gatepass_core::utils::truncate;

/// Column width for event names in list output
const EVENT_COLUMN_WIDTH: usize = 28;

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("Unknown")
}

pub fn print_profile(profile: &Profile) {
    println!("Name:     {}", profile.display_name());
    println!("Username: {}", or_unknown(profile.username.as_deref()));
    println!("Email:    {}", or_unknown(profile.email.as_deref()));
    println!("Phone:    {}", or_unknown(profile.phone_number.as_deref()));
    match profile.age {
        Some(age) => println!("Age:      {}", age),
        None => println!("Age:      Unknown"),
    }
    println!("Joined:   {}", profile.member_since());
}

pub fn print_tickets(tickets: &[&Ticket], show_qr: bool) {
    if tickets.is_empty() {
        println!("No tickets found.");
        return;
    }

    println!(
        "{:<12} {:<width$} {:<10} {:<9} {}",
        "CODE",
        "EVENT",
        "TYPE",
        "STATUS",
        "PURCHASED",
        width = EVENT_COLUMN_WIDTH
    );
    for ticket in tickets {
        println!(
            "{:<12} {:<width$} {:<10} {:<9} {}",
            or_unknown(ticket.ticket_code.as_deref()),
            truncate(or_unknown(ticket.event_name.as_deref()), EVENT_COLUMN_WIDTH),
            or_unknown(ticket.ticket_type.as_deref()),
            ticket.status_display(),
            ticket.purchased_on(),
            width = EVENT_COLUMN_WIDTH
        );
        if show_qr {
            match ticket.qr_code_url() {
                Some(url) => println!("  QR: {}", url),
                None => println!("  QR: not available"),
            }
        }
    }
}

pub fn print_check_in_logs(logs: &[&CheckInLog]) {
    if logs.is_empty() {
        println!("No check-ins found.");
        return;
    }

    for log in logs {
        println!("Ticket {}", or_unknown(log.ticket_code.as_deref()));
        println!("  Event:    {}", or_unknown(log.event_name.as_deref()));
        println!(
            "  Customer: {} | Type: {}",
            or_unknown(log.customer_name.as_deref()),
            or_unknown(log.ticket_type.as_deref())
        );
        println!("  Status:   {}", log.status_display());
        println!("  Time:     {}", log.checked_in_at());
        println!("  Staff:    {}", or_unknown(log.user_name.as_deref()));
    }
}

pub fn print_home(tickets: &[Ticket], logs: &[CheckInLog]) {
    let unused = tickets.iter().filter(|t| !t.is_used()).count();
    println!("Tickets:   {} ({} not used yet)", tickets.len(), unused);
    println!("Check-ins: {}", logs.len());
    if let Some(latest) = logs.first() {
        println!(
            "Latest:    {} at {}",
            or_unknown(latest.event_name.as_deref()),
            latest.checked_in_at()
        );
    }
}
