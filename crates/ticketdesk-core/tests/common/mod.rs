#![allow(dead_code)]
use chrono::{DateTime, Duration, TimeZone, Utc};
use ticketdesk_core::{Comment, Department, Priority, Ticket, TicketStatus, User};

/// Fixed clock used by every fixture.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
}

pub fn ops() -> Department {
    Department::new("ops", "Operations")
}

pub fn finance() -> Department {
    Department::new("fin", "Finance")
}

pub fn agent(id: &str, name: &str) -> User {
    User::new(id, name)
}

/// Builds a ticket created `age_hours` before [`now`].
pub fn ticket(id: &str, title: &str, priority: Priority, age_hours: i64) -> Ticket {
    let mut t = Ticket::new(
        id,
        title,
        agent("rep-1", "Rosa Diaz"),
        ops(),
        now() - Duration::hours(age_hours),
    );
    t.priority = priority;
    t
}

pub fn with_status(mut t: Ticket, status: TicketStatus) -> Ticket {
    t.status = status;
    t
}

pub fn with_due(mut t: Ticket, due_in_hours: i64) -> Ticket {
    t.due_date = Some(now() + Duration::hours(due_in_hours));
    t
}

pub fn with_comment(mut t: Ticket, content: &str) -> Ticket {
    t.comments.push(Comment {
        id: format!("{}-c{}", t.id, t.comments.len()),
        content: content.to_string(),
        author: agent("u-x", "Someone"),
        created_at: now(),
    });
    t
}

/// A mixed backlog covering every priority and SLA state.
pub fn backlog() -> Vec<Ticket> {
    let mut lost = ticket("T-1", "Courier lost parcel", Priority::High, 30);
    lost.assignee = Some(agent("a-1", "Ada"));
    lost.order_number = Some("ORD-001".to_string());
    lost.tags = vec!["courier".to_string(), "shipping".to_string()];

    let mut refund = ticket("T-2", "Refund not processed", Priority::Critical, 5);
    refund.department = finance();
    refund.issue_category = Some("Refunds not processed".to_string());

    vec![
        with_status(with_due(lost, -24), TicketStatus::InProgress),
        with_due(refund, 1),
        with_comment(
            ticket("T-3", "Discount voucher rejected", Priority::Low, 2),
            "@Ada can you check the voucher?",
        ),
        with_status(
            with_due(ticket("T-4", "Damage in transit", Priority::Medium, 50), -2),
            TicketStatus::Resolved,
        ),
    ]
}
