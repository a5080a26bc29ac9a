//! SLA classification from a ticket's due date.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ticket::Ticket;

/// Tickets due within this many seconds are "at risk".
pub const AT_RISK_WINDOW_SECS: i64 = 2 * 60 * 60;

/// On-track / at-risk / breached classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    OnTrack,
    AtRisk,
    Breached,
}

impl SlaStatus {
    /// Classifies a ticket relative to `now`.
    ///
    /// Breached: due date in the past and the ticket is neither resolved
    /// nor closed. At risk: due strictly within the next two hours and not
    /// settled. Everything else, including tickets without a due date, is
    /// on track.
    pub fn classify(ticket: &Ticket, now: DateTime<Utc>) -> Self {
        let Some(due) = ticket.due_date else {
            return SlaStatus::OnTrack;
        };
        if ticket.status.is_settled() {
            return SlaStatus::OnTrack;
        }

        let remaining = due - now;
        let window = Duration::seconds(AT_RISK_WINDOW_SECS);
        if remaining < Duration::zero() {
            SlaStatus::Breached
        } else if remaining > Duration::zero() && remaining < window {
            SlaStatus::AtRisk
        } else {
            SlaStatus::OnTrack
        }
    }
}

/// Returns true if the due date has passed, regardless of status.
pub fn is_overdue(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due.is_some_and(|due| now > due)
}
