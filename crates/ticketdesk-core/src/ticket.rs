//! Ticket model as consumed by the filter engine.
//!
//! Tickets are owned by the surrounding application; the engine only reads
//! them. Only the fields that filtering, sorting and analytics look at are
//! modelled here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DeskError;

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    Triaged,
    Assigned,
    InProgress,
    AwaitingCustomer,
    AwaitingInternal,
    Escalated,
    Resolved,
    Closed,
    Cancelled,
}

impl TicketStatus {
    /// All statuses in workflow order.
    pub const ALL: [TicketStatus; 10] = [
        TicketStatus::New,
        TicketStatus::Triaged,
        TicketStatus::Assigned,
        TicketStatus::InProgress,
        TicketStatus::AwaitingCustomer,
        TicketStatus::AwaitingInternal,
        TicketStatus::Escalated,
        TicketStatus::Resolved,
        TicketStatus::Closed,
        TicketStatus::Cancelled,
    ];

    /// Wire name, e.g. `in_progress`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Triaged => "triaged",
            TicketStatus::Assigned => "assigned",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::AwaitingCustomer => "awaiting_customer",
            TicketStatus::AwaitingInternal => "awaiting_internal",
            TicketStatus::Escalated => "escalated",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// Human form used for free-text search, e.g. `in progress`.
    pub fn search_label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Resolved and closed tickets no longer count against their SLA.
    pub fn is_settled(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DeskError::unknown_value("ticket status", s))
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Ordinal used for sorting: critical=4, high=3, medium=2, low=1.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(DeskError::unknown_value("priority", other)),
        }
    }
}

/// A support agent or requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: String::new(),
        }
    }
}

/// Team that owns a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    /// Target resolution time in hours.
    #[serde(default)]
    pub sla_hours: Option<f64>,
}

impl Department {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            sla_hours: None,
        }
    }
}

/// A comment on a ticket thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub department: Department,
    #[serde(default)]
    pub assignee: Option<User>,
    pub reporter: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub issue_category: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    /// Minutes from creation to resolution, once resolved.
    #[serde(default)]
    pub resolution_time: Option<f64>,
}

impl Ticket {
    /// Creates a new open ticket with medium priority and no optional data.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        reporter: User,
        department: Department,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: TicketStatus::New,
            priority: Priority::Medium,
            department,
            assignee: None,
            reporter,
            created_at,
            updated_at: created_at,
            due_date: None,
            tags: Vec::new(),
            comments: Vec::new(),
            issue_category: None,
            order_number: None,
            resolution_time: None,
        }
    }

    /// Returns true if nobody is assigned.
    pub fn is_unassigned(&self) -> bool {
        self.assignee.is_none()
    }

    /// Id of the assignee, if any.
    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee.as_ref().map(|u| u.id.as_str())
    }
}
