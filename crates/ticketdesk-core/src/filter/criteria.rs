//! Structured filter criteria.
//!
//! Every recognised key is a typed field. `None` means "not set"; a set
//! but empty list is kept distinct (it counts as an active filter key)
//! but imposes no constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ViewContext;
use super::sla::SlaStatus;
use crate::ticket::{Priority, Ticket, TicketStatus};

/// Sentinel used on the wire for "no assignee".
pub const UNASSIGNED: &str = "unassigned";

/// One entry of the assignee filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssigneeSelector {
    /// Matches tickets that have no assignee.
    Unassigned,
    /// Matches tickets assigned to the user with this id.
    User(String),
}

impl From<String> for AssigneeSelector {
    fn from(value: String) -> Self {
        if value == UNASSIGNED {
            AssigneeSelector::Unassigned
        } else {
            AssigneeSelector::User(value)
        }
    }
}

impl From<AssigneeSelector> for String {
    fn from(value: AssigneeSelector) -> Self {
        match value {
            AssigneeSelector::Unassigned => UNASSIGNED.to_string(),
            AssigneeSelector::User(id) => id,
        }
    }
}

/// Half-open creation-date window `[start, end)`. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Returns true if `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if self.start.is_some_and(|start| at < start) {
            return false;
        }
        if self.end.is_some_and(|end| at >= end) {
            return false;
        }
        true
    }
}

/// Structured criteria applied after the free-text match.
/// All populated keys combine with logical AND.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<TicketStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<Priority>>,
    /// Department ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Vec<AssigneeSelector>>,
    /// Reporter user ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_status: Option<SlaStatus>,
    /// Only tickets whose comments mention the current user.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mentions_me: bool,
    /// Creation-date window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateRange>,
}

/// Returns the list only when it actually constrains the result.
fn constraining<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    list.as_deref().filter(|items| !items.is_empty())
}

impl TicketFilter {
    /// A filter with no keys set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Number of keys that are set, including keys set to an empty list.
    pub fn active_count(&self) -> usize {
        [
            self.status.is_some(),
            self.priority.is_some(),
            self.department.is_some(),
            self.assignee.is_some(),
            self.reporter.is_some(),
            self.sla_status.is_some(),
            self.mentions_me,
            self.created.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Returns true if no key is set.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Tests a single ticket against every populated key.
    pub fn matches(&self, ticket: &Ticket, ctx: &ViewContext) -> bool {
        if let Some(statuses) = constraining(&self.status)
            && !statuses.contains(&ticket.status)
        {
            return false;
        }
        if let Some(priorities) = constraining(&self.priority)
            && !priorities.contains(&ticket.priority)
        {
            return false;
        }
        if let Some(departments) = constraining(&self.department)
            && !departments.iter().any(|id| *id == ticket.department.id)
        {
            return false;
        }
        if let Some(selectors) = constraining(&self.assignee)
            && !assignee_matches(selectors, ticket)
        {
            return false;
        }
        if let Some(reporters) = constraining(&self.reporter)
            && !reporters.iter().any(|id| *id == ticket.reporter.id)
        {
            return false;
        }
        if let Some(wanted) = self.sla_status
            && SlaStatus::classify(ticket, ctx.now) != wanted
        {
            return false;
        }
        if self.mentions_me
            && let Some(user) = &ctx.current_user
            && !mentions(ticket, &user.name)
        {
            return false;
        }
        if let Some(range) = &self.created
            && !range.contains(ticket.created_at)
        {
            return false;
        }
        true
    }
}

/// When the sentinel is present only unassigned tickets pass, even if user
/// ids are listed alongside it. Otherwise the assignee must be listed.
fn assignee_matches(selectors: &[AssigneeSelector], ticket: &Ticket) -> bool {
    if selectors.contains(&AssigneeSelector::Unassigned) {
        return ticket.is_unassigned();
    }
    match ticket.assignee_id() {
        Some(id) => selectors
            .iter()
            .any(|s| matches!(s, AssigneeSelector::User(user) if user == id)),
        None => false,
    }
}

/// Raw `@<name>` substring scan over comment text. A user named "Al" is
/// also "mentioned" by "@Alex"; see DESIGN.md.
pub fn mentions(ticket: &Ticket, user_name: &str) -> bool {
    let needle = format!("@{user_name}");
    ticket.comments.iter().any(|c| c.content.contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{Comment, Department, User};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn ticket(id: &str) -> Ticket {
        Ticket::new(
            id,
            "Item damaged",
            User::new("rep-1", "Rita"),
            Department::new("ops", "Operations"),
            now() - Duration::days(1),
        )
    }

    fn comment(content: &str) -> Comment {
        Comment {
            id: "c1".to_string(),
            content: content.to_string(),
            author: User::new("u9", "Bo"),
            created_at: now(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let ctx = ViewContext::new(now());
        assert!(TicketFilter::none().matches(&ticket("T-1"), &ctx));
    }

    #[test]
    fn test_empty_list_is_active_but_unconstraining() {
        let filter = TicketFilter {
            status: Some(vec![]),
            ..Default::default()
        };

        assert_eq!(filter.active_count(), 1);
        assert!(filter.matches(&ticket("T-1"), &ViewContext::new(now())));
    }

    #[test]
    fn test_status_and_priority_combine_with_and() {
        let ctx = ViewContext::new(now());
        let mut t = ticket("T-1");
        t.status = TicketStatus::Escalated;
        t.priority = Priority::Low;

        let filter = TicketFilter {
            status: Some(vec![TicketStatus::Escalated]),
            priority: Some(vec![Priority::Critical, Priority::High]),
            ..Default::default()
        };
        assert!(!filter.matches(&t, &ctx));

        t.priority = Priority::High;
        assert!(filter.matches(&t, &ctx));
    }

    #[test]
    fn test_unassigned_sentinel() {
        let ctx = ViewContext::new(now());
        let unassigned = ticket("T-1");
        let mut assigned = ticket("T-2");
        assigned.assignee = Some(User::new("agent-1", "Kim"));

        let only_unassigned = TicketFilter {
            assignee: Some(vec![AssigneeSelector::Unassigned]),
            ..Default::default()
        };
        assert!(only_unassigned.matches(&unassigned, &ctx));
        assert!(!only_unassigned.matches(&assigned, &ctx));

        // The sentinel wins over listed ids.
        let mixed = TicketFilter {
            assignee: Some(vec![
                AssigneeSelector::Unassigned,
                AssigneeSelector::User("agent-1".to_string()),
            ]),
            ..Default::default()
        };
        assert!(!mixed.matches(&assigned, &ctx));

        let by_id = TicketFilter {
            assignee: Some(vec![AssigneeSelector::User("agent-1".to_string())]),
            ..Default::default()
        };
        assert!(by_id.matches(&assigned, &ctx));
        assert!(!by_id.matches(&unassigned, &ctx));
    }

    #[test]
    fn test_assignee_selector_wire_form() {
        let selectors: Vec<AssigneeSelector> =
            serde_json::from_str(r#"["unassigned", "agent-7"]"#).unwrap();

        assert_eq!(selectors[0], AssigneeSelector::Unassigned);
        assert_eq!(selectors[1], AssigneeSelector::User("agent-7".to_string()));
    }

    #[test]
    fn test_mentions_filter_uses_current_user_name() {
        let mut t = ticket("T-1");
        t.comments.push(comment("Looping in @Dana for the refund"));
        let filter = TicketFilter {
            mentions_me: true,
            ..Default::default()
        };

        let dana = ViewContext::new(now()).with_user(User::new("u1", "Dana"));
        let eli = ViewContext::new(now()).with_user(User::new("u2", "Eli"));
        assert!(filter.matches(&t, &dana));
        assert!(!filter.matches(&t, &eli));

        // Without a current user the flag has nothing to compare against.
        assert!(filter.matches(&t, &ViewContext::new(now())));
    }

    #[test]
    fn test_mentions_is_a_raw_substring_scan() {
        let mut t = ticket("T-1");
        t.comments.push(comment("cc @Alexandra"));

        assert!(mentions(&t, "Alex"));
    }

    #[test]
    fn test_created_range_is_half_open() {
        let ctx = ViewContext::new(now());
        let t = ticket("T-1");
        let created = t.created_at;

        let including = TicketFilter {
            created: Some(DateRange::new(Some(created), Some(created + Duration::hours(1)))),
            ..Default::default()
        };
        let excluding = TicketFilter {
            created: Some(DateRange::new(None, Some(created))),
            ..Default::default()
        };

        assert!(including.matches(&t, &ctx));
        assert!(!excluding.matches(&t, &ctx));
    }

    #[test]
    fn test_sla_filter() {
        let ctx = ViewContext::new(now());
        let mut t = ticket("T-1");
        t.status = TicketStatus::InProgress;
        t.due_date = Some(now() - Duration::days(1));

        let breached = TicketFilter {
            sla_status: Some(SlaStatus::Breached),
            ..Default::default()
        };
        let on_track = TicketFilter {
            sla_status: Some(SlaStatus::OnTrack),
            ..Default::default()
        };

        assert!(breached.matches(&t, &ctx));
        assert!(!on_track.matches(&t, &ctx));
    }

    #[test]
    fn test_filter_deserializes_camel_case() {
        let filter: TicketFilter = serde_json::from_str(
            r#"{"status": ["new"], "slaStatus": "at_risk", "mentionsMe": true}"#,
        )
        .unwrap();

        assert_eq!(filter.status, Some(vec![TicketStatus::New]));
        assert_eq!(filter.sla_status, Some(SlaStatus::AtRisk));
        assert!(filter.mentions_me);
        assert_eq!(filter.active_count(), 3);
    }
}
