//! One-click filter presets offered above the ticket list.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ViewContext;
use super::criteria::{AssigneeSelector, DateRange, TicketFilter};
use super::sla::SlaStatus;
use crate::ticket::Priority;

/// Named quick filters. Each one replaces the whole filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    AssignedToMe,
    Mentions,
    ReportedByMe,
    Overdue,
    HighPriority,
    Unassigned,
    Today,
}

impl QuickFilter {
    /// Builds the filter for this preset.
    ///
    /// Presets that depend on the current user produce an empty (and so
    /// unconstraining) list when nobody is signed in. "Today" is the UTC
    /// calendar day containing `ctx.now`.
    pub fn to_filter(self, ctx: &ViewContext) -> TicketFilter {
        let me = ctx.current_user.as_ref().map(|u| u.id.clone());

        match self {
            QuickFilter::AssignedToMe => TicketFilter {
                assignee: Some(me.map(AssigneeSelector::User).into_iter().collect()),
                ..Default::default()
            },
            QuickFilter::Mentions => TicketFilter {
                mentions_me: true,
                ..Default::default()
            },
            QuickFilter::ReportedByMe => TicketFilter {
                reporter: Some(me.into_iter().collect()),
                ..Default::default()
            },
            QuickFilter::Overdue => TicketFilter {
                sla_status: Some(SlaStatus::Breached),
                ..Default::default()
            },
            QuickFilter::HighPriority => TicketFilter {
                priority: Some(vec![Priority::Critical, Priority::High]),
                ..Default::default()
            },
            QuickFilter::Unassigned => TicketFilter {
                assignee: Some(vec![AssigneeSelector::Unassigned]),
                ..Default::default()
            },
            QuickFilter::Today => {
                let start = ctx.now.date_naive().and_time(NaiveTime::default()).and_utc();
                TicketFilter {
                    created: Some(DateRange::new(Some(start), Some(start + Duration::days(1)))),
                    ..Default::default()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::User;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_assigned_to_me_uses_current_user() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let ctx = ViewContext::new(now).with_user(User::new("agent-3", "Noor"));

        let filter = QuickFilter::AssignedToMe.to_filter(&ctx);

        assert_eq!(
            filter.assignee,
            Some(vec![AssigneeSelector::User("agent-3".to_string())])
        );
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn test_assigned_to_me_without_user_is_unconstraining() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let filter = QuickFilter::AssignedToMe.to_filter(&ViewContext::new(now));

        assert_eq!(filter.assignee, Some(vec![]));
    }

    #[test]
    fn test_today_spans_the_utc_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 17, 45, 0).unwrap();
        let filter = QuickFilter::Today.to_filter(&ViewContext::new(now));
        let range = filter.created.unwrap();

        assert_eq!(range.start, Some(Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()));
        assert_eq!(range.end, Some(Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_overdue_and_high_priority() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let ctx = ViewContext::new(now);

        assert_eq!(
            QuickFilter::Overdue.to_filter(&ctx).sla_status,
            Some(SlaStatus::Breached)
        );
        assert_eq!(
            QuickFilter::HighPriority.to_filter(&ctx).priority,
            Some(vec![Priority::Critical, Priority::High])
        );
    }
}
