//! Ticket filter/sort engine.
//!
//! Derives the ordered subset of tickets to display from the full list, a
//! free-text query, structured criteria and a sort spec:
//!
//! 1. free-text: every query term must occur in the ticket's searchable text
//! 2. structured criteria: every populated [`TicketFilter`] key must pass
//! 3. sort: by [`SortSpec`], stable
//!
//! The engine never mutates tickets and always returns a subset of its input.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use ticketdesk_core::{TicketQuery, ViewContext};
//!
//! let query = TicketQuery::text("refund");
//! let visible = query.apply(&[], &ViewContext::new(Utc::now()));
//! assert!(visible.is_empty());
//! ```

mod criteria;
mod preset;
mod sla;
mod sort;
mod text;

pub use criteria::{AssigneeSelector, DateRange, TicketFilter, UNASSIGNED, mentions};
pub use preset::QuickFilter;
pub use sla::{AT_RISK_WINDOW_SECS, SlaStatus, is_overdue};
pub use sort::{SortDirection, SortField, SortSpec};
pub use text::{matches_terms, search_terms, searchable_text};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ticket::{Ticket, User};

/// Inputs that come from outside the ticket list: the clock and the
/// signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub now: DateTime<Utc>,
    pub current_user: Option<User>,
}

impl ViewContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            current_user: None,
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.current_user = Some(user);
        self
    }
}

/// Everything that determines the visible ticket list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TicketQuery {
    /// Raw free-text query as typed.
    pub search: String,
    pub filter: TicketFilter,
    pub sort: SortSpec,
}

impl TicketQuery {
    /// A query with free text only, default sort.
    pub fn text(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: TicketFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the matching tickets in display order.
    pub fn apply<'a>(&self, tickets: &'a [Ticket], ctx: &ViewContext) -> Vec<&'a Ticket> {
        self.apply_indices(tickets, ctx)
            .into_iter()
            .map(|i| &tickets[i])
            .collect()
    }

    /// Like [`apply`](Self::apply) but returns positions into `tickets`.
    pub fn apply_indices(&self, tickets: &[Ticket], ctx: &ViewContext) -> Vec<usize> {
        let terms = search_terms(&self.search);

        let mut visible: Vec<usize> = tickets
            .iter()
            .enumerate()
            .filter(|(_, t)| matches_terms(t, &terms) && self.filter.matches(t, ctx))
            .map(|(i, _)| i)
            .collect();

        visible.sort_by(|&a, &b| self.sort.compare(&tickets[a], &tickets[b]));
        visible
    }
}
