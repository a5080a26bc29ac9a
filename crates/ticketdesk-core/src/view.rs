//! Memoized ticket view.
//!
//! The visible list is recomputed from scratch, but only when one of its
//! inputs changes: the ticket list (tracked by a generation counter), the
//! query, or the signed-in user. The clock is read at recompute time and is
//! deliberately not part of the memo key, so SLA classification only moves
//! forward when some other input changes.

use crate::filter::{TicketQuery, ViewContext};
use crate::ticket::{Ticket, User};

#[derive(Debug, Clone)]
struct Memo {
    generation: u64,
    query: TicketQuery,
    user: Option<User>,
    indices: Vec<usize>,
}

/// Ticket list plus the last computed visible subset.
#[derive(Debug, Default)]
pub struct TicketView {
    tickets: Vec<Ticket>,
    generation: u64,
    memo: Option<Memo>,
    recomputes: u64,
}

impl TicketView {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            ..Default::default()
        }
    }

    /// Replaces the ticket list. Any memoized result is discarded.
    pub fn replace_tickets(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
        self.generation += 1;
    }

    /// The full, unfiltered list.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Returns the visible tickets for `query`, reusing the previous result
    /// when nothing in the memo key changed.
    pub fn visible(&mut self, query: &TicketQuery, ctx: &ViewContext) -> Vec<&Ticket> {
        let fresh = self.memo.as_ref().is_some_and(|memo| {
            memo.generation == self.generation
                && memo.query == *query
                && memo.user == ctx.current_user
        });

        if !fresh {
            let indices = query.apply_indices(&self.tickets, ctx);
            self.recomputes += 1;
            self.memo = Some(Memo {
                generation: self.generation,
                query: query.clone(),
                user: ctx.current_user.clone(),
                indices,
            });
        }

        match &self.memo {
            Some(memo) => memo.indices.iter().map(|&i| &self.tickets[i]).collect(),
            None => Vec::new(),
        }
    }

    /// How many times the visible list has been computed.
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{SortField, SortSpec};
    use crate::ticket::Department;
    use chrono::{Duration, TimeZone, Utc};

    fn tickets() -> Vec<Ticket> {
        let created = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap();
        (0..3)
            .map(|i| {
                Ticket::new(
                    format!("T-{i}"),
                    format!("Ticket number {i}"),
                    User::new("r", "Reporter"),
                    Department::new("ops", "Ops"),
                    created + Duration::hours(i),
                )
            })
            .collect()
    }

    #[test]
    fn test_same_inputs_reuse_result() {
        let mut view = TicketView::new(tickets());
        let ctx = ViewContext::new(Utc::now());
        let query = TicketQuery::text("ticket");

        assert_eq!(view.visible(&query, &ctx).len(), 3);
        assert_eq!(view.visible(&query, &ctx).len(), 3);
        assert_eq!(view.recompute_count(), 1);
    }

    #[test]
    fn test_changed_query_recomputes() {
        let mut view = TicketView::new(tickets());
        let ctx = ViewContext::new(Utc::now());

        view.visible(&TicketQuery::text("ticket"), &ctx);
        let visible = view.visible(&TicketQuery::text("number 1"), &ctx);

        assert_eq!(visible.len(), 1);
        assert_eq!(view.recompute_count(), 2);
    }

    #[test]
    fn test_replaced_tickets_recompute() {
        let mut view = TicketView::new(tickets());
        let ctx = ViewContext::new(Utc::now());
        let query = TicketQuery::default().with_sort(SortSpec::new(
            SortField::CreatedAt,
            Default::default(),
        ));

        assert_eq!(view.visible(&query, &ctx)[0].id, "T-2");

        let mut fewer = tickets();
        fewer.truncate(1);
        view.replace_tickets(fewer);

        assert_eq!(view.visible(&query, &ctx).len(), 1);
        assert_eq!(view.recompute_count(), 2);
    }

    #[test]
    fn test_user_change_recomputes() {
        let mut view = TicketView::new(tickets());
        let now = Utc::now();
        let query = TicketQuery::default();

        view.visible(&query, &ViewContext::new(now));
        view.visible(&query, &ViewContext::new(now).with_user(User::new("u", "U")));

        assert_eq!(view.recompute_count(), 2);
    }
}
