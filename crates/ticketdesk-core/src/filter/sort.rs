//! Ordering of the filtered ticket list.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::ticket::Ticket;

/// Field the ticket list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    UpdatedAt,
    CreatedAt,
    Priority,
    DueDate,
}

/// Sort direction. Lists start out descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Clicking the active field flips the direction; a new field starts
    /// descending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Desc)
        }
    }

    /// Compares two tickets under this spec.
    ///
    /// Tickets without a due date always come after the ones that have one,
    /// whatever the direction.
    pub fn compare(&self, a: &Ticket, b: &Ticket) -> Ordering {
        match self.field {
            SortField::Priority => self
                .direction
                .apply(a.priority.rank().cmp(&b.priority.rank())),
            SortField::CreatedAt => self.direction.apply(a.created_at.cmp(&b.created_at)),
            SortField::UpdatedAt => self.direction.apply(a.updated_at.cmp(&b.updated_at)),
            SortField::DueDate => match (a.due_date, b.due_date) {
                (Some(a_due), Some(b_due)) => self.direction.apply(a_due.cmp(&b_due)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }

    /// Sorts in place. The sort is stable, so ties keep input order.
    pub fn sort(&self, tickets: &mut [&Ticket]) {
        tickets.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{Department, Priority, User};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap()
    }

    fn ticket(id: &str, priority: Priority, due_in_hours: Option<i64>) -> Ticket {
        let mut t = Ticket::new(
            id,
            "t",
            User::new("r", "R"),
            Department::new("d", "D"),
            base(),
        );
        t.priority = priority;
        t.due_date = due_in_hours.map(|h| base() + Duration::hours(h));
        t
    }

    fn ids(tickets: &[&Ticket]) -> Vec<String> {
        tickets.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_priority_descending_regardless_of_input_order() {
        let low = ticket("low", Priority::Low, None);
        let crit = ticket("crit", Priority::Critical, None);
        let med = ticket("med", Priority::Medium, None);
        let high = ticket("high", Priority::High, None);
        let mut list = vec![&low, &med, &crit, &high];

        SortSpec::new(SortField::Priority, SortDirection::Desc).sort(&mut list);

        assert_eq!(ids(&list), vec!["crit", "high", "med", "low"]);
    }

    #[test]
    fn test_due_date_missing_sorts_last_in_both_directions() {
        let none = ticket("none", Priority::Low, None);
        let soon = ticket("soon", Priority::Low, Some(1));
        let later = ticket("later", Priority::Low, Some(48));
        let mut list = vec![&none, &soon, &later];

        SortSpec::new(SortField::DueDate, SortDirection::Desc).sort(&mut list);
        assert_eq!(ids(&list), vec!["later", "soon", "none"]);

        SortSpec::new(SortField::DueDate, SortDirection::Asc).sort(&mut list);
        assert_eq!(ids(&list), vec!["soon", "later", "none"]);
    }

    #[test]
    fn test_dates_sort_descending_by_default() {
        let mut old = ticket("old", Priority::Low, None);
        let mut new = ticket("new", Priority::Low, None);
        old.updated_at = base();
        new.updated_at = base() + Duration::days(1);
        let mut list = vec![&old, &new];

        SortSpec::default().sort(&mut list);

        assert_eq!(ids(&list), vec!["new", "old"]);
    }

    #[test]
    fn test_toggle() {
        let spec = SortSpec::default();

        let flipped = spec.toggle(SortField::UpdatedAt);
        assert_eq!(flipped.direction, SortDirection::Asc);

        let switched = flipped.toggle(SortField::Priority);
        assert_eq!(switched, SortSpec::new(SortField::Priority, SortDirection::Desc));
    }
}
