//! Ticketdesk Core - Domain types and ticket view logic
//!
//! This crate provides the foundational types shared by the Ticketdesk
//! services: order records served by the order proxy, the ticket model,
//! and the pure filter/sort engine that derives the visible ticket list.
//!
//! Nothing in here performs I/O. Time and the acting user are passed in
//! explicitly through [`ViewContext`], so every operation is deterministic.

pub mod analytics;
pub mod error;
pub mod filter;
pub mod order;
pub mod ticket;
pub mod view;

pub use analytics::{
    DepartmentResolution, ViewSummary, category_counts, count_by, department_resolution,
};
pub use error::{DeskError, Result};
pub use filter::{
    AssigneeSelector, DateRange, QuickFilter, SlaStatus, SortDirection, SortField, SortSpec,
    TicketFilter, TicketQuery, ViewContext,
};
pub use order::{OrderLineId, OrderRecord};
pub use ticket::{Comment, Department, Priority, Ticket, TicketStatus, User};
pub use view::TicketView;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
