//! Free-text matching.
//!
//! A ticket matches a query when every whitespace-separated term of the
//! query appears somewhere in the ticket's searchable text. Matching is an
//! AND of case-folded substring tests; there is no ranking.

use crate::ticket::Ticket;

/// Splits a raw query into lowercase terms, dropping empty ones.
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Builds the lowercase haystack searched by free-text queries.
///
/// Covers title, description, id, assignee and reporter names, department
/// name, category, order number, tags, status and priority.
pub fn searchable_text(ticket: &Ticket) -> String {
    let status = ticket.status.search_label();
    let assignee = ticket.assignee.as_ref().map(|u| u.name.as_str()).unwrap_or("");

    let mut parts: Vec<&str> = vec![
        &ticket.title,
        &ticket.description,
        &ticket.id,
        assignee,
        &ticket.reporter.name,
        &ticket.department.name,
        ticket.issue_category.as_deref().unwrap_or(""),
        ticket.order_number.as_deref().unwrap_or(""),
    ];
    parts.extend(ticket.tags.iter().map(String::as_str));
    parts.push(&status);
    parts.push(ticket.priority.as_str());

    parts.join(" ").to_lowercase()
}

/// Returns true if every term occurs in the ticket's searchable text.
/// An empty term list matches everything.
pub fn matches_terms(ticket: &Ticket, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = searchable_text(ticket);
    terms.iter().all(|term| haystack.contains(term.as_str()))
}
