//! Summary numbers shown alongside a ticket view.
//!
//! Plain reductions over the visible list: counts, means and a p90. No
//! smoothing or weighting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::filter::is_overdue;
use crate::ticket::{Department, Priority, Ticket, TicketStatus};

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Headline counts for the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSummary {
    pub total: usize,
    pub critical: usize,
    /// Due date in the past, whatever the status.
    pub overdue: usize,
    pub unassigned: usize,
    /// Mean age since creation, in days. Zero for an empty view.
    pub avg_age_days: f64,
}

impl ViewSummary {
    pub fn compute(tickets: &[&Ticket], now: DateTime<Utc>) -> Self {
        let total = tickets.len();
        let critical = tickets
            .iter()
            .filter(|t| t.priority == Priority::Critical)
            .count();
        let overdue = tickets
            .iter()
            .filter(|t| is_overdue(t.due_date, now))
            .count();
        let unassigned = tickets.iter().filter(|t| t.is_unassigned()).count();

        let avg_age_days = if total == 0 {
            0.0
        } else {
            let total_ms: i64 = tickets
                .iter()
                .map(|t| (now - t.created_at).num_milliseconds())
                .sum();
            total_ms as f64 / total as f64 / MS_PER_DAY
        };

        Self {
            total,
            critical,
            overdue,
            unassigned,
            avg_age_days,
        }
    }
}

/// Resolution statistics for one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResolution {
    pub department_id: String,
    pub department_name: String,
    pub total_tickets: usize,
    pub resolved_tickets: usize,
    pub avg_resolution_hours: f64,
    pub p90_resolution_hours: f64,
    pub sla_hours: Option<f64>,
    /// `(sla - avg) / sla * 100`; zero when there is no average or no SLA.
    pub performance_pct: f64,
}

/// Computes per-department resolution stats, skipping departments with no
/// tickets in the view.
///
/// Only resolved tickets with a recorded, non-zero resolution time count
/// towards the averages.
pub fn department_resolution(
    departments: &[Department],
    tickets: &[&Ticket],
) -> Vec<DepartmentResolution> {
    departments
        .iter()
        .filter_map(|dept| {
            let dept_tickets: Vec<&&Ticket> = tickets
                .iter()
                .filter(|t| t.department.id == dept.id)
                .collect();
            if dept_tickets.is_empty() {
                return None;
            }

            let mut minutes: Vec<f64> = dept_tickets
                .iter()
                .filter(|t| t.status == TicketStatus::Resolved)
                .filter_map(|t| t.resolution_time)
                .filter(|m| *m > 0.0)
                .collect();
            minutes.sort_by(f64::total_cmp);

            let avg_resolution_hours = if minutes.is_empty() {
                0.0
            } else {
                minutes.iter().sum::<f64>() / minutes.len() as f64 / 60.0
            };
            let p90_resolution_hours = p90(&minutes) / 60.0;

            let performance_pct = match dept.sla_hours {
                Some(sla) if avg_resolution_hours > 0.0 && sla > 0.0 => {
                    (sla - avg_resolution_hours) / sla * 100.0
                },
                _ => 0.0,
            };

            Some(DepartmentResolution {
                department_id: dept.id.clone(),
                department_name: dept.name.clone(),
                total_tickets: dept_tickets.len(),
                resolved_tickets: minutes.len(),
                avg_resolution_hours,
                p90_resolution_hours,
                sla_hours: dept.sla_hours,
                performance_pct,
            })
        })
        .collect()
}

/// Value at index `floor(len * 0.9)` of an ascending slice, or the last one.
fn p90(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (sorted.len() as f64 * 0.9).floor() as usize;
    sorted
        .get(index)
        .or(sorted.last())
        .copied()
        .unwrap_or(0.0)
}

/// Counts tickets by an arbitrary key.
///
/// ```
/// use ticketdesk_core::count_by;
///
/// let by_status = count_by(&[], |t| t.status);
/// assert!(by_status.is_empty());
/// ```
pub fn count_by<K, F>(tickets: &[&Ticket], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&Ticket) -> K,
{
    tickets.iter().fold(BTreeMap::new(), |mut acc, t| {
        *acc.entry(key(*t)).or_insert(0) += 1;
        acc
    })
}

/// Category counts, most frequent first. Tickets without a category are
/// left out.
pub fn category_counts(tickets: &[&Ticket]) -> Vec<(String, usize)> {
    let counts = tickets
        .iter()
        .filter_map(|t| t.issue_category.clone())
        .fold(BTreeMap::new(), |mut acc: BTreeMap<String, usize>, c| {
            *acc.entry(c).or_insert(0) += 1;
            acc
        });

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
