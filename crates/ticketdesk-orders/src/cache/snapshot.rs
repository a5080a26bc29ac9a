//! Immutable order snapshots and substring search over them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ticketdesk_core::OrderRecord;

/// Maximum number of identifiers returned as suggestions.
pub const SUGGESTION_LIMIT: usize = 10;

/// One complete result of a refresh. Never mutated after construction;
/// a refresh replaces the whole snapshot.
#[derive(Debug)]
pub struct Snapshot {
    records: Vec<OrderRecord>,
    /// Lowercased identifiers, index-aligned with `records`.
    folded: Vec<String>,
    fetched_at: DateTime<Utc>,
    seq: u64,
}

/// Match counts within the returned page of results.
///
/// The categories nest: every exact match is also a prefix match, and every
/// prefix match is also a contains match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub exact_matches: usize,
    pub prefix_matches: usize,
    pub contains_matches: usize,
    /// Always zero; there is no fuzzy matching.
    pub fuzzy_matches: usize,
}

/// Records matching a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub records: Vec<OrderRecord>,
    pub suggestions: Vec<String>,
    pub stats: SearchStats,
}

impl Snapshot {
    pub(crate) fn new(records: Vec<OrderRecord>, fetched_at: DateTime<Utc>, seq: u64) -> Self {
        let folded = records
            .iter()
            .map(|r| r.order_line_id.as_str().to_lowercase())
            .collect();
        Self {
            records,
            folded,
            fetched_at,
            seq,
        }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Case-insensitive substring search on order identifiers.
    ///
    /// The query is matched as given, surrounding whitespace included. An
    /// empty query matches every record. Results keep snapshot order and
    /// are cut to `limit`; suggestions are drawn from the whole snapshot.
    pub fn search(&self, query: &str, limit: usize) -> SearchHits {
        let folded_query = query.to_lowercase();
        let needle = folded_query.as_str();
        let folded = &self.folded;
        let matching = move || {
            folded
                .iter()
                .enumerate()
                .filter(move |(_, id)| id.contains(needle))
                .map(|(i, _)| i)
        };

        let page: Vec<usize> = matching().take(limit).collect();

        let mut suggestions: Vec<String> = Vec::with_capacity(SUGGESTION_LIMIT);
        for i in matching() {
            if suggestions.len() == SUGGESTION_LIMIT {
                break;
            }
            let id = self.records[i].order_line_id.as_str();
            if !suggestions.iter().any(|s| s == id) {
                suggestions.push(id.to_string());
            }
        }

        let stats = SearchStats {
            exact_matches: page.iter().filter(|&&i| self.folded[i] == needle).count(),
            prefix_matches: page
                .iter()
                .filter(|&&i| self.folded[i].starts_with(needle))
                .count(),
            contains_matches: page.len(),
            fuzzy_matches: 0,
        };

        SearchHits {
            records: page.into_iter().map(|i| self.records[i].clone()).collect(),
            suggestions,
            stats,
        }
    }

    /// Looks up a record by identifier, ignoring surrounding whitespace.
    pub fn get(&self, order_line_id: &str) -> Option<&OrderRecord> {
        let wanted = order_line_id.trim();
        self.records
            .iter()
            .find(|r| r.order_line_id.normalized() == wanted)
    }
}
