//! Order cache and search.

mod order_cache;
mod snapshot;
mod state;

pub use order_cache::{CacheInfo, OrderCache, RefreshReport, SearchOutcome};
pub use snapshot::{SUGGESTION_LIMIT, SearchHits, SearchStats, Snapshot};
pub use state::{CacheState, RefreshTotals};
