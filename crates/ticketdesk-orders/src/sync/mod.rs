//! Scheduled cache refresh.

mod scheduler;

pub use scheduler::{RefreshConfig, RefreshHandle, RefreshScheduler};
