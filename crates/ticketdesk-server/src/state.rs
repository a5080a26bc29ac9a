//! Application state.

use std::sync::Arc;

use ticketdesk_orders::OrderCache;

use crate::settings::Settings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The order cache.
    cache: OrderCache,
    /// Settings loaded at startup.
    settings: Arc<Settings>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(cache: OrderCache, settings: Settings) -> Self {
        Self {
            cache,
            settings: Arc::new(settings),
        }
    }

    /// Returns the order cache.
    pub fn cache(&self) -> &OrderCache {
        &self.cache
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
