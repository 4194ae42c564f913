//! Application state for the bakery back-office API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::attendance::AttendanceTracker;
use crate::cash::CashDrawer;
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::config::ConfigLoader;
use crate::store::Store;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the persistent store and the wall clock.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            clock,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Current local time.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Attendance operations over the shared store.
    pub fn tracker(&self) -> AttendanceTracker<'_, dyn Store> {
        AttendanceTracker::new(self.store.as_ref(), self.config.attendance())
    }

    /// Cash drawer operations over the shared store.
    pub fn drawer(&self) -> CashDrawer<'_, dyn Store> {
        CashDrawer::new(self.store.as_ref(), self.config.cash())
    }

    /// Catalog operations over the shared store.
    pub fn catalog(&self) -> Catalog<'_, dyn Store> {
        Catalog::new(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
