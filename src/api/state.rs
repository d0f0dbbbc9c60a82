//! Application state for the Jornada Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::HrConfig;
use crate::store::Store;

/// Shared application state.
///
/// Wraps the document store, which holds the catalog loaded from the YAML
/// configuration together with employees, weekly records and conversations.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
}

impl AppState {
    /// Creates a new application state around a store.
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a state with an in-memory store seeded from `config`.
    pub fn in_memory(config: HrConfig) -> Self {
        Self::new(Store::in_memory(config))
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &Store {
        &self.store
    }
}
