//! Application state for the web layer.

use std::sync::Arc;

use crate::adif::AdifPortal;
use crate::registry::Registry;
use crate::schedule::ScheduleFetcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Schedule fetcher, which also owns the station registry
    pub fetcher: Arc<ScheduleFetcher<AdifPortal>>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(fetcher: ScheduleFetcher<AdifPortal>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.fetcher.registry()
    }
}
