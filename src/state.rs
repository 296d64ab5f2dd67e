//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::split::SplitService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    split_service: SplitService,
}

impl AppState {
    pub fn new(config: Config, split_service: SplitService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                split_service,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the split service
    pub fn split_service(&self) -> &SplitService {
        &self.inner.split_service
    }
}
