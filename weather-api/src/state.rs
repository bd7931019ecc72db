use std::sync::Arc;

use weather_core::{Config, UpstreamClient};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Arc<dyn UpstreamClient>,
}

impl AppState {
    pub fn new(config: Config, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
        }
    }
}
