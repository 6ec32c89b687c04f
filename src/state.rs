//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::convert::Converter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    converter: Converter,
}

impl AppState {
    /// Create a new application state with the stock extractors
    pub fn new(config: Config) -> Self {
        let converter = Converter::new(&config.conversion);
        Self::with_converter(config, converter)
    }

    /// Create a new application state around a prepared converter
    pub fn with_converter(config: Config, converter: Converter) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, converter }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the upload converter
    pub fn converter(&self) -> &Converter {
        &self.inner.converter
    }
}
