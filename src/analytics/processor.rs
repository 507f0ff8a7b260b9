//! Runs analytics records through the configured plugin

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, info};

use super::AnalyticsRecord;
use crate::config::AnalyticsPluginConfig;
use crate::plugins::{load_analytics_handler, AnalyticsHandler, LoadError};

/// Applies the analytics plugin, if any, to every record before it is stored
#[derive(Debug, Clone, Default)]
pub struct AnalyticsProcessor {
    handler: Option<AnalyticsHandler>,
}

impl AnalyticsProcessor {
    /// Processor that leaves records untouched
    pub fn disabled() -> Self {
        Self { handler: None }
    }

    pub fn with_handler(handler: AnalyticsHandler) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    /// Load the plugin named by `config`; a disabled config is not an error
    pub fn try_from_config(config: &AnalyticsPluginConfig) -> Result<Self, LoadError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let handler = load_analytics_handler(&config.plugin_path, &config.func_name)?;
        Ok(Self::with_handler(handler))
    }

    /// Like [`try_from_config`](Self::try_from_config), but a plugin that
    /// fails to load is logged and the processor runs without it.
    pub fn from_config(config: &AnalyticsPluginConfig) -> Self {
        match Self::try_from_config(config) {
            Ok(processor) => processor,
            Err(e) => {
                error!(error = %e, "Could not load analytics plugin, records will not be processed");
                Self::disabled()
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.handler.is_some()
    }

    /// Run the plugin on a record.
    ///
    /// A panicking handler is logged; the record keeps whatever changes the
    /// handler made before panicking. A `cdylib` plugin links its own copy of
    /// the standard library, and a panic raised there is a foreign exception
    /// to the host that aborts the process, so plugins must not panic.
    pub fn process(&self, record: &mut AnalyticsRecord) {
        let Some(handler) = &self.handler else {
            return;
        };

        if catch_unwind(AssertUnwindSafe(|| handler.call(record))).is_err() {
            error!(
                symbol = handler.symbol(),
                path = %handler.path().display(),
                "Analytics plugin panicked"
            );
        }
    }
}

impl From<AnalyticsHandler> for AnalyticsProcessor {
    fn from(handler: AnalyticsHandler) -> Self {
        info!(symbol = handler.symbol(), "Analytics plugin enabled");
        Self::with_handler(handler)
    }
}
