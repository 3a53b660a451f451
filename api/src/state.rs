//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use anyhow::{Context, Result};
use shared::models::ReferenceMode;
use shared::storage::{InMemoryReportStore, InMemoryScopeStore, ReportStore, ScopeStore};
use std::sync::Arc;

use crate::config::{Config, DEFAULT_CMC_PERCENT};

/// Application state shared across all request handlers.
///
/// This struct contains the storage backends and the calculation defaults
/// taken from the configuration.
#[derive(Clone)]
pub struct AppState {
    /// Named report sheets.
    report_store: Arc<dyn ReportStore>,
    /// Accreditation scope.
    scope_store: Arc<dyn ScopeStore>,
    /// Reference mode used when a request does not name one.
    reference_mode: ReferenceMode,
    /// CMC bound used when a request does not carry one.
    default_cmc_percent: f64,
}

impl AppState {
    /// Creates a new application state with the given stores and defaults.
    pub fn new(
        report_store: Arc<dyn ReportStore>,
        scope_store: Arc<dyn ScopeStore>,
        reference_mode: ReferenceMode,
        default_cmc_percent: f64,
    ) -> Self {
        Self {
            report_store,
            scope_store,
            reference_mode,
            default_cmc_percent,
        }
    }

    /// Creates a new application state with empty in-memory stores.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self::new(
            Arc::new(InMemoryReportStore::new()),
            Arc::new(InMemoryScopeStore::new()),
            ReferenceMode::default(),
            DEFAULT_CMC_PERCENT,
        )
    }

    /// Creates the application state described by `config`.
    ///
    /// The scope store is seeded from `config.scope_file` when one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope file cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let scope_store = match &config.scope_file {
            Some(path) => {
                let store = InMemoryScopeStore::from_json_file(path).with_context(|| {
                    format!("Failed to load scope file {}", path.display())
                })?;
                tracing::info!(
                    path = %path.display(),
                    entries = store.count()?,
                    "Loaded accreditation scope"
                );
                store
            }
            None => {
                tracing::info!("No scope file configured, scope is empty");
                InMemoryScopeStore::new()
            }
        };

        Ok(Self::new(
            Arc::new(InMemoryReportStore::new()),
            Arc::new(scope_store),
            config.reference_mode,
            config.default_cmc_percent,
        ))
    }

    /// Returns a reference to the report store.
    #[must_use]
    pub fn report_store(&self) -> &dyn ReportStore {
        self.report_store.as_ref()
    }

    /// Returns a reference to the scope store.
    #[must_use]
    pub fn scope_store(&self) -> &dyn ScopeStore {
        self.scope_store.as_ref()
    }

    /// Returns the default reference mode.
    #[must_use]
    pub fn reference_mode(&self) -> ReferenceMode {
        self.reference_mode
    }

    /// Returns the default CMC bound in percent.
    #[must_use]
    pub fn default_cmc_percent(&self) -> f64 {
        self.default_cmc_percent
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
