//! Accreditation scope storage trait and implementations.
//!
//! Provides the `ScopeStore` trait for browsing scope entries and an
//! `InMemoryScopeStore` implementation that can be seeded from a JSON file.

use crate::models::{ScopeColumn, ScopeEntry};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use validator::Validate;

/// Errors that can occur during scope store operations.
#[derive(Debug, Error)]
pub enum ScopeStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on scope store")]
    LockError,

    /// Reading the scope file failed.
    #[error("Failed to read scope file: {0}")]
    Io(#[from] std::io::Error),

    /// The scope file is not valid JSON for scope entries.
    #[error("Failed to parse scope file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry failed validation.
    #[error("Scope entry {index} is invalid: {source}")]
    InvalidEntry {
        /// Position of the entry in the input.
        index: usize,
        /// Validation details.
        source: validator::ValidationErrors,
    },
}

/// Query parameters for browsing the scope.
///
/// Each filter is a multi-select: an entry matches a filter when its column
/// value equals any of the selected values. An empty selection does not
/// filter at all.
#[derive(Debug, Clone, Default)]
pub struct ScopeQuery {
    /// Selected natures of calibration.
    pub nature: Vec<String>,

    /// Selected measurands.
    pub measurand: Vec<String>,

    /// Selected methods.
    pub method: Vec<String>,

    /// Selected ranges.
    pub range: Vec<String>,

    /// Keep only entries whose CMC is at most this value.
    pub max_cmc_percent: Option<f64>,

    /// Maximum number of entries to return.
    pub limit: Option<usize>,

    /// Number of entries to skip (for pagination).
    pub offset: Option<usize>,
}

impl ScopeQuery {
    /// Creates a new empty query (returns all entries).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a selected value for a column.
    #[must_use]
    pub fn with_value(mut self, column: ScopeColumn, value: impl Into<String>) -> Self {
        self.values_mut(column).push(value.into());
        self
    }

    /// Sets the CMC ceiling.
    #[must_use]
    pub fn with_max_cmc_percent(mut self, max: f64) -> Self {
        self.max_cmc_percent = Some(max);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    fn values(&self, column: ScopeColumn) -> &[String] {
        match column {
            ScopeColumn::Nature => &self.nature,
            ScopeColumn::Measurand => &self.measurand,
            ScopeColumn::Method => &self.method,
            ScopeColumn::Range => &self.range,
        }
    }

    fn values_mut(&mut self, column: ScopeColumn) -> &mut Vec<String> {
        match column {
            ScopeColumn::Nature => &mut self.nature,
            ScopeColumn::Measurand => &mut self.measurand,
            ScopeColumn::Method => &mut self.method,
            ScopeColumn::Range => &mut self.range,
        }
    }

    fn matches(&self, entry: &ScopeEntry) -> bool {
        let columns = [
            ScopeColumn::Nature,
            ScopeColumn::Measurand,
            ScopeColumn::Method,
            ScopeColumn::Range,
        ];
        let selected = columns.into_iter().all(|column| {
            let values = self.values(column);
            values.is_empty() || values.iter().any(|v| v == entry.column(column))
        });
        selected
            && self
                .max_cmc_percent
                .map_or(true, |max| entry.cmc_percent <= max)
    }
}

/// A scope entry together with its position in the store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexedScopeEntry {
    /// Position of the entry in the store; stable until the store is reloaded.
    pub index: usize,
    /// The entry.
    #[serde(flatten)]
    pub entry: ScopeEntry,
}

/// Result of a scope query.
#[derive(Debug, Clone)]
pub struct ScopeQueryResult {
    /// Entries matching the query, after pagination.
    pub entries: Vec<IndexedScopeEntry>,

    /// Total count of matching entries (before limit/offset applied).
    pub total_count: usize,
}

/// Trait for scope storage implementations.
pub trait ScopeStore: Send + Sync {
    /// Inserts entries after validating each of them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntry` for the first invalid entry; nothing is inserted.
    fn insert_batch(&self, entries: Vec<ScopeEntry>) -> Result<(), ScopeStoreError>;

    /// Queries entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn query(&self, query: &ScopeQuery) -> Result<ScopeQueryResult, ScopeStoreError>;

    /// Returns the entry at `index`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    fn get(&self, index: usize) -> Result<Option<ScopeEntry>, ScopeStoreError>;

    /// Returns the number of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the count operation fails.
    fn count(&self) -> Result<usize, ScopeStoreError>;

    /// Returns the distinct values of a column, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    fn distinct(&self, column: ScopeColumn) -> Result<Vec<String>, ScopeStoreError>;
}

/// In-memory scope store implementation.
///
/// # Example
///
/// ```
/// use shared::models::{ScopeColumn, ScopeEntry};
/// use shared::storage::{InMemoryScopeStore, ScopeQuery, ScopeStore};
///
/// let store = InMemoryScopeStore::new();
/// store
///     .insert_batch(vec![
///         ScopeEntry::new("Electro-Technical", "DC Voltage", "Direct", "1 V to 10 V", 0.05),
///         ScopeEntry::new("Electro-Technical", "Resistance", "Direct", "1 Ω to 10 MΩ", 0.2),
///     ])
///     .unwrap();
///
/// let query = ScopeQuery::new().with_value(ScopeColumn::Measurand, "Resistance");
/// let result = store.query(&query).unwrap();
/// assert_eq!(result.total_count, 1);
/// assert_eq!(result.entries[0].index, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryScopeStore {
    entries: Arc<RwLock<Vec<ScopeEntry>>>,
}

impl InMemoryScopeStore {
    /// Creates a new empty in-memory scope store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a store seeded from a JSON array of scope entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an entry
    /// is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScopeStoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), count = store.count()?, "Loaded scope entries");
        Ok(store)
    }

    /// Creates a store seeded from a JSON array of scope entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or an entry is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ScopeStoreError> {
        let entries: Vec<ScopeEntry> = serde_json::from_str(json)?;
        let store = Self::new();
        store.insert_batch(entries)?;
        Ok(store)
    }
}

impl ScopeStore for InMemoryScopeStore {
    fn insert_batch(&self, entries: Vec<ScopeEntry>) -> Result<(), ScopeStoreError> {
        for (index, entry) in entries.iter().enumerate() {
            entry
                .validate()
                .map_err(|source| ScopeStoreError::InvalidEntry { index, source })?;
        }
        let mut stored = self
            .entries
            .write()
            .map_err(|_| ScopeStoreError::LockError)?;
        stored.extend(entries);
        Ok(())
    }

    fn query(&self, query: &ScopeQuery) -> Result<ScopeQueryResult, ScopeStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScopeStoreError::LockError)?;

        let filtered: Vec<IndexedScopeEntry> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.matches(entry))
            .map(|(index, entry)| IndexedScopeEntry {
                index,
                entry: entry.clone(),
            })
            .collect();

        let total_count = filtered.len();
        let entries = filtered
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(ScopeQueryResult {
            entries,
            total_count,
        })
    }

    fn get(&self, index: usize) -> Result<Option<ScopeEntry>, ScopeStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScopeStoreError::LockError)?;
        Ok(entries.get(index).cloned())
    }

    fn count(&self) -> Result<usize, ScopeStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScopeStoreError::LockError)?;
        Ok(entries.len())
    }

    fn distinct(&self, column: ScopeColumn) -> Result<Vec<String>, ScopeStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ScopeStoreError::LockError)?;
        Ok(entries
            .iter()
            .map(|e| e.column(column))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }
}
