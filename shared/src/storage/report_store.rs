//! Report sheet storage trait and implementations.
//!
//! Provides the `ReportStore` trait for keeping named report sheets and an
//! `InMemoryReportStore` implementation for development and testing.

use crate::models::{ReportRow, ReportSheet, SummaryRow};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during report store operations.
#[derive(Debug, Error)]
pub enum ReportStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on report store")]
    LockError,

    /// No sheet exists under the given name.
    #[error("Report sheet '{0}' not found")]
    NotFound(String),

    /// The requested row does not exist.
    #[error("Row {index} is out of range for sheet '{sheet}' ({len} rows)")]
    RowOutOfRange {
        /// Sheet name.
        sheet: String,
        /// Requested index.
        index: usize,
        /// Number of rows in the sheet.
        len: usize,
    },
}

/// Trait for report sheet storage implementations.
///
/// Sheets are identified by a caller-chosen name. Appending to a name that
/// does not exist yet creates the sheet. Implementations must be thread-safe.
pub trait ReportStore: Send + Sync {
    /// Appends rows to the named sheet and returns the new row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn append(&self, sheet: &str, rows: Vec<ReportRow>) -> Result<usize, ReportStoreError>;

    /// Returns a copy of the named sheet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sheet does not exist.
    fn get(&self, sheet: &str) -> Result<ReportSheet, ReportStoreError>;

    /// Removes one row from the named sheet.
    ///
    /// Returns the removed row together with the renumbered summary, both
    /// taken under the same write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `RowOutOfRange`.
    fn remove_row(
        &self,
        sheet: &str,
        index: usize,
    ) -> Result<(ReportRow, Vec<SummaryRow>), ReportStoreError>;

    /// Removes every row from the named sheet, keeping the sheet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sheet does not exist.
    fn clear(&self, sheet: &str) -> Result<(), ReportStoreError>;

    /// Deletes the named sheet. Returns false if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn delete(&self, sheet: &str) -> Result<bool, ReportStoreError>;

    /// Returns the names of all sheets in lexical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn names(&self) -> Result<Vec<String>, ReportStoreError>;
}

/// In-memory report store implementation.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::storage::{InMemoryReportStore, ReportStore};
///
/// let store = InMemoryReportStore::new();
/// store.append("bench-1", Vec::new()).unwrap();
/// assert_eq!(store.names().unwrap(), vec!["bench-1".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    sheets: Arc<RwLock<BTreeMap<String, ReportSheet>>>,
}

impl InMemoryReportStore {
    /// Creates a new empty in-memory report store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheets: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Creates a new in-memory report store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl ReportStore for InMemoryReportStore {
    fn append(&self, sheet: &str, rows: Vec<ReportRow>) -> Result<usize, ReportStoreError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ReportStoreError::LockError)?;
        let entry = sheets.entry(sheet.to_string()).or_default();
        for row in rows {
            entry.push(row);
        }
        Ok(entry.len())
    }

    fn get(&self, sheet: &str) -> Result<ReportSheet, ReportStoreError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|_| ReportStoreError::LockError)?;
        sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| ReportStoreError::NotFound(sheet.to_string()))
    }

    fn remove_row(
        &self,
        sheet: &str,
        index: usize,
    ) -> Result<(ReportRow, Vec<SummaryRow>), ReportStoreError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ReportStoreError::LockError)?;
        let entry = sheets
            .get_mut(sheet)
            .ok_or_else(|| ReportStoreError::NotFound(sheet.to_string()))?;
        let len = entry.len();
        let removed = entry
            .remove(index)
            .map_err(|_| ReportStoreError::RowOutOfRange {
                sheet: sheet.to_string(),
                index,
                len,
            })?;
        Ok((removed, entry.summary()))
    }

    fn clear(&self, sheet: &str) -> Result<(), ReportStoreError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ReportStoreError::LockError)?;
        sheets
            .get_mut(sheet)
            .ok_or_else(|| ReportStoreError::NotFound(sheet.to_string()))?
            .clear();
        Ok(())
    }

    fn delete(&self, sheet: &str) -> Result<bool, ReportStoreError> {
        let mut sheets = self
            .sheets
            .write()
            .map_err(|_| ReportStoreError::LockError)?;
        Ok(sheets.remove(sheet).is_some())
    }

    fn names(&self) -> Result<Vec<String>, ReportStoreError> {
        let sheets = self
            .sheets
            .read()
            .map_err(|_| ReportStoreError::LockError)?;
        Ok(sheets.keys().cloned().collect())
    }
}
