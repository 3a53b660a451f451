//! Storage traits and implementations.
//!
//! This module provides abstractions for keeping report sheets and the
//! accreditation scope. Each store is a trait with an in-memory implementation
//! so the service can run without an external database.

pub mod report_store;
pub mod scope_store;

pub use report_store::{InMemoryReportStore, ReportStore, ReportStoreError};
pub use scope_store::{
    InMemoryScopeStore, IndexedScopeEntry, ScopeQuery, ScopeQueryResult, ScopeStore,
    ScopeStoreError,
};
