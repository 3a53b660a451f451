//! Calbudget Shared Library
//!
//! This crate contains the uncertainty budget calculator and the types shared
//! between the Calbudget API server and command-line tool.
//!
//! # Modules
//!
//! - [`calculator`] - Uncertainty budget calculation
//! - [`models`] - Observations, budgets, report sheets, scope entries, and annexures
//! - [`storage`] - Storage traits and in-memory implementations
//!
//! # Example
//!
//! ```
//! use shared::calculator::compute;
//! use shared::models::{CalibrationObservation, ReferenceMode};
//!
//! let obs = CalibrationObservation::new(10.0, [10.02, 9.98, 10.01])
//!     .with_resolution(0.01)
//!     .with_reference_uncertainty(0.005)
//!     .with_cmc_percent(0.5);
//!
//! let budget = compute(&obs, ReferenceMode::CertificateHalved).unwrap();
//! assert!(budget.reported_uncertainty >= budget.expanded_uncertainty);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calculator;
pub mod models;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
