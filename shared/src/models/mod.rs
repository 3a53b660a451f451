//! Data models for the calibration uncertainty service.
//!
//! This module contains the calculation inputs and outputs, the report sheet
//! that accumulates calculated rows, the accreditation scope, and annexure data.

pub mod annexure;
pub mod budget;
pub mod observation;
pub mod parameter;
pub mod report;
pub mod scope;

pub use annexure::{Annexure, AnnexureDetails, AnnexureError, AnnexureResultRow};
pub use budget::UncertaintyBudget;
pub use observation::{CalibrationObservation, ReferenceMode};
pub use parameter::{all_units, Parameter};
pub use report::{
    calculate_rows, CalculationBatch, ReportError, ReportRow, ReportSheet, SummaryRow,
};
pub use scope::{ScopeColumn, ScopeEntry};
