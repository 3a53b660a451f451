//! Report sheet model.
//!
//! A `ReportSheet` is the caller-owned accumulator of calculated rows: one
//! row per standard value, kept in the order the rows were added. The
//! summary view numbers the rows from 1 and is always derived from the
//! current rows, so removing a row renumbers everything after it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::budget::UncertaintyBudget;
use super::observation::{present_readings, CalibrationObservation, ReferenceMode};
use super::parameter::{all_units, Parameter};
use crate::calculator::{self, ValidationError};

/// Errors that can occur while editing a report sheet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// The requested row index does not exist.
    #[error("Row {index} is out of range (sheet has {len} rows)")]
    RowOutOfRange {
        /// Requested row index.
        index: usize,
        /// Number of rows in the sheet.
        len: usize,
    },
}

/// Inputs for calculating one row per standard value in a single pass.
///
/// All standard values share the same readings and instrument settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationBatch {
    /// Quantity being calibrated.
    pub parameter: Parameter,

    /// Unit of the range setting.
    pub range_unit: String,

    /// Range setting of the equipment under calibration.
    pub range_value: f64,

    /// Unit the standard values are expressed in.
    pub standard_unit: String,

    /// Standard values to calculate, in order.
    pub standard_values: Vec<f64>,

    /// Readings indicated by the equipment under calibration.
    pub indicated_readings: Vec<Option<f64>>,

    /// Resolution of the equipment under calibration.
    pub resolution: f64,

    /// Uncertainty of the reference standard.
    pub reference_uncertainty: f64,

    /// Accuracy specification contribution.
    #[serde(default)]
    pub accuracy_uncertainty: f64,

    /// CMC bound in percent.
    pub cmc_percent: f64,
}

impl CalculationBatch {
    fn observation_for(&self, standard_value: f64) -> CalibrationObservation {
        CalibrationObservation {
            standard_value,
            indicated_readings: self.indicated_readings.clone(),
            resolution: self.resolution,
            reference_uncertainty: self.reference_uncertainty,
            accuracy_uncertainty: self.accuracy_uncertainty,
            cmc_percent: self.cmc_percent,
        }
    }
}

/// One detailed row of a report: the inputs and the resulting budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Quantity being calibrated.
    pub parameter: Parameter,
    /// Unit of the range setting.
    pub range_unit: String,
    /// Range setting of the equipment under calibration.
    pub range_value: f64,
    /// Unit of the standard value.
    pub standard_unit: String,
    /// Standard value for this row.
    pub standard_value: f64,
    /// Readings that took part in the calculation.
    pub readings: Vec<f64>,
    /// Resolution of the equipment under calibration.
    pub resolution: f64,
    /// CMC bound in percent.
    pub cmc_percent: f64,
    /// Calculated budget.
    pub budget: UncertaintyBudget,
}

/// One line of the final summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Serial number, starting at 1.
    pub sl_no: usize,
    /// Range setting.
    pub range_value: f64,
    /// Unit of the range setting.
    pub range_unit: String,
    /// Standard value.
    pub standard_value: f64,
    /// Mean value indicated by the equipment under calibration.
    pub indicated_value: f64,
    /// Expanded uncertainty at 95 % C.L., k=2, after CMC reconciliation.
    pub expanded_uncertainty: f64,
    /// Unit of the standard, indicated and uncertainty values.
    pub standard_unit: String,
}

/// Ordered collection of calculated rows.
///
/// # Example
///
/// ```
/// use shared::models::{CalculationBatch, Parameter, ReferenceMode, ReportSheet};
///
/// let batch = CalculationBatch {
///     parameter: Parameter::Resistance,
///     range_unit: "MΩ".to_string(),
///     range_value: 100.0,
///     standard_unit: "MΩ".to_string(),
///     standard_values: vec![10.0, 50.0],
///     indicated_readings: vec![Some(10.01), Some(9.99)],
///     resolution: 0.01,
///     reference_uncertainty: 0.02,
///     accuracy_uncertainty: 0.0,
///     cmc_percent: 1.0,
/// };
///
/// let mut sheet = ReportSheet::new();
/// let added = sheet.calculate_and_add(&batch, ReferenceMode::CertificateHalved).unwrap();
/// assert_eq!(added, 2);
/// assert_eq!(sheet.summary()[1].sl_no, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSheet {
    rows: Vec<ReportRow>,
}

impl ReportSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates one row for every positive standard value in the batch and
    /// appends them in order.
    ///
    /// Standard values that are zero, negative or not finite are skipped.
    /// Nothing is appended unless every row calculates successfully.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` if the batch carries no usable reading, or
    /// `InvalidParameter` if the shared instrument settings are invalid, the
    /// range unit does not belong to the parameter, or the standard unit is
    /// not a known unit.
    pub fn calculate_and_add(
        &mut self,
        batch: &CalculationBatch,
        mode: ReferenceMode,
    ) -> Result<usize, ValidationError> {
        let new_rows = calculate_rows(batch, mode)?;
        let added = new_rows.len();
        self.rows.extend(new_rows);
        Ok(added)
    }

    /// Appends a row.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Removes and returns the row at `index`.
    ///
    /// # Errors
    ///
    /// Returns `RowOutOfRange` if `index` is past the end of the sheet.
    pub fn remove(&mut self, index: usize) -> Result<ReportRow, ReportError> {
        if index >= self.rows.len() {
            return Err(ReportError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Returns the detailed rows.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the sheet has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds the numbered summary table.
    #[must_use]
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| SummaryRow {
                sl_no: i + 1,
                range_value: row.range_value,
                range_unit: row.range_unit.clone(),
                standard_value: row.standard_value,
                indicated_value: row.budget.average_indicated,
                expanded_uncertainty: row.budget.reported_uncertainty,
                standard_unit: row.standard_unit.clone(),
            })
            .collect()
    }
}

/// Calculates the rows for a batch without touching any sheet.
///
/// # Errors
///
/// Same as [`ReportSheet::calculate_and_add`].
pub fn calculate_rows(
    batch: &CalculationBatch,
    mode: ReferenceMode,
) -> Result<Vec<ReportRow>, ValidationError> {
    if !batch.parameter.supports_unit(&batch.range_unit) {
        return Err(ValidationError::InvalidParameter {
            field: "range_unit",
            reason: format!(
                "'{}' is not a unit of {} (expected one of {})",
                batch.range_unit,
                batch.parameter,
                batch.parameter.units().join(", ")
            ),
        });
    }
    if !all_units().contains(&batch.standard_unit.as_str()) {
        return Err(ValidationError::InvalidParameter {
            field: "standard_unit",
            reason: format!("'{}' is not a known unit", batch.standard_unit),
        });
    }

    let readings: Vec<f64> = present_readings(&batch.indicated_readings).collect();
    if readings.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    batch
        .standard_values
        .iter()
        .copied()
        .filter(|&v| {
            let usable = v.is_finite() && v > 0.0;
            if !usable {
                tracing::debug!(standard_value = v, "Skipping non-positive standard value");
            }
            usable
        })
        .map(|standard_value| {
            let budget = calculator::compute(&batch.observation_for(standard_value), mode)?;
            Ok(ReportRow {
                parameter: batch.parameter,
                range_unit: batch.range_unit.clone(),
                range_value: batch.range_value,
                standard_unit: batch.standard_unit.clone(),
                standard_value,
                readings: readings.clone(),
                resolution: batch.resolution,
                cmc_percent: batch.cmc_percent,
                budget,
            })
        })
        .collect()
}
