//! Certificate annexure model.
//!
//! An `Annexure` is the data behind the printed certificate annexure: the
//! administrative details of the calibration and the formatted results
//! table derived from a report summary. Rendering it to a document is left
//! to the consumer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::report::SummaryRow;

/// Statement printed below the results table.
pub const COVERAGE_STATEMENT: &str = "The reported expanded uncertainty is at coverage factor k=2 \
which corresponds to a coverage probability of approximately 95% for a normal distribution.";

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Errors that can occur while building an annexure.
#[derive(Debug, Error)]
pub enum AnnexureError {
    /// The next calibration is due before the calibration took place.
    #[error("Next calibration due ({due}) is before the date of calibration ({calibrated})")]
    DueBeforeCalibration {
        /// Date of calibration.
        calibrated: NaiveDate,
        /// Next calibration due date.
        due: NaiveDate,
    },

    /// The requested file name would escape the download directory.
    #[error("Invalid file name: {0}")]
    InvalidFilename(String),

    /// The report has no rows to put in the results table.
    #[error("Annexure needs at least one result row")]
    NoResults,

    /// Field validation failed.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Administrative details entered for an annexure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnnexureDetails {
    /// Date of calibration.
    pub date_of_calibration: NaiveDate,

    /// Next calibration due.
    pub next_calibration_due: NaiveDate,

    /// Description of the sample.
    #[validate(length(min = 1, message = "Sample description cannot be empty"))]
    pub description_sample: String,

    /// Make of the sample.
    #[serde(default)]
    pub description_make: String,

    /// Serial number of the sample.
    #[validate(length(min = 1, message = "Serial number cannot be empty"))]
    pub serial_no: String,

    /// Identification of the method used.
    #[serde(default)]
    pub method_used: String,

    /// Environmental temperature, as written on the certificate (°C).
    #[serde(default)]
    pub env_temperature: String,

    /// Relative humidity, as written on the certificate (%).
    #[serde(default)]
    pub env_humidity: String,

    /// Major standards or equipment used.
    #[serde(default)]
    pub major_standards: String,

    /// Site of calibration.
    #[serde(default)]
    pub site_of_calibration: String,

    /// Traceability of the measurement.
    #[serde(default)]
    pub traceability: String,

    /// Identification mark on the calibration sticker.
    #[validate(length(min = 1, message = "Identification mark cannot be empty"))]
    pub identification_mark: String,

    /// Name of the calibrated parameter, e.g. "Insulation Resistance".
    #[validate(length(min = 1, message = "Parameter cannot be empty"))]
    pub parameter: String,

    /// Note explaining how the indicated values were obtained.
    #[serde(default)]
    pub euc_note: String,

    /// File name for the document, without extension. Blank means the
    /// `Annexure_<identification mark>` default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AnnexureDetails {
    /// Validates the details.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the next due date is before the calibration date
    /// - a required text field is empty
    /// - the file name contains a path separator
    pub fn validate_details(&self) -> Result<(), AnnexureError> {
        if self.next_calibration_due < self.date_of_calibration {
            return Err(AnnexureError::DueBeforeCalibration {
                calibrated: self.date_of_calibration,
                due: self.next_calibration_due,
            });
        }
        self.validate()?;
        if let Some(name) = self.filename_override() {
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(AnnexureError::InvalidFilename(name.to_string()));
            }
        }
        Ok(())
    }

    /// File name derived from the identification mark.
    #[must_use]
    pub fn default_filename(&self) -> String {
        format!("Annexure_{}", self.identification_mark)
    }

    /// File name for the annexure document: the override when one was
    /// given, otherwise [`Self::default_filename`].
    #[must_use]
    pub fn filename(&self) -> String {
        self.filename_override()
            .map_or_else(|| self.default_filename(), str::to_string)
    }

    fn filename_override(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One formatted line of the annexure results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnexureResultRow {
    /// Serial number, starting at 1.
    pub sl_no: usize,
    /// Range setting.
    pub range_value: String,
    /// Standard value with unit.
    pub standard_value: String,
    /// Indicated value with unit.
    pub indicated_value: String,
    /// Expanded uncertainty with unit.
    pub uncertainty_value: String,
}

/// Annexure data ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annexure {
    /// Suggested file name, without extension.
    pub filename: String,
    /// Date of calibration, `dd.mm.yyyy`.
    pub date_of_calibration: String,
    /// Next calibration due, `dd.mm.yyyy`.
    pub next_calibration_due: String,
    /// Details as entered.
    pub details: AnnexureDetails,
    /// Unit of the range column.
    pub range_unit: String,
    /// Unit of the standard, indicated and uncertainty columns.
    pub standard_unit: String,
    /// Results table.
    pub results: Vec<AnnexureResultRow>,
    /// Coverage statement.
    pub coverage_statement: String,
    /// When the annexure data was generated.
    pub generated_at: DateTime<Utc>,
}

impl Annexure {
    /// Builds annexure data from details and a report summary.
    ///
    /// Units are taken from the first summary row.
    ///
    /// # Errors
    ///
    /// Returns an error if the details are invalid or the summary is empty.
    pub fn build(details: AnnexureDetails, summary: &[SummaryRow]) -> Result<Self, AnnexureError> {
        details.validate_details()?;
        let first = summary.first().ok_or(AnnexureError::NoResults)?;

        let range_unit = first.range_unit.clone();
        let standard_unit = first.standard_unit.clone();

        let results = summary
            .iter()
            .enumerate()
            .map(|(i, row)| AnnexureResultRow {
                sl_no: i + 1,
                range_value: format_value(row.range_value),
                standard_value: format!("{} {standard_unit}", format_value(row.standard_value)),
                indicated_value: format!("{} {standard_unit}", format_value(row.indicated_value)),
                uncertainty_value: format!(
                    "{} {standard_unit}",
                    format_uncertainty(row.expanded_uncertainty)
                ),
            })
            .collect();

        Ok(Self {
            filename: details.filename(),
            date_of_calibration: details.date_of_calibration.format(DATE_FORMAT).to_string(),
            next_calibration_due: details.next_calibration_due.format(DATE_FORMAT).to_string(),
            details,
            range_unit,
            standard_unit,
            results,
            coverage_statement: COVERAGE_STATEMENT.to_string(),
            generated_at: Utc::now(),
        })
    }
}

/// Rounds an uncertainty for printing: four decimals below 1, three otherwise.
#[must_use]
pub fn format_uncertainty(value: f64) -> String {
    if value < 1.0 {
        format!("{value:.4}")
    } else {
        format!("{value:.3}")
    }
}

/// Formats a plain value, keeping a trailing `.0` on whole numbers.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
