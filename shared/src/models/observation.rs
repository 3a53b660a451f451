//! Calibration observation model.
//!
//! Defines the `CalibrationObservation` input record and the `ReferenceMode`
//! that selects how the reference standard's uncertainty is interpreted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How `reference_uncertainty` on an observation is interpreted.
///
/// Laboratories record the standard's uncertainty in one of two ways, and the
/// two conventions give different budgets for the same numbers. The mode is
/// always chosen explicitly rather than guessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// The value is an expanded (k=2) uncertainty taken from the standard's
    /// calibration certificate.
    #[default]
    CertificateHalved,
    /// The value is a fractional factor (e.g. `0.005` for 0.5 %) applied to
    /// the mean indicated reading.
    FractionOfMean,
}

impl std::fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CertificateHalved => write!(f, "certificate_halved"),
            Self::FractionOfMean => write!(f, "fraction_of_mean"),
        }
    }
}

impl FromStr for ReferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "certificate_halved" | "certificate" => Ok(Self::CertificateHalved),
            "fraction_of_mean" | "fraction" => Ok(Self::FractionOfMean),
            other => Err(format!(
                "unknown reference mode '{other}' (expected certificate_halved or fraction_of_mean)"
            )),
        }
    }
}

/// A single calibration point as entered by the operator.
///
/// Readings are optional so that blank entries coming from a form or a JSON
/// `null` can be passed straight through; they are dropped before the
/// calculation along with NaN values.
///
/// # Example
///
/// ```
/// use shared::models::CalibrationObservation;
///
/// let obs = CalibrationObservation::new(100.0, [100.1, 99.9, 100.0])
///     .with_resolution(0.1)
///     .with_reference_uncertainty(0.5)
///     .with_cmc_percent(1.0);
///
/// assert_eq!(obs.present_readings().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationObservation {
    /// Nominal value applied by the reference standard.
    pub standard_value: f64,

    /// Repeated readings indicated by the equipment under calibration.
    pub indicated_readings: Vec<Option<f64>>,

    /// Smallest distinguishable increment of the equipment under calibration.
    pub resolution: f64,

    /// Uncertainty of the reference standard, interpreted per `ReferenceMode`.
    pub reference_uncertainty: f64,

    /// Manufacturer-specification accuracy contribution.
    #[serde(default)]
    pub accuracy_uncertainty: f64,

    /// Calibration and Measurement Capability bound as a percentage of the
    /// standard value.
    pub cmc_percent: f64,
}

impl CalibrationObservation {
    /// Creates an observation with the given standard value and readings.
    ///
    /// All instrument characteristics start at zero.
    #[must_use]
    pub fn new(standard_value: f64, readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            standard_value,
            indicated_readings: readings.into_iter().map(Some).collect(),
            resolution: 0.0,
            reference_uncertainty: 0.0,
            accuracy_uncertainty: 0.0,
            cmc_percent: 0.0,
        }
    }

    /// Sets the resolution of the equipment under calibration.
    #[must_use]
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the reference standard's uncertainty.
    #[must_use]
    pub fn with_reference_uncertainty(mut self, uncertainty: f64) -> Self {
        self.reference_uncertainty = uncertainty;
        self
    }

    /// Sets the accuracy (specification) uncertainty.
    #[must_use]
    pub fn with_accuracy_uncertainty(mut self, uncertainty: f64) -> Self {
        self.accuracy_uncertainty = uncertainty;
        self
    }

    /// Sets the CMC bound in percent.
    #[must_use]
    pub fn with_cmc_percent(mut self, cmc_percent: f64) -> Self {
        self.cmc_percent = cmc_percent;
        self
    }

    /// Returns the readings that are present, skipping blanks and NaN.
    pub fn present_readings(&self) -> impl Iterator<Item = f64> + '_ {
        present_readings(&self.indicated_readings)
    }
}

/// Returns the readings that take part in a calculation: blanks and NaN are
/// dropped, everything else is kept in order.
pub fn present_readings(readings: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    readings.iter().filter_map(|r| *r).filter(|r| !r.is_nan())
}
