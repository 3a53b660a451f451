//! Uncertainty budget model.
//!
//! Defines the `UncertaintyBudget` output record produced by the calculator.

use serde::{Deserialize, Serialize};

use super::observation::{CalibrationObservation, ReferenceMode};
use crate::calculator::{self, ValidationError};

/// Full breakdown of the uncertainty contributions for one calibration point.
///
/// A budget is a plain value: it is built once by
/// [`calculator::compute`] and never mutated afterwards. Every field is a
/// finite number.
///
/// The reported uncertainty is always `max(expanded_uncertainty, cmc_absolute)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyBudget {
    /// Number of readings that took part in the calculation.
    pub reading_count: usize,

    /// Mean of the indicated readings.
    pub average_indicated: f64,

    /// Deviation of the mean from the standard value, in percent.
    pub percent_error: f64,

    /// Repeatability (standard error of the mean).
    pub type_a_uncertainty: f64,

    /// Uncertainty of the standard before the coverage factor is removed.
    pub standard_uncertainty: f64,

    /// Standard uncertainty contributed by the reference standard.
    pub standard_contribution: f64,

    /// Standard uncertainty contributed by the resolution (rectangular).
    pub resolution_contribution: f64,

    /// Standard uncertainty contributed by the accuracy specification (rectangular).
    pub accuracy_contribution: f64,

    /// Contribution of other conditions. Always zero for now.
    pub other_contribution: f64,

    /// Root-sum-of-squares of all contributions.
    pub combined_uncertainty: f64,

    /// Combined uncertainty multiplied by the coverage factor k=2.
    pub expanded_uncertainty: f64,

    /// CMC bound converted to the unit of the standard value.
    pub cmc_absolute: f64,

    /// Uncertainty to print on the certificate.
    pub reported_uncertainty: f64,
}

impl UncertaintyBudget {
    /// Computes a budget using the certificate convention for the reference
    /// standard.
    ///
    /// # Errors
    ///
    /// See [`calculator::compute`].
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::{CalibrationObservation, UncertaintyBudget};
    ///
    /// let obs = CalibrationObservation::new(100.0, [100.1, 99.9, 100.0])
    ///     .with_resolution(0.1)
    ///     .with_reference_uncertainty(0.5)
    ///     .with_cmc_percent(1.0);
    ///
    /// let budget = UncertaintyBudget::compute(&obs).unwrap();
    /// assert!((budget.reported_uncertainty - 1.0).abs() < 1e-12);
    /// ```
    pub fn compute(observation: &CalibrationObservation) -> Result<Self, ValidationError> {
        calculator::compute(observation, ReferenceMode::CertificateHalved)
    }

    /// Returns true when the CMC bound, not the measured budget, is what
    /// ends up on the certificate.
    #[must_use]
    pub fn is_cmc_limited(&self) -> bool {
        self.cmc_absolute > self.expanded_uncertainty
    }

    /// Returns the contribution terms in budget order.
    #[must_use]
    pub fn contributions(&self) -> [(&'static str, f64); 5] {
        [
            ("type_a", self.type_a_uncertainty),
            ("standard", self.standard_contribution),
            ("resolution", self.resolution_contribution),
            ("accuracy", self.accuracy_contribution),
            ("other", self.other_contribution),
        ]
    }
}
