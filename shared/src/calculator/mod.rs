//! Uncertainty budget calculation.
//!
//! Combines the repeatability (Type-A) term with the Type-B contributions of
//! the reference standard, the resolution and the accuracy specification into
//! a combined and expanded uncertainty, then reconciles the result against the
//! CMC bound.
//!
//! The calculation is a pure function of its inputs. It holds no state and may
//! be called from any number of threads at once.
//!
//! # Example
//!
//! ```
//! use shared::calculator::compute;
//! use shared::models::{CalibrationObservation, ReferenceMode};
//!
//! let obs = CalibrationObservation::new(100.0, [100.1, 99.9, 100.0])
//!     .with_resolution(0.1)
//!     .with_reference_uncertainty(0.5)
//!     .with_cmc_percent(1.0);
//!
//! let budget = compute(&obs, ReferenceMode::CertificateHalved).unwrap();
//! assert!((budget.standard_contribution - 0.25).abs() < 1e-12);
//! assert!((budget.reported_uncertainty - 1.0).abs() < 1e-12);
//! ```

pub mod stats;

use crate::models::{CalibrationObservation, ReferenceMode, UncertaintyBudget};
use thiserror::Error;

/// Coverage factor applied to the combined uncertainty (~95 % under normality).
pub const COVERAGE_FACTOR: f64 = 2.0;

/// Errors raised while validating an observation.
///
/// A zero standard value is not an error: percent error and the absolute CMC
/// bound are both reported as `0` instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// No usable readings were supplied.
    #[error("At least one indicated reading is required")]
    EmptyInput,

    /// A parameter is not finite or is physically impossible.
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// Name of the offending input field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Short machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidParameter { .. } => "invalid_parameter",
        }
    }
}

/// Computes the uncertainty budget for one observation.
///
/// # Errors
///
/// Returns an error if:
/// - any numeric input is NaN or infinite (`InvalidParameter`)
/// - `resolution`, `accuracy_uncertainty`, `reference_uncertainty` or
///   `cmc_percent` is negative (`InvalidParameter`)
/// - no reading is present once blanks and NaN are dropped (`EmptyInput`)
/// - the inputs are finite but so large that a result field would overflow
///   (`InvalidParameter`, naming the result field)
pub fn compute(
    observation: &CalibrationObservation,
    mode: ReferenceMode,
) -> Result<UncertaintyBudget, ValidationError> {
    validate(observation)?;

    let readings: Vec<f64> = observation.present_readings().collect();
    let average_indicated = stats::mean(&readings).ok_or(ValidationError::EmptyInput)?;

    let standard_value = observation.standard_value;
    let percent_error = if standard_value == 0.0 {
        0.0
    } else {
        (average_indicated - standard_value) / standard_value * 100.0
    };

    let type_a_uncertainty = stats::standard_error(&readings);

    let standard_uncertainty = match mode {
        ReferenceMode::CertificateHalved => observation.reference_uncertainty,
        ReferenceMode::FractionOfMean => {
            (observation.reference_uncertainty * average_indicated).abs()
        }
    };
    let standard_contribution = standard_uncertainty / 2.0;

    let rectangular = 2.0 * 3.0_f64.sqrt();
    let resolution_contribution = observation.resolution / rectangular;
    let accuracy_contribution = observation.accuracy_uncertainty / rectangular;
    let other_contribution = 0.0_f64;

    let combined_uncertainty = [
        type_a_uncertainty,
        standard_contribution,
        resolution_contribution,
        accuracy_contribution,
        other_contribution,
    ]
    .into_iter()
    .fold(0.0_f64, f64::hypot);
    let expanded_uncertainty = COVERAGE_FACTOR * combined_uncertainty;

    let cmc_absolute = observation.cmc_percent / 100.0 * standard_value;
    let reported_uncertainty = expanded_uncertainty.max(cmc_absolute);

    let budget = UncertaintyBudget {
        reading_count: readings.len(),
        average_indicated,
        percent_error,
        type_a_uncertainty,
        standard_uncertainty,
        standard_contribution,
        resolution_contribution,
        accuracy_contribution,
        other_contribution,
        combined_uncertainty,
        expanded_uncertainty,
        cmc_absolute,
        reported_uncertainty,
    };
    require_finite_result(&budget)?;
    Ok(budget)
}

/// Rejects a budget whose magnitudes no longer fit in an `f64`.
fn require_finite_result(budget: &UncertaintyBudget) -> Result<(), ValidationError> {
    let fields = [
        ("average_indicated", budget.average_indicated),
        ("percent_error", budget.percent_error),
        ("type_a_uncertainty", budget.type_a_uncertainty),
        ("standard_uncertainty", budget.standard_uncertainty),
        ("combined_uncertainty", budget.combined_uncertainty),
        ("expanded_uncertainty", budget.expanded_uncertainty),
        ("cmc_absolute", budget.cmc_absolute),
        ("reported_uncertainty", budget.reported_uncertainty),
    ];
    match fields.into_iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(ValidationError::invalid(
            field,
            "inputs are too large to give a finite result",
        )),
        None => Ok(()),
    }
}

fn validate(observation: &CalibrationObservation) -> Result<(), ValidationError> {
    require_finite("standard_value", observation.standard_value)?;
    require_non_negative("resolution", observation.resolution)?;
    require_non_negative("reference_uncertainty", observation.reference_uncertainty)?;
    require_non_negative("accuracy_uncertainty", observation.accuracy_uncertainty)?;
    require_non_negative("cmc_percent", observation.cmc_percent)?;

    if observation.present_readings().any(f64::is_infinite) {
        return Err(ValidationError::invalid(
            "indicated_readings",
            "readings must be finite",
        ));
    }
    if observation.present_readings().next().is_none() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(())
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::invalid(field, format!("{value} is not finite")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("{value} must not be negative"),
        ));
    }
    Ok(())
}
