//! Accreditation scope model.
//!
//! Each `ScopeEntry` is one line of the laboratory's accreditation scope: what
//! is measured, how, over which range, and the best uncertainty the laboratory
//! may claim there (the CMC). Field names follow the scope export.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// One line of the accreditation scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScopeEntry {
    /// Discipline or nature of calibration (e.g. "Electro-Technical").
    #[serde(rename = "Nature")]
    #[validate(length(min = 1, message = "Nature cannot be empty"))]
    pub nature: String,

    /// Quantity measured or sourced.
    #[serde(rename = "Measurand or Reference")]
    #[validate(length(min = 1, message = "Measurand cannot be empty"))]
    pub measurand: String,

    /// Calibration or measurement method.
    #[serde(rename = "Calibration or Measurement Method", default)]
    pub method: String,

    /// Measurement range and additional parameters.
    #[serde(rename = "Measurement Range and Additional Parameters", default)]
    pub range: String,

    /// CMC upper bound in percent.
    #[serde(rename = "CMC (Upper Bound)", deserialize_with = "percent_from_any")]
    #[validate(range(min = 0.0, message = "CMC cannot be negative"))]
    pub cmc_percent: f64,
}

/// Scope columns that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeColumn {
    /// Nature of calibration.
    Nature,
    /// Measurand or reference.
    Measurand,
    /// Calibration or measurement method.
    Method,
    /// Measurement range.
    Range,
}

impl ScopeEntry {
    /// Creates a scope entry.
    #[must_use]
    pub fn new(
        nature: impl Into<String>,
        measurand: impl Into<String>,
        method: impl Into<String>,
        range: impl Into<String>,
        cmc_percent: f64,
    ) -> Self {
        Self {
            nature: nature.into(),
            measurand: measurand.into(),
            method: method.into(),
            range: range.into(),
            cmc_percent,
        }
    }

    /// Returns the value of a text column.
    #[must_use]
    pub fn column(&self, column: ScopeColumn) -> &str {
        match column {
            ScopeColumn::Nature => &self.nature,
            ScopeColumn::Measurand => &self.measurand,
            ScopeColumn::Method => &self.method,
            ScopeColumn::Range => &self.range,
        }
    }
}

/// Accepts the CMC either as a number or as text such as `"0.5"` or `"0.5 %"`.
fn percent_from_any<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid CMC value '{s}': {e}"))),
    }
}
