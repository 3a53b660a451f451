//! Measured parameters and their units.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Electrical quantity being calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Resistance (Ω).
    Resistance,
    /// Voltage (V).
    Voltage,
    /// Current (A).
    Current,
    /// Frequency (Hz).
    Frequency,
    /// Capacitance (F).
    Capacitance,
    /// Inductance (H).
    Inductance,
}

impl Parameter {
    /// All parameters in display order.
    pub const ALL: [Self; 6] = [
        Self::Resistance,
        Self::Voltage,
        Self::Current,
        Self::Frequency,
        Self::Capacitance,
        Self::Inductance,
    ];

    /// Units offered for this parameter, smallest prefix first.
    #[must_use]
    pub fn units(self) -> &'static [&'static str] {
        match self {
            Self::Resistance => &["mΩ", "Ω", "kΩ", "MΩ"],
            Self::Voltage => &["mV", "V", "kV", "MV"],
            Self::Current => &["mA", "A", "kA", "MA"],
            Self::Frequency => &["mHz", "Hz", "kHz", "MHz"],
            Self::Capacitance => &["mF", "F", "kF", "MF"],
            Self::Inductance => &["mH", "H", "kH", "MH"],
        }
    }

    /// Returns true if `unit` is one of this parameter's units.
    #[must_use]
    pub fn supports_unit(self, unit: &str) -> bool {
        self.units().contains(&unit)
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Resistance => "Resistance",
            Self::Voltage => "Voltage",
            Self::Current => "Current",
            Self::Frequency => "Frequency",
            Self::Capacitance => "Capacitance",
            Self::Inductance => "Inductance",
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown parameter '{s}'"))
    }
}

/// Every unit across all parameters, sorted and de-duplicated.
///
/// The standard value may be entered in any of these, independent of the
/// parameter chosen for the range.
#[must_use]
pub fn all_units() -> Vec<&'static str> {
    Parameter::ALL
        .iter()
        .flat_map(|p| p.units().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
