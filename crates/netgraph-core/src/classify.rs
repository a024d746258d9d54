//! Net classification by naming convention.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic category assigned to a net. Discriminants are the class codes
/// emitted in net feature vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetClass {
    Supply = 0,
    Bias = 1,
    Signal = 2,
    Internal = 3,
}

impl NetClass {
    /// Numeric class code used in net feature vectors.
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            NetClass::Supply => "supply",
            NetClass::Bias => "bias",
            NetClass::Signal => "signal",
            NetClass::Internal => "internal",
        }
    }
}

impl fmt::Display for NetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supply-rail net names, matched exactly (case-insensitive).
const SUPPLY_NETS: [&str; 3] = ["vdd!", "gnd!", "0"];

/// Substrings marking bias nets.
const BIAS_PATTERNS: [&str; 2] = ["vbias", "ibias"];

/// Substrings marking signal nets.
const SIGNAL_PATTERNS: [&str; 2] = ["vin", "vout"];

/// Classify a net name. Priority order: supply, bias, signal, internal.
///
/// This is a naming-convention heuristic, not an electrical check.
pub fn classify_net(name: &str) -> NetClass {
    let lower = name.to_lowercase();
    if SUPPLY_NETS.contains(&lower.as_str()) {
        return NetClass::Supply;
    }
    if BIAS_PATTERNS.iter().any(|p| lower.contains(p)) {
        return NetClass::Bias;
    }
    if SIGNAL_PATTERNS.iter().any(|p| lower.contains(p)) {
        return NetClass::Signal;
    }
    NetClass::Internal
}
