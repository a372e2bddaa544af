//! Scoring profiles and their tunable parameters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::SignalError;

/// Which condition table and label set the scorer uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProfile {
    /// Fifteen conditions, seven labels.
    #[default]
    Enhanced,
    /// Five conditions, BUY/SELL/HOLD.
    Baseline,
}

impl ScoringProfile {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringProfile::Enhanced => "enhanced",
            ScoringProfile::Baseline => "baseline",
        }
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enhanced" => Ok(ScoringProfile::Enhanced),
            "baseline" => Ok(ScoringProfile::Baseline),
            other => Err(format!(
                "unknown scoring profile '{}' (expected enhanced or baseline)",
                other
            )),
        }
    }
}

pub const DEFAULT_PARTIAL_CREDIT: f64 = 0.5;
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 0.01;

/// Empirical constants of the condition tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Points for an "approaching" signal (RSI near a zone, VWAP side, above-average volume).
    pub partial_credit: f64,
    /// Relative half-width of the band around S1/R1 counted as "near".
    pub pivot_tolerance: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            partial_credit: DEFAULT_PARTIAL_CREDIT,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }
}

impl ScoringParams {
    /// `partial_credit` must lie in (0, 1] and `pivot_tolerance` in (0, 0.1].
    pub fn validate(&self) -> Result<(), SignalError> {
        if !(self.partial_credit > 0.0 && self.partial_credit <= 1.0) {
            return Err(invalid("partial_credit", "partial_credit must be in (0, 1]"));
        }
        if !(self.pivot_tolerance > 0.0 && self.pivot_tolerance <= 0.1) {
            return Err(invalid("pivot_tolerance", "pivot_tolerance must be in (0, 0.1]"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> SignalError {
    SignalError::ConfigInvalid {
        section: "scoring".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
