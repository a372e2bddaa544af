//! Configuration validation.
//!
//! Checks the `[scoring]` and `[data]` sections before any symbol is scored.

use crate::domain::error::SignalError;
use crate::domain::scoring::{ScoringParams, ScoringProfile, profile};
use crate::ports::config_port::ConfigPort;

pub const SCORING: &str = "scoring";
pub const DATA: &str = "data";
pub const CACHE: &str = "cache";

pub fn validate_scoring_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_profile(config)?;
    validate_partial_credit(config)?;
    validate_pivot_tolerance(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string(DATA, "dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        _ => Err(SignalError::ConfigMissing {
            section: DATA.to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_profile(config: &dyn ConfigPort) -> Result<(), SignalError> {
    if let Some(value) = config.get_string(SCORING, "profile") {
        value
            .parse::<ScoringProfile>()
            .map_err(|reason| SignalError::ConfigInvalid {
                section: SCORING.to_string(),
                key: "profile".to_string(),
                reason,
            })?;
    }
    Ok(())
}

fn validate_partial_credit(config: &dyn ConfigPort) -> Result<(), SignalError> {
    ScoringParams {
        partial_credit: config.get_double(SCORING, "partial_credit", profile::DEFAULT_PARTIAL_CREDIT),
        ..ScoringParams::default()
    }
    .validate()
}

fn validate_pivot_tolerance(config: &dyn ConfigPort) -> Result<(), SignalError> {
    ScoringParams {
        pivot_tolerance: config.get_double(SCORING, "pivot_tolerance", profile::DEFAULT_PIVOT_TOLERANCE),
        ..ScoringParams::default()
    }
    .validate()
}
