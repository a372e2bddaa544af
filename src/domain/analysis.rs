//! End-to-end analysis of one symbol, and fan-out over many.
//!
//! fetch raw frame -> indicator engine -> scorer -> performance summary.
//! Each symbol is independent; a failure for one never affects another.

use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::domain::augmented::AugmentedTable;
use crate::domain::engine::compute_indicators;
use crate::domain::error::SignalError;
use crate::domain::scoring::{score, Classification, ScoreBreakdown, ScoringParams, ScoringProfile};
use crate::domain::summary::{PerformanceSummary, DEFAULT_WINDOW};
use crate::ports::cache_port::CachePort;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile: ScoringProfile,
    pub params: ScoringParams,
    pub summary_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::default(),
            params: ScoringParams::default(),
            summary_window: DEFAULT_WINDOW,
        }
    }
}

/// Everything produced for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub close: f64,
    pub classification: Classification,
    pub breakdown: ScoreBreakdown,
    pub summary: Option<PerformanceSummary>,
    #[serde(skip)]
    pub table: Arc<AugmentedTable>,
}

/// Score one symbol, consulting `cache` first when given.
pub fn analyze(
    data: &dyn DataPort,
    cache: Option<&dyn CachePort>,
    symbol: &str,
    settings: &Settings,
) -> Result<SignalReport, SignalError> {
    if let Some(hit) = cache.and_then(|c| c.get(symbol, settings)) {
        tracing::debug!(symbol, profile = %settings.profile, "cache hit");
        return Ok(hit);
    }

    let frame = data.fetch_frame(symbol)?;
    let table = compute_indicators(&frame, symbol)?;
    let report = report_for(table, settings)?;

    tracing::info!(
        symbol,
        classification = %report.classification,
        buy = report.breakdown.buy_score,
        sell = report.breakdown.sell_score,
        "analyzed"
    );

    if let Some(c) = cache {
        c.put(settings, &report);
    }
    Ok(report)
}

/// Score an already computed table.
pub fn report_for(table: AugmentedTable, settings: &Settings) -> Result<SignalReport, SignalError> {
    let (classification, breakdown) = score(&table, settings.profile, &settings.params)?;
    let summary = PerformanceSummary::from_table(&table, settings.summary_window);
    let latest = table
        .latest()
        .ok_or_else(|| SignalError::InsufficientHistory {
            symbol: table.symbol.clone(),
            bars: 0,
            minimum: 1,
        })?;
    let (as_of, close) = (latest.date(), latest.close());

    Ok(SignalReport {
        symbol: table.symbol.clone(),
        as_of,
        close,
        classification,
        breakdown,
        summary,
        table: Arc::new(table),
    })
}

/// Analyze every symbol in parallel. Results keep the order of `symbols`.
pub fn analyze_all(
    data: &(dyn DataPort + Sync),
    cache: Option<&(dyn CachePort + Sync)>,
    symbols: &[String],
    settings: &Settings,
) -> Vec<(String, Result<SignalReport, SignalError>)> {
    symbols
        .par_iter()
        .map(|symbol| {
            let cache = cache.map(|c| c as &dyn CachePort);
            let result = analyze(data, cache, symbol, settings);
            if let Err(e) = &result {
                tracing::warn!(symbol = %symbol, error = %e, "analysis failed");
            }
            (symbol.clone(), result)
        })
        .collect()
}
