//! Raw tabular input from a data source and its normalization to an
//! [`OhlcvSeries`].
//!
//! Providers hand back either a flat column layout (`Close`, `High`, ...) or a
//! two-level `(field, symbol)` layout when a download covers several tickers.
//! [`normalize`] always produces the canonical flat series before any
//! indicator runs.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::{OhlcvBar, OhlcvSeries};
use chrono::NaiveDate;
use std::collections::HashSet;

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// Columns that must be present; reported in this order when absent.
pub const REQUIRED_COLUMNS: [&str; 4] = [CLOSE, HIGH, LOW, VOLUME];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Flat(String),
    Pair { field: String, symbol: String },
}

impl ColumnKey {
    pub fn flat(name: &str) -> Self {
        ColumnKey::Flat(name.to_string())
    }

    pub fn pair(field: &str, symbol: &str) -> Self {
        ColumnKey::Pair {
            field: field.to_string(),
            symbol: symbol.to_string(),
        }
    }

    fn matches(&self, field: &str, symbol: &str) -> bool {
        match self {
            ColumnKey::Flat(name) => name.eq_ignore_ascii_case(field),
            ColumnKey::Pair { field: f, symbol: s } => {
                f.eq_ignore_ascii_case(field) && s.eq_ignore_ascii_case(symbol)
            }
        }
    }
}

/// Date-indexed table of optional numeric cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(ColumnKey, Vec<Option<f64>>)>,
}

impl RawFrame {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, key: ColumnKey, cells: Vec<Option<f64>>) -> Self {
        self.columns.push((key, cells));
        self
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn is_multi_level(&self) -> bool {
        self.columns
            .iter()
            .any(|(key, _)| matches!(key, ColumnKey::Pair { .. }))
    }

    fn find(&self, field: &str, symbol: &str, multi_level: bool) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .filter(|(key, _)| multi_level == matches!(key, ColumnKey::Pair { .. }))
            .find(|(key, _)| key.matches(field, symbol))
            .map(|(_, cells)| cells.as_slice())
    }
}

/// Select the symbol's OHLCV columns, check presence, and order the bars by date.
///
/// Rows where every selected cell is missing (a date the symbol did not trade
/// in a multi-ticker download) are dropped. A partially missing row keeps its
/// missing cells as NaN; the indicator engine rejects them when an indicator
/// consumes that field. A frame without an `Open` column takes the close as
/// the open.
pub fn normalize(frame: &RawFrame, symbol: &str) -> Result<OhlcvSeries, SignalError> {
    let multi_level = frame.is_multi_level();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|field| frame.find(field, symbol, multi_level).is_none())
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SignalError::MissingColumns {
            symbol: symbol.to_string(),
            columns: missing,
        });
    }

    let high = column(frame, HIGH, symbol, multi_level)?;
    let low = column(frame, LOW, symbol, multi_level)?;
    let close = column(frame, CLOSE, symbol, multi_level)?;
    let volume = column(frame, VOLUME, symbol, multi_level)?;
    let open = match frame.find(OPEN, symbol, multi_level) {
        Some(_) => Some(column(frame, OPEN, symbol, multi_level)?),
        None => {
            tracing::debug!(symbol, "no Open column, using Close");
            None
        }
    };

    let cell = |cells: &[Option<f64>], i: usize| cells[i].unwrap_or(f64::NAN);
    let empty_row = |i: usize| {
        [high, low, close, volume]
            .into_iter()
            .chain(open)
            .all(|cells| cells[i].is_none())
    };

    let mut bars: Vec<OhlcvBar> = frame
        .dates
        .iter()
        .enumerate()
        .filter(|&(i, _)| !empty_row(i))
        .map(|(i, &date)| OhlcvBar {
            date,
            open: open.map_or_else(|| cell(close, i), |o| cell(o, i)),
            high: cell(high, i),
            low: cell(low, i),
            close: cell(close, i),
            volume: cell(volume, i),
        })
        .collect();

    let dropped = frame.row_count() - bars.len();
    if dropped > 0 {
        tracing::debug!(symbol, dropped, "skipped rows with no data for symbol");
    }

    bars.sort_by_key(|b| b.date);

    let mut seen = HashSet::with_capacity(bars.len());
    if let Some(dup) = bars.iter().find(|b| !seen.insert(b.date)) {
        return Err(SignalError::DataSource {
            reason: format!("duplicate bar for {} on {}", symbol, dup.date),
        });
    }

    Ok(OhlcvSeries::new(symbol, bars))
}

fn column<'a>(
    frame: &'a RawFrame,
    field: &str,
    symbol: &str,
    multi_level: bool,
) -> Result<&'a [Option<f64>], SignalError> {
    let cells = frame
        .find(field, symbol, multi_level)
        .ok_or_else(|| SignalError::MissingColumns {
            symbol: symbol.to_string(),
            columns: vec![field.to_string()],
        })?;
    if cells.len() != frame.dates.len() {
        return Err(SignalError::DataSource {
            reason: format!(
                "{} column for {} has {} cells, expected {}",
                field,
                symbol,
                cells.len(),
                frame.dates.len()
            ),
        });
    }
    Ok(cells)
}
