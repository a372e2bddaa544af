#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use swingsignal::domain::error::SignalError;
use swingsignal::domain::frame::{ColumnKey, RawFrame};
use swingsignal::ports::data_port::DataPort;

pub struct MockDataPort {
    pub frames: HashMap<String, RawFrame>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_frame(mut self, symbol: &str, frame: RawFrame) -> Self {
        self.frames.insert(symbol.to_string(), frame);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_frame(&self, symbol: &str) -> Result<RawFrame, SignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalError::DataSource {
                reason: reason.clone(),
            });
        }
        self.frames
            .get(symbol)
            .cloned()
            .ok_or_else(|| SignalError::DataSource {
                reason: format!("no data for {}", symbol),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let mut symbols: Vec<String> = self.frames.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dates(n: usize) -> Vec<NaiveDate> {
    let start = date(2024, 1, 1);
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

/// Flat-layout frame with high/low at `spread` around each close.
pub fn frame_from_closes(closes: &[f64], spread: f64, volume: f64) -> RawFrame {
    let col = |f: f64| closes.iter().map(|c| Some(c * f)).collect::<Vec<_>>();
    RawFrame::new(dates(closes.len()))
        .with_column(ColumnKey::flat("Open"), col(1.0))
        .with_column(ColumnKey::flat("High"), col(1.0 + spread))
        .with_column(ColumnKey::flat("Low"), col(1.0 - spread))
        .with_column(ColumnKey::flat("Close"), col(1.0))
        .with_column(ColumnKey::flat("Volume"), vec![Some(volume); closes.len()])
}

pub fn uptrend_closes(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 * 1.005f64.powi(i as i32)).collect()
}

pub fn downtrend_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 400.0 - 100.0 * 1.005f64.powi(i as i32))
        .collect()
}

pub fn uptrend_frame(n: usize) -> RawFrame {
    frame_from_closes(&uptrend_closes(n), 0.01, 1_000_000.0)
}

pub fn downtrend_frame(n: usize) -> RawFrame {
    frame_from_closes(&downtrend_closes(n), 0.01, 1_000_000.0)
}

/// Closes rising one point a day from 100.
pub fn linear_up_frame(n: usize) -> RawFrame {
    let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
    frame_from_closes(&closes, 0.01, 1_000_000.0)
}

/// Closes falling one point a day from 300.
pub fn linear_down_frame(n: usize) -> RawFrame {
    let closes: Vec<f64> = (0..n).map(|i| 300.0 - i as f64).collect();
    frame_from_closes(&closes, 0.01, 1_000_000.0)
}

/// Constant price with no intraday range.
pub fn flat_frame(n: usize) -> RawFrame {
    frame_from_closes(&vec![100.0; n], 0.0, 1_000_000.0)
}

/// Two-level `(field, symbol)` frame holding an uptrend for `up` and a
/// downtrend for `down`.
pub fn two_level_frame(up: &str, down: &str, n: usize) -> RawFrame {
    let mut frame = RawFrame::new(dates(n));
    for (symbol, closes) in [(up, uptrend_closes(n)), (down, downtrend_closes(n))] {
        let col = |f: f64| closes.iter().map(|c| Some(c * f)).collect::<Vec<_>>();
        frame = frame
            .with_column(ColumnKey::pair("Close", symbol), col(1.0))
            .with_column(ColumnKey::pair("High", symbol), col(1.01))
            .with_column(ColumnKey::pair("Low", symbol), col(0.99))
            .with_column(ColumnKey::pair("Open", symbol), col(1.0))
            .with_column(ColumnKey::pair("Volume", symbol), vec![Some(1_000_000.0); n]);
    }
    frame
}

/// Blank every cell of `symbol` on row `row`.
pub fn blank_row(frame: RawFrame, symbol: &str, row: usize) -> RawFrame {
    RawFrame {
        dates: frame.dates,
        columns: frame
            .columns
            .into_iter()
            .map(|(key, mut cells)| {
                if matches!(&key, ColumnKey::Pair { symbol: s, .. } if s == symbol) {
                    cells[row] = None;
                }
                (key, cells)
            })
            .collect(),
    }
}

pub fn without_column(frame: RawFrame, field: &str) -> RawFrame {
    RawFrame {
        dates: frame.dates,
        columns: frame
            .columns
            .into_iter()
            .filter(|(key, _)| match key {
                ColumnKey::Flat(name) => name != field,
                ColumnKey::Pair { field: f, .. } => f != field,
            })
            .collect(),
    }
}

/// CSV text in the flat `Date,Open,High,Low,Close,Volume` layout.
pub fn csv_from_closes(closes: &[f64]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for (d, c) in dates(closes.len()).iter().zip(closes) {
        out.push_str(&format!(
            "{},{},{},{},{},1000000\n",
            d,
            c,
            c * 1.01,
            c * 0.99,
            c
        ));
    }
    out
}
