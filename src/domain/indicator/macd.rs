//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line, see [`difference`]
//!
//! Default parameters: fast=12, slow=26, signal=9
//! The line is present from bar slow-1, the signal from bar slow-1 + signal-1.

use crate::domain::indicator::{ema, ema_series, Series};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Series = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = ema_series(&line, signal_period);

    MacdSeries { line, signal }
}

pub fn macd_default(closes: &[f64]) -> MacdSeries {
    macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// Element-wise `left - right`, missing where either side is missing.
pub fn difference(left: &Series, right: &Series) -> Series {
    left.iter()
        .zip(right)
        .map(|(l, r)| Some((*l)? - (*r)?))
        .collect()
}
