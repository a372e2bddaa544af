//! Ichimoku cloud lines (unshifted).
//!
//! - Conversion (tenkan) = (highest high + lowest low) / 2 over 9 bars
//! - Base (kijun) = same over 26 bars
//! - Leading span A = (conversion + base) / 2
//! - Leading span B = (highest high + lowest low) / 2 over 52 bars
//!
//! Spans are reported on the bar they are computed for, not projected forward.

use crate::domain::indicator::{window_max, window_min, Series};

pub const CONVERSION_PERIOD: usize = 9;
pub const BASE_PERIOD: usize = 26;
pub const SPAN_B_PERIOD: usize = 52;

#[derive(Debug, Clone, PartialEq)]
pub struct IchimokuLines {
    pub conversion: Series,
    pub base: Series,
    pub span_a: Series,
    pub span_b: Series,
}

pub fn ichimoku(
    highs: &[f64],
    lows: &[f64],
    conversion_period: usize,
    base_period: usize,
    span_b_period: usize,
) -> IchimokuLines {
    let conversion = midpoint(highs, lows, conversion_period);
    let base = midpoint(highs, lows, base_period);
    let span_a = conversion
        .iter()
        .zip(&base)
        .map(|(c, b)| Some(((*c)? + (*b)?) / 2.0))
        .collect();
    let span_b = midpoint(highs, lows, span_b_period);

    IchimokuLines {
        conversion,
        base,
        span_a,
        span_b,
    }
}

/// (highest high + lowest low) / 2 over a trailing window.
fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> Series {
    (0..highs.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                None
            } else {
                Some((window_max(highs, i, period) + window_min(lows, i, period)) / 2.0)
            }
        })
        .collect()
}
