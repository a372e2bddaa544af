//! Average True Range (Wilder).
//!
//! TR[0] = high - low, TR[i] = max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR seeds with the mean of the first n true ranges, then
//! ATR[i] = (ATR[i-1] * (n-1) + TR[i]) / n. First (n-1) bars are missing.

use crate::domain::indicator::Series;

pub const DEFAULT_PERIOD: usize = 14;

pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (0..closes.len())
        .map(|i| {
            let hl = highs[i] - lows[i];
            if i == 0 {
                hl
            } else {
                let prev_close = closes[i - 1];
                hl.max((highs[i] - prev_close).abs())
                    .max((lows[i] - prev_close).abs())
            }
        })
        .collect()
}

pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Series {
    let n = closes.len();
    let mut values = vec![None; n];
    if period == 0 || n < period {
        return values;
    }

    let tr = true_ranges(highs, lows, closes);
    let mut current = tr[..period].iter().sum::<f64>() / period as f64;
    values[period - 1] = Some(current);

    for i in period..n {
        current = (current * (period - 1) as f64 + tr[i]) / period as f64;
        values[i] = Some(current);
    }

    values
}
