//! Bollinger Bands indicator.
//!
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Default parameters: period=20, multiplier=2.0. First (period-1) bars are missing.

use crate::domain::indicator::Series;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

pub fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let n = closes.len();
    let mut bands = BollingerBands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };
    if period == 0 {
        return bands;
    }

    for i in (period - 1)..n {
        let window = &closes[i + 1 - period..=i];
        let (mean, stddev) = population_stddev(window);
        let upper = mean + multiplier * stddev;
        let lower = mean - multiplier * stddev;

        bands.upper[i] = Some(upper);
        bands.middle[i] = Some(mean);
        bands.lower[i] = Some(lower);
    }

    bands
}

/// Mean and population standard deviation of a window.
pub fn population_stddev(window: &[f64]) -> (f64, f64) {
    let len = window.len() as f64;
    let mean = window.iter().sum::<f64>() / len;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / len;
    (mean, variance.sqrt())
}
