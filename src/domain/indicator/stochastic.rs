//! Stochastic oscillator.
//!
//! %K = 100 * (close - lowest low) / (highest high - lowest low) over k bars,
//! 50 when the range is zero. %D = SMA(d) of %K.

use crate::domain::indicator::{window_max, window_min, Series};

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticSeries {
    let n = closes.len();
    let mut k = vec![None; n];
    if k_period > 0 {
        for i in (k_period - 1)..n {
            let hh = window_max(highs, i, k_period);
            let ll = window_min(lows, i, k_period);
            let range = hh - ll;
            k[i] = Some(if range == 0.0 {
                50.0
            } else {
                100.0 * (closes[i] - ll) / range
            });
        }
    }

    let mut d = vec![None; n];
    if d_period > 0 {
        for i in 0..n {
            if i + 1 < d_period {
                continue;
            }
            let window = &k[i + 1 - d_period..=i];
            if window.iter().all(Option::is_some) {
                d[i] = Some(window.iter().flatten().sum::<f64>() / d_period as f64);
            }
        }
    }

    StochasticSeries { k, d }
}
