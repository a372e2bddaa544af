//! Simple and exponential moving averages.
//!
//! SMA(n)[i] = mean of the trailing n values; first (n-1) bars are missing.
//!
//! EMA(n): k = 2/(n+1), EMA[0] = x[0], then
//! EMA[i] = EMA[i-1] + k * (x[i] - EMA[i-1]). The recursion runs from the
//! first bar; only the output of the first (n-1) bars is withheld.

use crate::domain::indicator::Series;

pub fn sma(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

pub fn ema(values: &[f64], period: usize) -> Series {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if period == 0 {
        return vec![None; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = first;
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i > 0 {
                ema += k * (value - ema);
            }
            (i + 1 >= period).then_some(ema)
        })
        .collect()
}

/// EMA of a derived series, starting at its first present value.
///
/// Cells missing after the start stay missing and do not advance the average.
pub fn ema_series(series: &Series, period: usize) -> Series {
    let Some(start) = series.iter().position(Option::is_some) else {
        return vec![None; series.len()];
    };

    let dense: Vec<f64> = series[start..].iter().map_while(|v| *v).collect();
    let mut out = vec![None; start];
    out.extend(ema(&dense, period));

    // A gap after the start: continue from the last average over the gap.
    if out.len() < series.len() {
        let k = 2.0 / (period as f64 + 1.0);
        let mut last = out.iter().rev().find_map(|v| *v);
        for value in &series[out.len()..] {
            match (value, last) {
                (Some(x), Some(prev)) => {
                    let next = prev + k * (x - prev);
                    last = Some(next);
                    out.push(Some(next));
                }
                _ => out.push(None),
            }
        }
    }

    out
}
