//! Volume-based indicators: OBV, accumulation/distribution, VWAP and the
//! bar-over-bar volume change.
//!
//! None of these has a warm-up period; every bar is valid except the first
//! Volume_Change cell.

use crate::domain::indicator::Series;

/// On-Balance Volume.
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
pub fn obv(closes: &[f64], volumes: &[f64]) -> Series {
    let mut values = Vec::with_capacity(closes.len());
    let mut running = 0.0;

    for (i, (&close, &volume)) in closes.iter().zip(volumes).enumerate() {
        if i == 0 {
            running = volume;
        } else if close > closes[i - 1] {
            running += volume;
        } else if close < closes[i - 1] {
            running -= volume;
        }
        values.push(Some(running));
    }

    values
}

/// Accumulation/Distribution line.
///
/// CLV = ((close - low) - (high - close)) / (high - low), 0 when high == low.
/// AD[i] = AD[i-1] + CLV * volume.
pub fn accumulation_distribution(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
) -> Series {
    let mut running = 0.0;
    (0..closes.len())
        .map(|i| {
            let range = highs[i] - lows[i];
            let clv = if range == 0.0 {
                0.0
            } else {
                ((closes[i] - lows[i]) - (highs[i] - closes[i])) / range
            };
            running += clv * volumes[i];
            Some(running)
        })
        .collect()
}

/// Cumulative volume-weighted average of the typical price.
///
/// Bars before any volume has traded fall back to the typical price itself.
pub fn vwap(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[f64]) -> Series {
    let mut pv = 0.0;
    let mut total_volume = 0.0;
    (0..closes.len())
        .map(|i| {
            let typical = (highs[i] + lows[i] + closes[i]) / 3.0;
            pv += typical * volumes[i];
            total_volume += volumes[i];
            if total_volume == 0.0 {
                Some(typical)
            } else {
                Some(pv / total_volume)
            }
        })
        .collect()
}

/// Fractional change in volume from the previous bar.
///
/// The first bar, and any bar following a zero-volume bar, is missing.
pub fn volume_change(volumes: &[f64]) -> Series {
    (0..volumes.len())
        .map(|i| {
            if i == 0 || volumes[i - 1] == 0.0 {
                None
            } else {
                Some(volumes[i] / volumes[i - 1] - 1.0)
            }
        })
        .collect()
}
