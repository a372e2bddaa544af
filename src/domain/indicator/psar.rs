//! Parabolic SAR (stop and reverse).
//!
//! Starts in an up regime with SAR = close for the first two bars. Each bar the
//! SAR moves toward the extreme point by the acceleration factor, which grows
//! by `step` (capped at `max_step`) whenever a new extreme is made. A price
//! crossing the SAR flips the regime, resets the factor and places the SAR at
//! the previous extreme. In an up regime the SAR is never above the two prior
//! lows, in a down regime never below the two prior highs.
//!
//! The up/down indicators are 1.0 only on the bar where the regime flips into
//! up/down, 0.0 otherwise.

use crate::domain::indicator::Series;

pub const DEFAULT_STEP: f64 = 0.02;
pub const DEFAULT_MAX_STEP: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct ParabolicSar {
    pub sar: Series,
    pub up_indicator: Series,
    pub down_indicator: Series,
}

pub fn parabolic_sar(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    step: f64,
    max_step: f64,
) -> ParabolicSar {
    let n = closes.len();
    let mut sar: Vec<f64> = closes.to_vec();
    let mut regime_up: Vec<Option<bool>> = vec![None; n];

    if n > 0 {
        let mut up_trend = true;
        let mut af = step;
        let mut up_trend_high = highs[0];
        let mut down_trend_low = lows[0];

        for i in 2..n {
            let mut reversal = false;
            let max_high = highs[i];
            let min_low = lows[i];

            if up_trend {
                sar[i] = sar[i - 1] + af * (up_trend_high - sar[i - 1]);
                if min_low < sar[i] {
                    reversal = true;
                    sar[i] = up_trend_high;
                    down_trend_low = min_low;
                    af = step;
                } else {
                    if max_high > up_trend_high {
                        up_trend_high = max_high;
                        af = (af + step).min(max_step);
                    }
                    let l1 = lows[i - 1];
                    let l2 = lows[i - 2];
                    if l2 < sar[i] {
                        sar[i] = l2;
                    } else if l1 < sar[i] {
                        sar[i] = l1;
                    }
                }
            } else {
                sar[i] = sar[i - 1] - af * (sar[i - 1] - down_trend_low);
                if max_high > sar[i] {
                    reversal = true;
                    sar[i] = down_trend_low;
                    up_trend_high = max_high;
                    af = step;
                } else {
                    if min_low < down_trend_low {
                        down_trend_low = min_low;
                        af = (af + step).min(max_step);
                    }
                    let h1 = highs[i - 1];
                    let h2 = highs[i - 2];
                    if h2 > sar[i] {
                        sar[i] = h2;
                    } else if h1 > sar[i] {
                        sar[i] = h1;
                    }
                }
            }

            up_trend = up_trend != reversal;
            regime_up[i] = Some(up_trend);
        }
    }

    let mut up_indicator = vec![Some(0.0); n];
    let mut down_indicator = vec![Some(0.0); n];
    for i in 1..n {
        let prev = regime_up[i - 1];
        match regime_up[i] {
            Some(true) if prev != Some(true) => up_indicator[i] = Some(1.0),
            Some(false) if prev != Some(false) => down_indicator[i] = Some(1.0),
            _ => {}
        }
    }

    ParabolicSar {
        sar: sar.into_iter().map(Some).collect(),
        up_indicator,
        down_indicator,
    }
}
