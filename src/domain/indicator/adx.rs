//! Average Directional Index with +DI / -DI (Wilder's directional movement).
//!
//! For each bar after the first:
//! - up = high - prev_high, down = prev_low - low
//! - +DM = up if up > down and up > 0, else 0; -DM symmetric
//! - TR = true range
//!
//! +DM, -DM and TR are Wilder-smoothed over n; +DI = 100 * sm(+DM) / sm(TR),
//! -DI likewise; DX = 100 * |+DI - -DI| / (+DI + -DI); ADX = Wilder average of DX.
//!
//! DI lines are present from bar n, ADX from bar 2n-1.

use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::Series;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct AdxSeries {
    pub adx: Series,
    pub plus_di: Series,
    pub minus_di: Series,
}

pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> AdxSeries {
    let n = closes.len();
    let mut out = AdxSeries {
        adx: vec![None; n],
        plus_di: vec![None; n],
        minus_di: vec![None; n],
    };
    if period == 0 || n <= period {
        return out;
    }

    let tr = true_ranges(highs, lows, closes);
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    let p = period as f64;
    let mut sm_tr = tr[1..=period].iter().sum::<f64>() / p;
    let mut sm_plus = plus_dm[1..=period].iter().sum::<f64>() / p;
    let mut sm_minus = minus_dm[1..=period].iter().sum::<f64>() / p;

    let mut dx: Vec<f64> = Vec::with_capacity(n - period);
    for i in period..n {
        if i > period {
            sm_tr = (sm_tr * (p - 1.0) + tr[i]) / p;
            sm_plus = (sm_plus * (p - 1.0) + plus_dm[i]) / p;
            sm_minus = (sm_minus * (p - 1.0) + minus_dm[i]) / p;
        }

        let (pdi, mdi) = if sm_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * sm_plus / sm_tr, 100.0 * sm_minus / sm_tr)
        };
        out.plus_di[i] = Some(pdi);
        out.minus_di[i] = Some(mdi);

        let di_sum = pdi + mdi;
        dx.push(if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (pdi - mdi).abs() / di_sum
        });
    }

    if dx.len() >= period {
        let mut current = dx[..period].iter().sum::<f64>() / p;
        out.adx[2 * period - 1] = Some(current);
        for (j, value) in dx.iter().enumerate().skip(period) {
            current = (current * (p - 1.0) + value) / p;
            out.adx[period + j] = Some(current);
        }
    }

    out
}
