//! Classic floor-trader pivot points, taken from the previous bar.
//!
//! PP = (H + L + C) / 3
//! R1 = 2PP - L, S1 = 2PP - H
//! R2 = PP + (H - L), S2 = PP - (H - L)
//!
//! The first bar has no previous bar and is missing on every level.

use crate::domain::indicator::Series;

#[derive(Debug, Clone, PartialEq)]
pub struct Pivots {
    pub pp: Series,
    pub r1: Series,
    pub s1: Series,
    pub r2: Series,
    pub s2: Series,
}

pub fn pivots(highs: &[f64], lows: &[f64], closes: &[f64]) -> Pivots {
    let n = closes.len();
    let mut out = Pivots {
        pp: vec![None; n],
        r1: vec![None; n],
        s1: vec![None; n],
        r2: vec![None; n],
        s2: vec![None; n],
    };

    for i in 1..n {
        let (h, l, c) = (highs[i - 1], lows[i - 1], closes[i - 1]);
        let pp = (h + l + c) / 3.0;
        out.pp[i] = Some(pp);
        out.r1[i] = Some(2.0 * pp - l);
        out.s1[i] = Some(2.0 * pp - h);
        out.r2[i] = Some(pp + (h - l));
        out.s2[i] = Some(pp - (h - l));
    }

    out
}
