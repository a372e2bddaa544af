//! Vortex indicator.
//!
//! VM+[i] = |high[i] - low[i-1]|, VM-[i] = |low[i] - high[i-1]|.
//! VI+ = sum(VM+, n) / sum(TR, n), VI- = sum(VM-, n) / sum(TR, n).
//! Present from bar n; a zero true-range sum reports 1.0 on both lines.

use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::Series;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct VortexSeries {
    pub positive: Series,
    pub negative: Series,
}

pub fn vortex(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> VortexSeries {
    let n = closes.len();
    let mut out = VortexSeries {
        positive: vec![None; n],
        negative: vec![None; n],
    };
    if period == 0 || n <= period {
        return out;
    }

    let tr = true_ranges(highs, lows, closes);
    let vm_plus: Vec<f64> = (0..n)
        .map(|i| if i == 0 { 0.0 } else { (highs[i] - lows[i - 1]).abs() })
        .collect();
    let vm_minus: Vec<f64> = (0..n)
        .map(|i| if i == 0 { 0.0 } else { (lows[i] - highs[i - 1]).abs() })
        .collect();

    for i in period..n {
        let range = i + 1 - period..=i;
        let tr_sum: f64 = tr[range.clone()].iter().sum();
        if tr_sum == 0.0 {
            out.positive[i] = Some(1.0);
            out.negative[i] = Some(1.0);
        } else {
            out.positive[i] = Some(vm_plus[range.clone()].iter().sum::<f64>() / tr_sum);
            out.negative[i] = Some(vm_minus[range].iter().sum::<f64>() / tr_sum);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vortex_warmup() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let out = vortex(&highs, &lows, &closes, 14);
        assert!(out.positive[13].is_none());
        assert!(out.positive[14].is_some());
    }

    #[test]
    fn uptrend_positive_dominates() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let out = vortex(&highs, &lows, &closes, 14);
        assert!(out.positive[29].unwrap() > out.negative[29].unwrap());
    }

    #[test]
    fn known_values() {
        // TR per bar after the first: max(2, |h - prev_c|, |l - prev_c|) with a +1 step = 2
        // VM+ = |h - prev_l| = 3, VM- = |l - prev_h| = 1
        let closes = [10.0, 11.0, 12.0];
        let highs = [11.0, 12.0, 13.0];
        let lows = [9.0, 10.0, 11.0];
        let out = vortex(&highs, &lows, &closes, 2);
        assert_eq!(out.positive[2], Some(6.0 / 4.0));
        assert_eq!(out.negative[2], Some(2.0 / 4.0));
    }

    #[test]
    fn flat_prices_report_parity() {
        let flat = [100.0; 20];
        let out = vortex(&flat, &flat, &flat, 14);
        assert_eq!(out.positive[19], Some(1.0));
        assert_eq!(out.negative[19], Some(1.0));
    }
}
