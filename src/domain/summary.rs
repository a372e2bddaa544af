//! Recent price performance over a trailing window of bars.

use std::fmt;

use serde::Serialize;

use crate::domain::augmented::AugmentedTable;

pub const DEFAULT_WINDOW: usize = 30;
pub const RECENT_VOLUME_BARS: usize = 5;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendStrength {
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    #[serde(rename = "Weak Uptrend")]
    WeakUptrend,
    #[serde(rename = "Weak Downtrend")]
    WeakDowntrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
}

impl TrendStrength {
    /// Bucket a period return in percent.
    pub fn from_return(return_pct: f64) -> Self {
        if return_pct > 5.0 {
            TrendStrength::StrongUptrend
        } else if return_pct > 0.0 {
            TrendStrength::WeakUptrend
        } else if return_pct > -5.0 {
            TrendStrength::WeakDowntrend
        } else {
            TrendStrength::StrongDowntrend
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendStrength::StrongUptrend => "Strong Uptrend",
            TrendStrength::WeakUptrend => "Weak Uptrend",
            TrendStrength::WeakDowntrend => "Weak Downtrend",
            TrendStrength::StrongDowntrend => "Strong Downtrend",
        }
    }
}

impl fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All percentages are in percent units (5.0 means 5%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub window: usize,
    pub return_pct: f64,
    pub volatility_pct: f64,
    pub annualized_volatility_pct: f64,
    pub max_daily_gain_pct: f64,
    pub max_daily_loss_pct: f64,
    pub profitable_days: usize,
    pub total_days: usize,
    pub volume_trend_pct: f64,
    pub trend: TrendStrength,
}

impl PerformanceSummary {
    /// Summarize the last `window` bars. `None` when fewer than two bars are available.
    pub fn from_table(table: &AugmentedTable, window: usize) -> Option<Self> {
        let take = window.min(table.len());
        if take < 2 {
            return None;
        }
        let bars = &table.bars[table.len() - take..];

        let start = bars[0].close;
        let end = bars[take - 1].close;
        let return_pct = if start != 0.0 {
            (end - start) / start * 100.0
        } else {
            0.0
        };

        let daily: Vec<f64> = bars
            .windows(2)
            .filter(|w| w[0].close != 0.0)
            .map(|w| (w[1].close / w[0].close - 1.0) * 100.0)
            .collect();
        let volatility_pct = sample_std(&daily);

        let avg_volume = mean(bars.iter().map(|b| b.volume));
        let recent = &bars[take.saturating_sub(RECENT_VOLUME_BARS)..];
        let recent_volume = mean(recent.iter().map(|b| b.volume));
        let volume_trend_pct = if avg_volume != 0.0 {
            (recent_volume - avg_volume) / avg_volume * 100.0
        } else {
            0.0
        };

        Some(Self {
            window: take,
            return_pct,
            volatility_pct,
            annualized_volatility_pct: volatility_pct * TRADING_DAYS_PER_YEAR.sqrt(),
            max_daily_gain_pct: extreme(&daily, f64::NEG_INFINITY, f64::max),
            max_daily_loss_pct: extreme(&daily, f64::INFINITY, f64::min),
            profitable_days: daily.iter().filter(|r| **r > 0.0).count(),
            total_days: daily.len(),
            volume_trend_pct,
            trend: TrendStrength::from_return(return_pct),
        })
    }
}

/// Largest or smallest value; zero when there are none.
fn extreme(values: &[f64], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(init, pick)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Sample standard deviation (n - 1); zero for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values.iter().copied());
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
