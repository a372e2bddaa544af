//! Condition tables for each scoring profile.
//!
//! A condition looks at the latest row (and the row before it) and votes for
//! at most one side. The profile ceiling is the number of rows in its table.

use crate::domain::augmented::AugmentedRow;
use crate::domain::indicator::Column;
use crate::domain::scoring::profile::{ScoringParams, ScoringProfile};

/// The two most recent rows of an augmented table.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub latest: AugmentedRow<'a>,
    pub previous: AugmentedRow<'a>,
}

impl Snapshot<'_> {
    /// Latest value of `column`, NaN when missing.
    pub fn get(&self, column: Column) -> f64 {
        self.latest.get(column)
    }

    pub fn close(&self) -> f64 {
        self.latest.close()
    }

    pub fn closed_higher(&self) -> bool {
        self.latest.close() > self.previous.close()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vote {
    Buy(f64, &'static str),
    Sell(f64, &'static str),
    Abstain,
}

pub struct Condition {
    pub name: &'static str,
    pub evaluate: fn(&Snapshot<'_>, &ScoringParams) -> Vote,
}

pub fn table(profile: ScoringProfile) -> &'static [Condition] {
    match profile {
        ScoringProfile::Enhanced => ENHANCED,
        ScoringProfile::Baseline => BASELINE,
    }
}

const ENHANCED: &[Condition] = &[
    Condition { name: "rsi_oversold", evaluate: rsi_oversold },
    Condition { name: "rsi_overbought", evaluate: rsi_overbought },
    Condition { name: "sma_cross", evaluate: sma_cross },
    Condition { name: "ema_cross", evaluate: ema_cross },
    Condition { name: "macd", evaluate: macd_vs_signal },
    Condition { name: "adx_trend", evaluate: adx_trend },
    Condition { name: "ichimoku_cloud", evaluate: ichimoku_cloud },
    Condition { name: "stochastic_cross", evaluate: stochastic_cross },
    Condition { name: "bollinger_touch", evaluate: bollinger_touch },
    Condition { name: "psar_flip", evaluate: psar_flip },
    Condition { name: "vwap_side", evaluate: vwap_side },
    Condition { name: "obv_trend", evaluate: obv_trend },
    Condition { name: "ad_trend", evaluate: ad_trend },
    Condition { name: "volume_ratio", evaluate: volume_ratio },
    Condition { name: "pivot_proximity", evaluate: pivot_proximity },
];

const BASELINE: &[Condition] = &[
    Condition { name: "rsi_zone", evaluate: rsi_zone },
    Condition { name: "sma_cross", evaluate: sma_cross },
    Condition { name: "macd", evaluate: macd_vs_signal },
    Condition { name: "bollinger_touch", evaluate: bollinger_touch },
    Condition { name: "volume_direction", evaluate: volume_direction },
];

// NaN operands make every comparison false, so missing cells abstain.

fn rsi_oversold(s: &Snapshot<'_>, p: &ScoringParams) -> Vote {
    let rsi = s.get(Column::Rsi);
    if rsi < 30.0 {
        Vote::Buy(1.0, "RSI below 30 (oversold)")
    } else if rsi < 40.0 {
        Vote::Buy(p.partial_credit, "RSI below 40 (approaching oversold)")
    } else {
        Vote::Abstain
    }
}

fn rsi_overbought(s: &Snapshot<'_>, p: &ScoringParams) -> Vote {
    let rsi = s.get(Column::Rsi);
    if rsi > 70.0 {
        Vote::Sell(1.0, "RSI above 70 (overbought)")
    } else if rsi > 60.0 {
        Vote::Sell(p.partial_credit, "RSI above 60 (approaching overbought)")
    } else {
        Vote::Abstain
    }
}

fn rsi_zone(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let rsi = s.get(Column::Rsi);
    if rsi < 40.0 {
        Vote::Buy(1.0, "RSI below 40")
    } else if rsi > 60.0 {
        Vote::Sell(1.0, "RSI above 60")
    } else {
        Vote::Abstain
    }
}

fn sma_cross(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (fast, slow) = (s.get(Column::Sma50), s.get(Column::Sma200));
    if fast > slow {
        Vote::Buy(1.0, "Golden Cross: 50-day SMA above 200-day")
    } else if fast < slow {
        Vote::Sell(1.0, "Death Cross: 50-day SMA below 200-day")
    } else {
        Vote::Abstain
    }
}

fn ema_cross(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (fast, slow) = (s.get(Column::Ema50), s.get(Column::Ema200));
    if fast > slow {
        Vote::Buy(1.0, "Golden Cross: 50-day EMA above 200-day")
    } else if fast < slow {
        Vote::Sell(1.0, "Death Cross: 50-day EMA below 200-day")
    } else {
        Vote::Abstain
    }
}

fn macd_vs_signal(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (line, signal) = (s.get(Column::Macd), s.get(Column::MacdSignal));
    if line > signal {
        Vote::Buy(1.0, "MACD above signal line (bullish)")
    } else if line < signal {
        Vote::Sell(1.0, "MACD below signal line (bearish)")
    } else {
        Vote::Abstain
    }
}

fn adx_trend(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let adx = s.get(Column::Adx);
    let (plus, minus) = (s.get(Column::DiPlus), s.get(Column::DiMinus));
    if !(adx > 25.0) {
        Vote::Abstain
    } else if plus > minus {
        Vote::Buy(1.0, "Strong bullish trend (ADX > 25 with +DI > -DI)")
    } else if minus > plus {
        Vote::Sell(1.0, "Strong bearish trend (ADX > 25 with -DI > +DI)")
    } else {
        Vote::Abstain
    }
}

fn ichimoku_cloud(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let close = s.close();
    let (a, b) = (s.get(Column::IchimokuA), s.get(Column::IchimokuB));
    if close > a && close > b {
        Vote::Buy(1.0, "Price above Ichimoku Cloud (bullish)")
    } else if close < a && close < b {
        Vote::Sell(1.0, "Price below Ichimoku Cloud (bearish)")
    } else {
        Vote::Abstain
    }
}

fn stochastic_cross(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (k, d) = (s.get(Column::StochK), s.get(Column::StochD));
    if k < 30.0 && d < 30.0 && k > d {
        Vote::Buy(1.0, "Stochastic bullish crossover in oversold region")
    } else if k > 70.0 && d > 70.0 && k < d {
        Vote::Sell(1.0, "Stochastic bearish crossover in overbought region")
    } else {
        Vote::Abstain
    }
}

/// Collapsed bands (zero deviation) put the close on both bands at once; that abstains.
fn bollinger_touch(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let close = s.close();
    let (upper, lower) = (s.get(Column::UpperBb), s.get(Column::LowerBb));
    if !(upper > lower) {
        Vote::Abstain
    } else if close <= lower {
        Vote::Buy(1.0, "Price at lower Bollinger Band (potential reversal)")
    } else if close >= upper {
        Vote::Sell(1.0, "Price at upper Bollinger Band (potential reversal)")
    } else {
        Vote::Abstain
    }
}

fn psar_flip(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    if s.get(Column::PsarUpIndicator) == 1.0 {
        Vote::Buy(1.0, "Parabolic SAR bullish signal")
    } else if s.get(Column::PsarDownIndicator) == 1.0 {
        Vote::Sell(1.0, "Parabolic SAR bearish signal")
    } else {
        Vote::Abstain
    }
}

fn vwap_side(s: &Snapshot<'_>, p: &ScoringParams) -> Vote {
    let (close, vwap) = (s.close(), s.get(Column::Vwap));
    if close > vwap {
        Vote::Buy(p.partial_credit, "Price above VWAP (bullish)")
    } else if close < vwap {
        Vote::Sell(p.partial_credit, "Price below VWAP (bearish)")
    } else {
        Vote::Abstain
    }
}

fn obv_trend(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (obv, avg) = (s.get(Column::Obv), s.get(Column::ObvEma));
    if obv > avg {
        Vote::Buy(1.0, "OBV above its EMA (increasing buying pressure)")
    } else if obv < avg {
        Vote::Sell(1.0, "OBV below its EMA (decreasing buying pressure)")
    } else {
        Vote::Abstain
    }
}

fn ad_trend(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let (ad, avg) = (s.get(Column::AdLine), s.get(Column::AdEma));
    if ad > avg {
        Vote::Buy(1.0, "Accumulation/Distribution Line rising")
    } else if ad < avg {
        Vote::Sell(1.0, "Accumulation/Distribution Line falling")
    } else {
        Vote::Abstain
    }
}

fn volume_ratio(s: &Snapshot<'_>, p: &ScoringParams) -> Vote {
    let ratio = s.get(Column::VolumeRatio);
    if ratio > 1.5 {
        Vote::Buy(1.0, "Volume spike (50% above average)")
    } else if ratio > 1.0 {
        Vote::Buy(p.partial_credit, "Above average volume")
    } else if s.closed_higher() && ratio < 0.7 {
        Vote::Sell(1.0, "Low volume on up day (30% below average)")
    } else {
        Vote::Abstain
    }
}

/// A close inside both the S1 and R1 bands (a bar with no range) abstains.
fn pivot_proximity(s: &Snapshot<'_>, p: &ScoringParams) -> Vote {
    let close = s.close();
    let near = |level: f64| {
        close < level * (1.0 + p.pivot_tolerance) && close > level * (1.0 - p.pivot_tolerance)
    };
    match (near(s.get(Column::S1)), near(s.get(Column::R1))) {
        (true, false) => Vote::Buy(1.0, "Price near support level S1"),
        (false, true) => Vote::Sell(1.0, "Price near resistance level R1"),
        _ => Vote::Abstain,
    }
}

fn volume_direction(s: &Snapshot<'_>, _: &ScoringParams) -> Vote {
    let change = s.get(Column::VolumeChange);
    if change > 0.0 {
        Vote::Buy(1.0, "Volume increasing")
    } else if change < 0.0 {
        Vote::Sell(1.0, "Volume decreasing")
    } else {
        Vote::Abstain
    }
}
