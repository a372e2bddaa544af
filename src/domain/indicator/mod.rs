//! Technical indicator implementations.
//!
//! Every calculator works on plain `f64` slices and returns a [`Series`]
//! aligned with its input, `None` marking warm-up bars or undefined values.
//! [`Column`] names each output column of the augmented table.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ichimoku;
pub mod macd;
pub mod moving_average;
pub mod pivot;
pub mod psar;
pub mod rsi;
pub mod stochastic;
pub mod volume;
pub mod vortex;

use serde::Serialize;
use std::fmt;

pub use moving_average::{ema, ema_series, sma};

/// An indicator time series; `None` is a missing cell.
pub type Series = Vec<Option<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    Sma50,
    Sma100,
    Sma200,
    Ema50,
    Ema100,
    Ema200,
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    Adx,
    DiPlus,
    DiMinus,
    IchimokuConversion,
    IchimokuBase,
    IchimokuA,
    IchimokuB,
    StochK,
    StochD,
    VortexPositive,
    VortexNegative,
    UpperBb,
    MiddleBb,
    LowerBb,
    BbWidth,
    Atr,
    AtrPercent,
    Psar,
    PsarUpIndicator,
    PsarDownIndicator,
    Vwap,
    Obv,
    ObvEma,
    AdLine,
    AdEma,
    VolumeChange,
    VolumeMa,
    VolumeRatio,
    Pp,
    R1,
    S1,
    R2,
    S2,
}

impl Column {
    pub const ALL: [Column; 43] = [
        Column::Sma50,
        Column::Sma100,
        Column::Sma200,
        Column::Ema50,
        Column::Ema100,
        Column::Ema200,
        Column::Rsi,
        Column::Macd,
        Column::MacdSignal,
        Column::MacdHist,
        Column::Adx,
        Column::DiPlus,
        Column::DiMinus,
        Column::IchimokuConversion,
        Column::IchimokuBase,
        Column::IchimokuA,
        Column::IchimokuB,
        Column::StochK,
        Column::StochD,
        Column::VortexPositive,
        Column::VortexNegative,
        Column::UpperBb,
        Column::MiddleBb,
        Column::LowerBb,
        Column::BbWidth,
        Column::Atr,
        Column::AtrPercent,
        Column::Psar,
        Column::PsarUpIndicator,
        Column::PsarDownIndicator,
        Column::Vwap,
        Column::Obv,
        Column::ObvEma,
        Column::AdLine,
        Column::AdEma,
        Column::VolumeChange,
        Column::VolumeMa,
        Column::VolumeRatio,
        Column::Pp,
        Column::R1,
        Column::S1,
        Column::R2,
        Column::S2,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Sma50 => "SMA_50",
            Column::Sma100 => "SMA_100",
            Column::Sma200 => "SMA_200",
            Column::Ema50 => "EMA_50",
            Column::Ema100 => "EMA_100",
            Column::Ema200 => "EMA_200",
            Column::Rsi => "RSI",
            Column::Macd => "MACD",
            Column::MacdSignal => "MACD_Signal",
            Column::MacdHist => "MACD_Hist",
            Column::Adx => "ADX",
            Column::DiPlus => "DI_Plus",
            Column::DiMinus => "DI_Minus",
            Column::IchimokuConversion => "Ichimoku_Conversion_Line",
            Column::IchimokuBase => "Ichimoku_Base_Line",
            Column::IchimokuA => "Ichimoku_A",
            Column::IchimokuB => "Ichimoku_B",
            Column::StochK => "Stoch_K",
            Column::StochD => "Stoch_D",
            Column::VortexPositive => "Vortex_Positive",
            Column::VortexNegative => "Vortex_Negative",
            Column::UpperBb => "Upper_BB",
            Column::MiddleBb => "Middle_BB",
            Column::LowerBb => "Lower_BB",
            Column::BbWidth => "BB_Width",
            Column::Atr => "ATR",
            Column::AtrPercent => "ATR_Percent",
            Column::Psar => "PSAR",
            Column::PsarUpIndicator => "PSAR_Up_Indicator",
            Column::PsarDownIndicator => "PSAR_Down_Indicator",
            Column::Vwap => "VWAP",
            Column::Obv => "OBV",
            Column::ObvEma => "OBV_EMA",
            Column::AdLine => "AD_Line",
            Column::AdEma => "AD_EMA",
            Column::VolumeChange => "Volume_Change",
            Column::VolumeMa => "Volume_MA",
            Column::VolumeRatio => "Volume_Ratio",
            Column::Pp => "PP",
            Column::R1 => "R1",
            Column::S1 => "S1",
            Column::R2 => "R2",
            Column::S2 => "S2",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shrink a lookback window to the series length so long windows still
/// produce a value at the final bar.
pub fn fit_window(period: usize, len: usize) -> usize {
    period.min(len)
}

/// `numerator / denominator`, or `None` when the denominator is zero or
/// either side is missing.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Highest value of `values[end + 1 - period..=end]`.
pub(crate) fn window_max(values: &[f64], end: usize, period: usize) -> f64 {
    values[end + 1 - period..=end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest value of `values[end + 1 - period..=end]`.
pub(crate) fn window_min(values: &[f64], end: usize, period: usize) -> f64 {
    values[end + 1 - period..=end]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min)
}
