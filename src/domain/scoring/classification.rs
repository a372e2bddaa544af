//! Mapping a (buy, sell) score pair to a discrete signal.

use std::fmt;

use serde::Serialize;

use crate::domain::scoring::profile::ScoringProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "WEAK BUY")]
    WeakBuy,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "WEAK SELL")]
    WeakSell,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
    #[serde(rename = "HOLD")]
    Hold,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::StrongBuy => "STRONG BUY",
            Classification::Buy => "BUY",
            Classification::WeakBuy => "WEAK BUY",
            Classification::Neutral => "NEUTRAL",
            Classification::WeakSell => "WEAK SELL",
            Classification::Sell => "SELL",
            Classification::StrongSell => "STRONG SELL",
            Classification::Hold => "HOLD",
        }
    }

    /// Labels a profile can produce.
    pub fn labels_for(profile: ScoringProfile) -> &'static [Classification] {
        match profile {
            ScoringProfile::Enhanced => &[
                Classification::StrongBuy,
                Classification::Buy,
                Classification::WeakBuy,
                Classification::Neutral,
                Classification::WeakSell,
                Classification::Sell,
                Classification::StrongSell,
            ],
            ScoringProfile::Baseline => &[
                Classification::Buy,
                Classification::Sell,
                Classification::Hold,
            ],
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            Classification::StrongBuy | Classification::Buy | Classification::WeakBuy
        )
    }

    pub fn is_bearish(&self) -> bool {
        matches!(
            self,
            Classification::StrongSell | Classification::Sell | Classification::WeakSell
        )
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered rules, first match wins.
pub fn classify(profile: ScoringProfile, buy: f64, sell: f64) -> Classification {
    match profile {
        ScoringProfile::Enhanced => {
            if buy >= 6.0 && buy > 1.5 * sell {
                Classification::StrongBuy
            } else if buy >= 4.0 && buy > sell {
                Classification::Buy
            } else if sell >= 6.0 && sell > 1.5 * buy {
                Classification::StrongSell
            } else if sell >= 4.0 && sell > buy {
                Classification::Sell
            } else if buy > sell {
                Classification::WeakBuy
            } else if sell > buy {
                Classification::WeakSell
            } else {
                Classification::Neutral
            }
        }
        ScoringProfile::Baseline => {
            if buy >= 3.0 && buy > sell {
                Classification::Buy
            } else if sell >= 3.0 && sell > buy {
                Classification::Sell
            } else {
                Classification::Hold
            }
        }
    }
}
