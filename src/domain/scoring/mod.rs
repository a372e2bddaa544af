//! Signal scorer: evaluates a profile's condition table on the latest bar of
//! an augmented table and classifies the resulting buy/sell scores.

pub mod classification;
pub mod conditions;
pub mod profile;

use serde::Serialize;

use crate::domain::augmented::AugmentedTable;
use crate::domain::error::SignalError;

pub use classification::{classify, Classification};
pub use conditions::{Snapshot, Vote};
pub use profile::{ScoringParams, ScoringProfile};

/// Rows needed to compare the latest bar with the one before it.
pub const MIN_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub profile: ScoringProfile,
    pub buy_score: f64,
    pub sell_score: f64,
    pub buy_reasons: Vec<String>,
    pub sell_reasons: Vec<String>,
    pub max_score: f64,
    pub buy_strength: f64,
    pub sell_strength: f64,
}

impl ScoreBreakdown {
    fn new(profile: ScoringProfile, max_score: f64) -> Self {
        Self {
            profile,
            buy_score: 0.0,
            sell_score: 0.0,
            buy_reasons: Vec::new(),
            sell_reasons: Vec::new(),
            max_score,
            buy_strength: 0.0,
            sell_strength: 0.0,
        }
    }

    fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Buy(points, reason) => {
                self.buy_score += points;
                self.buy_reasons.push(reason.to_string());
            }
            Vote::Sell(points, reason) => {
                self.sell_score += points;
                self.sell_reasons.push(reason.to_string());
            }
            Vote::Abstain => {}
        }
    }

    fn finish(mut self) -> Self {
        self.buy_strength = self.buy_score / self.max_score * 100.0;
        self.sell_strength = self.sell_score / self.max_score * 100.0;
        self
    }
}

/// Score the latest bar of `table` under `profile`.
pub fn score(
    table: &AugmentedTable,
    profile: ScoringProfile,
    params: &ScoringParams,
) -> Result<(Classification, ScoreBreakdown), SignalError> {
    params.validate()?;
    let n = table.len();
    let insufficient = || SignalError::InsufficientHistory {
        symbol: table.symbol.clone(),
        bars: n,
        minimum: MIN_ROWS,
    };
    let latest = table.latest().ok_or_else(insufficient)?;
    let previous = n
        .checked_sub(2)
        .and_then(|i| table.row(i))
        .ok_or_else(insufficient)?;
    let snapshot = Snapshot { latest, previous };

    let conditions = conditions::table(profile);
    let mut breakdown = ScoreBreakdown::new(profile, conditions.len() as f64);
    for condition in conditions {
        let vote = (condition.evaluate)(&snapshot, params);
        tracing::trace!(condition = condition.name, ?vote, "condition evaluated");
        breakdown.record(vote);
    }
    let breakdown = breakdown.finish();

    let classification = classify(profile, breakdown.buy_score, breakdown.sell_score);
    tracing::debug!(
        symbol = %table.symbol,
        %profile,
        buy = breakdown.buy_score,
        sell = breakdown.sell_score,
        %classification,
        "scored"
    );

    Ok((classification, breakdown))
}
