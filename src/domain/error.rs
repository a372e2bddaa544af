//! Domain error types.

/// Top-level error type for swingsignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("missing columns in {symbol} data: {}", columns.join(", "))]
    MissingColumns { symbol: String, columns: Vec<String> },

    #[error("insufficient history for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("failed to compute {indicator} for {symbol}: {reason}")]
    IndicatorComputation {
        symbol: String,
        indicator: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config value [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::DataSource { .. } => 3,
            SignalError::MissingColumns { .. } | SignalError::InsufficientHistory { .. } => 5,
            SignalError::IndicatorComputation { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
