//! Market data port trait.

use crate::domain::error::SignalError;
use crate::domain::frame::RawFrame;

/// Source of raw OHLCV tables, one per symbol.
pub trait DataPort {
    /// The full available history for `symbol`, in either column layout.
    fn fetch_frame(&self, symbol: &str) -> Result<RawFrame, SignalError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalError>;
}
