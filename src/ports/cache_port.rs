//! Result memoization port trait.

use crate::domain::analysis::{Settings, SignalReport};

/// Per-symbol store of the last computed report.
///
/// A report is only valid for the settings it was computed with, so entries
/// are looked up by symbol and the full [`Settings`]. Entries live until the
/// caller invalidates them; the engine never expires anything on its own.
pub trait CachePort {
    fn get(&self, symbol: &str, settings: &Settings) -> Option<SignalReport>;
    fn put(&self, settings: &Settings, report: &SignalReport);
    /// Drop every entry for `symbol`, whatever its settings.
    fn invalidate(&self, symbol: &str);
    fn clear(&self);
}
