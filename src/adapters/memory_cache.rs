//! In-process cache of signal reports.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::analysis::{Settings, SignalReport};
use crate::domain::scoring::ScoringProfile;
use crate::ports::cache_port::CachePort;

/// Symbol (upper-cased) plus every setting that changes a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: String,
    profile: ScoringProfile,
    partial_credit: u64,
    pivot_tolerance: u64,
    summary_window: usize,
}

impl CacheKey {
    fn new(symbol: &str, settings: &Settings) -> Self {
        Self {
            symbol: symbol.to_ascii_uppercase(),
            profile: settings.profile,
            partial_credit: settings.params.partial_credit.to_bits(),
            pivot_tolerance: settings.params.pivot_tolerance.to_bits(),
            summary_window: settings.summary_window,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<CacheKey, SignalReport>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CachePort for InMemoryCache {
    fn get(&self, symbol: &str, settings: &Settings) -> Option<SignalReport> {
        let entries = self.entries.lock().ok()?;
        entries.get(&CacheKey::new(symbol, settings)).cloned()
    }

    fn put(&self, settings: &Settings, report: &SignalReport) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(CacheKey::new(&report.symbol, settings), report.clone());
        }
    }

    fn invalidate(&self, symbol: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            let symbol = symbol.to_ascii_uppercase();
            entries.retain(|key, _| key.symbol != symbol);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::report_for;
    use crate::domain::augmented::AugmentedTable;
    use crate::domain::ohlcv::OhlcvBar;
    use crate::domain::scoring::ScoringParams;
    use chrono::NaiveDate;

    fn settings(profile: ScoringProfile) -> Settings {
        Settings {
            profile,
            ..Settings::default()
        }
    }

    fn report(symbol: &str, settings: &Settings) -> SignalReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..3)
            .map(|i| OhlcvBar {
                date: start + chrono::Duration::days(i),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0,
                volume: 1.0,
            })
            .collect();
        report_for(AugmentedTable::new(symbol, bars), settings).unwrap()
    }

    fn store(cache: &InMemoryCache, symbol: &str, settings: &Settings) {
        cache.put(settings, &report(symbol, settings));
    }

    #[test]
    fn put_then_get() {
        let cache = InMemoryCache::new();
        let enhanced = settings(ScoringProfile::Enhanced);
        assert!(cache.get("AAPL", &enhanced).is_none());
        store(&cache, "AAPL", &enhanced);
        assert!(cache.get("aapl", &enhanced).is_some());
        assert!(cache.get("AAPL", &settings(ScoringProfile::Baseline)).is_none());
    }

    #[test]
    fn changed_params_or_window_miss() {
        let cache = InMemoryCache::new();
        let base = Settings::default();
        store(&cache, "AAPL", &base);

        let credit = Settings {
            params: ScoringParams {
                partial_credit: 0.25,
                ..ScoringParams::default()
            },
            ..base.clone()
        };
        let window = Settings {
            summary_window: 10,
            ..base.clone()
        };
        assert!(cache.get("AAPL", &credit).is_none());
        assert!(cache.get("AAPL", &window).is_none());
        assert!(cache.get("AAPL", &base).is_some());
    }

    #[test]
    fn invalidate_drops_all_settings_for_symbol() {
        let cache = InMemoryCache::new();
        store(&cache, "AAPL", &settings(ScoringProfile::Enhanced));
        store(&cache, "AAPL", &settings(ScoringProfile::Baseline));
        store(&cache, "MSFT", &settings(ScoringProfile::Enhanced));
        cache.invalidate("AAPL");
        assert_eq!(cache.len(), 1);
        assert!(cache.get("MSFT", &settings(ScoringProfile::Enhanced)).is_some());
    }

    #[test]
    fn clear_empties() {
        let cache = InMemoryCache::new();
        store(&cache, "AAPL", &Settings::default());
        cache.clear();
        assert!(cache.is_empty());
    }
}
