//! The indicator-enriched table: OHLCV bars plus one aligned column per
//! indicator.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::indicator::{Column, Series};
use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedTable {
    pub symbol: String,
    pub bars: Vec<OhlcvBar>,
    columns: BTreeMap<Column, Series>,
}

impl AugmentedTable {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            columns: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Add or replace a column. The series must be aligned with the bars.
    pub fn insert(&mut self, column: Column, series: Series) {
        debug_assert_eq!(series.len(), self.bars.len());
        self.columns.insert(column, series);
    }

    pub fn column(&self, column: Column) -> Option<&Series> {
        self.columns.get(&column)
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Columns present in the table, in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = (Column, &Series)> {
        self.columns.iter().map(|(c, s)| (*c, s))
    }

    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.columns
            .get(&column)
            .and_then(|s| s.get(index).copied().flatten())
    }

    pub fn row(&self, index: usize) -> Option<AugmentedRow<'_>> {
        (index < self.bars.len()).then_some(AugmentedRow { table: self, index })
    }

    /// The most recent bar.
    pub fn latest(&self) -> Option<AugmentedRow<'_>> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// Backward-fill every indicator column.
    pub fn backfill(&mut self) {
        for series in self.columns.values_mut() {
            backfill(series);
        }
    }
}

/// One bar of an [`AugmentedTable`].
#[derive(Debug, Clone, Copy)]
pub struct AugmentedRow<'a> {
    table: &'a AugmentedTable,
    index: usize,
}

impl<'a> AugmentedRow<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bar(&self) -> &'a OhlcvBar {
        &self.table.bars[self.index]
    }

    pub fn date(&self) -> NaiveDate {
        self.bar().date
    }

    pub fn close(&self) -> f64 {
        self.bar().close
    }

    /// Indicator value, NaN when the cell is missing.
    pub fn get(&self, column: Column) -> f64 {
        self.table.value(column, self.index).unwrap_or(f64::NAN)
    }
}

/// Replace each missing cell with the next later present value.
///
/// A trailing run of missing cells has nothing to copy from and stays missing.
pub fn backfill(series: &mut Series) {
    let mut next: Option<f64> = None;
    for cell in series.iter_mut().rev() {
        match *cell {
            Some(v) => next = Some(v),
            None => *cell = next,
        }
    }
}
