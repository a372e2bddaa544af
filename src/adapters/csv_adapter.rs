//! CSV file data adapter.
//!
//! Reads `<dir>/<SYMBOL>.csv`. Two header layouts are accepted:
//!
//! - flat: `Date,Open,High,Low,Close,Volume` (any order, any case)
//! - two-level, as written by yfinance for multi-ticker downloads:
//!   a `Price,...` row of field names, a `Ticker,...` row of symbols and an
//!   optional `Date,,,...` row before the data.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::augmented::AugmentedTable;
use crate::domain::error::SignalError;
use crate::domain::frame::{ColumnKey, RawFrame};
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Parse CSV text into a frame.
    pub fn parse(content: &str) -> Result<RawFrame, SignalError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for result in rdr.records() {
            records.push(result.map_err(|e| SignalError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?);
        }

        let mut rows = records.into_iter();
        let header = rows.next().ok_or_else(|| SignalError::DataSource {
            reason: "empty CSV".into(),
        })?;

        let mut rows = rows.peekable();
        let two_level = first_cell_is(&header, "Price")
            && rows.peek().is_some_and(|r| first_cell_is(r, "Ticker"));

        let (date_index, keys) = if two_level {
            let tickers = rows.next().unwrap_or_default();
            if rows
                .peek()
                .is_some_and(|r| first_cell_is(r, "Date") && r.iter().skip(1).all(str::is_empty))
            {
                rows.next();
            }
            let keys: Vec<Option<ColumnKey>> = header
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    (i > 0).then(|| ColumnKey::pair(field, tickers.get(i).unwrap_or("")))
                })
                .collect();
            (0, keys)
        } else {
            let date_index = header
                .iter()
                .position(|h| h.eq_ignore_ascii_case("Date") || h.eq_ignore_ascii_case("Datetime"))
                .unwrap_or(0);
            let keys = header
                .iter()
                .enumerate()
                .map(|(i, name)| (i != date_index).then(|| ColumnKey::flat(name)))
                .collect();
            (date_index, keys)
        };

        let mut dates = Vec::new();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); keys.len()];

        for (line, record) in rows.enumerate() {
            if record.iter().all(str::is_empty) {
                continue;
            }
            let raw_date = record.get(date_index).unwrap_or("");
            dates.push(parse_date(raw_date).ok_or_else(|| SignalError::DataSource {
                reason: format!("invalid date '{}' on data row {}", raw_date, line + 1),
            })?);

            for (i, key) in keys.iter().enumerate() {
                if key.is_none() {
                    continue;
                }
                let value = match record.get(i).unwrap_or("") {
                    "" => None,
                    text => Some(text.parse::<f64>().map_err(|_| SignalError::DataSource {
                        reason: format!(
                            "invalid number '{}' in column {} on data row {}",
                            text,
                            header.get(i).unwrap_or("?"),
                            line + 1
                        ),
                    })?),
                };
                cells[i].push(value);
            }
        }

        let frame = keys
            .into_iter()
            .zip(cells)
            .filter_map(|(key, column)| key.map(|k| (k, column)))
            .fold(RawFrame::new(dates), |frame, (key, column)| {
                frame.with_column(key, column)
            });
        Ok(frame)
    }
}

fn first_cell_is(record: &StringRecord, name: &str) -> bool {
    record.get(0).is_some_and(|c| c.eq_ignore_ascii_case(name))
}

/// `YYYY-MM-DD`, ignoring any time-of-day suffix.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

impl DataPort for CsvAdapter {
    fn fetch_frame(&self, symbol: &str) -> Result<RawFrame, SignalError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SignalError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let frame = Self::parse(&content)?;
        tracing::debug!(
            symbol,
            rows = frame.row_count(),
            multi_level = frame.is_multi_level(),
            "loaded CSV"
        );
        Ok(frame)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SignalError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Write an augmented table as CSV: OHLCV columns, then one column per indicator.
/// Missing cells are written empty.
pub fn write_augmented<W: Write>(table: &AugmentedTable, writer: W) -> Result<(), SignalError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let columns: Vec<_> = table.columns().collect();

    let mut header = vec![
        "Date".to_string(),
        "Open".to_string(),
        "High".to_string(),
        "Low".to_string(),
        "Close".to_string(),
        "Volume".to_string(),
    ];
    header.extend(columns.iter().map(|(c, _)| c.name().to_string()));
    wtr.write_record(&header).map_err(csv_write_error)?;

    for (i, bar) in table.bars.iter().enumerate() {
        let mut row = vec![
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        row.extend(
            columns
                .iter()
                .map(|(_, series)| series[i].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row).map_err(csv_write_error)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_augmented_file(table: &AugmentedTable, path: &Path) -> Result<(), SignalError> {
    let file = fs::File::create(path)?;
    write_augmented(table, file)
}

fn csv_write_error(e: csv::Error) -> SignalError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => SignalError::Io(io),
        other => SignalError::DataSource {
            reason: format!("CSV write error: {:?}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::normalize;
    use tempfile::TempDir;

    const FLAT: &str = "Date,Open,High,Low,Close,Volume\n\
        2024-01-16,105.0,115.0,100.0,110.0,60000\n\
        2024-01-15,100.0,110.0,90.0,105.0,50000\n\
        2024-01-17,110.0,120.0,105.0,115.0,55000\n";

    const TWO_LEVEL: &str = "Price,Close,High,Low,Open,Volume\n\
        Ticker,TCS.NS,TCS.NS,TCS.NS,TCS.NS,TCS.NS\n\
        Date,,,,,\n\
        2024-01-15,105.0,110.0,90.0,100.0,50000\n\
        2024-01-16,110.0,115.0,100.0,105.0,60000\n";

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(path.join("BHP.csv"), FLAT).unwrap();
        fs::write(path.join("TCS.NS.csv"), TWO_LEVEL).unwrap();
        fs::write(path.join("notes.txt"), "not data").unwrap();
        (dir, path)
    }

    #[test]
    fn parses_flat_header() {
        let frame = CsvAdapter::parse(FLAT).unwrap();
        assert!(!frame.is_multi_level());
        assert_eq!(frame.row_count(), 3);

        let series = normalize(&frame, "BHP").unwrap();
        assert_eq!(series.bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(series.bars[0].open, 100.0);
        assert_eq!(series.bars[0].high, 110.0);
        assert_eq!(series.bars[0].low, 90.0);
        assert_eq!(series.bars[0].close, 105.0);
        assert_eq!(series.bars[0].volume, 50000.0);
    }

    #[test]
    fn parses_two_level_header() {
        let frame = CsvAdapter::parse(TWO_LEVEL).unwrap();
        assert!(frame.is_multi_level());
        assert_eq!(frame.row_count(), 2);

        let series = normalize(&frame, "tcs.ns").unwrap();
        assert_eq!(series.bars[1].close, 110.0);
        assert_eq!(series.bars[1].open, 105.0);
    }

    #[test]
    fn empty_cells_are_missing() {
        let frame = CsvAdapter::parse("Date,Close\n2024-01-15,\n2024-01-16,3.5\n").unwrap();
        assert_eq!(frame.columns[0].1, vec![None, Some(3.5)]);
    }

    #[test]
    fn datetime_suffix_is_ignored() {
        let frame =
            CsvAdapter::parse("Datetime,Close\n2024-01-15 00:00:00+05:30,1.0\n").unwrap();
        assert_eq!(frame.dates[0], NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn bad_number_is_data_source_error() {
        let err = CsvAdapter::parse("Date,Close\n2024-01-15,abc\n").unwrap_err();
        assert!(matches!(err, SignalError::DataSource { reason } if reason.contains("Close")));
    }

    #[test]
    fn bad_date_is_data_source_error() {
        let err = CsvAdapter::parse("Date,Close\n15/01/2024,1.0\n").unwrap_err();
        assert!(matches!(err, SignalError::DataSource { .. }));
    }

    #[test]
    fn fetch_frame_reads_symbol_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let frame = adapter.fetch_frame("BHP").unwrap();
        assert_eq!(frame.row_count(), 3);
    }

    #[test]
    fn fetch_frame_missing_file_fails() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_frame("XYZ"),
            Err(SignalError::DataSource { .. })
        ));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_symbols().unwrap(), vec!["BHP", "TCS.NS"]);
    }

    #[test]
    fn write_augmented_emits_header_and_rows() {
        use crate::domain::indicator::Column;

        let frame = CsvAdapter::parse(FLAT).unwrap();
        let series = normalize(&frame, "BHP").unwrap();
        let mut table = AugmentedTable::new("BHP", series.bars);
        table.insert(Column::Rsi, vec![None, Some(55.5), Some(60.0)]);

        let mut out = Vec::new();
        write_augmented(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume,RSI");
        assert_eq!(lines[1], "2024-01-15,100,110,90,105,50000,");
        assert_eq!(lines[2], "2024-01-16,105,115,100,110,60000,55.5");
    }
}
