//! Indicator engine: raw OHLCV frame in, augmented table out.
//!
//! Indicators are declared as data in two passes. The base pass reads only
//! OHLCV fields; the derived pass reads columns produced earlier and runs in
//! declaration order, so a derived step may depend on an earlier derived
//! step. After both passes every column is backward-filled.

use crate::domain::augmented::AugmentedTable;
use crate::domain::error::SignalError;
use crate::domain::frame::{normalize, RawFrame};
use crate::domain::indicator::macd::difference;
use crate::domain::indicator::{
    adx, atr, bollinger, ema, ema_series, fit_window, ichimoku, macd, pivot, psar, ratio, rsi,
    sma, stochastic, volume, vortex, Column, Series,
};
use crate::domain::ohlcv::OhlcvSeries;

/// Fewest bars the engine accepts.
pub const MIN_BARS: usize = 50;

/// EMA period applied to OBV and the A/D line.
pub const FLOW_EMA_PERIOD: usize = 20;

pub const VOLUME_MA_PERIOD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    High,
    Low,
    Close,
    Volume,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::High => "High",
            Field::Low => "Low",
            Field::Close => "Close",
            Field::Volume => "Volume",
        }
    }
}

/// Column-major view of the bars.
struct Prices {
    highs: Vec<f64>,
    lows: Vec<f64>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
}

impl Prices {
    fn from_series(series: &OhlcvSeries) -> Self {
        Self {
            highs: series.highs(),
            lows: series.lows(),
            closes: series.closes(),
            volumes: series.volumes(),
        }
    }

    fn len(&self) -> usize {
        self.closes.len()
    }

    fn field(&self, field: Field) -> &[f64] {
        match field {
            Field::High => &self.highs,
            Field::Low => &self.lows,
            Field::Close => &self.closes,
            Field::Volume => &self.volumes,
        }
    }
}

struct BaseStep {
    outputs: &'static [Column],
    inputs: &'static [Field],
    compute: fn(&Prices) -> Vec<Series>,
}

struct DerivedStep {
    output: Column,
    inputs: &'static [Column],
    derive: fn(&[&Series], &Prices) -> Series,
}

const BASE_STEPS: &[BaseStep] = &[
    BaseStep {
        outputs: &[Column::Sma50, Column::Sma100, Column::Sma200],
        inputs: &[Field::Close],
        compute: simple_averages,
    },
    BaseStep {
        outputs: &[Column::Ema50, Column::Ema100, Column::Ema200],
        inputs: &[Field::Close],
        compute: exponential_averages,
    },
    BaseStep {
        outputs: &[Column::Rsi],
        inputs: &[Field::Close],
        compute: relative_strength,
    },
    BaseStep {
        outputs: &[Column::Macd, Column::MacdSignal],
        inputs: &[Field::Close],
        compute: macd_lines,
    },
    BaseStep {
        outputs: &[Column::Adx, Column::DiPlus, Column::DiMinus],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: directional,
    },
    BaseStep {
        outputs: &[
            Column::IchimokuConversion,
            Column::IchimokuBase,
            Column::IchimokuA,
            Column::IchimokuB,
        ],
        inputs: &[Field::High, Field::Low],
        compute: ichimoku_lines,
    },
    BaseStep {
        outputs: &[Column::StochK, Column::StochD],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: stochastic_lines,
    },
    BaseStep {
        outputs: &[Column::VortexPositive, Column::VortexNegative],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: vortex_lines,
    },
    BaseStep {
        outputs: &[Column::UpperBb, Column::MiddleBb, Column::LowerBb],
        inputs: &[Field::Close],
        compute: bollinger_bands,
    },
    BaseStep {
        outputs: &[Column::Atr],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: average_true_range,
    },
    BaseStep {
        outputs: &[
            Column::Psar,
            Column::PsarUpIndicator,
            Column::PsarDownIndicator,
        ],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: parabolic_sar,
    },
    BaseStep {
        outputs: &[Column::Vwap],
        inputs: &[Field::High, Field::Low, Field::Close, Field::Volume],
        compute: volume_weighted_price,
    },
    BaseStep {
        outputs: &[Column::Obv],
        inputs: &[Field::Close, Field::Volume],
        compute: on_balance_volume,
    },
    BaseStep {
        outputs: &[Column::AdLine],
        inputs: &[Field::High, Field::Low, Field::Close, Field::Volume],
        compute: accumulation_distribution,
    },
    BaseStep {
        outputs: &[Column::VolumeChange, Column::VolumeMa],
        inputs: &[Field::Volume],
        compute: volume_activity,
    },
    BaseStep {
        outputs: &[Column::Pp, Column::R1, Column::S1, Column::R2, Column::S2],
        inputs: &[Field::High, Field::Low, Field::Close],
        compute: pivot_levels,
    },
];

const DERIVED_STEPS: &[DerivedStep] = &[
    DerivedStep {
        output: Column::MacdHist,
        inputs: &[Column::Macd, Column::MacdSignal],
        derive: macd_histogram,
    },
    DerivedStep {
        output: Column::BbWidth,
        inputs: &[Column::UpperBb, Column::LowerBb, Column::MiddleBb],
        derive: band_width,
    },
    DerivedStep {
        output: Column::AtrPercent,
        inputs: &[Column::Atr],
        derive: atr_percent,
    },
    DerivedStep {
        output: Column::ObvEma,
        inputs: &[Column::Obv],
        derive: flow_ema,
    },
    DerivedStep {
        output: Column::AdEma,
        inputs: &[Column::AdLine],
        derive: flow_ema,
    },
    DerivedStep {
        output: Column::VolumeRatio,
        inputs: &[Column::VolumeMa],
        derive: volume_ratio,
    },
];

/// Normalize a raw frame for `symbol` and compute every indicator column.
pub fn compute_indicators(frame: &RawFrame, symbol: &str) -> Result<AugmentedTable, SignalError> {
    let series = normalize(frame, symbol)?;
    compute_from_series(&series)
}

/// Compute every indicator column over an already normalized series.
pub fn compute_from_series(series: &OhlcvSeries) -> Result<AugmentedTable, SignalError> {
    if series.len() < MIN_BARS {
        return Err(SignalError::InsufficientHistory {
            symbol: series.symbol.clone(),
            bars: series.len(),
            minimum: MIN_BARS,
        });
    }
    if series.len() < 200 {
        tracing::debug!(
            symbol = %series.symbol,
            bars = series.len(),
            "long-window averages fitted to series length"
        );
    }

    let prices = Prices::from_series(series);
    let mut table = AugmentedTable::new(series.symbol.clone(), series.bars.clone());

    for step in BASE_STEPS {
        check_inputs(series, &prices, step)?;
        let outputs = (step.compute)(&prices);
        for (column, values) in step.outputs.iter().zip(outputs) {
            table.insert(*column, values);
        }
    }

    for step in DERIVED_STEPS {
        let mut inputs = Vec::with_capacity(step.inputs.len());
        for column in step.inputs {
            let values = table
                .column(*column)
                .ok_or_else(|| SignalError::IndicatorComputation {
                    symbol: series.symbol.clone(),
                    indicator: step.output.name().to_string(),
                    reason: format!("depends on {} which was not computed", column),
                })?;
            inputs.push(values);
        }
        let values = (step.derive)(&inputs, &prices);
        table.insert(step.output, values);
    }

    table.backfill();

    tracing::debug!(
        symbol = %series.symbol,
        bars = table.len(),
        columns = table.columns().count(),
        "indicators computed"
    );

    Ok(table)
}

/// Reject non-finite OHLCV cells feeding a base step, naming the step's first column.
fn check_inputs(series: &OhlcvSeries, prices: &Prices, step: &BaseStep) -> Result<(), SignalError> {
    for field in step.inputs {
        if let Some(i) = prices.field(*field).iter().position(|v| !v.is_finite()) {
            let indicator = step.outputs.first().map_or("indicator", |c| c.name());
            return Err(SignalError::IndicatorComputation {
                symbol: series.symbol.clone(),
                indicator: indicator.to_string(),
                reason: format!(
                    "non-finite {} value on {}",
                    field.name(),
                    series.bars[i].date
                ),
            });
        }
    }
    Ok(())
}

// --- base pass ---

fn simple_averages(p: &Prices) -> Vec<Series> {
    [50, 100, 200]
        .iter()
        .map(|&n| sma(&p.closes, fit_window(n, p.len())))
        .collect()
}

fn exponential_averages(p: &Prices) -> Vec<Series> {
    [50, 100, 200]
        .iter()
        .map(|&n| ema(&p.closes, fit_window(n, p.len())))
        .collect()
}

fn relative_strength(p: &Prices) -> Vec<Series> {
    vec![rsi::rsi(&p.closes, rsi::DEFAULT_PERIOD)]
}

fn macd_lines(p: &Prices) -> Vec<Series> {
    let m = macd::macd_default(&p.closes);
    vec![m.line, m.signal]
}

fn directional(p: &Prices) -> Vec<Series> {
    let a = adx::adx(&p.highs, &p.lows, &p.closes, adx::DEFAULT_PERIOD);
    vec![a.adx, a.plus_di, a.minus_di]
}

fn ichimoku_lines(p: &Prices) -> Vec<Series> {
    let lines = ichimoku::ichimoku(
        &p.highs,
        &p.lows,
        ichimoku::CONVERSION_PERIOD,
        ichimoku::BASE_PERIOD,
        fit_window(ichimoku::SPAN_B_PERIOD, p.len()),
    );
    vec![lines.conversion, lines.base, lines.span_a, lines.span_b]
}

fn stochastic_lines(p: &Prices) -> Vec<Series> {
    let s = stochastic::stochastic(
        &p.highs,
        &p.lows,
        &p.closes,
        stochastic::DEFAULT_K_PERIOD,
        stochastic::DEFAULT_D_PERIOD,
    );
    vec![s.k, s.d]
}

fn vortex_lines(p: &Prices) -> Vec<Series> {
    let v = vortex::vortex(&p.highs, &p.lows, &p.closes, vortex::DEFAULT_PERIOD);
    vec![v.positive, v.negative]
}

fn bollinger_bands(p: &Prices) -> Vec<Series> {
    let b = bollinger::bollinger(
        &p.closes,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_MULTIPLIER,
    );
    vec![b.upper, b.middle, b.lower]
}

fn average_true_range(p: &Prices) -> Vec<Series> {
    vec![atr::atr(&p.highs, &p.lows, &p.closes, atr::DEFAULT_PERIOD)]
}

fn parabolic_sar(p: &Prices) -> Vec<Series> {
    let s = psar::parabolic_sar(
        &p.highs,
        &p.lows,
        &p.closes,
        psar::DEFAULT_STEP,
        psar::DEFAULT_MAX_STEP,
    );
    vec![s.sar, s.up_indicator, s.down_indicator]
}

fn volume_weighted_price(p: &Prices) -> Vec<Series> {
    vec![volume::vwap(&p.highs, &p.lows, &p.closes, &p.volumes)]
}

fn on_balance_volume(p: &Prices) -> Vec<Series> {
    vec![volume::obv(&p.closes, &p.volumes)]
}

fn accumulation_distribution(p: &Prices) -> Vec<Series> {
    vec![volume::accumulation_distribution(
        &p.highs, &p.lows, &p.closes, &p.volumes,
    )]
}

fn volume_activity(p: &Prices) -> Vec<Series> {
    vec![
        volume::volume_change(&p.volumes),
        sma(&p.volumes, VOLUME_MA_PERIOD),
    ]
}

fn pivot_levels(p: &Prices) -> Vec<Series> {
    let lv = pivot::pivots(&p.highs, &p.lows, &p.closes);
    vec![lv.pp, lv.r1, lv.s1, lv.r2, lv.s2]
}

// --- derived pass ---

fn macd_histogram(inputs: &[&Series], _: &Prices) -> Series {
    difference(inputs[0], inputs[1])
}

fn band_width(inputs: &[&Series], _: &Prices) -> Series {
    let (upper, lower, middle) = (inputs[0], inputs[1], inputs[2]);
    (0..upper.len())
        .map(|i| {
            let spread = upper[i].zip(lower[i]).map(|(u, l)| u - l);
            ratio(spread, middle[i])
        })
        .collect()
}

fn atr_percent(inputs: &[&Series], p: &Prices) -> Series {
    inputs[0]
        .iter()
        .zip(&p.closes)
        .map(|(atr, &close)| ratio(atr.map(|a| a * 100.0), Some(close)))
        .collect()
}

fn flow_ema(inputs: &[&Series], _: &Prices) -> Series {
    ema_series(inputs[0], FLOW_EMA_PERIOD)
}

fn volume_ratio(inputs: &[&Series], p: &Prices) -> Series {
    inputs[0]
        .iter()
        .zip(&p.volumes)
        .map(|(avg, &vol)| ratio(Some(vol), *avg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::ColumnKey;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::NaiveDate;

    fn series_from_closes(closes: &[f64]) -> OhlcvSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: c,
                high: c * 1.01,
                low: c * 0.99,
                close: c,
                volume: 1_000_000.0,
            })
            .collect();
        OhlcvSeries::new("TEST", bars)
    }

    fn uptrend(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.005f64.powi(i as i32)).collect()
    }

    #[test]
    fn every_column_is_produced() {
        let table = compute_from_series(&series_from_closes(&uptrend(200))).unwrap();
        for column in Column::ALL {
            assert!(table.has_column(column), "missing {}", column);
        }
        assert_eq!(table.columns().count(), Column::ALL.len());
    }

    #[test]
    fn no_missing_cells_after_backfill() {
        let table = compute_from_series(&series_from_closes(&uptrend(200))).unwrap();
        for (column, values) in table.columns() {
            assert!(values.iter().all(Option::is_some), "gap in {}", column);
        }
    }

    #[test]
    fn short_series_degenerates_long_windows_to_constants() {
        let table = compute_from_series(&series_from_closes(&uptrend(60))).unwrap();
        let sma200 = table.column(Column::Sma200).unwrap();
        assert!(sma200.iter().all(|v| *v == sma200[59]));
        assert!(sma200[0].is_some());
    }

    #[test]
    fn rejects_short_history() {
        let err = compute_from_series(&series_from_closes(&uptrend(30))).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InsufficientHistory { bars: 30, minimum: 50, .. }
        ));
    }

    #[test]
    fn accepts_exactly_minimum() {
        assert!(compute_from_series(&series_from_closes(&uptrend(MIN_BARS))).is_ok());
    }

    #[test]
    fn non_finite_close_names_first_consumer() {
        let mut series = series_from_closes(&uptrend(80));
        series.bars[40].close = f64::NAN;
        match compute_from_series(&series) {
            Err(SignalError::IndicatorComputation { indicator, reason, .. }) => {
                assert_eq!(indicator, "SMA_50");
                assert!(reason.contains("Close"));
            }
            other => panic!("expected IndicatorComputation, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_volume_names_first_consumer() {
        let mut series = series_from_closes(&uptrend(80));
        series.bars[10].volume = f64::INFINITY;
        match compute_from_series(&series) {
            Err(SignalError::IndicatorComputation { indicator, .. }) => {
                assert_eq!(indicator, "VWAP");
            }
            other => panic!("expected IndicatorComputation, got {:?}", other),
        }
    }

    #[test]
    fn compute_is_deterministic() {
        let series = series_from_closes(&uptrend(150));
        let a = compute_from_series(&series).unwrap();
        let b = compute_from_series(&series).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bars_pass_through_unmodified() {
        let series = series_from_closes(&uptrend(60));
        let table = compute_from_series(&series).unwrap();
        assert_eq!(table.bars, series.bars);
    }

    #[test]
    fn derived_columns_follow_parents() {
        let table = compute_from_series(&series_from_closes(&uptrend(120))).unwrap();
        let last = table.len() - 1;
        let macd = table.value(Column::Macd, last).unwrap();
        let signal = table.value(Column::MacdSignal, last).unwrap();
        let hist = table.value(Column::MacdHist, last).unwrap();
        assert!((hist - (macd - signal)).abs() < 1e-12);

        let upper = table.value(Column::UpperBb, last).unwrap();
        let lower = table.value(Column::LowerBb, last).unwrap();
        let middle = table.value(Column::MiddleBb, last).unwrap();
        let width = table.value(Column::BbWidth, last).unwrap();
        assert!((width - (upper - lower) / middle).abs() < 1e-12);

        // constant volume: ratio to its own average is one
        let vr = table.value(Column::VolumeRatio, last).unwrap();
        assert!((vr - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_volume_column_is_reported() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let dates = (0..60)
            .map(|i| start + chrono::Duration::days(i))
            .collect();
        let cells: Vec<Option<f64>> = uptrend(60).into_iter().map(Some).collect();
        let frame = RawFrame::new(dates)
            .with_column(ColumnKey::flat("Close"), cells.clone())
            .with_column(ColumnKey::flat("High"), cells.clone())
            .with_column(ColumnKey::flat("Low"), cells);
        match compute_indicators(&frame, "TEST") {
            Err(SignalError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["Volume".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }
}
