//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{write_augmented, write_augmented_file, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_cache::InMemoryCache;
use crate::domain::analysis::{analyze, analyze_all, Settings, SignalReport};
use crate::domain::config_validation::{
    validate_data_config, validate_scoring_config, CACHE, DATA, SCORING,
};
use crate::domain::error::SignalError;
use crate::domain::scoring::profile::{DEFAULT_PARTIAL_CREDIT, DEFAULT_PIVOT_TOLERANCE};
use crate::domain::scoring::{ScoringParams, ScoringProfile};
use crate::domain::summary::DEFAULT_WINDOW;
use crate::ports::cache_port::CachePort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

const SUMMARY: &str = "summary";

#[derive(Parser, Debug)]
#[command(name = "swingsignal", about = "Technical indicator signal scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one or more symbols
    Score {
        #[arg(short, long)]
        config: PathBuf,
        /// Symbol to score (repeatable); defaults to [data] symbols
        #[arg(short, long = "symbol")]
        symbols: Vec<String>,
        /// Override [scoring] profile (enhanced or baseline)
        #[arg(short, long)]
        profile: Option<ScoringProfile>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the indicator table for a symbol as CSV
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Score {
            config,
            symbols,
            profile,
            json,
        } => run_score(&config, &symbols, profile, json),
        Command::Indicators {
            config,
            symbol,
            output,
        } => run_indicators(&config, &symbol, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Scoring settings from `[scoring]`, with an optional profile override.
pub fn build_settings(
    config: &dyn ConfigPort,
    profile_override: Option<ScoringProfile>,
) -> Result<Settings, SignalError> {
    validate_scoring_config(config)?;

    let profile = match profile_override {
        Some(p) => p,
        None => match config.get_string(SCORING, "profile") {
            Some(name) => name
                .parse()
                .map_err(|reason| SignalError::ConfigInvalid {
                    section: SCORING.into(),
                    key: "profile".into(),
                    reason,
                })?,
            None => ScoringProfile::default(),
        },
    };

    let window = config.get_int(SUMMARY, "window", DEFAULT_WINDOW as i64);
    Ok(Settings {
        profile,
        params: ScoringParams {
            partial_credit: config.get_double(SCORING, "partial_credit", DEFAULT_PARTIAL_CREDIT),
            pivot_tolerance: config.get_double(SCORING, "pivot_tolerance", DEFAULT_PIVOT_TOLERANCE),
        },
        summary_window: usize::try_from(window).unwrap_or(DEFAULT_WINDOW).max(2),
    })
}

pub fn build_data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, SignalError> {
    validate_data_config(config)?;
    let dir = config.get_string(DATA, "dir").unwrap_or_default();
    Ok(CsvAdapter::new(PathBuf::from(dir.trim())))
}

/// Command-line symbols win over `[data] symbols`.
pub fn resolve_symbols(overrides: &[String], config: &dyn ConfigPort) -> Vec<String> {
    let from_overrides: Vec<String> = overrides
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if from_overrides.is_empty() {
        config.get_list(DATA, "symbols")
    } else {
        from_overrides
    }
}

fn run_score(
    config_path: &Path,
    symbol_overrides: &[String],
    profile_override: Option<ScoringProfile>,
    json: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match build_settings(&config, profile_override) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data = match build_data_adapter(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut symbols = resolve_symbols(symbol_overrides, &config);
    if symbols.is_empty() {
        symbols = match data.list_symbols() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
    }
    if symbols.is_empty() {
        eprintln!("error: no symbols configured or found");
        return ExitCode::from(2);
    }

    let cache = InMemoryCache::new();
    let cache: Option<&(dyn CachePort + Sync)> = if config.get_bool(CACHE, "enabled", true) {
        Some(&cache)
    } else {
        None
    };

    tracing::info!(
        symbols = symbols.len(),
        profile = %settings.profile,
        "scoring"
    );
    let stdout = io::stdout();
    match run_score_pipeline(&data, cache, &symbols, &settings, json, &mut stdout.lock()) {
        Ok(scored) => {
            eprintln!("{} of {} symbols scored", scored, symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Analyze `symbols` and print the results.
///
/// Returns the number of symbols scored, or the first failure when none were.
pub fn run_score_pipeline(
    data: &(dyn DataPort + Sync),
    cache: Option<&(dyn CachePort + Sync)>,
    symbols: &[String],
    settings: &Settings,
    json: bool,
    out: &mut dyn Write,
) -> Result<usize, SignalError> {
    let results = analyze_all(data, cache, symbols, settings);

    if json {
        write_json(&results, out)?;
    } else {
        write_text(&results, out)?;
    }

    let scored = results.iter().filter(|(_, r)| r.is_ok()).count();
    if scored == 0 {
        if let Some(first) = results.into_iter().find_map(|(_, r)| r.err()) {
            return Err(first);
        }
    }
    Ok(scored)
}

fn write_json(
    results: &[(String, Result<SignalReport, SignalError>)],
    out: &mut dyn Write,
) -> io::Result<()> {
    let values: Vec<serde_json::Value> = results
        .iter()
        .map(|(symbol, result)| match result {
            Ok(report) => serde_json::to_value(report)
                .unwrap_or_else(|e| serde_json::json!({ "symbol": symbol, "error": e.to_string() })),
            Err(e) => serde_json::json!({ "symbol": symbol, "error": e.to_string() }),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &values)?;
    writeln!(out)
}

fn write_text(
    results: &[(String, Result<SignalReport, SignalError>)],
    out: &mut dyn Write,
) -> io::Result<()> {
    for (symbol, result) in results {
        match result {
            Ok(report) => {
                for line in format_report(report) {
                    writeln!(out, "{}", line)?;
                }
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
            }
        }
    }
    Ok(())
}

/// Human-readable lines for one report: a headline, then reasons.
pub fn format_report(report: &SignalReport) -> Vec<String> {
    let b = &report.breakdown;
    let mut lines = vec![format!(
        "{}  {}  close {:.2}  {}  buy {}/{} ({:.1}%)  sell {}/{} ({:.1}%)",
        report.symbol,
        report.as_of,
        report.close,
        report.classification,
        b.buy_score,
        b.max_score,
        b.buy_strength,
        b.sell_score,
        b.max_score,
        b.sell_strength,
    )];
    lines.extend(b.buy_reasons.iter().map(|r| format!("  + {}", r)));
    lines.extend(b.sell_reasons.iter().map(|r| format!("  - {}", r)));
    if let Some(s) = &report.summary {
        lines.push(format!(
            "  {} ({:+.2}% over {} bars), volatility {:.2}%/day",
            s.trend, s.return_pct, s.window, s.volatility_pct
        ));
    }
    lines
}

fn run_indicators(config_path: &Path, symbol: &str, output: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = match build_data_adapter(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let settings = match build_settings(&config, None) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = match analyze(&data, None, symbol, &settings) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let written = match output {
        Some(path) => write_augmented_file(&report.table, path).map(|()| {
            eprintln!("Indicators written to: {}", path.display());
        }),
        None => write_augmented(&report.table, io::stdout().lock()),
    };
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let settings = match build_settings(&config, None) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = validate_data_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("  profile:         {}", settings.profile);
    eprintln!("  partial credit:  {}", settings.params.partial_credit);
    eprintln!("  pivot tolerance: {}", settings.params.pivot_tolerance);

    let symbols = resolve_symbols(&[], &config);
    if symbols.is_empty() {
        eprintln!("  symbols:         (all files in data dir)");
    } else {
        eprintln!("  symbols:         {}", symbols.join(", "));
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = match build_data_adapter(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
