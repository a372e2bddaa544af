//! CLI integration tests for config handling and the score pipeline.
//!
//! Tests cover:
//! - Settings from `[scoring]` / `[summary]` (build_settings)
//! - Symbol resolution (resolve_symbols)
//! - The score pipeline over a MockDataPort, text and JSON output
//! - CSV data directory and INI file on disk, end to end

mod common;

use common::*;
use std::io::Write;
use swingsignal::adapters::csv_adapter::CsvAdapter;
use swingsignal::adapters::file_config_adapter::FileConfigAdapter;
use swingsignal::adapters::memory_cache::InMemoryCache;
use swingsignal::cli;
use swingsignal::domain::analysis::{analyze, Settings};
use swingsignal::domain::error::SignalError;
use swingsignal::domain::scoring::ScoringProfile;
use swingsignal::ports::data_port::DataPort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

mod settings {
    use super::*;

    #[test]
    fn defaults_when_section_absent() {
        let settings = cli::build_settings(&config("[data]\ndir = /tmp\n"), None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_scoring_and_summary_sections() {
        let c = config(
            r#"
[scoring]
profile = Baseline
partial_credit = 0.25
pivot_tolerance = 0.02

[summary]
window = 10
"#,
        );
        let settings = cli::build_settings(&c, None).unwrap();
        assert_eq!(settings.profile, ScoringProfile::Baseline);
        assert_eq!(settings.params.partial_credit, 0.25);
        assert_eq!(settings.params.pivot_tolerance, 0.02);
        assert_eq!(settings.summary_window, 10);
    }

    #[test]
    fn override_wins_over_config() {
        let c = config("[scoring]\nprofile = baseline\n");
        let settings = cli::build_settings(&c, Some(ScoringProfile::Enhanced)).unwrap();
        assert_eq!(settings.profile, ScoringProfile::Enhanced);
    }

    #[test]
    fn unknown_profile_is_invalid() {
        let err = cli::build_settings(&config("[scoring]\nprofile = aggressive\n"), None)
            .unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { ref key, .. } if key == "profile"));
    }

    #[test]
    fn out_of_range_partial_credit_is_invalid() {
        let err = cli::build_settings(&config("[scoring]\npartial_credit = 1.5\n"), None)
            .unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { .. }));
    }

    #[test]
    fn missing_data_dir_is_reported() {
        let err = match cli::build_data_adapter(&config("[scoring]\n")) {
            Err(e) => e,
            Ok(_) => panic!("expected missing [data] dir"),
        };
        assert_eq!(err.to_string(), "missing config value [data] dir");
    }
}

mod symbol_resolution {
    use super::*;

    #[test]
    fn command_line_symbols_win() {
        let c = config("[data]\nsymbols = AAPL, MSFT\n");
        assert_eq!(
            cli::resolve_symbols(&symbols(&[" TCS.NS "]), &c),
            vec!["TCS.NS"]
        );
    }

    #[test]
    fn falls_back_to_config_list() {
        let c = config("[data]\nsymbols = AAPL, MSFT,,GOOG \n");
        assert_eq!(cli::resolve_symbols(&[], &c), vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn empty_when_nothing_configured() {
        assert!(cli::resolve_symbols(&[], &config("[data]\ndir = x\n")).is_empty());
    }
}

mod score_pipeline {
    use super::*;

    fn port() -> MockDataPort {
        MockDataPort::new()
            .with_frame("UP", uptrend_frame(120))
            .with_frame("DOWN", downtrend_frame(120))
            .with_frame("SHORT", uptrend_frame(20))
    }

    #[test]
    fn text_output_lists_reasons() {
        let mut out = Vec::new();
        let scored = cli::run_score_pipeline(
            &port(),
            None,
            &symbols(&["UP", "SHORT"]),
            &Settings::default(),
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(scored, 1);

        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("UP  "));
        assert!(first.contains("/15"));
        assert!(text.contains("  + Golden Cross: 50-day SMA above 200-day"));
        assert!(!text.contains("SHORT"));
    }

    #[test]
    fn json_output_includes_failures() {
        let mut out = Vec::new();
        let cache = InMemoryCache::new();
        let scored = cli::run_score_pipeline(
            &port(),
            Some(&cache),
            &symbols(&["DOWN", "SHORT"]),
            &Settings::default(),
            true,
            &mut out,
        )
        .unwrap();
        assert_eq!(scored, 1);

        let values: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let items = values.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["symbol"], "DOWN");
        assert!(items[0]["breakdown"]["sell_score"].as_f64().unwrap() > 0.0);
        assert_eq!(items[1]["symbol"], "SHORT");
        assert!(items[1]["error"].as_str().unwrap().contains("insufficient history"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn all_failures_return_the_first_error() {
        let mut out = Vec::new();
        let err = cli::run_score_pipeline(
            &port(),
            None,
            &symbols(&["SHORT", "MISSING"]),
            &Settings::default(),
            false,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, SignalError::InsufficientHistory { bars: 20, .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn format_report_headline_and_summary() {
        let report = analyze(&port(), None, "UP", &Settings::default()).unwrap();
        let lines = cli::format_report(&report);
        assert!(lines[0].contains(report.classification.label()));
        assert!(lines.last().unwrap().contains("Uptrend"));
    }
}

mod csv_end_to_end {
    use super::*;

    #[test]
    fn ini_and_csv_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("UP.csv"),
            csv_from_closes(&uptrend_closes(100)),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("DOWN.csv"),
            csv_from_closes(&downtrend_closes(100)),
        )
        .unwrap();

        let ini = write_temp_ini(&format!(
            "[data]\ndir = {}\nsymbols = UP, DOWN\n\n[scoring]\nprofile = enhanced\n",
            dir.path().display()
        ));
        let config = cli::load_config(ini.path()).unwrap();
        let settings = cli::build_settings(&config, None).unwrap();
        let data = cli::build_data_adapter(&config).unwrap();

        let mut listed = data.list_symbols().unwrap();
        listed.sort();
        assert_eq!(listed, vec!["DOWN", "UP"]);

        let mut out = Vec::new();
        let scored = cli::run_score_pipeline(
            &data,
            None,
            &cli::resolve_symbols(&[], &config),
            &settings,
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(scored, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("UP  "));
        assert!(text.contains("DOWN  "));
    }

    #[test]
    fn missing_csv_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(
            adapter.fetch_frame("NOPE"),
            Err(SignalError::DataSource { .. })
        ));
    }

    #[test]
    fn load_config_rejects_missing_file() {
        assert!(cli::load_config(std::path::Path::new("/nonexistent/swingsignal.ini")).is_err());
    }
}
