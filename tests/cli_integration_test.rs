//! CLI integration tests for the value and validate commands.
//!
//! Tests cover:
//! - Report settings read from `[report]`
//! - Valuing scenario files on disk into a report file
//! - Exit codes for unreadable, incomplete and inconsistent scenarios

mod common;

use clap::Parser;
use common::*;
use lookback::adapters::file_config_adapter::FileConfigAdapter;
use lookback::cli::{self, Cli};
use lookback::domain::error::LookbackError;
use lookback::domain::scenario::Scenario;
use lookback::ports::report_port::ReportPort;
use std::path::PathBuf;
use std::process::ExitCode;

const VALID_INI: &str = r#"
[portfolio]
base_currency = AUD

[fx]
AUDUSD = 0.65

[cash]
currencies = AUD, USD

[stocks]
ZZB AU = 2.50 AUD
AAPL US = 300 USD

[transfers]
AUD = 1000
USD = 1000

[trades]
ZZB AU = 100

[report]
precision = 3
"#;

/// ExitCode has no PartialEq; compare through its Debug form.
fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

fn expected_code(err: LookbackError) -> ExitCode {
    ExitCode::from(&err)
}

mod report_settings {
    use super::*;

    #[test]
    fn precision_from_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let scenario = Scenario::from_config(&adapter).unwrap();
        let report = cli::build_report_adapter(&adapter).render(scenario.portfolio());
        let total = report.lines().last().unwrap();
        let expected = format!("{:.3}", 1000.0 + 1000.0 / 0.65);
        assert!(total.ends_with(&expected), "{total}");
    }

    #[test]
    fn negative_precision_clamps_to_zero() {
        let adapter =
            FileConfigAdapter::from_string(&VALID_INI.replace("precision = 3", "precision = -4"))
                .unwrap();
        let scenario = Scenario::from_config(&adapter).unwrap();
        let report = cli::build_report_adapter(&adapter).render(scenario.portfolio());
        assert!(report.lines().last().unwrap().ends_with(" 2538"));
    }
}

mod value_command {
    use super::*;

    #[test_log::test]
    fn writes_report_file() {
        let ini = write_temp_ini(VALID_INI);
        let out = tempfile::NamedTempFile::new().unwrap();
        let out_path = out.path().to_path_buf();

        let code = cli::run_value(&ini.path().to_path_buf(), Some(&out_path));
        assert!(same_code(code, ExitCode::SUCCESS));

        let report = std::fs::read_to_string(&out_path).unwrap();
        assert!(report.contains("ZZB AU"));
        assert!(!report.contains("AAPL US"));
        assert!(report.contains("TOTAL (AUD)"));
    }

    #[test]
    fn run_dispatches_parsed_command() {
        let ini = write_temp_ini(VALID_INI);
        let out = tempfile::NamedTempFile::new().unwrap();
        let cli = Cli::try_parse_from([
            "lookback",
            "value",
            "--config",
            ini.path().to_str().unwrap(),
            "--output",
            out.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(same_code(cli::run(cli), ExitCode::SUCCESS));
        assert!(std::fs::read_to_string(out.path()).unwrap().contains("USD"));
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let path = PathBuf::from("/nonexistent/lookback/scenario.ini");
        let code = cli::run_value(&path, None);
        let expected = expected_code(LookbackError::ConfigParse {
            file: String::new(),
            reason: String::new(),
        });
        assert!(same_code(code, expected));
    }

    #[test]
    fn missing_base_currency_is_config_error() {
        let ini = write_temp_ini("[fx]\nAUDUSD = 0.65\n");
        let code = cli::run_value(&ini.path().to_path_buf(), None);
        let expected = expected_code(LookbackError::ConfigMissing {
            section: String::new(),
            key: String::new(),
        });
        assert!(same_code(code, expected));
    }

    #[test]
    fn unconvertible_holding_is_rate_error() {
        let ini = write_temp_ini(
            "[portfolio]\nbase_currency = AUD\n[cash]\ncurrencies = EUR\n[transfers]\nEUR = 10\n",
        );
        let code = cli::run_value(&ini.path().to_path_buf(), None);
        let expected = expected_code(LookbackError::RateUnavailable {
            pair: String::new(),
        });
        assert!(same_code(code, expected));
    }

    #[test]
    fn unwritable_output_is_io_error() {
        let ini = write_temp_ini(VALID_INI);
        let out = PathBuf::from("/nonexistent/lookback/report.txt");
        let code = cli::run_value(&ini.path().to_path_buf(), Some(&out));
        let expected = expected_code(LookbackError::Io(std::io::Error::other("x")));
        assert!(same_code(code, expected));
    }
}

mod validate_command {
    use super::*;

    #[test]
    fn valid_scenario_succeeds() {
        let ini = write_temp_ini(VALID_INI);
        let code = cli::run_validate(&ini.path().to_path_buf());
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn negative_price_is_validation_error() {
        let ini = write_temp_ini("[portfolio]\nbase_currency = AUD\n[stocks]\nZZB AU = -1 AUD\n");
        let code = cli::run_validate(&ini.path().to_path_buf());
        let expected = expected_code(LookbackError::InvalidValue {
            field: "price",
            reason: String::new(),
        });
        assert!(same_code(code, expected));
    }

    #[test]
    fn duplicate_pair_is_registry_error() {
        let ini = write_temp_ini("[portfolio]\nbase_currency = AUD\n[fx]\nAUDUSD = 0.65\nUSDAUD = 1.5\n");
        let code = cli::run_validate(&ini.path().to_path_buf());
        let expected = expected_code(LookbackError::DuplicateKey {
            kind: "fx rate",
            key: String::new(),
        });
        assert!(same_code(code, expected));
    }
}
