//! Command-line argument parsing for weightlog.
//!
//! Typical invocations:
//! - `weightlog 182.4` — log today's weight and refresh the graph
//! - `weightlog 182.4 -d 2024-01-15` — log for an explicit date
//! - `weightlog -g -r 6m -s` — graph the last six months and keep that default

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::error::{Error, Result};
use crate::range::RangeSpec;

/// A personal weight tracker: log daily weights, graph the trend.
#[derive(Parser, Debug)]
#[command(name = "weightlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Weight to log, in lbs
    #[arg(allow_negative_numbers = true)]
    pub weight: Option<f64>,

    /// Date for the logged entry (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    pub date: Option<String>,

    /// Graph window: 1m, 6m, 1y, or all
    #[arg(short, long)]
    pub range: Option<String>,

    /// Explicit graph start date (YYYY-MM-DD), overrides --range
    #[arg(short, long)]
    pub from_date: Option<String>,

    /// Persist the chosen range as the default
    #[arg(short, long)]
    pub set_default: bool,

    /// Bulk-import historical entries from the legacy JSON file
    #[arg(long)]
    pub import_history: bool,

    /// Skip logging and only render the graph
    #[arg(short, long)]
    pub graph_only: bool,

    /// Path to the database file
    /// Defaults to the platform data directory
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Graph output path
    /// Defaults to weight_progress.png in the downloads directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments, with dates and range tokens
/// validated up front.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weight: Option<f64>,
    pub date: Option<NaiveDate>,
    pub range: Option<RangeSpec>,
    pub from_date: Option<NaiveDate>,
    pub set_default: bool,
    pub import_history: bool,
    pub graph_only: bool,
    pub db_path: PathBuf,
    pub output_path: PathBuf,
}

impl AppConfig {
    /// Validate and convert raw CLI arguments.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if let Some(weight) = cli.weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(Error::InvalidInput(format!(
                    "weight must be a positive number, got {weight}"
                )));
            }
        }

        let date = cli.date.as_deref().map(parse_date).transpose()?;
        let from_date = cli.from_date.as_deref().map(parse_date).transpose()?;
        let range = cli.range.as_deref().map(RangeSpec::parse).transpose()?;

        Ok(AppConfig {
            weight: cli.weight,
            date,
            range,
            from_date,
            set_default: cli.set_default,
            import_history: cli.import_history,
            graph_only: cli.graph_only,
            db_path: cli.db_path.unwrap_or_else(default_db_path),
            output_path: cli.output.unwrap_or_else(default_output_path),
        })
    }

    /// Fixed location of the legacy import file, next to the database.
    pub fn legacy_path(&self) -> PathBuf {
        self.db_path
            .parent()
            .map(|dir| dir.join("legacy_weights.json"))
            .unwrap_or_else(|| PathBuf::from("legacy_weights.json"))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("invalid date `{s}` (expected YYYY-MM-DD)")))
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weightlog")
        .join("weightlog.db")
}

fn default_output_path() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weight_progress.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Result<AppConfig> {
        let cli = Cli::try_parse_from(args).unwrap();
        AppConfig::from_cli(cli)
    }

    #[test]
    fn test_full_flag_surface_parses() {
        let config = config_from(&[
            "weightlog",
            "182.4",
            "-d",
            "2024-01-15",
            "-r",
            "6m",
            "-s",
            "-g",
        ])
        .unwrap();
        assert_eq!(config.weight, Some(182.4));
        assert_eq!(config.date, Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert_eq!(config.range, Some(RangeSpec::LastSixMonths));
        assert!(config.set_default);
        assert!(config.graph_only);
        assert!(!config.import_history);
    }

    #[test]
    fn test_from_date_flag() {
        let config = config_from(&["weightlog", "-g", "-f", "2023-06-01"]).unwrap();
        assert_eq!(
            config.from_date,
            Some(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap())
        );
        assert_eq!(config.range, None);
    }

    #[test]
    fn test_non_positive_weight_is_invalid_input() {
        assert!(matches!(
            config_from(&["weightlog", "-10.0"]),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            config_from(&["weightlog", "0"]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_date_is_invalid_input() {
        assert!(matches!(
            config_from(&["weightlog", "182.4", "-d", "01/15/2024"]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_range_token_is_invalid_range() {
        assert!(matches!(
            config_from(&["weightlog", "-g", "-r", "2y"]),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_legacy_path_sits_next_to_the_database() {
        let config = config_from(&["weightlog", "-g", "--db-path", "/tmp/wl/weights.db"]).unwrap();
        assert_eq!(
            config.legacy_path(),
            PathBuf::from("/tmp/wl/legacy_weights.json")
        );
    }
}
