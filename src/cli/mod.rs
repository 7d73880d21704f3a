//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use agromatch::{reading::ColumnMapping, Deduplicate, JoinMode, MatchConfig, TemporalMode};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match primary tables against a secondary table
    Match(MatchArgs),
    /// Summarise a table
    Summary {
        /// Path or http(s) URL of the table
        input: String,
        #[command(flatten)]
        columns: ColumnArgs,
    },
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Primary tables (paths or http(s) URLs), matched one at a time
    #[arg(long, required = true, num_args = 1..)]
    pub primary: Vec<String>,

    /// Secondary table (path or http(s) URL)
    #[arg(long)]
    pub secondary: String,

    /// Decimal places kept when rounding coordinates
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    pub precision: i32,

    /// Largest accepted coordinate distance, in degrees
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub tolerance: f64,

    #[arg(long, value_enum, default_value_t = TemporalMode::YearOnly)]
    pub temporal: TemporalMode,

    #[arg(long, value_enum, default_value_t = JoinMode::NearestWithinTolerance)]
    pub join: JoinMode,

    #[arg(long, value_enum, default_value_t = Deduplicate::Both)]
    pub dedup: Deduplicate,

    /// Only match primary records of this variable
    #[arg(long)]
    pub primary_variable: Option<String>,

    /// Only match secondary records of this variable
    #[arg(long)]
    pub secondary_variable: Option<String>,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Output file (.csv, .parquet or .db); defaults to ~/agromatch-<date>.csv
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also insert the result into this SQLite database
    #[arg(long)]
    pub sqlite: Option<PathBuf>,

    /// Table name used with --sqlite
    #[arg(long, default_value = "matched")]
    pub table: String,
}

impl MatchArgs {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            coordinate_precision: self.precision,
            tolerance: self.tolerance,
            temporal_mode: self.temporal,
            join_mode: self.join,
            deduplicate: self.dedup,
            primary_variable: self.primary_variable.clone(),
            secondary_variable: self.secondary_variable.clone(),
        }
    }
}

/// Source column names shared by both inputs.
#[derive(Args, Debug)]
pub struct ColumnArgs {
    #[arg(long = "lat-column", default_value = "lat")]
    pub lat: String,

    #[arg(long = "lon-column", default_value = "lon")]
    pub lon: String,

    #[arg(long = "time-column", default_value = "time")]
    pub time: String,

    #[arg(long = "value-column", default_value = "value")]
    pub value: String,

    /// Variable name column; the value column name is used when absent
    #[arg(long = "variable-column", default_value = "variable")]
    pub variable: String,
}

impl ColumnArgs {
    pub fn mapping(&self) -> ColumnMapping {
        ColumnMapping {
            latitude: self.lat.clone(),
            longitude: self.lon.clone(),
            time: self.time.clone(),
            value: self.value.clone(),
            variable: Some(self.variable.clone()),
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_match_defaults() {
        let cli = Cli::try_parse_from([
            "agromatch",
            "match",
            "--primary",
            "maize_2019.csv",
            "maize_2020.csv",
            "--secondary",
            "agro.csv",
        ])
        .unwrap();

        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(args.primary, vec!["maize_2019.csv", "maize_2020.csv"]);
        assert_eq!(args.match_config(), MatchConfig::default());
        assert_eq!(args.columns.mapping(), ColumnMapping::default());
        assert!(args.output.is_none());
    }

    #[test]
    fn should_parse_match_options() {
        let cli = Cli::try_parse_from([
            "agromatch",
            "match",
            "--primary",
            "maize.parquet",
            "--secondary",
            "agro.parquet",
            "--precision",
            "3",
            "--tolerance",
            "0.14",
            "--temporal",
            "exact-date",
            "--join",
            "exact-rounded",
            "--dedup",
            "off",
            "--secondary-variable",
            "GSL",
            "--lat-column",
            "latitude",
            "--output",
            "combined.parquet",
        ])
        .unwrap();

        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        let config = args.match_config();
        assert_eq!(config.coordinate_precision, 3);
        assert_eq!(config.tolerance, 0.14);
        assert_eq!(config.temporal_mode, TemporalMode::ExactDate);
        assert_eq!(config.join_mode, JoinMode::ExactRounded);
        assert_eq!(config.deduplicate, Deduplicate::Off);
        assert_eq!(config.secondary_variable.as_deref(), Some("GSL"));
        assert_eq!(args.columns.mapping().latitude, "latitude");
        assert_eq!(args.output, Some(PathBuf::from("combined.parquet")));
    }

    #[test]
    fn should_accept_nearest_alias() {
        let cli = Cli::try_parse_from([
            "agromatch", "match", "--primary", "a.csv", "--secondary", "b.csv", "--join", "nearest",
        ])
        .unwrap();

        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(args.join, JoinMode::NearestWithinTolerance);
    }

    #[test]
    fn should_require_primary() {
        let result = Cli::try_parse_from(["agromatch", "match", "--secondary", "agro.csv"]);

        assert!(result.is_err());
    }
}
