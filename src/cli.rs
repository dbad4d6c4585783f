//! CLI argument parsing for Stepwise

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for report tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Boxed text tables (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

/// Which report tables to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Every report, in study order
    All,
    /// Inter-rater reliability of step coding (Cohen's Kappa)
    Agreement,
    /// Abstract step transitions
    Transitions,
    /// Loop iterations and time per iteration
    Iterations,
    /// Time spent per step
    Durations,
    /// Raw per-task participant data
    Tasks,
}

#[derive(Parser, Debug)]
#[command(name = "stepwise")]
#[command(version)]
#[command(about = "Statistical tables for coded user-study sessions", long_about = None)]
pub struct Cli {
    /// Study description (TOML) naming each dataset's files
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Report to produce
    #[arg(short, long, value_enum, default_value = "all")]
    pub report: ReportKind,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Restrict reports to one dataset
    #[arg(short, long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["stepwise", "--config", "study.toml"]);
        assert_eq!(cli.config, PathBuf::from("study.toml"));
        assert_eq!(cli.report, ReportKind::All);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.dataset.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_report_and_format() {
        let cli = Cli::parse_from([
            "stepwise",
            "-c",
            "study.toml",
            "--report",
            "agreement",
            "--format",
            "json",
            "--dataset",
            "nanofuzz",
        ]);
        assert_eq!(cli.report, ReportKind::Agreement);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.dataset.as_deref(), Some("nanofuzz"));
    }

    #[test]
    fn test_cli_requires_config() {
        assert!(Cli::try_parse_from(["stepwise"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_report() {
        assert!(Cli::try_parse_from(["stepwise", "-c", "s.toml", "--report", "anova"]).is_err());
    }

    #[test]
    fn test_cli_debug_flag() {
        let cli = Cli::parse_from(["stepwise", "-c", "s.toml", "--debug"]);
        assert!(cli.debug);
    }
}
