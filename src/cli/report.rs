//! Report subcommand
//!
//! Prints the number of completed tasks due on each day of a range.

use clap::{Args, ValueEnum};

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Aligned text table (default)
    #[default]
    Table,
    /// JSON summary
    Json,
}

/// Arguments for the report subcommand
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// First day of the range (YYYY-MM-DD or ISO-8601 timestamp)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Last day of the range, inclusive
    #[arg(long, value_name = "DATE")]
    pub end: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    pub format: ReportFormat,
}
