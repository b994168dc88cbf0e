//! Command-line definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::compare::CompareArgs;
use crate::commands::config::ConfigCommands;
use crate::commands::describe::DescribeArgs;
use crate::output::OutputFormat;

/// Compare two bidding strategies with an assumption-driven A/B test
#[derive(Debug, Parser)]
#[command(name = "abtest", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Additional configuration file
    #[arg(long, global = true, env = "ABTEST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Descriptive statistics for each group
    Describe(DescribeArgs),

    /// Check assumptions and run the selected hypothesis test
    Compare(CompareArgs),

    /// Inspect or create configuration
    Config(ConfigCommands),
}
