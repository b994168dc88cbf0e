//! CLI execution context

use anyhow::Result;

use crate::cli::Cli;
use crate::config::Settings;
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// Effective settings
    pub settings: Settings,

    /// Output writer
    pub output: OutputWriter,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref())?;

        // Command-line flag wins over configured format
        let output_format: OutputFormat = cli.output.unwrap_or(settings.output_format);
        let output = OutputWriter::new(output_format, cli.no_color);

        tracing::debug!(?settings, %output_format, "Context initialised");

        Ok(Self {
            settings,
            output,
        })
    }
}
