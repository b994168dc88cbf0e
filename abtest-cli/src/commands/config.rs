//! Configuration commands

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Settings, ENV_PREFIX};
use crate::context::Context;
use crate::output::{print_field, print_section, OutputFormat};

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Target file (defaults to the user configuration file)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file locations
    Path,
}

/// Execute configuration commands
pub fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Init { path, force } => init(ctx, path, force),
        ConfigSubcommand::Path => show_paths(),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;

    match ctx.output.format() {
        OutputFormat::Table => {
            print_section("Configuration");
            print_field("alpha", &settings.alpha.to_string());
            print_field("metric", &settings.metric);
            print_field("group_column", &settings.group_column);
            print_field("control_label", &settings.control_label);
            print_field("test_label", &settings.test_label);
            print_field("levene_center", &settings.levene_center.to_string());
            print_field("output_format", &settings.output_format.to_string());
        }
        OutputFormat::Compact => {
            print!("{}", toml::to_string(settings).context("Failed to serialize config")?);
        }
        OutputFormat::Json | OutputFormat::Yaml => ctx.output.write_serialized(settings)?,
    }

    Ok(())
}

fn init(ctx: &Context, path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(Settings::user_config_path) {
        Some(p) => p,
        None => bail!("Could not determine config directory; pass --path"),
    };

    if path.exists() && !force {
        bail!("{:?} already exists (use --force to overwrite)", path);
    }

    Settings::default().save(&path)?;
    tracing::info!("Wrote default configuration to {:?}", path);
    ctx.output.success(&format!("Configuration written to {}", path.display()));

    Ok(())
}

fn show_paths() -> Result<()> {
    println!("{}", "Configuration sources (later entries win):".cyan());
    match Settings::user_config_path() {
        Some(p) => println!("  user file:   {}", p.display()),
        None => println!("  user file:   {}", "unavailable".dimmed()),
    }
    println!("  local file:  ./abtest.toml (or .json/.yaml)");
    println!("  --config:    explicit file passed on the command line");
    println!("  environment: {}_* variables", ENV_PREFIX);
    Ok(())
}
