use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod context;
mod loader;
mod output;
mod report;

use cli::{Cli, Commands};
use context::Context;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "✗".red(), err);
        std::process::exit(1);
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "abtest=debug"
    } else {
        "abtest=info"
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = default_filter(verbose);

    // Logs go to stderr so structured stdout stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Describe(args) => commands::describe::execute(&ctx, args),
        Commands::Compare(args) => commands::compare::execute(&ctx, args),
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd),
    }
}
