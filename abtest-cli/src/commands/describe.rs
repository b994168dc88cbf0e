//! Descriptive summary of both groups

use abtest_core::{ReportSink, SampleSource};
use anyhow::{Context as _, Result};
use clap::Args;

use super::{build_report, DataArgs};
use crate::context::Context;
use crate::report::ConsoleReporter;

/// Summarise the outcome column of each group
#[derive(Debug, Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub source: DataArgs,
}

pub fn execute(ctx: &Context, args: DescribeArgs) -> Result<()> {
    let source = args.source.to_source(&ctx.settings)?;
    let pair = source.load().context("Failed to load samples")?;

    let report = build_report(&source.metric, &pair, None);
    ConsoleReporter::new(&ctx.output)
        .report(&report)
        .context("Failed to render report")?;

    Ok(())
}
