//! Assumption-driven comparison of the two groups

use abtest_core::{ComparisonConfig, LeveneCenter, ReportSink, SampleSource};
use abtest_metrics::AssumptionDrivenComparator;
use anyhow::{Context as _, Result};
use clap::Args;

use super::{build_report, DataArgs};
use crate::context::Context;
use crate::report::ConsoleReporter;

/// Check assumptions, pick a test and report the verdict
#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: DataArgs,

    /// Significance level (overrides configuration)
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Centre for Levene's test: median or mean
    #[arg(long)]
    pub levene_center: Option<LeveneCenter>,
}

pub fn execute(ctx: &Context, args: CompareArgs) -> Result<()> {
    let source = args.source.to_source(&ctx.settings)?;
    let pair = source.load().context("Failed to load samples")?;

    let config = ComparisonConfig::default()
        .with_alpha(args.alpha.unwrap_or(ctx.settings.alpha))
        .with_levene_center(args.levene_center.unwrap_or(ctx.settings.levene_center));
    tracing::debug!(alpha = config.alpha, center = %config.levene_center, "Comparing groups");

    let outcome = AssumptionDrivenComparator::new(config)
        .compare_detailed(&pair.control, &pair.test)
        .context("Comparison failed")?;

    for result in outcome.assumptions() {
        tracing::debug!(
            check = %result.check,
            statistic = result.statistic,
            p_value = result.p_value,
            holds = result.holds,
            "Assumption checked"
        );
    }
    tracing::info!(
        test = %outcome.verdict.test,
        p_value = outcome.verdict.p_value,
        rejected = outcome.verdict.null_rejected,
        "Comparison complete"
    );

    let report = build_report(&source.metric, &pair, Some(outcome));
    ConsoleReporter::new(&ctx.output)
        .report(&report)
        .context("Failed to render report")?;

    Ok(())
}
