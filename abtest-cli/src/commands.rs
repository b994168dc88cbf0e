pub mod compare;
pub mod config;
pub mod describe;

use abtest_core::{AnalysisReport, ComparisonOutcome, SamplePair};
use abtest_metrics::SampleAggregator;
use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::Settings;
use crate::loader::{CsvSampleSource, DataLayout};

/// Where to read the two groups from
#[derive(Debug, Args)]
pub struct DataArgs {
    /// CSV file with the control group
    #[arg(long, requires = "test", conflicts_with = "data")]
    pub control: Option<PathBuf>,

    /// CSV file with the test group
    #[arg(long, requires = "control", conflicts_with = "data")]
    pub test: Option<PathBuf>,

    /// Single CSV file holding both groups and a group column
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Outcome column to analyse
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Group column in the combined file
    #[arg(long)]
    pub group_column: Option<String>,

    /// Label of the control group
    #[arg(long)]
    pub control_label: Option<String>,

    /// Label of the test group
    #[arg(long)]
    pub test_label: Option<String>,
}

impl DataArgs {
    /// Build the data source, falling back to configured settings
    pub fn to_source(&self, settings: &Settings) -> Result<CsvSampleSource> {
        let layout = match (&self.control, &self.test, &self.data) {
            (Some(control), Some(test), None) => DataLayout::Split {
                control: control.clone(),
                test: test.clone(),
            },
            (None, None, Some(path)) => DataLayout::Combined {
                path: path.clone(),
                group_column: self
                    .group_column
                    .clone()
                    .unwrap_or_else(|| settings.group_column.clone()),
            },
            _ => bail!("Provide either --control and --test, or --data"),
        };

        let control_label = self
            .control_label
            .clone()
            .unwrap_or_else(|| settings.control_label.clone());
        let test_label = self
            .test_label
            .clone()
            .unwrap_or_else(|| settings.test_label.clone());
        if control_label == test_label {
            bail!("Control and test labels must differ (both are '{}')", control_label);
        }

        Ok(CsvSampleSource {
            layout,
            metric: self.metric.clone().unwrap_or_else(|| settings.metric.clone()),
            control_label,
            test_label,
        })
    }
}

/// Assemble the report handed to the reporter
pub fn build_report(metric: &str, pair: &SamplePair, outcome: Option<ComparisonOutcome>) -> AnalysisReport {
    AnalysisReport {
        metric: metric.to_string(),
        summaries: vec![
            SampleAggregator::summarize(&pair.control, pair.missing.control),
            SampleAggregator::summarize(&pair.test, pair.missing.test),
        ],
        outcome,
    }
}
