//! CSV data source for control and test samples

use abtest_core::{CoreError, MissingCounts, Result, Sample, SamplePair, SampleSource};
use std::path::{Path, PathBuf};

/// Cell contents treated as a missing observation
const MISSING_TOKENS: [&str; 6] = ["", "na", "n/a", "nan", "null", "none"];

/// Where the two groups live on disk
#[derive(Debug, Clone, PartialEq)]
pub enum DataLayout {
    /// One file per group
    Split { control: PathBuf, test: PathBuf },
    /// One file with a group column, as produced by concatenating both groups
    Combined { path: PathBuf, group_column: String },
}

/// Loads the outcome column of both groups from CSV
#[derive(Debug, Clone)]
pub struct CsvSampleSource {
    pub layout: DataLayout,
    pub metric: String,
    pub control_label: String,
    pub test_label: String,
}

/// Parsed values of one column plus the number of skipped cells
#[derive(Debug, Default, PartialEq)]
struct ColumnValues {
    values: Vec<f64>,
    missing: usize,
}

impl SampleSource for CsvSampleSource {
    fn load(&self) -> Result<SamplePair> {
        let (control, test) = match &self.layout {
            DataLayout::Split { control, test } => (
                read_column(control, &self.metric)?,
                read_column(test, &self.metric)?,
            ),
            DataLayout::Combined { path, group_column } => self.read_grouped(path, group_column)?,
        };

        tracing::info!(
            metric = %self.metric,
            control = control.values.len(),
            test = test.values.len(),
            "Loaded samples"
        );
        if control.missing + test.missing > 0 {
            tracing::warn!(
                control_missing = control.missing,
                test_missing = test.missing,
                "Skipped missing cells"
            );
        }

        let missing = MissingCounts {
            control: control.missing,
            test: test.missing,
        };
        let pair = SamplePair::new(
            Sample::new(self.control_label.as_str(), control.values)?,
            Sample::new(self.test_label.as_str(), test.values)?,
        );

        Ok(pair.with_missing(missing))
    }
}

impl CsvSampleSource {
    fn read_grouped(&self, path: &Path, group_column: &str) -> Result<(ColumnValues, ColumnValues)> {
        let mut reader = open(path)?;
        let headers = reader.headers().map_err(|e| csv_error(path, 1, e))?.clone();

        let group_idx = column_index(path, &headers, group_column)?;
        let metric_idx = column_index(path, &headers, &self.metric)?;

        let mut control = ColumnValues::default();
        let mut test = ColumnValues::default();
        let mut ignored = 0usize;

        for (row, record) in reader.records().enumerate() {
            let line = row + 2;
            let record = record.map_err(|e| csv_error(path, line, e))?;

            let group = record.get(group_idx).unwrap_or("").trim();
            let target = if group == self.control_label {
                &mut control
            } else if group == self.test_label {
                &mut test
            } else {
                ignored += 1;
                continue;
            };

            push_cell(target, record.get(metric_idx).unwrap_or(""), path, line, &self.metric)?;
        }

        if ignored > 0 {
            tracing::debug!("Ignored {} row(s) with an unknown group in {:?}", ignored, path);
        }

        Ok((control, test))
    }
}

fn read_column(path: &Path, column: &str) -> Result<ColumnValues> {
    let mut reader = open(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, 1, e))?.clone();
    let idx = column_index(path, &headers, column)?;

    let mut parsed = ColumnValues::default();
    for (row, record) in reader.records().enumerate() {
        let line = row + 2;
        let record = record.map_err(|e| csv_error(path, line, e))?;
        push_cell(&mut parsed, record.get(idx).unwrap_or(""), path, line, column)?;
    }

    tracing::debug!("Read {} value(s) of '{}' from {:?}", parsed.values.len(), column, path);
    Ok(parsed)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CoreError::DataSource(format!("{}: failed to open CSV: {}", path.display(), e)))
}

fn column_index(path: &Path, headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        CoreError::DataSource(format!(
            "{}: column '{}' not found (available: {})",
            path.display(),
            column,
            headers.iter().collect::<Vec<_>>().join(", ")
        ))
    })
}

fn push_cell(target: &mut ColumnValues, cell: &str, path: &Path, line: usize, column: &str) -> Result<()> {
    let cell = cell.trim();
    if is_missing(cell) {
        target.missing += 1;
        return Ok(());
    }

    // `inf` and `infinity` parse as f64 but are not observations.
    let value = cell
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CoreError::DataSource(format!(
                "{}: line {}: column '{}': '{}' is not a finite number",
                path.display(),
                line,
                column,
                cell
            ))
        })?;
    target.values.push(value);
    Ok(())
}

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

fn csv_error(path: &Path, line: usize, err: csv::Error) -> CoreError {
    CoreError::DataSource(format!("{}: line {}: {}", path.display(), line, err))
}
