use crate::domain::{AnalysisReport, SamplePair};
use crate::error::Result;

/// Supplies the control and test samples for one comparison.
pub trait SampleSource {
    fn load(&self) -> Result<SamplePair>;
}

/// Receives the structured results of an analysis for presentation.
pub trait ReportSink {
    fn report(&mut self, report: &AnalysisReport) -> Result<()>;
}
