//! The `ReportWriter` trait implemented by all backend writers.

use ft_traffic::FlowCounters;

use crate::{LayerReport, OutputResult, OverallRecord};

/// Trait implemented by the data-file and SQLite writers.
///
/// Errors surface to the observer, which keeps the first one for
/// [`ReportObserver::take_error`][crate::ReportObserver::take_error].
pub trait ReportWriter {
    /// Write one layer's time series.
    fn write_layer(&mut self, report: &LayerReport) -> OutputResult<()>;

    /// Write the run summary.
    fn write_overall(&mut self, record: &OverallRecord<'_>) -> OutputResult<()>;

    /// Write the flow locality histogram.
    fn write_locality(&mut self, _counters: &FlowCounters) -> OutputResult<()> {
        Ok(())
    }

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
