//! `ReportObserver<W>` bridges `ExperimentObserver` to a `ReportWriter`.

use std::time::SystemTime;

use tracing::info;

use ft_core::{ExperimentConfig, FatTreeDims, Layer, NodeIndex};
use ft_sim::{ExperimentObserver, ExperimentReport};

use crate::aggregate::{ReportAggregator, RunReport};
use crate::record::OverallRecord;
use crate::writer::ReportWriter;
use crate::{OutputError, OutputResult};

/// An [`ExperimentObserver`] that aggregates the telemetry at the end of the
/// run and hands every report to a [`ReportWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `experiment.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct ReportObserver<W: ReportWriter> {
    writer:     W,
    started:    SystemTime,
    report:     Option<RunReport>,
    last_error: Option<OutputError>,
}

impl<W: ReportWriter> ReportObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, started: SystemTime::now(), report: None, last_error: None }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// The aggregated telemetry, once the run has ended.
    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn write_all(&mut self, end: &ExperimentReport<'_>, run: &RunReport) -> OutputResult<()> {
        for layer in &run.layers {
            self.writer.write_layer(layer)?;
        }
        let record = OverallRecord::new(
            end.config,
            end.dims,
            self.started,
            SystemTime::now(),
            end.large_flows,
            end.short_flows,
            run,
        );
        self.writer.write_overall(&record)?;
        self.writer.write_locality(end.counters)?;
        self.writer.finish()
    }
}

impl<W: ReportWriter> ExperimentObserver for ReportObserver<W> {
    fn on_experiment_start(&mut self, _config: &ExperimentConfig, _dims: &FatTreeDims) {
        self.started = SystemTime::now();
    }

    fn on_hotspots(&mut self, layer: Layer, nodes: &[NodeIndex]) {
        info!(layer = layer.name(), nodes = ?nodes, "hotspot nodes");
    }

    fn on_experiment_end(&mut self, end: &ExperimentReport<'_>) {
        let aggregator = ReportAggregator::new(*end.dims, end.store.horizon());
        let run = aggregator.aggregate(end.store);
        let result = self.write_all(end, &run);
        self.store_err(result);
        self.report = Some(run);
    }
}
