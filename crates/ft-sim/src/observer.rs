//! Experiment observer trait for progress reporting and result collection.

use ft_core::{ExperimentConfig, FatTreeDims, Layer, NodeIndex, SimTime};
use ft_telemetry::TelemetryStore;
use ft_traffic::FlowCounters;

/// Read-only view of a finished experiment.
pub struct ExperimentReport<'a> {
    pub config:      &'a ExperimentConfig,
    pub dims:        &'a FatTreeDims,
    pub store:       &'a TelemetryStore,
    pub counters:    &'a FlowCounters,
    /// Connections promoted to long-lived flows.
    pub large_flows: usize,
    /// Short flows launched by the arrival process.
    pub short_flows: u64,
}

/// Callbacks invoked by [`Experiment::run`][crate::Experiment::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait ExperimentObserver {
    /// Called once before the first event is dispatched.
    fn on_experiment_start(&mut self, _config: &ExperimentConfig, _dims: &FatTreeDims) {}

    /// Called on every progress event.
    fn on_progress(&mut self, _now: SimTime) {}

    /// Called after hotspot injection with the chosen nodes.
    fn on_hotspots(&mut self, _layer: Layer, _nodes: &[NodeIndex]) {}

    /// Called once after the last event.
    fn on_experiment_end(&mut self, _report: &ExperimentReport<'_>) {}
}

/// An [`ExperimentObserver`] that does nothing.
pub struct NoopObserver;

impl ExperimentObserver for NoopObserver {}
