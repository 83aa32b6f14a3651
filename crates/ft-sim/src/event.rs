//! Events dispatched by the experiment loop.

/// One scheduled action.  Same-time events run in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Fire the short-flow arrival process.
    ShortFlowArrival,
    /// Harvest one telemetry bucket.
    TelemetrySample,
    /// One-shot hotspot injection.
    InjectHotspots,
    /// Periodic progress report.
    Progress,
}
