//! Fluent builder for constructing an [`Experiment`].

use tracing::info;

use ft_core::{ExperimentConfig, SimRng};
use ft_fabric::FabricBuilder;
use ft_schedule::VirtualScheduler;
use ft_telemetry::{TelemetrySampler, TelemetryStore};
use ft_traffic::{
    ArrivalMode, ArrivalProcess, Connection, DupAckPolicy, FlowLauncher, FlowSizeCdf, FlowSizeModel,
    HotspotInjector, LocalityClassifier, ShortFlowPool, TrafficError, promote_large_flows, promotion_count,
};

use crate::{Experiment, SimResult, Transport};

/// Child-stream offsets of the root RNG.
const PROMOTION_STREAM: u64 = 1;
const ARRIVAL_STREAM: u64 = 2;
const HOTSPOT_STREAM: u64 = 3;

/// Fluent builder for [`Experiment<T>`].
///
/// # Required inputs
///
/// - [`ExperimentConfig`], validated in [`build`][Self::build]
/// - `T: Transport`, where flows are installed
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                         |
/// |-----------------------|---------------------------------|
/// | `.connections(v)`     | empty matrix                    |
/// | `.flow_size_cdf(c)`   | the built-in web-search table   |
///
/// # Example
///
/// ```rust,ignore
/// let matrix = load_connections_csv(path, dims.total_host())?;
/// let mut exp = ExperimentBuilder::new(config, LedgerTransport::new(rate))
///     .connections(matrix)
///     .build()?;
/// exp.run(&mut NoopObserver)?;
/// ```
pub struct ExperimentBuilder<T: Transport> {
    config:      ExperimentConfig,
    transport:   T,
    connections: Vec<Connection>,
    cdf:         Option<FlowSizeCdf>,
}

impl<T: Transport> ExperimentBuilder<T> {
    pub fn new(config: ExperimentConfig, transport: T) -> Self {
        Self { config, transport, connections: Vec::new(), cdf: None }
    }

    /// Supply the externally generated connection matrix.
    pub fn connections(mut self, connections: Vec<Connection>) -> Self {
        self.connections = connections;
        self
    }

    /// Replace the empirical flow-size table.
    pub fn flow_size_cdf(mut self, cdf: FlowSizeCdf) -> Self {
        self.cdf = Some(cdf);
        self
    }

    /// Validate the configuration, build the fabric, promote large flows and
    /// prepare the arrival process, sampler and hotspot injector.
    pub fn build(self) -> SimResult<Experiment<T>> {
        let config = self.config;
        config.validate()?;
        let dims = config.dims()?;
        let horizon = config.horizon();

        // ── Validate the matrix against the fabric ────────────────────────
        let total = dims.total_host();
        for (index, c) in self.connections.iter().enumerate() {
            for host in [c.source, c.destination] {
                if host.0 >= total {
                    return Err(TrafficError::HostOutOfRange { index, host, total }.into());
                }
            }
        }

        let fabric = FabricBuilder::new(dims).queue_capacity(config.default_queue_capacity).build();
        let mut root = SimRng::new(config.seed);
        let mut promotion_rng = root.child(PROMOTION_STREAM);
        let arrival_rng = root.child(ARRIVAL_STREAM);
        let hotspot_rng = root.child(HOTSPOT_STREAM);

        let classifier = LocalityClassifier::new(&dims);
        let dup_ack =
            DupAckPolicy::new(classifier, config.socket, config.dup_ack.auto, config.dup_ack.static_threshold);
        let mut launcher = FlowLauncher::new(classifier, dup_ack);

        // ── Large-flow promotion ──────────────────────────────────────────
        let mut matrix = self.connections;
        let mut transport = self.transport;
        let count = promotion_count(
            matrix.len(),
            config.traffic_matrix,
            config.short_flow_matrix,
            config.large_flow_percent,
        );
        let promoted = promote_large_flows(
            &mut matrix,
            count,
            config.large_flow_bytes,
            horizon,
            &mut promotion_rng,
            &mut launcher,
            &mut transport,
            &fabric,
        )?;

        // ── Short-flow arrival process ────────────────────────────────────
        let arrival = if config.generates_short_flows() {
            let pool = ShortFlowPool::from_matrix(&matrix)?;
            let mut sizes = FlowSizeModel::new(&config.flow_size, config.socket, config.segment_size_bytes)?;
            if let Some(cdf) = self.cdf {
                sizes = sizes.with_cdf(cdf);
            }
            let mode = if config.is_incast() { ArrivalMode::Incast } else { ArrivalMode::Single };
            Some(ArrivalProcess::new(pool, sizes, mode, &config.arrival, horizon)?)
        } else {
            None
        };

        let hotspot = if config.hotspot.enabled { Some(HotspotInjector::from_config(&config.hotspot)?) } else { None };

        let sampler = TelemetrySampler::new(config.sampled_layers.clone(), config.link_rate_bps, horizon)?;
        let store = TelemetryStore::new(config.sim_time_secs as u32);

        info!(
            radix = dims.radix(),
            hosts = dims.total_host(),
            matrix = matrix.len(),
            large = promoted.len(),
            short_flows = arrival.is_some(),
            hotspots = hotspot.is_some(),
            "experiment built"
        );

        Ok(Experiment {
            config,
            dims,
            fabric,
            scheduler: VirtualScheduler::new(),
            transport,
            launcher,
            matrix,
            promoted,
            arrival,
            arrival_rng,
            sampler,
            store,
            hotspot,
            hotspot_rng,
            hotspots: Vec::new(),
            ran: false,
        })
    }
}
