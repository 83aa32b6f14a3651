//! The overall-file record and its three text blocks.

use std::time::SystemTime;

use ft_core::{ExperimentConfig, FatTreeDims, Layer};

use crate::aggregate::{LayerSummary, RunReport};

/// Everything the overall file reports about one run.
#[derive(Clone, Debug)]
pub struct OverallRecord<'a> {
    pub config:      &'a ExperimentConfig,
    pub dims:        &'a FatTreeDims,
    pub started:     SystemTime,
    pub ended:       SystemTime,
    pub large_flows: usize,
    pub short_flows: u64,
    /// In [`Layer::ALL`] order.
    pub means:       [LayerSummary; 4],
}

impl<'a> OverallRecord<'a> {
    pub fn new(
        config: &'a ExperimentConfig,
        dims: &'a FatTreeDims,
        started: SystemTime,
        ended: SystemTime,
        large_flows: usize,
        short_flows: u64,
        report: &RunReport,
    ) -> Self {
        Self {
            config,
            dims,
            started,
            ended,
            large_flows,
            short_flows,
            means: Layer::ALL.map(|layer| report.summary(layer)),
        }
    }

    pub fn all_flows(&self) -> u64 {
        self.large_flows as u64 + self.short_flows
    }

    pub fn mean(&self, layer: Layer) -> LayerSummary {
        self.means[layer.index()]
    }

    /// Run metadata, one line.
    pub fn header_line(&self) -> String {
        let c = self.config;
        format!(
            "SimStart [{}] simName[{}] Topology[{}] TotalHost[{}] SocketType[{}] bwRatio[1:{}] \
             TrafficMatrix[{}] FlowSizeThresh[{}] ShortFlowTM[{}] BackgroundFlowLimit[{}] Seed[{}] \
             simInstance[{}] Lamda[{}] SimPeriod[{}s] HostPerToR[{}] FlowSize[{}] ShortFlowSize[{}] \
             LinkRate[{}] LinkDelay[{}us] AutoDupAck[{}] DupAckThresh[{}] isHotspot[{}]",
            humantime::format_rfc3339_seconds(self.started),
            c.sim_name,
            c.topology,
            self.dims.total_host(),
            c.socket.name(),
            c.ratio,
            c.traffic_matrix.name(),
            c.flow_size.threshold_bytes,
            c.short_flow_matrix.name(),
            c.large_flow_percent,
            c.seed,
            c.instance,
            c.arrival.lambda,
            c.sim_time_secs,
            self.dims.hosts_per_tor(),
            c.large_flow_bytes,
            c.arrival.incast_flow_bytes,
            link_rate_label(c.link_rate_bps),
            c.link_delay_us,
            on_off(c.dup_ack.auto),
            c.reported_dup_ack_threshold(),
            on_off(c.hotspot.enabled),
        )
    }

    /// The eight bracket-tagged means, one per line.
    pub fn mean_lines(&self) -> [String; 8] {
        let [core, aggr, tor, host] = self.means;
        [
            format!("CoreUtil [!{}!]", core.mean_utilization),
            format!("CoreLoss [@{}@]", core.mean_loss),
            format!("AggrUtil [#{}#]", aggr.mean_utilization),
            format!("AggrLoss [${}$]", aggr.mean_loss),
            format!("TorUtil [%{}%]", tor.mean_utilization),
            format!("TorLoss [^{}^]", tor.mean_loss),
            format!("HostUtil [&{}&]", host.mean_utilization),
            format!("HostLoss [*{}*]", host.mean_loss),
        ]
    }

    /// End stamp, flow counts and the switch-layer means.
    pub fn footer_line(&self) -> String {
        let (core, aggr) = (self.mean(Layer::Core), self.mean(Layer::Aggr));
        format!(
            "SimEnd [{}] AllFlows[{}] LargeFlow[{}] ShortFlows[{}]  CoreUtil[{}] CoreLoss[{}] AggrUtil[{}] AggrLoss[{}]",
            humantime::format_rfc3339_seconds(self.ended),
            self.all_flows(),
            self.large_flows,
            self.short_flows,
            core.mean_utilization,
            core.mean_loss,
            aggr.mean_utilization,
            aggr.mean_loss,
        )
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}

/// `100Mbps` for whole megabits, plain `bps` otherwise.
pub fn link_rate_label(bps: u64) -> String {
    if bps % 1_000_000 == 0 { format!("{}Mbps", bps / 1_000_000) } else { format!("{bps}bps") }
}
