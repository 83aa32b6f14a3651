//! Experiment configuration.
//!
//! Loaded from JSON by the driver (every field has a default, so a partial
//! file is fine) and then checked once with [`ExperimentConfig::validate`].
//! Defaults reproduce the reference experiment: a radix-8 fat-tree at
//! 100 Mbps, 20 simulated seconds of MMPTCP short flows arriving at
//! λ = 256/s over a permutation matrix with a third of the connections
//! carrying long-lived flows.

use serde::{Deserialize, Serialize};

use crate::{FatTreeDims, FtError, FtResult, Layer, SimTime, SocketKind, TrafficPattern};

// ── ExperimentConfig ──────────────────────────────────────────────────────────

/// Top-level experiment configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Free-form run name; first component of every output file name.
    pub sim_name: String,

    /// Topology label written into output file names (e.g. `"FT"`).
    pub topology: String,

    /// Instance label; last component of every output file name.
    pub instance: String,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Simulation horizon in whole seconds.  Also the number of telemetry
    /// buckets per layer.
    pub sim_time_secs: u64,

    /// Switch radix `K`.
    pub radix: u32,

    /// Host oversubscription ratio (hosts per ToR = K/2 * ratio).
    pub ratio: u32,

    /// Point-to-point link rate in bits per second.
    pub link_rate_bps: u64,

    /// Point-to-point link delay in microseconds; reported in the run
    /// header.
    pub link_delay_us: u32,

    /// Default outbound queue capacity of every device, in packets.
    pub default_queue_capacity: u32,

    /// Transport segment size; empirical-CDF sizes are in segments.
    pub segment_size_bytes: u32,

    pub socket: SocketKind,

    /// Top-level traffic pattern.  `SHORT_FLOW` mixes long-lived flows with
    /// the short-flow arrival process; any other pattern runs long-lived
    /// flows only.
    pub traffic_matrix: TrafficPattern,

    /// Pattern of the matrix feeding the short-flow arrival process.
    /// `INCAST` switches the arrival process to synchronized bursts.
    pub short_flow_matrix: TrafficPattern,

    /// Share of the matrix promoted to long-lived flows in mixed runs, in
    /// percent.
    pub large_flow_percent: u32,

    /// Byte budget of a long-lived flow; 0 means unlimited.
    pub large_flow_bytes: u64,

    pub arrival: ArrivalConfig,
    pub flow_size: FlowSizeConfig,
    pub dup_ack: DupAckConfig,
    pub hotspot: HotspotConfig,

    /// Layers harvested by the telemetry sampler.
    pub sampled_layers: Vec<Layer>,

    /// Period of the progress monitor in seconds; 0 disables it.
    pub progress_interval_secs: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sim_name:               "S0".into(),
            topology:               "FT".into(),
            instance:               "0".into(),
            seed:                   0,
            sim_time_secs:          20,
            radix:                  8,
            ratio:                  1,
            link_rate_bps:          100_000_000,
            link_delay_us:          20,
            default_queue_capacity: 100,
            segment_size_bytes:     1400,
            socket:                 SocketKind::Mmptcp,
            traffic_matrix:         TrafficPattern::ShortFlow,
            short_flow_matrix:      TrafficPattern::Permutation,
            large_flow_percent:     33,
            large_flow_bytes:       0,
            arrival:                ArrivalConfig::default(),
            flow_size:              FlowSizeConfig::default(),
            dup_ack:                DupAckConfig::default(),
            hotspot:                HotspotConfig::default(),
            sampled_layers:         Layer::ALL.to_vec(),
            progress_interval_secs: 0.1,
        }
    }
}

impl ExperimentConfig {
    /// Check every numeric bound.  Any failure is fatal for the run.
    pub fn validate(&self) -> FtResult<()> {
        self.dims()?;
        if self.sim_time_secs == 0 {
            return Err(FtError::Config("sim_time_secs must be >= 1".into()));
        }
        if self.link_rate_bps == 0 {
            return Err(FtError::Config("link_rate_bps must be > 0".into()));
        }
        if self.segment_size_bytes == 0 {
            return Err(FtError::Config("segment_size_bytes must be > 0".into()));
        }
        if self.large_flow_percent > 100 {
            return Err(FtError::Config(format!(
                "large_flow_percent must be <= 100, got {}",
                self.large_flow_percent
            )));
        }
        if !self.progress_interval_secs.is_finite() || self.progress_interval_secs < 0.0 {
            return Err(FtError::Config("progress_interval_secs must be >= 0".into()));
        }
        for (i, layer) in self.sampled_layers.iter().enumerate() {
            if self.sampled_layers[..i].contains(layer) {
                return Err(FtError::Config(format!("sampled layer {} is listed twice", layer.name())));
            }
        }
        self.arrival.validate()?;
        self.flow_size.validate()?;
        self.hotspot.validate()
    }

    /// Topology sizing for this run.
    pub fn dims(&self) -> FtResult<FatTreeDims> {
        FatTreeDims::new(self.radix, self.ratio)
    }

    /// The horizon as a timestamp.
    #[inline]
    pub fn horizon(&self) -> SimTime {
        SimTime::from_secs(self.sim_time_secs)
    }

    /// `true` when the short-flow arrival process runs at all.
    #[inline]
    pub fn generates_short_flows(&self) -> bool {
        self.traffic_matrix == TrafficPattern::ShortFlow
    }

    /// `true` when short flows arrive as synchronized incast bursts.
    #[inline]
    pub fn is_incast(&self) -> bool {
        self.generates_short_flows() && self.short_flow_matrix == TrafficPattern::Incast
    }

    /// Duplicate-ack threshold reported in the run header: the static
    /// threshold plus the three duplicate acks every transport waits for.
    #[inline]
    pub fn reported_dup_ack_threshold(&self) -> u32 {
        self.dup_ack.static_threshold + 3
    }
}

// ── ArrivalConfig ─────────────────────────────────────────────────────────────

/// Short-flow arrival process parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Poisson rate λ (arrivals per simulated second).
    pub lambda: f64,

    /// No new arrival is scheduled within this many seconds of the horizon.
    pub upper_bound_secs: f64,

    /// Time of the first arrival (and of hotspot injection).
    pub start_time_secs: f64,

    /// Period between incast bursts.
    pub incast_heartbeat_secs: f64,

    /// Byte size of every flow in an incast burst.
    pub incast_flow_bytes: u64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            lambda:                256.0,
            upper_bound_secs:      0.2,
            start_time_secs:       0.0,
            incast_heartbeat_secs: 0.5,
            incast_flow_bytes:     70_000,
        }
    }
}

impl ArrivalConfig {
    fn validate(&self) -> FtResult<()> {
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Err(FtError::Config(format!("arrival lambda must be > 0, got {}", self.lambda)));
        }
        if !(self.incast_heartbeat_secs.is_finite() && self.incast_heartbeat_secs > 0.0) {
            return Err(FtError::Config("incast heartbeat must be > 0".into()));
        }
        if !(self.upper_bound_secs.is_finite() && self.upper_bound_secs >= 0.0) {
            return Err(FtError::Config("arrival upper bound must be >= 0".into()));
        }
        if !(self.start_time_secs.is_finite() && self.start_time_secs >= 0.0) {
            return Err(FtError::Config("short-flow start time must be >= 0".into()));
        }
        Ok(())
    }
}

// ── FlowSizeConfig ────────────────────────────────────────────────────────────

/// How single-arrival short flows are sized.  Exactly one mode is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowSizeMode {
    /// Uniform whole-KiB sizes; the range depends on the socket kind.
    #[default]
    Uniform,
    /// Inverse-transform sampling of the empirical flow-size CDF.
    EmpiricalCdf,
    /// Every flow carries the same number of bytes.
    Fixed { bytes: u64 },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSizeConfig {
    pub mode: FlowSizeMode,

    /// Upper bound of the narrow uniform range, in bytes.
    pub threshold_bytes: u64,

    /// Lower bound of the wide uniform range, in bytes.
    pub wide_lower_bytes: u64,

    /// Upper bound of the wide uniform range, in bytes.
    pub wide_upper_bytes: u64,
}

impl Default for FlowSizeConfig {
    fn default() -> Self {
        Self {
            mode:             FlowSizeMode::Uniform,
            threshold_bytes:  100_000,
            wide_lower_bytes: 1024,
            wide_upper_bytes: 1024 * 1024,
        }
    }
}

impl FlowSizeConfig {
    fn validate(&self) -> FtResult<()> {
        if self.threshold_bytes < 1024 {
            return Err(FtError::Config(format!(
                "flow size threshold must be at least 1024 bytes, got {}",
                self.threshold_bytes
            )));
        }
        if self.wide_lower_bytes < 1024 || self.wide_lower_bytes > self.wide_upper_bytes {
            return Err(FtError::Config(format!(
                "wide flow size range [{}, {}] is invalid",
                self.wide_lower_bytes, self.wide_upper_bytes
            )));
        }
        if let FlowSizeMode::Fixed { bytes: 0 } = self.mode {
            return Err(FtError::Config("fixed flow size must be > 0".into()));
        }
        Ok(())
    }
}

// ── DupAckConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DupAckConfig {
    /// Derive each flow's threshold from its locality tier when the socket
    /// kind supports it.
    pub auto: bool,

    /// Threshold used when automatic tuning does not apply.
    pub static_threshold: u32,
}

impl Default for DupAckConfig {
    fn default() -> Self {
        Self { auto: true, static_threshold: 0 }
    }
}

// ── HotspotConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HotspotConfig {
    pub enabled: bool,
    pub layer: Layer,
    /// Share of the layer's nodes to under-provision, in percent.
    pub ratio_percent: u32,
    /// Outbound queue capacity set on every link of a hotspot node, in
    /// packets.
    pub queue_capacity: u32,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            enabled:        false,
            layer:          Layer::Core,
            ratio_percent:  15,
            queue_capacity: 50,
        }
    }
}

impl HotspotConfig {
    fn validate(&self) -> FtResult<()> {
        if self.ratio_percent > 100 {
            return Err(FtError::Config(format!(
                "hotspot ratio must be <= 100%, got {}%",
                self.ratio_percent
            )));
        }
        Ok(())
    }
}
