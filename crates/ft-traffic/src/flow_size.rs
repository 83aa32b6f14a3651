//! Short-flow sizing.
//!
//! Two sampling schemes:
//!
//! - **Uniform**: a whole number of KiB drawn uniformly from a range fixed
//!   for the run.  MMPTCP uses the wide range (`[lower, upper]` KiB); every
//!   other socket kind uses `[1, threshold]` KiB.
//! - **Empirical CDF**: inverse-transform sampling of a piecewise-linear
//!   flow-size CDF expressed in packets, scaled by the segment size.
//!
//! [`FlowSizeModel`] picks between them (or a fixed size) from
//! [`FlowSizeMode`]; the uniform distributions are built once in
//! [`FlowSizeModel::new`].

use rand::distributions::Uniform;

use ft_core::{FlowSizeConfig, FlowSizeMode, SimRng, SocketKind};

use crate::{TrafficError, TrafficResult};

const KIB: u64 = 1024;

// ── FlowSizeCdf ───────────────────────────────────────────────────────────────

/// One `(size, cumulative probability)` point of a flow-size CDF.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CdfPoint {
    /// Flow size in packets.
    pub size_packets: u64,
    pub probability:  f64,
}

/// Piecewise-linear flow-size CDF.  Immutable once built.
#[derive(Clone, Debug)]
pub struct FlowSizeCdf {
    points: Vec<CdfPoint>,
}

/// Web-search flow-size distribution in packets.
const DEFAULT_POINTS: [(u64, f64); 12] = [
    (1, 0.0),
    (1, 0.5),
    (2, 0.6),
    (3, 0.7),
    (5, 0.75),
    (7, 0.8),
    (40, 0.8125),
    (72, 0.825),
    (137, 0.85),
    (267, 0.9),
    (1187, 0.95),
    (2107, 1.0),
];

impl Default for FlowSizeCdf {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS
                .iter()
                .map(|&(size_packets, probability)| CdfPoint { size_packets, probability })
                .collect(),
        }
    }
}

impl FlowSizeCdf {
    /// Build a custom table.
    ///
    /// Requires at least two points, sizes `>= 1` and non-decreasing, and
    /// probabilities in `[0, 1]` and strictly increasing.
    pub fn from_points(points: Vec<CdfPoint>) -> TrafficResult<Self> {
        if points.len() < 2 {
            return Err(TrafficError::InvalidCdf(format!("need at least 2 points, got {}", points.len())));
        }
        for (i, p) in points.iter().enumerate() {
            if p.size_packets == 0 {
                return Err(TrafficError::InvalidCdf(format!("point {i} has size 0")));
            }
            if !(0.0..=1.0).contains(&p.probability) {
                return Err(TrafficError::InvalidCdf(format!(
                    "point {i} has probability {} outside [0, 1]",
                    p.probability
                )));
            }
        }
        for (i, w) in points.windows(2).enumerate() {
            if w[1].size_packets < w[0].size_packets {
                return Err(TrafficError::InvalidCdf(format!("sizes decrease at point {}", i + 1)));
            }
            if w[1].probability <= w[0].probability {
                return Err(TrafficError::InvalidCdf(format!(
                    "probabilities not strictly increasing at point {}",
                    i + 1
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[CdfPoint] {
        &self.points
    }

    /// Flow size in packets for cumulative probability `u`, rounded to the
    /// nearest whole packet.
    pub fn invert(&self, u: f64) -> u64 {
        self.interpolate(u).round().max(1.0) as u64
    }

    /// Unrounded flow size for cumulative probability `u`.
    ///
    /// Finds the nearest point by scanning from the start until the distance
    /// stops shrinking (ties keep the earlier point), then interpolates
    /// linearly towards whichever neighbour brackets `u`.  Past the last
    /// point the last segment is extended, not clamped.  `u == 0` is always
    /// one packet.
    pub fn interpolate(&self, u: f64) -> f64 {
        if u == 0.0 {
            return 1.0;
        }
        let pts = &self.points;

        let mut nearest = 0;
        let mut best = f64::INFINITY;
        for (i, p) in pts.iter().enumerate() {
            let d = (p.probability - u).abs();
            if d < best {
                best = d;
                nearest = i;
            } else {
                break;
            }
        }

        let at = pts[nearest];
        if u == at.probability {
            return at.size_packets as f64;
        }
        // Upper end of the bracketing segment.
        let k = if u < at.probability { nearest } else { nearest + 1 };
        let k = k.clamp(1, pts.len() - 1);
        let (lo, hi) = (pts[k - 1], pts[k]);

        (u - lo.probability) / (hi.probability - lo.probability)
            * (hi.size_packets as f64 - lo.size_packets as f64)
            + lo.size_packets as f64
    }
}

// ── FlowSizeModel ─────────────────────────────────────────────────────────────

/// Per-run short-flow size sampler.
pub struct FlowSizeModel {
    mode:          FlowSizeMode,
    socket:        SocketKind,
    segment_bytes: u64,
    cdf:           FlowSizeCdf,
    /// `[1, threshold]` KiB.
    narrow:        Uniform<u64>,
    /// `[lower, upper]` KiB.
    wide:          Uniform<u64>,
}

impl FlowSizeModel {
    pub fn new(cfg: &FlowSizeConfig, socket: SocketKind, segment_bytes: u32) -> TrafficResult<Self> {
        let narrow_hi = cfg.threshold_bytes / KIB;
        if narrow_hi < 1 {
            return Err(TrafficError::InvalidSizeRange(format!(
                "threshold {} B is below one KiB",
                cfg.threshold_bytes
            )));
        }
        let (wide_lo, wide_hi) = (cfg.wide_lower_bytes / KIB, cfg.wide_upper_bytes / KIB);
        if wide_lo < 1 || wide_lo > wide_hi {
            return Err(TrafficError::InvalidSizeRange(format!(
                "wide range [{}, {}] B",
                cfg.wide_lower_bytes, cfg.wide_upper_bytes
            )));
        }
        Ok(Self {
            mode: cfg.mode,
            socket,
            segment_bytes: u64::from(segment_bytes),
            cdf: FlowSizeCdf::default(),
            narrow: Uniform::new_inclusive(1, narrow_hi),
            wide: Uniform::new_inclusive(wide_lo, wide_hi),
        })
    }

    /// Replace the empirical table.
    pub fn with_cdf(mut self, cdf: FlowSizeCdf) -> Self {
        self.cdf = cdf;
        self
    }

    pub fn mode(&self) -> FlowSizeMode {
        self.mode
    }

    pub fn cdf(&self) -> &FlowSizeCdf {
        &self.cdf
    }

    /// Uniform whole-KiB size in bytes for this run's socket kind.
    pub fn uniform_size(&self, rng: &mut SimRng) -> u64 {
        let dist = if self.socket.uses_wide_size_range() { &self.wide } else { &self.narrow };
        rng.sample(dist) * KIB
    }

    /// Empirical-CDF size in bytes.
    pub fn cdf_size(&self, rng: &mut SimRng) -> u64 {
        self.cdf.invert(rng.unit()) * self.segment_bytes
    }

    /// Size of the next short flow, in bytes.
    pub fn sample(&self, rng: &mut SimRng) -> u64 {
        match self.mode {
            FlowSizeMode::Uniform => self.uniform_size(rng),
            FlowSizeMode::EmpiricalCdf => self.cdf_size(rng),
            FlowSizeMode::Fixed { bytes } => bytes,
        }
    }
}
