//! Locality classification of host pairs and the per-tier flow histograms.
//!
//! Host addresses are `10.<pod>.<tor>.<n>`, so octets 1 and 2 identify the
//! rack and octet 1 alone identifies the pod.

use std::io::{self, Write};
use std::net::Ipv4Addr;

use ft_core::{FatTreeDims, FlowKind, SocketKind};

// ── LocalityTier ──────────────────────────────────────────────────────────────

/// Topological distance between two hosts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalityTier {
    SameRack,
    SamePod,
    CrossPod,
}

impl LocalityTier {
    pub const ALL: [LocalityTier; 3] = [LocalityTier::SameRack, LocalityTier::SamePod, LocalityTier::CrossPod];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// ── LocalityClassifier ────────────────────────────────────────────────────────

/// Classifies address pairs and derives the retransmit threshold per tier.
#[derive(Copy, Clone, Debug)]
pub struct LocalityClassifier {
    aggr_per_pod: u32,
    total_core:   u32,
}

impl LocalityClassifier {
    pub fn new(dims: &FatTreeDims) -> Self {
        Self { aggr_per_pod: dims.aggr_per_pod(), total_core: dims.total_core() }
    }

    pub fn classify(&self, src: Ipv4Addr, dst: Ipv4Addr) -> LocalityTier {
        let (s, d) = (src.octets(), dst.octets());
        if s[1] == d[1] && s[2] == d[2] {
            LocalityTier::SameRack
        } else if s[1] == d[1] {
            LocalityTier::SamePod
        } else {
            LocalityTier::CrossPod
        }
    }

    /// Number of equal-cost paths a flow between `src` and `dst` can spray
    /// over: none within a rack, one per aggregation switch within a pod,
    /// one per core switch across pods.
    pub fn retx_threshold(&self, src: Ipv4Addr, dst: Ipv4Addr) -> u32 {
        match self.classify(src, dst) {
            LocalityTier::SameRack => 0,
            LocalityTier::SamePod => self.aggr_per_pod,
            LocalityTier::CrossPod => self.total_core,
        }
    }
}

// ── DupAckPolicy ──────────────────────────────────────────────────────────────

/// Duplicate-ack threshold assigned to each new flow.
#[derive(Copy, Clone, Debug)]
pub struct DupAckPolicy {
    classifier:       LocalityClassifier,
    auto:             bool,
    static_threshold: u32,
}

impl DupAckPolicy {
    /// Automatic tuning only applies to socket kinds that spread one flow
    /// over several paths.
    pub fn new(classifier: LocalityClassifier, socket: SocketKind, auto: bool, static_threshold: u32) -> Self {
        Self { classifier, auto: auto && socket.supports_auto_dup_ack(), static_threshold }
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn threshold(&self, src: Ipv4Addr, dst: Ipv4Addr) -> u32 {
        if self.auto { self.classifier.retx_threshold(src, dst) } else { self.static_threshold }
    }
}

// ── FlowCounters ──────────────────────────────────────────────────────────────

/// Flow counts per locality tier, split by kind.  Never reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowCounters {
    short: [u64; 3],
    large: [u64; 3],
    all:   [u64; 3],
}

impl FlowCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tier: LocalityTier, kind: FlowKind) {
        let i = tier.index();
        match kind {
            FlowKind::Short => self.short[i] += 1,
            FlowKind::Large => self.large[i] += 1,
        }
        self.all[i] += 1;
    }

    pub fn short(&self) -> [u64; 3] {
        self.short
    }

    pub fn large(&self) -> [u64; 3] {
        self.large
    }

    pub fn all(&self) -> [u64; 3] {
        self.all
    }

    pub fn total_short(&self) -> u64 {
        self.short.iter().sum()
    }

    pub fn total_large(&self) -> u64 {
        self.large.iter().sum()
    }

    pub fn total(&self) -> u64 {
        self.all.iter().sum()
    }

    /// Write the locality table: one row per kind, one column per tier.
    pub fn write_table<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "FlowType\tTOR\tAggr\tCore")?;
        writeln!(out, "--------\t----\t----\t----")?;
        for (label, row) in [("Large   ", self.large), ("Short   ", self.short), ("All     ", self.all)] {
            writeln!(
                out,
                "{label} \t{:.1} \t{:.1} \t{:.1} ",
                row[0] as f64, row[1] as f64, row[2] as f64
            )?;
        }
        Ok(())
    }
}
