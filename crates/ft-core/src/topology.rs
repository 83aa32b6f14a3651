//! Fat-tree sizing derived from the switch radix.
//!
//! # Invariant group
//!
//! Every count in [`FatTreeDims`] is a function of the radix `K` and the
//! oversubscription `ratio`:
//!
//! ```text
//! pods            = K
//! tor_per_pod     = K/2
//! aggr_per_pod    = K/2
//! core_groups     = K/2
//! core_per_group  = K/2
//! hosts_per_tor   = K/2 * ratio
//! total_host      = K³/4 * ratio
//! total_tor       = tor_per_pod  * pods
//! total_aggr      = aggr_per_pod * pods
//! total_core      = core_per_group * core_groups
//! ```
//!
//! The fields are private and only written by [`FatTreeDims::recompute`], so a
//! stale total after changing `K` cannot be expressed.
//!
//! Hosts are addressed `10.<pod>.<tor>.<4·slot + 1>` and listen on port
//! `host + 1`, which bounds the pod count, the hosts per ToR and the host
//! total.  [`FatTreeDims::new`] rejects anything outside those bounds.

use crate::{FtError, FtResult, HostIndex, Layer};

/// The pod number is one address octet.
pub const MAX_PODS: u32 = 255;

/// `4·slot + 1` must fit the last address octet.
pub const MAX_HOSTS_PER_TOR: u32 = 63;

/// Every host's port `host + 1` must fit a `u16`.
pub const MAX_TOTAL_HOST: u32 = u16::MAX as u32 - 1;

/// Radix-derived fat-tree dimensions.  Cheap to copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FatTreeDims {
    radix:          u32,
    ratio:          u32,
    pods:           u32,
    tor_per_pod:    u32,
    aggr_per_pod:   u32,
    core_groups:    u32,
    core_per_group: u32,
    hosts_per_tor:  u32,
    total_host:     u32,
    total_tor:      u32,
    total_aggr:     u32,
    total_core:     u32,
}

impl FatTreeDims {
    /// Build dimensions for radix `radix` (even, ≥ 2) and host
    /// oversubscription `ratio` (≥ 1).
    pub fn new(radix: u32, ratio: u32) -> FtResult<Self> {
        Self::check(radix, ratio)?;
        let mut dims = FatTreeDims {
            radix,
            ratio,
            pods: 0,
            tor_per_pod: 0,
            aggr_per_pod: 0,
            core_groups: 0,
            core_per_group: 0,
            hosts_per_tor: 0,
            total_host: 0,
            total_tor: 0,
            total_aggr: 0,
            total_core: 0,
        };
        dims.recompute();
        Ok(dims)
    }

    /// Change the radix; every derived total is recomputed.
    pub fn set_radix(&mut self, radix: u32) -> FtResult<()> {
        Self::check(radix, self.ratio)?;
        self.radix = radix;
        self.recompute();
        Ok(())
    }

    /// Change the oversubscription ratio; every derived total is recomputed.
    pub fn set_ratio(&mut self, ratio: u32) -> FtResult<()> {
        Self::check(self.radix, ratio)?;
        self.ratio = ratio;
        self.recompute();
        Ok(())
    }

    fn check(radix: u32, ratio: u32) -> FtResult<()> {
        if radix < 2 || radix % 2 != 0 {
            return Err(FtError::Config(format!("switch radix must be even and >= 2, got {radix}")));
        }
        if ratio == 0 {
            return Err(FtError::Config("oversubscription ratio must be >= 1".into()));
        }
        if radix > MAX_PODS {
            return Err(FtError::Config(format!("switch radix must be <= {MAX_PODS}, got {radix}")));
        }
        let hosts_per_tor = (radix / 2).checked_mul(ratio).filter(|&h| h <= MAX_HOSTS_PER_TOR);
        if hosts_per_tor.is_none() {
            return Err(FtError::Config(format!(
                "radix {radix} with ratio {ratio} puts more than {MAX_HOSTS_PER_TOR} hosts on a ToR"
            )));
        }
        let total_host = u64::from(radix).pow(3) / 4 * u64::from(ratio);
        if total_host > u64::from(MAX_TOTAL_HOST) {
            return Err(FtError::Config(format!(
                "radix {radix} with ratio {ratio} gives {total_host} hosts, more than {MAX_TOTAL_HOST}"
            )));
        }
        Ok(())
    }

    // Only called after `check`, so no product overflows.
    fn recompute(&mut self) {
        let k = self.radix;
        let half = k / 2;
        self.pods           = k;
        self.tor_per_pod    = half;
        self.aggr_per_pod   = half;
        self.core_groups    = half;
        self.core_per_group = half;
        self.hosts_per_tor  = half * self.ratio;
        self.total_host     = (k * k * k / 4) * self.ratio;
        self.total_tor      = self.tor_per_pod * self.pods;
        self.total_aggr     = self.aggr_per_pod * self.pods;
        self.total_core     = self.core_per_group * self.core_groups;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn radix(&self) -> u32 { self.radix }
    pub fn ratio(&self) -> u32 { self.ratio }
    pub fn pods(&self) -> u32 { self.pods }
    pub fn tor_per_pod(&self) -> u32 { self.tor_per_pod }
    pub fn aggr_per_pod(&self) -> u32 { self.aggr_per_pod }
    pub fn core_groups(&self) -> u32 { self.core_groups }
    pub fn core_per_group(&self) -> u32 { self.core_per_group }
    pub fn hosts_per_tor(&self) -> u32 { self.hosts_per_tor }
    pub fn total_host(&self) -> u32 { self.total_host }
    pub fn total_tor(&self) -> u32 { self.total_tor }
    pub fn total_aggr(&self) -> u32 { self.total_aggr }
    pub fn total_core(&self) -> u32 { self.total_core }

    // ── Per-layer views ───────────────────────────────────────────────────

    /// Number of nodes in `layer`.
    pub fn node_count(&self, layer: Layer) -> usize {
        (match layer {
            Layer::Core => self.total_core,
            Layer::Aggr => self.total_aggr,
            Layer::Tor  => self.total_tor,
            Layer::Host => self.total_host,
        }) as usize
    }

    /// Links per node in `layer`, excluding the loopback device.
    pub fn devices_per_node(&self, layer: Layer) -> usize {
        (match layer {
            // one downlink per pod
            Layer::Core => self.pods,
            Layer::Aggr => self.tor_per_pod + self.core_per_group,
            Layer::Tor  => self.hosts_per_tor + self.aggr_per_pod,
            Layer::Host => 1,
        }) as usize
    }

    /// `(pod, tor-in-pod, slot-on-tor)` of a host.  Hosts are numbered
    /// pod-major, then by ToR, then by slot.
    pub fn host_position(&self, host: HostIndex) -> (u32, u32, u32) {
        let per_pod = self.tor_per_pod * self.hosts_per_tor;
        let pod = host.0 / per_pod;
        let rem = host.0 % per_pod;
        (pod, rem / self.hosts_per_tor, rem % self.hosts_per_tor)
    }
}
