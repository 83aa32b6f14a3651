//! Transport installation seam and the shared flow launcher.
//!
//! The transport itself is external.  [`FlowInstaller`] is all this crate
//! needs from it: install a flow described by a [`FlowSpec`] and set its
//! start and stop offsets through the returned [`FlowHandle`].
//!
//! [`FlowLauncher`] is the part shared by large-flow promotion and the
//! arrival process: resolve addresses, classify locality, pick the
//! duplicate-ack threshold, allocate the per-source flow id, install, and
//! count the flow.

use std::net::Ipv4Addr;

use rustc_hash::FxHashMap;
use tracing::debug;

use ft_core::{FlowId, FlowKind, HostIndex, SimTime};
use ft_fabric::AddressBook;

use crate::connection::Connection;
use crate::locality::{DupAckPolicy, FlowCounters, LocalityClassifier, LocalityTier};
use crate::{TrafficError, TrafficResult};

// ── FlowSpec ──────────────────────────────────────────────────────────────────

/// Everything the transport needs to install one flow.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowSpec {
    pub source:            HostIndex,
    pub destination:       HostIndex,
    pub destination_addr:  Ipv4Addr,
    /// Sinks listen on `destination index + 1`.
    pub destination_port:  u16,
    /// 0 means unlimited.
    pub size_bytes:        u64,
    /// Sequential per source host.
    pub flow_id:           FlowId,
    pub dup_ack_threshold: u32,
    pub kind:              FlowKind,
    /// Simulated time at which the flow was installed; handle offsets are
    /// relative to it.
    pub installed_at:      SimTime,
}

// ── Transport seam ────────────────────────────────────────────────────────────

/// Control over one installed flow.
pub trait FlowHandle {
    fn start_after(&mut self, delay: SimTime);
    fn stop_after(&mut self, delay: SimTime);
}

/// Transport flow installation.
pub trait FlowInstaller {
    type Handle<'a>: FlowHandle
    where
        Self: 'a;

    fn install_flow(&mut self, spec: &FlowSpec) -> Self::Handle<'_>;
}

// ── FlowIdAllocator ───────────────────────────────────────────────────────────

/// Per-source sequential flow ids, shared by large and short flows.
#[derive(Default, Debug)]
pub struct FlowIdAllocator {
    next: FxHashMap<HostIndex, u32>,
}

impl FlowIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, source: HostIndex) -> FlowId {
        let slot = self.next.entry(source).or_insert(0);
        let id = FlowId(*slot);
        *slot += 1;
        id
    }

    /// Flows allocated so far for `source`.
    pub fn count(&self, source: HostIndex) -> u32 {
        self.next.get(&source).copied().unwrap_or(0)
    }
}

// ── FlowLauncher ──────────────────────────────────────────────────────────────

/// Installs flows and keeps the locality histograms.
pub struct FlowLauncher {
    classifier: LocalityClassifier,
    dup_ack:    DupAckPolicy,
    ids:        FlowIdAllocator,
    counters:   FlowCounters,
}

impl FlowLauncher {
    pub fn new(classifier: LocalityClassifier, dup_ack: DupAckPolicy) -> Self {
        Self { classifier, dup_ack, ids: FlowIdAllocator::new(), counters: FlowCounters::new() }
    }

    pub fn counters(&self) -> &FlowCounters {
        &self.counters
    }

    pub fn classifier(&self) -> &LocalityClassifier {
        &self.classifier
    }

    pub fn dup_ack(&self) -> &DupAckPolicy {
        &self.dup_ack
    }

    pub fn flow_ids(&self) -> &FlowIdAllocator {
        &self.ids
    }

    /// Install one flow over `conn` that starts immediately and stops
    /// `stop_after` later.
    #[allow(clippy::too_many_arguments)]
    pub fn launch<I, A>(
        &mut self,
        installer: &mut I,
        addrs: &A,
        conn: &Connection,
        kind: FlowKind,
        size_bytes: u64,
        now: SimTime,
        stop_after: SimTime,
    ) -> TrafficResult<FlowSpec>
    where
        I: FlowInstaller,
        A: AddressBook,
    {
        let src_addr = addrs.local_address(conn.source)?;
        let dst_addr = addrs.local_address(conn.destination)?;
        let tier: LocalityTier = self.classifier.classify(src_addr, dst_addr);
        let destination_port = u16::try_from(conn.destination.0 + 1)
            .map_err(|_| TrafficError::PortOutOfRange(conn.destination))?;

        let spec = FlowSpec {
            source:            conn.source,
            destination:       conn.destination,
            destination_addr:  dst_addr,
            destination_port,
            size_bytes,
            flow_id:           self.ids.next(conn.source),
            dup_ack_threshold: self.dup_ack.threshold(src_addr, dst_addr),
            kind,
            installed_at:      now,
        };

        let mut handle = installer.install_flow(&spec);
        handle.start_after(SimTime::ZERO);
        handle.stop_after(stop_after);
        self.counters.record(tier, kind);

        debug!(
            kind = kind.name(),
            src = conn.source.0,
            dst = conn.destination.0,
            bytes = size_bytes,
            dup_ack = spec.dup_ack_threshold,
            ?tier,
            %now,
            "flow installed"
        );
        Ok(spec)
    }
}
