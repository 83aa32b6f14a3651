//! The transport seam of the driver and a bookkeeping implementation.
//!
//! [`LedgerTransport`] moves no packets.  Every installed flow sends at the
//! link rate from its start until it has sent its byte budget (0 means
//! until stopped).  On each [`Transport::settle`] the bytes a source offered
//! since the previous settle are charged to its NIC: up to one link's worth
//! as received, the excess as dropped.

use rustc_hash::FxHashMap;

use ft_core::{HostIndex, SimTime};
use ft_fabric::{DeviceCounters, StaticFabric};
use ft_traffic::{FlowHandle, FlowInstaller, FlowSpec};

/// Transport as seen by the experiment loop.
pub trait Transport: FlowInstaller {
    /// Account the traffic of installed flows onto the fabric counters up
    /// to `now`.  Called right before every telemetry sample.
    fn settle(&mut self, _now: SimTime, _fabric: &mut StaticFabric) {}
}

// ── LedgerTransport ───────────────────────────────────────────────────────────

/// One installed flow and how much of it has been sent.
#[derive(Clone, Debug)]
pub struct LedgerFlow {
    pub spec:       FlowSpec,
    pub start:      SimTime,
    pub stop:       SimTime,
    pub sent_bytes: u64,
}

impl LedgerFlow {
    fn finished(&self) -> bool {
        self.spec.size_bytes != 0 && self.sent_bytes >= self.spec.size_bytes
    }
}

pub struct LedgerHandle<'a> {
    flow: &'a mut LedgerFlow,
}

impl FlowHandle for LedgerHandle<'_> {
    fn start_after(&mut self, delay: SimTime) {
        self.flow.start = self.flow.spec.installed_at + delay;
    }

    fn stop_after(&mut self, delay: SimTime) {
        self.flow.stop = self.flow.spec.installed_at + delay;
    }
}

/// Bookkeeping transport that charges flow bytes to source NICs.
pub struct LedgerTransport {
    bytes_per_sec: f64,
    active:        Vec<LedgerFlow>,
    installed:     u64,
    last_settle:   SimTime,
}

impl LedgerTransport {
    pub fn new(link_rate_bps: u64) -> Self {
        Self {
            bytes_per_sec: link_rate_bps as f64 / 8.0,
            active:        Vec::new(),
            installed:     0,
            last_settle:   SimTime::ZERO,
        }
    }

    /// Flows installed since construction.
    pub fn installed(&self) -> u64 {
        self.installed
    }

    /// Flows still sending.
    pub fn active(&self) -> &[LedgerFlow] {
        &self.active
    }
}

impl FlowInstaller for LedgerTransport {
    type Handle<'a>
        = LedgerHandle<'a>
    where
        Self: 'a;

    fn install_flow(&mut self, spec: &FlowSpec) -> LedgerHandle<'_> {
        self.installed += 1;
        self.active.push(LedgerFlow {
            spec:       spec.clone(),
            start:      spec.installed_at,
            stop:       SimTime(u64::MAX),
            sent_bytes: 0,
        });
        let i = self.active.len() - 1;
        LedgerHandle { flow: &mut self.active[i] }
    }
}

impl Transport for LedgerTransport {
    fn settle(&mut self, now: SimTime, fabric: &mut StaticFabric) {
        let from = self.last_settle;
        if now <= from {
            return;
        }
        let capacity = self.bytes_per_sec * (now - from).as_secs_f64();

        let mut offered: FxHashMap<HostIndex, f64> = FxHashMap::default();
        for flow in &mut self.active {
            let begin = flow.start.max(from);
            let end = flow.stop.min(now);
            if end <= begin {
                continue;
            }
            let mut bytes = self.bytes_per_sec * (end - begin).as_secs_f64();
            if flow.spec.size_bytes != 0 {
                bytes = bytes.min(flow.spec.size_bytes.saturating_sub(flow.sent_bytes) as f64);
            }
            flow.sent_bytes += bytes as u64;
            *offered.entry(flow.spec.source).or_default() += bytes;
        }
        self.active.retain(|f| !f.finished() && f.stop > now);

        for (host, bytes) in offered {
            let nic = fabric.host_uplink(host);
            let accepted = bytes.min(capacity);
            fabric.record_received(nic, accepted as u64);
            fabric.record_dropped(nic, (bytes - accepted) as u64);
        }
        self.last_settle = now;
    }
}
