//! In-memory fat-tree inventory.
//!
//! # Layout
//!
//! Each layer is a `Vec` of nodes; each node is a `Vec<DeviceState>` whose
//! index 0 is the loopback.  Link devices are numbered in the order the
//! links of a fat-tree are wired:
//!
//! ```text
//! host : [lo, uplink-to-ToR]
//! ToR  : [lo, host links (hosts_per_tor) .., aggr links (aggr_per_pod) ..]
//! aggr : [lo, ToR links (tor_per_pod) .., core links (core_per_group) ..]
//! core : [lo, one aggr link per pod ..]
//! ```
//!
//! # Host addressing
//!
//! Host `(pod, tor, slot)` gets `10.<pod>.<tor>.<4·slot + 1>`: every
//! host–ToR link is its own /30 inside the ToR's `10.pod.tor.0` block.  The
//! second and third octets therefore identify the pod and the rack, which is
//! all locality classification relies on.  Racks with more than 63 hosts
//! overflow into the next third-octet value, as consecutive /30 allocation
//! would.

use std::net::Ipv4Addr;

use ft_core::{DeviceIndex, FatTreeDims, HostIndex, Layer, NodeIndex};

use crate::traits::{AddressBook, DeviceCounters, DeviceRef, FabricInventory, QueueControl};
use crate::{FabricError, FabricResult};

/// Counters and configuration of one device.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Bytes accepted into the outbound queue since the last reset.
    pub received_bytes: u64,
    /// Bytes dropped at the outbound queue since the last reset.
    pub dropped_bytes:  u64,
    /// Outbound queue capacity in packets.
    pub queue_capacity: u32,
}

/// Fat-tree inventory with per-device counters.
///
/// Do not construct directly; use [`FabricBuilder`].
pub struct StaticFabric {
    dims:       FatTreeDims,
    /// Indexed by `Layer::index()`, then node, then device.
    layers:     [Vec<Vec<DeviceState>>; 4],
    host_addrs: Vec<Ipv4Addr>,
}

impl StaticFabric {
    pub fn dims(&self) -> &FatTreeDims {
        &self.dims
    }

    /// The device a host uses to reach its ToR.
    pub fn host_uplink(&self, host: HostIndex) -> DeviceRef {
        DeviceRef::new(Layer::Host, NodeIndex(host.0), DeviceIndex(1))
    }

    #[inline]
    pub fn device(&self, dev: DeviceRef) -> &DeviceState {
        &self.layers[dev.layer.index()][dev.node.index()][dev.device.index()]
    }

    #[inline]
    pub fn device_mut(&mut self, dev: DeviceRef) -> &mut DeviceState {
        &mut self.layers[dev.layer.index()][dev.node.index()][dev.device.index()]
    }
}

impl FabricInventory for StaticFabric {
    fn node_count(&self, layer: Layer) -> usize {
        self.layers[layer.index()].len()
    }

    fn device_count(&self, layer: Layer, node: NodeIndex) -> usize {
        self.layers[layer.index()][node.index()].len()
    }
}

impl DeviceCounters for StaticFabric {
    fn received_bytes(&self, dev: DeviceRef) -> u64 {
        self.device(dev).received_bytes
    }

    fn dropped_bytes(&self, dev: DeviceRef) -> u64 {
        self.device(dev).dropped_bytes
    }

    fn reset_counters(&mut self, dev: DeviceRef) {
        let d = self.device_mut(dev);
        d.received_bytes = 0;
        d.dropped_bytes = 0;
    }

    fn record_received(&mut self, dev: DeviceRef, bytes: u64) {
        let d = self.device_mut(dev);
        d.received_bytes = d.received_bytes.saturating_add(bytes);
    }

    fn record_dropped(&mut self, dev: DeviceRef, bytes: u64) {
        let d = self.device_mut(dev);
        d.dropped_bytes = d.dropped_bytes.saturating_add(bytes);
    }
}

impl QueueControl for StaticFabric {
    fn queue_capacity(&self, dev: DeviceRef) -> u32 {
        self.device(dev).queue_capacity
    }

    fn set_queue_capacity(&mut self, dev: DeviceRef, packets: u32) {
        self.device_mut(dev).queue_capacity = packets;
    }
}

impl AddressBook for StaticFabric {
    fn local_address(&self, host: HostIndex) -> FabricResult<Ipv4Addr> {
        self.host_addrs
            .get(host.index())
            .copied()
            .ok_or(FabricError::UnknownHost { host, total: self.dims.total_host() })
    }
}

// ── FabricBuilder ─────────────────────────────────────────────────────────────

/// Builds a [`StaticFabric`] from radix-derived dimensions.
pub struct FabricBuilder {
    dims:           FatTreeDims,
    queue_capacity: u32,
}

impl FabricBuilder {
    pub fn new(dims: FatTreeDims) -> Self {
        Self { dims, queue_capacity: 100 }
    }

    /// Default outbound queue capacity of every device, in packets.
    pub fn queue_capacity(mut self, packets: u32) -> Self {
        self.queue_capacity = packets;
        self
    }

    pub fn build(self) -> StaticFabric {
        let dims = self.dims;
        let blank = DeviceState { queue_capacity: self.queue_capacity, ..DeviceState::default() };
        let layers = Layer::ALL.map(|layer| {
            // +1 for the loopback
            let devices = dims.devices_per_node(layer) + 1;
            vec![vec![blank; devices]; dims.node_count(layer)]
        });

        let host_addrs = (0..dims.total_host())
            .map(|h| host_address(&dims, HostIndex(h)))
            .collect();

        StaticFabric { dims, layers, host_addrs }
    }
}

fn host_address(dims: &FatTreeDims, host: HostIndex) -> Ipv4Addr {
    let (pod, tor, slot) = dims.host_position(host);
    let base = (10u32 << 24) | (pod << 16) | (tor << 8);
    Ipv4Addr::from(base + 4 * slot + 1)
}
