//! Narrow interfaces over a fabric.
//!
//! Per-device counters are written by the transport between samples and
//! read-and-reset only by the telemetry sampler; queue capacity is written
//! only by the hotspot injector.  Splitting the traits keeps each consumer's
//! access to exactly what it needs.

use std::net::Ipv4Addr;

use ft_core::{DeviceIndex, HostIndex, Layer, NodeIndex};

use crate::FabricResult;

/// Address of one device: `(layer, node-in-layer, device-on-node)`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct DeviceRef {
    pub layer:  Layer,
    pub node:   NodeIndex,
    pub device: DeviceIndex,
}

impl DeviceRef {
    pub fn new(layer: Layer, node: NodeIndex, device: DeviceIndex) -> Self {
        Self { layer, node, device }
    }
}

/// Shape of the fabric: how many nodes per layer and devices per node.
pub trait FabricInventory {
    fn node_count(&self, layer: Layer) -> usize;

    /// Devices on `node`, *including* the loopback at index 0.
    ///
    /// # Panics
    /// Implementations may panic if `node` is out of range for `layer`.
    fn device_count(&self, layer: Layer, node: NodeIndex) -> usize;

    /// Non-loopback devices of `node`, in index order.
    fn links(&self, layer: Layer, node: NodeIndex) -> impl Iterator<Item = DeviceIndex> {
        (1..self.device_count(layer, node) as u32).map(DeviceIndex)
    }
}

/// Cumulative byte counters of each device since the last reset.
///
/// All methods may panic on a `DeviceRef` outside the inventory.
pub trait DeviceCounters: FabricInventory {
    fn received_bytes(&self, dev: DeviceRef) -> u64;
    fn dropped_bytes(&self, dev: DeviceRef) -> u64;
    fn reset_counters(&mut self, dev: DeviceRef);

    /// Account `bytes` entering the outbound queue of `dev`.
    fn record_received(&mut self, dev: DeviceRef, bytes: u64);

    /// Account `bytes` dropped at the outbound queue of `dev`.
    fn record_dropped(&mut self, dev: DeviceRef, bytes: u64);
}

/// Outbound queue capacity of each device, in packets.
pub trait QueueControl: FabricInventory {
    fn queue_capacity(&self, dev: DeviceRef) -> u32;
    fn set_queue_capacity(&mut self, dev: DeviceRef, packets: u32);
}

/// Host address introspection.
pub trait AddressBook {
    fn local_address(&self, host: HostIndex) -> FabricResult<Ipv4Addr>;
}
