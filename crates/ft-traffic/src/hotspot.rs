//! Hotspot injection: shrink the outbound queues of a random subset of one
//! layer's nodes.

use rustc_hash::FxHashSet;
use tracing::info;

use ft_core::{HotspotConfig, Layer, NodeIndex, SimRng};
use ft_fabric::{DeviceRef, QueueControl};

use crate::{TrafficError, TrafficResult};

/// One-shot queue-capacity mutation.
#[derive(Copy, Clone, Debug)]
pub struct HotspotInjector {
    layer:          Layer,
    ratio_percent:  u32,
    queue_capacity: u32,
}

impl HotspotInjector {
    pub fn new(layer: Layer, ratio_percent: u32, queue_capacity: u32) -> TrafficResult<Self> {
        if ratio_percent > 100 {
            return Err(TrafficError::InvalidHotspotRatio(ratio_percent));
        }
        Ok(Self { layer, ratio_percent, queue_capacity })
    }

    pub fn from_config(cfg: &HotspotConfig) -> TrafficResult<Self> {
        Self::new(cfg.layer, cfg.ratio_percent, cfg.queue_capacity)
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// `floor(population * ratio / 100)`.
    pub fn hotspot_count(&self, population: usize) -> usize {
        population * self.ratio_percent as usize / 100
    }

    /// Pick the hotspot nodes by rejection sampling and set the queue
    /// capacity of every non-loopback device on each.  Returns the chosen
    /// nodes in selection order.
    pub fn inject<F: QueueControl>(&self, fabric: &mut F, rng: &mut SimRng) -> Vec<NodeIndex> {
        let population = fabric.node_count(self.layer);
        let count = self.hotspot_count(population);
        let mut seen = FxHashSet::default();
        let mut chosen = Vec::with_capacity(count);

        while chosen.len() < count {
            let node = NodeIndex(rng.index(population) as u32);
            if seen.insert(node) {
                chosen.push(node);
            }
        }

        for &node in &chosen {
            let links: Vec<_> = fabric.links(self.layer, node).collect();
            for device in links {
                fabric.set_queue_capacity(DeviceRef::new(self.layer, node, device), self.queue_capacity);
            }
        }

        info!(
            layer = self.layer.name(),
            population,
            ratio = self.ratio_percent,
            hotspots = chosen.len(),
            queue = self.queue_capacity,
            "hotspots injected"
        );
        chosen
    }
}
