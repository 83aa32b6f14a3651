//! Reduction of the telemetry store into per-layer tables and layer means.
//!
//! Each layer walks buckets `1..=horizon`, every node and every non-loopback
//! device.  A row holds the utilization of every `(node, device)` followed by
//! the loss of every `(node, device)`.  The means divide the running sums by
//! the theoretical population `horizon × nodes × devices_per_node`, so
//! devices the sampler never reached count as idle.

use ft_core::{DeviceIndex, FatTreeDims, Layer, NodeIndex};
use ft_telemetry::{LinkSample, TelemetryStore};

// ── LayerAccumulator ──────────────────────────────────────────────────────────

/// Running sums of one layer's samples.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayerAccumulator {
    pub utilization_sum: f64,
    pub loss_sum:        f64,
}

impl LayerAccumulator {
    pub fn add(&mut self, sample: LinkSample) {
        self.utilization_sum += sample.utilization;
        self.loss_sum += sample.loss;
    }

    /// `(mean utilization, mean loss)` over `population` samples; NaN
    /// becomes 0.
    pub fn means(&self, population: f64) -> (f64, f64) {
        (nan_to_zero(self.utilization_sum / population), nan_to_zero(self.loss_sum / population))
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// Layer-wide means in percent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerSummary {
    pub layer:            Layer,
    pub mean_utilization: f64,
    pub mean_loss:        f64,
}

/// One second of one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub bucket:      u32,
    /// Node-major, then device.
    pub utilization: Vec<f64>,
    pub loss:        Vec<f64>,
}

/// Time series and means of one layer.
#[derive(Clone, Debug)]
pub struct LayerReport {
    pub layer:   Layer,
    pub nodes:   u32,
    /// Non-loopback devices per node.
    pub devices: u32,
    /// `Link<d>` for every metric × node × device column.
    pub header:  Vec<String>,
    /// Buckets `1..=horizon`.
    pub rows:    Vec<TableRow>,
    pub summary: LayerSummary,
}

/// All four layers of a run, in [`Layer::ALL`] order.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub layers: Vec<LayerReport>,
}

impl RunReport {
    pub fn layer(&self, layer: Layer) -> Option<&LayerReport> {
        self.layers.iter().find(|r| r.layer == layer)
    }

    /// Means of `layer`; zero when the layer is missing.
    pub fn summary(&self, layer: Layer) -> LayerSummary {
        self.layer(layer).map_or(
            LayerSummary { layer, mean_utilization: 0.0, mean_loss: 0.0 },
            |r| r.summary,
        )
    }
}

// ── ReportAggregator ──────────────────────────────────────────────────────────

/// Reduces a finished [`TelemetryStore`].
#[derive(Copy, Clone, Debug)]
pub struct ReportAggregator {
    dims:         FatTreeDims,
    horizon_secs: u32,
}

impl ReportAggregator {
    pub fn new(dims: FatTreeDims, horizon_secs: u32) -> Self {
        Self { dims, horizon_secs }
    }

    /// `horizon × nodes × devices_per_node`.
    pub fn population(&self, layer: Layer) -> f64 {
        f64::from(self.horizon_secs) * self.dims.node_count(layer) as f64 * self.dims.devices_per_node(layer) as f64
    }

    /// Reduce one layer.
    pub fn layer(&self, store: &TelemetryStore, layer: Layer) -> LayerReport {
        let nodes = self.dims.node_count(layer) as u32;
        let devices = self.dims.devices_per_node(layer) as u32;
        let columns = (nodes * devices) as usize;

        let mut header = Vec::with_capacity(2 * columns);
        for _metric in 0..2 {
            for _node in 0..nodes {
                header.extend((1..=devices).map(|d| format!("Link{d}")));
            }
        }

        let mut acc = LayerAccumulator::default();
        let mut rows = Vec::with_capacity(self.horizon_secs as usize);
        for bucket in 1..=self.horizon_secs {
            let mut utilization = Vec::with_capacity(columns);
            let mut loss = Vec::with_capacity(columns);
            for n in 0..nodes {
                for d in 1..=devices {
                    let sample = store.get_or_zero(layer, bucket, NodeIndex(n), DeviceIndex(d));
                    acc.add(sample);
                    utilization.push(sample.utilization);
                    loss.push(sample.loss);
                }
            }
            rows.push(TableRow { bucket, utilization, loss });
        }

        let (mean_utilization, mean_loss) = acc.means(self.population(layer));
        LayerReport {
            layer,
            nodes,
            devices,
            header,
            rows,
            summary: LayerSummary { layer, mean_utilization, mean_loss },
        }
    }

    /// Reduce every layer.
    pub fn aggregate(&self, store: &TelemetryStore) -> RunReport {
        #[cfg(not(feature = "parallel"))]
        let layers = Layer::ALL.iter().map(|&layer| self.layer(store, layer)).collect();

        #[cfg(feature = "parallel")]
        let layers = {
            use rayon::prelude::*;

            Layer::ALL.par_iter().map(|&layer| self.layer(store, layer)).collect()
        };

        RunReport { layers }
    }
}

#[inline]
fn nan_to_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}
