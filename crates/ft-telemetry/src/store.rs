//! The `TelemetryStore`: one utilization/loss pair per
//! `(layer, bucket, node, device)`.

use rustc_hash::FxHashMap;

use ft_core::{DeviceIndex, Layer, NodeIndex};

use crate::{TelemetryError, TelemetryResult};

/// Utilization and loss of one device over one second, both in percent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinkSample {
    pub utilization: f64,
    pub loss:        f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub layer:  Layer,
    /// Whole simulated seconds since start.
    pub bucket: u32,
    pub node:   NodeIndex,
    pub device: DeviceIndex,
}

/// Write-once sample store bounded by the run's horizon.
///
/// Buckets range over `0..=horizon` for every layer.  Writing a bucket past
/// the horizon or a key that already holds a sample is an error; samples are
/// read-only once written.
pub struct TelemetryStore {
    horizon: u32,
    samples: FxHashMap<SampleKey, LinkSample>,
}

impl TelemetryStore {
    pub fn new(horizon_secs: u32) -> Self {
        Self { horizon: horizon_secs, samples: FxHashMap::default() }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Whether `key` could be inserted now.
    pub fn check(&self, key: &SampleKey) -> TelemetryResult<()> {
        if key.bucket > self.horizon {
            return Err(TelemetryError::BucketOutOfRange { bucket: key.bucket, horizon: self.horizon });
        }
        if self.samples.contains_key(key) {
            return Err(TelemetryError::Overwrite(*key));
        }
        Ok(())
    }

    pub fn insert(&mut self, key: SampleKey, sample: LinkSample) -> TelemetryResult<()> {
        self.check(&key)?;
        self.samples.insert(key, sample);
        Ok(())
    }

    pub fn get(&self, layer: Layer, bucket: u32, node: NodeIndex, device: DeviceIndex) -> Option<LinkSample> {
        self.samples.get(&SampleKey { layer, bucket, node, device }).copied()
    }

    /// Sample for `key`, or zeros when the device was never sampled in that
    /// bucket.
    pub fn get_or_zero(&self, layer: Layer, bucket: u32, node: NodeIndex, device: DeviceIndex) -> LinkSample {
        self.get(layer, bucket, node, device).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
