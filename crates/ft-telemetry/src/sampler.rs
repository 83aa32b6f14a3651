//! Per-second link telemetry harvesting.
//!
//! # State machine
//!
//! ```text
//! Armed ──fire──▶ Sampling ──▶ Rescheduled ──fire──▶ Sampling ──▶ …
//!                          └─▶ Done
//! ```
//!
//! Each firing at whole second `T` reads every non-loopback device of every
//! sampled layer, converts the counters into percentages, resets them and
//! stores the result under bucket `T`:
//!
//! ```text
//! utilization = received · 8 · 100 / link_rate
//! loss        = dropped · 100 / (received + dropped)
//! ```
//!
//! A `0/0` ratio is recorded as 0.  Every key of the bucket is checked
//! against the store before any counter is reset, so a rejected firing
//! leaves the fabric and the sampler as they were.  The first firing is at `T = 0`; it only
//! clears whatever the counters gathered during setup, and its bucket is the
//! header row of the reports.

use tracing::{debug, trace};

use ft_core::{Layer, NodeIndex, SimTime};
use ft_fabric::{DeviceCounters, DeviceRef};
use ft_schedule::Firing;

use crate::store::{LinkSample, SampleKey, TelemetryStore};
use crate::{TelemetryError, TelemetryResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SamplerState {
    Armed,
    Sampling,
    Rescheduled,
    Done,
}

pub struct TelemetrySampler {
    layers:        Vec<Layer>,
    link_rate_bps: f64,
    horizon:       SimTime,
    state:         SamplerState,
}

impl TelemetrySampler {
    pub fn new(layers: Vec<Layer>, link_rate_bps: u64, horizon: SimTime) -> TelemetryResult<Self> {
        if link_rate_bps == 0 {
            return Err(TelemetryError::ZeroLinkRate);
        }
        for (i, layer) in layers.iter().enumerate() {
            if layers[..i].contains(layer) {
                return Err(TelemetryError::DuplicateLayer(*layer));
            }
        }
        Ok(Self { layers, link_rate_bps: link_rate_bps as f64, horizon, state: SamplerState::Armed })
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Convert one device's counters into percentages.
    pub fn link_sample(&self, received: u64, dropped: u64) -> LinkSample {
        let r = received as f64;
        let d = dropped as f64;
        LinkSample {
            utilization: nan_to_zero(r * 8.0 * 100.0 / self.link_rate_bps),
            loss:        nan_to_zero(d * 100.0 / (r + d)),
        }
    }

    /// Harvest bucket `now` and decide whether to fire again.
    pub fn fire<F: DeviceCounters>(
        &mut self,
        now: SimTime,
        fabric: &mut F,
        store: &mut TelemetryStore,
    ) -> TelemetryResult<Firing> {
        if !matches!(self.state, SamplerState::Armed | SamplerState::Rescheduled) {
            return Err(TelemetryError::NotArmed(self.state));
        }
        if now.0 % SimTime::NANOS_PER_SEC != 0 {
            return Err(TelemetryError::FractionalSecond(now));
        }
        let bucket = now.whole_secs() as u32;
        let mut harvested = Vec::new();
        for &layer in &self.layers {
            for n in 0..fabric.node_count(layer) as u32 {
                let node = NodeIndex(n);
                for device in fabric.links(layer, node) {
                    let key = SampleKey { layer, bucket, node, device };
                    store.check(&key)?;
                    let dev = DeviceRef::new(layer, node, device);
                    harvested.push((key, self.link_sample(fabric.received_bytes(dev), fabric.dropped_bytes(dev))));
                }
            }
        }

        self.state = SamplerState::Sampling;
        for (key, sample) in harvested {
            fabric.reset_counters(DeviceRef::new(key.layer, key.node, key.device));
            trace!(layer = key.layer.name(), bucket, node = key.node.0, device = key.device.0, ?sample, "link sample");
            store.insert(key, sample)?;
        }
        debug!(bucket, samples = store.len(), "telemetry bucket stored");

        let next = if now < self.horizon { Firing::Reschedule(SimTime::ONE_SECOND) } else { Firing::Terminated };
        self.state = match next {
            Firing::Reschedule(_) => SamplerState::Rescheduled,
            Firing::Terminated => SamplerState::Done,
        };
        Ok(next)
    }
}

#[inline]
fn nan_to_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}
