//! `ft-telemetry`: per-second link utilization and loss.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`sampler`] | `TelemetrySampler` state machine, `SamplerState`         |
//! | [`store`]   | `TelemetryStore`, `SampleKey`, `LinkSample`              |
//! | [`error`]   | `TelemetryError`, `TelemetryResult<T>`                   |
//!
//! The sampler is the only reader of the fabric's device counters and the
//! only writer of the store.  Reports read the store after the run.

pub mod error;
pub mod sampler;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{TelemetryError, TelemetryResult};
pub use sampler::{SamplerState, TelemetrySampler};
pub use store::{LinkSample, SampleKey, TelemetryStore};
