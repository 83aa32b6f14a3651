//! `ft-traffic`: the traffic side of a fat-tree experiment.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`flow_size`]   | `FlowSizeCdf` (empirical table + inversion), `FlowSizeModel`   |
//! | [`locality`]    | `LocalityTier`, `LocalityClassifier`, `DupAckPolicy`, `FlowCounters` |
//! | [`connection`]  | `Connection`, `ShortFlowPool`                                  |
//! | [`loader`]      | CSV connection-matrix loader                                   |
//! | [`install`]     | `FlowInstaller`/`FlowHandle` seam, `FlowSpec`, `FlowLauncher`  |
//! | [`promotion`]   | Large-flow promotion                                           |
//! | [`arrival`]     | `ArrivalProcess` state machine                                 |
//! | [`hotspot`]     | `HotspotInjector`                                              |
//! | [`error`]       | `TrafficError`, `TrafficResult<T>`                             |
//!
//! # Design notes
//!
//! Nothing in this crate owns a clock or a scheduler.  Components that
//! would self-reschedule return a [`Firing`] instead, and every random draw
//! goes through a caller-supplied `SimRng`, so a test can drive any of them
//! step by step with a hand-rolled clock.

pub mod arrival;
pub mod connection;
pub mod error;
pub mod flow_size;
pub mod hotspot;
pub mod install;
pub mod loader;
pub mod locality;
pub mod promotion;

#[cfg(test)]
mod tests;

pub use arrival::{ArrivalMode, ArrivalProcess, ArrivalState};
pub use connection::{Connection, ShortFlowPool};
pub use error::{TrafficError, TrafficResult};
pub use ft_schedule::Firing;
pub use flow_size::{CdfPoint, FlowSizeCdf, FlowSizeModel};
pub use hotspot::HotspotInjector;
pub use install::{FlowHandle, FlowIdAllocator, FlowInstaller, FlowLauncher, FlowSpec};
pub use loader::{load_connections_csv, load_connections_reader};
pub use locality::{DupAckPolicy, FlowCounters, LocalityClassifier, LocalityTier};
pub use promotion::{promote_large_flows, promotion_count};
