//! `ft-core`: foundational types for the fat-tree workload framework.
//!
//! This crate is a dependency of every other `ft-*` crate.  It has no `ft-*`
//! dependencies and minimal external ones (`rand`, `thiserror`, `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `HostIndex`, `NodeIndex`, `DeviceIndex`, `FlowId`       |
//! | [`time`]      | `SimTime`, `SimClock`                                   |
//! | [`rng`]       | `SimRng`                                                |
//! | [`layer`]     | `Layer` (core / aggregation / ToR / host)               |
//! | [`topology`]  | `FatTreeDims`, radix-derived sizing                     |
//! | [`transport`] | `SocketKind`, `TrafficPattern`, `FlowKind`              |
//! | [`config`]    | `ExperimentConfig` and its nested sections              |
//! | [`error`]     | `FtError`, `FtResult`                                   |

pub mod config;
pub mod error;
pub mod ids;
pub mod layer;
pub mod rng;
pub mod time;
pub mod topology;
pub mod transport;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    ArrivalConfig, DupAckConfig, ExperimentConfig, FlowSizeConfig, FlowSizeMode, HotspotConfig,
};
pub use error::{FtError, FtResult};
pub use ids::{DeviceIndex, FlowId, HostIndex, NodeIndex};
pub use layer::Layer;
pub use rng::SimRng;
pub use time::{SimClock, SimTime};
pub use topology::FatTreeDims;
pub use transport::{FlowKind, SocketKind, TrafficPattern};
