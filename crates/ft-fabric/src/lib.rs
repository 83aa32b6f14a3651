//! `ft-fabric`: fat-tree device inventory and the seams over it.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`traits`]    | `FabricInventory`, `DeviceCounters`, `QueueControl`, `AddressBook` |
//! | [`fabric`]    | `StaticFabric`, `FabricBuilder`, `DeviceState`             |
//! | [`error`]     | `FabricError`, `FabricResult<T>`                           |
//!
//! The traits are what the telemetry sampler, the hotspot injector and the
//! arrival process consume.  `StaticFabric` is the in-memory implementation
//! used by the driver and by tests: it holds counters and queue capacities
//! only and moves no packets.

pub mod error;
pub mod fabric;
pub mod traits;


pub use error::{FabricError, FabricResult};
pub use fabric::{DeviceState, FabricBuilder, StaticFabric};
pub use traits::{AddressBook, DeviceCounters, DeviceRef, FabricInventory, QueueControl};
