//! `ft-sim`: experiment driver for the fat-tree workload framework.
//!
//! # Run sequence
//!
//! ```text
//! build:
//!   ① validate ExperimentConfig, size the fabric
//!   ② promote part of the connection matrix to long-lived flows
//!   ③ wrap the rest in a ShortFlowPool, build the arrival process
//! run:
//!   ④ t = 0        first telemetry sample (counters cleared, header bucket)
//!   ⑤ t = start    hotspot injection, first short-flow arrival
//!   ⑥ loop         dispatch events in (time, registration) order until the
//!                  horizon; every component reschedules itself through the
//!                  `Firing` it returns
//!   ⑦ end          ExperimentObserver::on_experiment_end with the store and
//!                  the locality counters
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ft_core::ExperimentConfig;
//! use ft_sim::{ExperimentBuilder, LedgerTransport, NoopObserver};
//!
//! let config = ExperimentConfig::default();
//! let transport = LedgerTransport::new(config.link_rate_bps);
//! let mut exp = ExperimentBuilder::new(config, transport)
//!     .connections(matrix)
//!     .build()?;
//! exp.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod experiment;
pub mod observer;
pub mod transport;


pub use builder::ExperimentBuilder;
pub use error::{SimError, SimResult};
pub use event::SimEvent;
pub use experiment::Experiment;
pub use observer::{ExperimentObserver, ExperimentReport, NoopObserver};
pub use transport::{LedgerFlow, LedgerHandle, LedgerTransport, Transport};
