//! `ft-schedule`: virtual-clock event queue and scheduler seam.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`event_queue`] | `EventQueue<E>` (`BTreeMap<SimTime, VecDeque<E>>`)      |
//! | [`scheduler`]   | `Scheduler<E>` trait, `VirtualScheduler<E>`, `Firing`   |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! # Ordering model
//!
//! ```text
//! pop order = (timestamp ascending, registration order within a timestamp)
//! ```
//!
//! Components never block: they "suspend" by registering a future event and
//! returning.  Nothing is ever cancelled; a self-rescheduling component stops
//! by not registering its next firing.

pub mod error;
pub mod event_queue;
pub mod scheduler;


pub use error::{ScheduleError, ScheduleResult};
pub use event_queue::EventQueue;
pub use scheduler::{Firing, Scheduler, VirtualScheduler};
