//! The scheduling seam consumed by self-rescheduling components.

use ft_core::{SimClock, SimTime};

use crate::{EventQueue, ScheduleError, ScheduleResult};

/// "Run event `E` after `delay`".  Fire-and-forget, no cancellation.
///
/// Implemented by [`VirtualScheduler`]; tests may substitute their own
/// recorder to observe what a component asked for.
pub trait Scheduler<E> {
    /// Current virtual time.
    fn now(&self) -> SimTime;

    /// Register `event` to fire `delay` after [`Scheduler::now`].
    fn schedule_after(&mut self, delay: SimTime, event: E);
}

/// What a self-rescheduling component asks for after one firing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Firing {
    /// Fire again after this delay.
    Reschedule(SimTime),
    Terminated,
}

impl Firing {
    /// Register the follow-up firing, if any, on `scheduler`.
    pub fn schedule_on<E, S: Scheduler<E>>(self, scheduler: &mut S, event: E) -> bool {
        match self {
            Firing::Reschedule(delay) => {
                scheduler.schedule_after(delay, event);
                true
            }
            Firing::Terminated => false,
        }
    }
}

/// A virtual clock plus its pending-event queue.
pub struct VirtualScheduler<E> {
    clock: SimClock,
    queue: EventQueue<E>,
}

impl<E> Default for VirtualScheduler<E> {
    fn default() -> Self {
        Self { clock: SimClock::new(), queue: EventQueue::new() }
    }
}

impl<E> VirtualScheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `event` at an absolute timestamp.
    pub fn schedule_at(&mut self, at: SimTime, event: E) -> ScheduleResult<()> {
        let now = self.clock.now();
        if at < now {
            return Err(ScheduleError::InThePast { at, now });
        }
        self.queue.push(at, event);
        Ok(())
    }

    /// Pop the next event and move the clock to its timestamp.
    pub fn next_event(&mut self) -> Option<(SimTime, E)> {
        let (at, event) = self.queue.pop()?;
        self.clock.advance_to(at);
        Some((at, event))
    }

    /// Timestamp of the earliest pending event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.next_time()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }
}

impl<E> Scheduler<E> for VirtualScheduler<E> {
    fn now(&self) -> SimTime {
        self.clock.now()
    }

    fn schedule_after(&mut self, delay: SimTime, event: E) {
        let at = self.clock.now() + delay;
        self.queue.push(at, event);
    }
}
