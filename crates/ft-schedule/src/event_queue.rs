//! `EventQueue`: ordered store of future events.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and O(log W) pop where W = number of
//! distinct pending timestamps.  A run has at most a handful of live
//! self-rescheduling components (arrivals, telemetry, progress), so W stays
//! tiny even over long horizons; an incast burst installs its flows inside a
//! single event rather than enqueuing one event per flow.

use std::collections::{BTreeMap, VecDeque};

use ft_core::SimTime;

/// A priority queue mapping simulated timestamps → events due at that time.
///
/// Events sharing a timestamp are popped in the order they were pushed.
pub struct EventQueue<E> {
    inner: BTreeMap<SimTime, VecDeque<E>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `event` to fire at `at`.
    pub fn push(&mut self, at: SimTime, event: E) {
        self.inner.entry(at).or_default().push_back(event);
        self.total += 1;
    }

    /// Remove and return the earliest event, with its timestamp.
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        let mut entry = self.inner.first_entry()?;
        let at = *entry.key();
        let event = entry.get_mut().pop_front()?;
        if entry.get().is_empty() {
            entry.remove();
        }
        self.total -= 1;
        Some((at, event))
    }

    /// Timestamp of the earliest pending event, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of pending events.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future timestamps with at least one event.
    pub fn time_count(&self) -> usize {
        self.inner.len()
    }
}
