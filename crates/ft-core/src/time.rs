//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is an integer nanosecond count, `SimTime`.  Integer time keeps
//! event ordering exact: two events registered for "0.3 s" compare equal no
//! matter how the 0.3 was computed, and the event queue can key on it
//! directly.  Floating-point seconds only appear at the edges (configuration
//! and the exponential inter-arrival draw) and are converted once.
//!
//! The clock never reads wall time.  It only moves forward, to the timestamp
//! of the event being dispatched.

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated timestamp or a delay, in nanoseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const NANOS_PER_SEC: u64 = 1_000_000_000;

    /// One simulated second, the telemetry sampling period.
    pub const ONE_SECOND: SimTime = SimTime(Self::NANOS_PER_SEC);

    #[inline]
    pub fn from_secs(secs: u64) -> SimTime {
        SimTime(secs * Self::NANOS_PER_SEC)
    }

    /// Convert fractional seconds, rounding to the nearest nanosecond.
    /// Negative and NaN inputs map to zero.
    pub fn from_secs_f64(secs: f64) -> SimTime {
        if secs.is_nan() || secs <= 0.0 {
            return SimTime::ZERO;
        }
        SimTime((secs * Self::NANOS_PER_SEC as f64).round() as u64)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / Self::NANOS_PER_SEC as f64
    }

    /// Whole seconds elapsed (truncating), used as the telemetry bucket.
    #[inline]
    pub fn whole_secs(self) -> u64 {
        self.0 / Self::NANOS_PER_SEC
    }

    #[inline]
    pub fn saturating_sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimTime;

    /// # Panics
    /// Panics in debug mode if `rhs > self`; use [`SimTime::saturating_sub`]
    /// when the order is not known.
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0 - rhs.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The virtual clock owned by the experiment driver.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock to `t`.
    ///
    /// # Panics
    /// Panics in debug mode if `t` is earlier than the current time.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        debug_assert!(t >= self.now, "clock moved backwards: {} -> {}", self.now, t);
        self.now = t;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimClock: {}", self.now)
    }
}
