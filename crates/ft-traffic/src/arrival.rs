//! Short-flow arrival process.
//!
//! # State machine
//!
//! ```text
//! Idle ──arm──▶ Scheduled ──fire──▶ Firing ──▶ Rescheduled ──fire──▶ …
//!                                      └─────▶ Terminated
//! ```
//!
//! The process never touches the scheduler.  [`ArrivalProcess::fire`]
//! returns a [`Firing`] and the driver schedules the next firing after the
//! returned delay.
//!
//! # Modes
//!
//! - **Single**: one connection drawn uniformly (with replacement) from the
//!   pool per firing; gaps are `Exp(λ)`.  No new arrival is scheduled once
//!   `now >= horizon - upper_bound`.
//! - **Incast**: every connection of the pool fires a fixed-size flow at
//!   once; bursts repeat every heartbeat while a whole heartbeat still fits
//!   before `horizon - upper_bound`.

use rand_distr::Exp;
use tracing::{debug, info};

use ft_core::{ArrivalConfig, FlowKind, SimRng, SimTime};
use ft_fabric::AddressBook;
use ft_schedule::Firing;

use crate::connection::ShortFlowPool;
use crate::flow_size::FlowSizeModel;
use crate::install::{FlowInstaller, FlowLauncher};
use crate::{TrafficError, TrafficResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrivalState {
    Idle,
    Scheduled,
    Firing,
    Rescheduled,
    Terminated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArrivalMode {
    Single,
    Incast,
}

/// Self-rescheduling short-flow launcher.
pub struct ArrivalProcess {
    pool:         ShortFlowPool,
    sizes:        FlowSizeModel,
    mode:         ArrivalMode,
    gap:          Exp<f64>,
    /// Horizon minus the arrival upper bound, in seconds.
    cutoff_secs:  f64,
    horizon:      SimTime,
    heartbeat:    f64,
    incast_bytes: u64,
    state:        ArrivalState,
    launched:     u64,
}

impl ArrivalProcess {
    pub fn new(
        pool: ShortFlowPool,
        sizes: FlowSizeModel,
        mode: ArrivalMode,
        cfg: &ArrivalConfig,
        horizon: SimTime,
    ) -> TrafficResult<Self> {
        if pool.is_empty() {
            return Err(TrafficError::EmptyConnectionPool);
        }
        let gap = Exp::new(cfg.lambda)
            .map_err(|e| TrafficError::InvalidArrival(format!("lambda {}: {e}", cfg.lambda)))?;
        if cfg.incast_heartbeat_secs.is_nan() || cfg.incast_heartbeat_secs <= 0.0 {
            return Err(TrafficError::InvalidArrival(format!(
                "incast heartbeat must be > 0, got {}",
                cfg.incast_heartbeat_secs
            )));
        }
        Ok(Self {
            pool,
            sizes,
            mode,
            gap,
            cutoff_secs: horizon.as_secs_f64() - cfg.upper_bound_secs,
            horizon,
            heartbeat: cfg.incast_heartbeat_secs,
            incast_bytes: cfg.incast_flow_bytes,
            state: ArrivalState::Idle,
            launched: 0,
        })
    }

    pub fn state(&self) -> ArrivalState {
        self.state
    }

    pub fn mode(&self) -> ArrivalMode {
        self.mode
    }

    /// Short flows launched so far.
    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn pool(&self) -> &ShortFlowPool {
        &self.pool
    }

    /// Idle → Scheduled.  The driver schedules the first firing.
    pub fn arm(&mut self) -> TrafficResult<()> {
        if self.state != ArrivalState::Idle {
            return Err(TrafficError::InvalidTransition { op: "arm", state: self.state });
        }
        self.state = ArrivalState::Scheduled;
        Ok(())
    }

    /// Launch this firing's flows and decide whether to fire again.
    pub fn fire<I, A>(
        &mut self,
        now: SimTime,
        rng: &mut SimRng,
        launcher: &mut FlowLauncher,
        installer: &mut I,
        addrs: &A,
    ) -> TrafficResult<Firing>
    where
        I: FlowInstaller,
        A: AddressBook,
    {
        if !matches!(self.state, ArrivalState::Scheduled | ArrivalState::Rescheduled) {
            return Err(TrafficError::InvalidTransition { op: "fire", state: self.state });
        }
        self.state = ArrivalState::Firing;

        let stop = self.horizon.saturating_sub(now);
        let next = match self.mode {
            ArrivalMode::Single => {
                let conn = *self.pool.get(rng.index(self.pool.len()));
                if conn.is_large() {
                    return Err(TrafficError::LargeInShortPool { src: conn.source, dst: conn.destination });
                }
                let bytes = self.sizes.sample(rng);
                launcher.launch(installer, addrs, &conn, FlowKind::Short, bytes, now, stop)?;
                self.launched += 1;
                self.next_single(now, rng)
            }
            ArrivalMode::Incast => {
                for conn in self.pool.iter() {
                    launcher.launch(installer, addrs, conn, FlowKind::Short, self.incast_bytes, now, stop)?;
                }
                self.launched += self.pool.len() as u64;
                info!(flows = self.pool.len(), %now, "incast burst");
                self.next_burst(now)
            }
        };

        self.state = match next {
            Firing::Reschedule(_) => ArrivalState::Rescheduled,
            Firing::Terminated => ArrivalState::Terminated,
        };
        if self.state == ArrivalState::Terminated {
            info!(launched = self.launched, %now, "short-flow arrivals finished");
        }
        Ok(next)
    }

    fn next_single(&self, now: SimTime, rng: &mut SimRng) -> Firing {
        if now.as_secs_f64() < self.cutoff_secs {
            let gap = rng.sample(&self.gap);
            debug!(gap, "next arrival");
            Firing::Reschedule(SimTime::from_secs_f64(gap))
        } else {
            Firing::Terminated
        }
    }

    fn next_burst(&self, now: SimTime) -> Firing {
        let now = now.as_secs_f64();
        if now < self.cutoff_secs && self.cutoff_secs - now > self.heartbeat {
            Firing::Reschedule(SimTime::from_secs_f64(self.heartbeat))
        } else {
            Firing::Terminated
        }
    }
}
