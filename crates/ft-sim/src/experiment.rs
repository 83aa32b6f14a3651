//! The `Experiment` struct and its event loop.

use tracing::{debug, info};

use ft_core::{ExperimentConfig, FatTreeDims, NodeIndex, SimRng, SimTime};
use ft_fabric::StaticFabric;
use ft_schedule::{Firing, VirtualScheduler};
use ft_telemetry::{TelemetrySampler, TelemetryStore};
use ft_traffic::{ArrivalProcess, Connection, FlowCounters, FlowLauncher, HotspotInjector};

use crate::{ExperimentObserver, ExperimentReport, SimError, SimEvent, SimResult, Transport};

/// One fat-tree experiment run.
///
/// ```text
/// t = 0            TelemetrySample (bucket 0, header row), Progress
/// t = start        InjectHotspots (if enabled), first ShortFlowArrival
/// t = 1, 2, …      TelemetrySample until the horizon
/// arrivals         self-reschedule until the cutoff
/// ```
///
/// Events past the horizon are never dispatched.  Large flows are installed
/// by the builder before the clock starts.
///
/// Create via [`ExperimentBuilder`][crate::ExperimentBuilder].
pub struct Experiment<T: Transport> {
    pub(crate) config:      ExperimentConfig,
    pub(crate) dims:        FatTreeDims,
    pub(crate) fabric:      StaticFabric,
    pub(crate) scheduler:   VirtualScheduler<SimEvent>,
    pub(crate) transport:   T,
    pub(crate) launcher:    FlowLauncher,
    pub(crate) matrix:      Vec<Connection>,
    pub(crate) promoted:    Vec<usize>,
    pub(crate) arrival:     Option<ArrivalProcess>,
    pub(crate) arrival_rng: SimRng,
    pub(crate) sampler:     TelemetrySampler,
    pub(crate) store:       TelemetryStore,
    pub(crate) hotspot:     Option<HotspotInjector>,
    pub(crate) hotspot_rng: SimRng,
    pub(crate) hotspots:    Vec<NodeIndex>,
    pub(crate) ran:         bool,
}

impl<T: Transport> Experiment<T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the experiment to the horizon.  Can only be called once.
    pub fn run<O: ExperimentObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.ran {
            return Err(SimError::AlreadyRun);
        }
        self.ran = true;

        observer.on_experiment_start(&self.config, &self.dims);
        self.schedule_initial()?;

        let horizon = self.config.horizon();
        while let Some((now, event)) = self.scheduler.next_event() {
            if now > horizon {
                break;
            }
            self.dispatch(now, event, observer)?;
        }

        info!(
            short_flows = self.short_flows(),
            large_flows = self.promoted.len(),
            samples = self.store.len(),
            "experiment finished"
        );
        observer.on_experiment_end(&self.report());
        Ok(())
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn dims(&self) -> &FatTreeDims {
        &self.dims
    }

    pub fn fabric(&self) -> &StaticFabric {
        &self.fabric
    }

    pub fn store(&self) -> &TelemetryStore {
        &self.store
    }

    pub fn counters(&self) -> &FlowCounters {
        self.launcher.counters()
    }

    pub fn matrix(&self) -> &[Connection] {
        &self.matrix
    }

    /// Matrix positions promoted to long-lived flows, in selection order.
    pub fn promoted(&self) -> &[usize] {
        &self.promoted
    }

    pub fn arrival(&self) -> Option<&ArrivalProcess> {
        self.arrival.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Nodes chosen by hotspot injection (empty until it has run).
    pub fn hotspots(&self) -> &[NodeIndex] {
        &self.hotspots
    }

    pub fn short_flows(&self) -> u64 {
        self.arrival.as_ref().map_or(0, |a| a.launched())
    }

    pub fn report(&self) -> ExperimentReport<'_> {
        ExperimentReport {
            config:      &self.config,
            dims:        &self.dims,
            store:       &self.store,
            counters:    self.launcher.counters(),
            large_flows: self.promoted.len(),
            short_flows: self.short_flows(),
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────

    fn schedule_initial(&mut self) -> SimResult<()> {
        let start = SimTime::from_secs_f64(self.config.arrival.start_time_secs);

        self.scheduler.schedule_at(SimTime::ZERO, SimEvent::TelemetrySample)?;
        if self.config.progress_interval_secs > 0.0 {
            self.scheduler.schedule_at(SimTime::ZERO, SimEvent::Progress)?;
        }
        if self.hotspot.is_some() {
            self.scheduler.schedule_at(start, SimEvent::InjectHotspots)?;
        }
        if let Some(arrival) = self.arrival.as_mut() {
            arrival.arm()?;
            self.scheduler.schedule_at(start, SimEvent::ShortFlowArrival)?;
        }
        Ok(())
    }

    fn dispatch<O: ExperimentObserver>(&mut self, now: SimTime, event: SimEvent, observer: &mut O) -> SimResult<()> {
        match event {
            SimEvent::ShortFlowArrival => {
                let Some(arrival) = self.arrival.as_mut() else { return Ok(()) };
                let next = arrival.fire(
                    now,
                    &mut self.arrival_rng,
                    &mut self.launcher,
                    &mut self.transport,
                    &self.fabric,
                )?;
                next.schedule_on(&mut self.scheduler, SimEvent::ShortFlowArrival);
            }

            SimEvent::TelemetrySample => {
                self.transport.settle(now, &mut self.fabric);
                let next = self.sampler.fire(now, &mut self.fabric, &mut self.store)?;
                next.schedule_on(&mut self.scheduler, SimEvent::TelemetrySample);
            }

            SimEvent::InjectHotspots => {
                if let Some(injector) = self.hotspot {
                    self.hotspots = injector.inject(&mut self.fabric, &mut self.hotspot_rng);
                    observer.on_hotspots(injector.layer(), &self.hotspots);
                }
            }

            SimEvent::Progress => {
                debug!(%now, pending = self.scheduler.pending(), "progress");
                observer.on_progress(now);
                let interval = SimTime::from_secs_f64(self.config.progress_interval_secs);
                if interval > SimTime::ZERO && now + interval < self.config.horizon() {
                    Firing::Reschedule(interval).schedule_on(&mut self.scheduler, SimEvent::Progress);
                }
            }
        }
        Ok(())
    }
}
