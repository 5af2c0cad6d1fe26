//! Countdown driver implementation.
//!
//! The driver is a clock-derived state machine. Each tick recomputes elapsed
//! time from the active cycle's `start_date`; nothing is accumulated between
//! ticks, so a late or skipped tick never causes drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Completing -> Finished -> Idle
//!            \---------------------> Interrupted -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let handle = CountdownDriver::spawn(context.clone(), DEFAULT_TICK_PERIOD);
//! context.create(new_cycle);
//! // ... the driver ticks until the cycle finishes or is interrupted
//! handle.shutdown();
//! ```
//!
//! [`CountdownDriver::tick`] is the synchronous core and can be driven by hand
//! (tests, or a caller with its own event loop).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::display::Remaining;
use crate::context::CycleContext;
use crate::cycle::{CycleId, CycleStore};
use crate::events::Event;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DriverState {
    Idle,
    Running { cycle_id: CycleId },
    /// Elapsed reached the total; the finish is being applied.
    Completing { cycle_id: CycleId },
    Finished { cycle_id: CycleId },
    Interrupted { cycle_id: CycleId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not running; nothing to do.
    Idle,
    Progress {
        cycle_id: CycleId,
        seconds_passed: u64,
        remaining: Remaining,
    },
    Finished(Event),
    /// The cycle this tick was meant for is no longer active.
    Stale,
}

#[derive(Debug, Clone)]
pub struct CountdownDriver {
    state: DriverState,
}

impl CountdownDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DriverState::Running { .. })
    }

    /// Reconcile with the store's active cycle.
    ///
    /// A cycle appearing starts `Running`; a running cycle disappearing
    /// without a finish is `Interrupted`; terminal states fold back to `Idle`
    /// once observed.
    pub fn observe(&mut self, active: Option<CycleId>) -> DriverState {
        self.state = match (self.state, active) {
            (DriverState::Running { cycle_id }, Some(id)) if cycle_id == id => self.state,
            (previous, Some(id)) => {
                if let DriverState::Running { cycle_id } = previous {
                    debug!(%cycle_id, by = %id, "running cycle replaced");
                }
                DriverState::Running { cycle_id: id }
            }
            (DriverState::Running { cycle_id }, None) => DriverState::Interrupted { cycle_id },
            (DriverState::Completing { cycle_id }, None) => DriverState::Finished { cycle_id },
            (
                DriverState::Idle | DriverState::Finished { .. } | DriverState::Interrupted { .. },
                None,
            ) => DriverState::Idle,
        };
        self.state
    }

    /// Recompute elapsed time for the running cycle and push it into the store.
    ///
    /// Once elapsed reaches the cycle total the cycle is marked finished and
    /// the elapsed counter is clamped to the total.
    pub fn tick(&mut self, store: &mut CycleStore) -> TickOutcome {
        let DriverState::Running { cycle_id } = self.state else {
            return TickOutcome::Idle;
        };

        let Some(cycle) = store.active_cycle().filter(|c| c.id == cycle_id) else {
            warn!(%cycle_id, "stale tick for inactive cycle");
            self.observe(store.active_cycle_id());
            return TickOutcome::Stale;
        };

        let total = cycle.total_seconds();
        let elapsed = cycle.elapsed_seconds(store.now());

        if elapsed < total {
            debug!(%cycle_id, elapsed, total, "tick");
            store.set_seconds_passed(elapsed);
            return TickOutcome::Progress {
                cycle_id,
                seconds_passed: elapsed,
                remaining: Remaining::new(total, elapsed),
            };
        }

        self.state = DriverState::Completing { cycle_id };
        let Some(event) = store.mark_finished() else {
            self.observe(store.active_cycle_id());
            return TickOutcome::Stale;
        };
        store.set_seconds_passed(total);
        self.state = DriverState::Finished { cycle_id };
        TickOutcome::Finished(event)
    }

    /// Run the driver on a tokio task, ticking every `period` while a cycle
    /// is active in `context`.
    ///
    /// The interval only exists while `Running`. Any change of the active
    /// cycle (create, interrupt, finish) drops it before another tick can
    /// fire, and a fresh one is started if a new cycle became active.
    pub fn spawn(context: CycleContext, period: Duration) -> DriverHandle {
        let active = context.subscribe_active();
        let task = tokio::spawn(run(context, active, period));
        DriverHandle { task }
    }
}

impl Default for CountdownDriver {
    fn default() -> Self {
        Self::new()
    }
}

async fn run(
    context: CycleContext,
    mut active: watch::Receiver<Option<CycleId>>,
    period: Duration,
) {
    let mut driver = CountdownDriver::new();
    loop {
        let current = *active.borrow_and_update();
        driver.observe(current);

        if !driver.is_running() {
            if active.changed().await.is_err() {
                return;
            }
            continue;
        }

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                changed = active.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
                _ = interval.tick() => {
                    match context.tick(&mut driver) {
                        TickOutcome::Progress { .. } => {}
                        TickOutcome::Finished(_) | TickOutcome::Stale | TickOutcome::Idle => break,
                    }
                }
            }
        }
    }
}

/// Owns the driver task. Dropping the handle cancels the tick.
#[derive(Debug)]
pub struct DriverHandle {
    task: JoinHandle<()>,
}

impl DriverHandle {
    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
