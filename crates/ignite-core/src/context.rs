//! Shared handle over the cycle store.
//!
//! Every front-end component that reads or changes cycle state holds a clone
//! of the same [`CycleContext`]. It serializes access to the [`CycleStore`],
//! publishes the active cycle id for the [`CountdownDriver`], and broadcasts
//! an [`Event`] for every state change.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::countdown::{title, Clock, CountdownDriver, Remaining, TickOutcome};
use crate::cycle::{Cycle, CycleId, CycleStatus, CycleStore, NewCycle};
use crate::events::Event;
use crate::storage::Config;

const EVENT_CAPACITY: usize = 64;
pub const DEFAULT_IDLE_TITLE: &str = "Ignite Timer";

#[derive(Debug, Clone)]
pub struct CycleContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    store: Mutex<CycleStore>,
    active_tx: watch::Sender<Option<CycleId>>,
    events_tx: broadcast::Sender<Event>,
    idle_title: String,
}

/// Everything a view needs to render the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub active_cycle: Option<Cycle>,
    pub is_active: bool,
    pub amount_seconds_passed: u64,
    pub remaining_seconds: u64,
    pub minutes: String,
    pub seconds: String,
    pub title: String,
}

/// One row of the history view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub cycle: Cycle,
    pub status: CycleStatus,
}

impl CycleContext {
    pub fn new(store: CycleStore, idle_title: impl Into<String>) -> Self {
        let (active_tx, _) = watch::channel(store.active_cycle_id());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                active_tx,
                events_tx,
                idle_title: idle_title.into(),
            }),
        }
    }

    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let store = CycleStore::new(clock).with_policy(config.timer.on_create_while_active);
        Self::new(store, config.ui.idle_title.clone())
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events_tx.subscribe()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<Option<CycleId>> {
        self.inner.active_tx.subscribe()
    }

    // ── Commands ─────────────────────────────────────────────────────

    // The active id and events are sent while the store guard is held, so
    // concurrent commands cannot publish out of order with the store.
    pub fn create(&self, new: NewCycle) -> CycleId {
        let mut store = self.lock();
        let (id, displaced) = store.create_replacing(new);
        self.inner.active_tx.send_replace(store.active_cycle_id());
        if let Some(event) = displaced {
            self.publish(event);
        }
        if let Some(cycle) = store.cycle(id) {
            self.publish(Event::CycleCreated {
                cycle_id: id,
                task: cycle.task.clone(),
                minutes_amount: cycle.minutes_amount,
                at: cycle.start_date,
            });
        }
        id
    }

    pub fn interrupt(&self) -> Option<Event> {
        let mut store = self.lock();
        let event = store.interrupt()?;
        self.inner.active_tx.send_replace(store.active_cycle_id());
        self.publish(event.clone());
        Some(event)
    }

    pub fn mark_finished(&self) -> Option<Event> {
        let mut store = self.lock();
        let event = store.mark_finished()?;
        self.inner.active_tx.send_replace(store.active_cycle_id());
        self.publish(event.clone());
        Some(event)
    }

    pub fn set_seconds_passed(&self, seconds: u64) {
        self.lock().set_seconds_passed(seconds);
    }

    /// Run one driver tick against the store and publish its outcome.
    pub(crate) fn tick(&self, driver: &mut CountdownDriver) -> TickOutcome {
        let mut store = self.lock();
        let outcome = driver.tick(&mut store);

        match &outcome {
            TickOutcome::Progress {
                cycle_id,
                seconds_passed,
                remaining,
            } => self.publish(Event::CycleTick {
                cycle_id: *cycle_id,
                seconds_passed: *seconds_passed,
                remaining_secs: remaining.seconds,
                at: store.now(),
            }),
            TickOutcome::Finished(event) => {
                self.inner.active_tx.send_replace(store.active_cycle_id());
                self.publish(event.clone());
            }
            TickOutcome::Idle | TickOutcome::Stale => {}
        }
        outcome
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    pub fn active_cycle(&self) -> Option<Cycle> {
        self.lock().active_cycle().cloned()
    }

    pub fn amount_seconds_passed(&self) -> u64 {
        self.lock().amount_seconds_passed()
    }

    pub fn cycle(&self, id: CycleId) -> Option<Cycle> {
        self.lock().cycle(id).cloned()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        let store = self.lock();
        store
            .cycles()
            .iter()
            .map(|cycle| HistoryEntry {
                cycle: cycle.clone(),
                status: store.status(cycle),
            })
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let store = self.lock();
        let active_cycle = store.active_cycle().cloned();
        let remaining = Remaining::from_store(&store);
        Snapshot {
            is_active: active_cycle.is_some(),
            title: title(active_cycle.as_ref().map(|_| remaining), &self.inner.idle_title),
            active_cycle,
            amount_seconds_passed: store.amount_seconds_passed(),
            remaining_seconds: remaining.seconds,
            minutes: remaining.minutes(),
            seconds: remaining.seconds(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, CycleStore> {
        self.inner.store.lock().unwrap_or_else(|poisoned| {
            warn!("cycle store lock poisoned; continuing with last state");
            poisoned.into_inner()
        })
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine; views may only poll snapshots.
        let _ = self.inner.events_tx.send(event);
    }
}
