//! Cycle store implementation.
//!
//! The store is the single source of truth for cycle history, the active
//! cycle and the elapsed-seconds counter. It does no I/O and never fails;
//! transitions that make no sense in the current state are no-ops.
//!
//! ## State Transitions
//!
//! ```text
//! create -> active -> (finished | interrupted)
//!             \-> superseded   (another cycle created over it)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{CreatePolicy, Cycle, CycleId, CycleStatus, NewCycle};
use crate::countdown::Clock;
use crate::events::Event;

#[derive(Debug)]
pub struct CycleStore {
    /// Creation order; entries are never removed.
    cycles: Vec<Cycle>,
    active_cycle_id: Option<CycleId>,
    /// Only meaningful while a cycle is active. Reset to 0 on every create.
    amount_seconds_passed: u64,
    policy: CreatePolicy,
    clock: Arc<dyn Clock>,
}

impl CycleStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            cycles: Vec::new(),
            active_cycle_id: None,
            amount_seconds_passed: 0,
            policy: CreatePolicy::default(),
            clock,
        }
    }

    pub fn with_policy(mut self, policy: CreatePolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn cycle(&self, id: CycleId) -> Option<&Cycle> {
        self.cycles.iter().find(|c| c.id == id)
    }

    pub fn active_cycle_id(&self) -> Option<CycleId> {
        self.active_cycle_id
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.cycle(self.active_cycle_id?)
    }

    pub fn is_active(&self) -> bool {
        self.active_cycle().is_some()
    }

    pub fn amount_seconds_passed(&self) -> u64 {
        self.amount_seconds_passed
    }

    pub fn status(&self, cycle: &Cycle) -> CycleStatus {
        if cycle.finished_date.is_some() {
            CycleStatus::Finished
        } else if cycle.interrupted_date.is_some() {
            CycleStatus::Interrupted
        } else if self.active_cycle_id == Some(cycle.id) {
            CycleStatus::Active
        } else {
            CycleStatus::Superseded
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new cycle, make it active and reset the elapsed counter.
    pub fn create(&mut self, new: NewCycle) -> CycleId {
        self.create_replacing(new).0
    }

    /// Like [`create`](Self::create), also returning the event for the cycle
    /// that was active before, if any.
    pub fn create_replacing(&mut self, new: NewCycle) -> (CycleId, Option<Event>) {
        let now = self.clock.now();
        let interrupted = match self.policy {
            CreatePolicy::Interrupt => self.interrupt(),
            CreatePolicy::Supersede => None,
        };
        let superseded = self.active_cycle_id.take();

        let cycle = Cycle::start(new, now);
        let id = cycle.id;
        info!(
            cycle_id = %id,
            task = %cycle.task,
            minutes = cycle.minutes_amount,
            "cycle created"
        );
        self.cycles.push(cycle);
        self.active_cycle_id = Some(id);
        self.amount_seconds_passed = 0;

        let displaced = interrupted.or_else(|| {
            let previous = superseded?;
            debug!(cycle_id = %previous, by = %id, "superseding active cycle");
            Some(Event::CycleSuperseded {
                cycle_id: previous,
                by: id,
                at: now,
            })
        });
        (id, displaced)
    }

    /// Stop the active cycle early. No-op when nothing is active.
    pub fn interrupt(&mut self) -> Option<Event> {
        let seconds_passed = self.amount_seconds_passed;
        let now = self.clock.now();
        let cycle = self.take_active()?;
        cycle.interrupted_date = Some(now);
        info!(cycle_id = %cycle.id, seconds_passed, "cycle interrupted");
        Some(Event::CycleInterrupted {
            cycle_id: cycle.id,
            task: cycle.task.clone(),
            seconds_passed,
            at: now,
        })
    }

    /// Complete the active cycle. No-op when nothing is active.
    ///
    /// Clears the active cycle in the same step, like [`interrupt`](Self::interrupt).
    pub fn mark_finished(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let cycle = self.take_active()?;
        cycle.finished_date = Some(now);
        info!(cycle_id = %cycle.id, "cycle finished");
        Some(Event::CycleFinished {
            cycle_id: cycle.id,
            task: cycle.task.clone(),
            total_secs: cycle.total_seconds(),
            at: now,
        })
    }

    pub fn set_seconds_passed(&mut self, seconds: u64) {
        self.amount_seconds_passed = seconds;
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Clear the active pointer and hand back the cycle it pointed at.
    fn take_active(&mut self) -> Option<&mut Cycle> {
        let id = self.active_cycle_id.take()?;
        self.cycles
            .iter_mut()
            .find(|c| c.id == id)
            .filter(|c| !c.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::ManualClock;

    fn store() -> (CycleStore, ManualClock) {
        let clock = ManualClock::default();
        (CycleStore::new(Arc::new(clock.clone())), clock)
    }

    fn new_cycle(task: &str, minutes: i64) -> NewCycle {
        NewCycle::new(task, minutes).unwrap()
    }

    #[test]
    fn create_appends_and_activates() {
        let (mut store, clock) = store();
        store.set_seconds_passed(42);

        let id = store.create(new_cycle("Write report", 5));

        assert_eq!(store.cycles().len(), 1);
        assert_eq!(store.active_cycle_id(), Some(id));
        assert_eq!(store.amount_seconds_passed(), 0);
        let active = store.active_cycle().unwrap();
        assert_eq!(active.task, "Write report");
        assert_eq!(active.start_date, clock.now());
        assert_eq!(store.status(active), CycleStatus::Active);
    }

    #[test]
    fn interrupt_sets_only_interrupted_date() {
        let (mut store, clock) = store();
        let id = store.create(new_cycle("X", 5));
        clock.advance_secs(10);
        store.set_seconds_passed(10);

        let event = store.interrupt();

        assert!(matches!(
            event,
            Some(Event::CycleInterrupted { seconds_passed: 10, .. })
        ));
        let cycle = store.cycle(id).unwrap();
        assert_eq!(cycle.interrupted_date, Some(clock.now()));
        assert!(cycle.finished_date.is_none());
        assert!(store.active_cycle().is_none());
        assert_eq!(store.status(cycle), CycleStatus::Interrupted);
    }

    #[test]
    fn interrupt_twice_is_noop() {
        let (mut store, clock) = store();
        let id = store.create(new_cycle("X", 5));
        assert!(store.interrupt().is_some());
        let first = store.cycle(id).unwrap().clone();

        clock.advance_secs(5);
        assert!(store.interrupt().is_none());
        assert_eq!(store.cycle(id).unwrap(), &first);
    }

    #[test]
    fn mark_finished_clears_active() {
        let (mut store, _clock) = store();
        let id = store.create(new_cycle("X", 5));

        assert!(store.mark_finished().is_some());

        let cycle = store.cycle(id).unwrap();
        assert!(cycle.finished_date.is_some());
        assert!(cycle.interrupted_date.is_none());
        assert_eq!(store.active_cycle_id(), None);
    }

    #[test]
    fn terminal_ops_without_active_cycle_are_noops() {
        let (mut store, _clock) = store();
        assert!(store.interrupt().is_none());
        assert!(store.mark_finished().is_none());

        store.create(new_cycle("X", 5));
        store.mark_finished();
        assert!(store.interrupt().is_none());
        assert!(store.mark_finished().is_none());
    }

    #[test]
    fn create_over_active_supersedes_by_default() {
        let (mut store, _clock) = store();
        let a = store.create(new_cycle("A", 5));
        let b = store.create(new_cycle("B", 10));

        assert_eq!(store.active_cycle_id(), Some(b));
        let first = store.cycle(a).unwrap();
        assert!(!first.is_terminal());
        assert_eq!(store.status(first), CycleStatus::Superseded);
        assert_eq!(store.cycles()[0].id, a);
        assert_eq!(store.cycles()[1].id, b);
    }

    #[test]
    fn create_over_active_interrupts_with_policy() {
        let (store, _clock) = store();
        let mut store = store.with_policy(CreatePolicy::Interrupt);
        let a = store.create(new_cycle("A", 5));
        store.create(new_cycle("B", 10));

        let first = store.cycle(a).unwrap();
        assert!(first.interrupted_date.is_some());
        assert_eq!(store.status(first), CycleStatus::Interrupted);
    }

    #[test]
    fn create_replacing_reports_interrupted_cycle_with_ticked_seconds() {
        let (store, clock) = store();
        let mut store = store.with_policy(CreatePolicy::Interrupt);
        let a = store.create(new_cycle("A", 5));
        store.set_seconds_passed(3);
        clock.advance_secs(12);

        let (b, displaced) = store.create_replacing(new_cycle("B", 5));

        assert_eq!(
            displaced,
            Some(Event::CycleInterrupted {
                cycle_id: a,
                task: "A".into(),
                seconds_passed: 3,
                at: clock.now(),
            })
        );
        assert_eq!(store.active_cycle_id(), Some(b));
        assert_eq!(store.amount_seconds_passed(), 0);
    }

    #[test]
    fn create_replacing_reports_superseded_cycle() {
        let (mut store, clock) = store();
        let a = store.create(new_cycle("A", 5));

        let (b, displaced) = store.create_replacing(new_cycle("B", 5));
        assert_eq!(
            displaced,
            Some(Event::CycleSuperseded {
                cycle_id: a,
                by: b,
                at: clock.now(),
            })
        );

        store.interrupt();
        let (_, displaced) = store.create_replacing(new_cycle("C", 5));
        assert!(displaced.is_none());
    }
}
