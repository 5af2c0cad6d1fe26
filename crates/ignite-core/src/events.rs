use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cycle::CycleId;

/// Every state change in the system produces an Event.
/// Front-ends subscribe to them through [`CycleContext::subscribe`](crate::CycleContext::subscribe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CycleCreated {
        cycle_id: CycleId,
        task: String,
        minutes_amount: u32,
        at: DateTime<Utc>,
    },
    /// Periodic recomputation of elapsed time while a cycle runs.
    CycleTick {
        cycle_id: CycleId,
        seconds_passed: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CycleInterrupted {
        cycle_id: CycleId,
        task: String,
        seconds_passed: u64,
        at: DateTime<Utc>,
    },
    CycleFinished {
        cycle_id: CycleId,
        task: String,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// A new cycle was created while this one was still active.
    CycleSuperseded {
        cycle_id: CycleId,
        by: CycleId,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn cycle_id(&self) -> CycleId {
        match self {
            Event::CycleCreated { cycle_id, .. }
            | Event::CycleTick { cycle_id, .. }
            | Event::CycleInterrupted { cycle_id, .. }
            | Event::CycleFinished { cycle_id, .. }
            | Event::CycleSuperseded { cycle_id, .. } => *cycle_id,
        }
    }

    /// True for events after which the cycle no longer counts down.
    pub fn ends_cycle(&self) -> bool {
        matches!(
            self,
            Event::CycleInterrupted { .. }
                | Event::CycleFinished { .. }
                | Event::CycleSuperseded { .. }
        )
    }
}
