//! Cycles: one run of a task for a target duration.
//!
//! A [`Cycle`] is created active, and leaves the active slot either through a
//! terminal transition (finished or interrupted) or by being superseded when
//! another cycle is created over it. Terminal timestamps are written at most
//! once and are mutually exclusive.

mod store;
mod validation;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::CycleStore;
pub use validation::{NewCycle, MAX_MINUTES, MIN_MINUTES};

/// Opaque unique identifier of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(Uuid);

impl CycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CycleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub id: CycleId,
    pub task: String,
    pub minutes_amount: u32,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    pub(crate) fn start(new: NewCycle, now: DateTime<Utc>) -> Self {
        let (task, minutes_amount) = new.into_parts();
        Self {
            id: CycleId::new(),
            task,
            minutes_amount,
            start_date: now,
            interrupted_date: None,
            finished_date: None,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    /// Whole seconds since `start_date`, never negative.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.start_date)
            .num_seconds()
            .max(0) as u64
    }

    pub fn is_terminal(&self) -> bool {
        self.interrupted_date.is_some() || self.finished_date.is_some()
    }
}

/// How a cycle currently stands relative to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Active,
    /// Replaced as the active cycle without reaching a terminal state.
    Superseded,
    Interrupted,
    Finished,
}

/// What `create` does with a cycle that is still active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatePolicy {
    /// Leave the previous cycle untouched; it becomes `Superseded`.
    #[default]
    Supersede,
    /// Interrupt the previous cycle before the new one starts.
    Interrupt,
}
