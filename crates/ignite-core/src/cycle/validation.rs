//! Validation schema for the new-cycle form.

use serde::Serialize;

use crate::error::ValidationError;

pub const MIN_MINUTES: u32 = 5;
pub const MAX_MINUTES: u32 = 60;

/// Validated input for [`CycleStore::create`](super::CycleStore::create).
///
/// The only way to build one is [`NewCycle::new`], so a store never sees a
/// blank task or an out-of-range duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCycle {
    task: String,
    minutes_amount: u32,
}

impl NewCycle {
    /// Validate a task name and duration in minutes.
    ///
    /// The task is trimmed; it must not be empty afterwards. The duration
    /// must lie in `MIN_MINUTES..=MAX_MINUTES`.
    pub fn new(task: impl AsRef<str>, minutes_amount: i64) -> Result<Self, ValidationError> {
        let task = task.as_ref().trim();
        if task.is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        if minutes_amount < i64::from(MIN_MINUTES) {
            return Err(ValidationError::TooShort {
                min: MIN_MINUTES,
                got: minutes_amount,
            });
        }
        if minutes_amount > i64::from(MAX_MINUTES) {
            return Err(ValidationError::TooLong {
                max: MAX_MINUTES,
                got: minutes_amount,
            });
        }
        Ok(Self {
            task: task.to_string(),
            minutes_amount: minutes_amount as u32,
        })
    }

    /// Parse raw form text, as typed into a terminal prompt.
    pub fn parse(task: impl AsRef<str>, minutes_amount: &str) -> Result<Self, ValidationError> {
        let minutes = minutes_amount
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidValue {
                field: "minutes_amount".into(),
                message: format!("'{minutes_amount}' is not a whole number of minutes"),
            })?;
        Self::new(task, minutes)
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_amount(&self) -> u32 {
        self.minutes_amount
    }

    pub(crate) fn into_parts(self) -> (String, u32) {
        (self.task, self.minutes_amount)
    }
}
