//! Remaining-time rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cycle::CycleStore;

/// Seconds left on the active cycle, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub seconds: u64,
}

impl Remaining {
    /// Saturates at zero if a stale tick pushed `passed` past `total`.
    pub fn new(total_seconds: u64, seconds_passed: u64) -> Self {
        Self {
            seconds: total_seconds.saturating_sub(seconds_passed),
        }
    }

    /// Zero when no cycle is active.
    pub fn from_store(store: &CycleStore) -> Self {
        match store.active_cycle() {
            Some(cycle) => Self::new(cycle.total_seconds(), store.amount_seconds_passed()),
            None => Self { seconds: 0 },
        }
    }

    pub fn minutes_part(&self) -> u64 {
        self.seconds / 60
    }

    pub fn seconds_part(&self) -> u64 {
        self.seconds % 60
    }

    pub fn minutes(&self) -> String {
        format!("{:02}", self.minutes_part())
    }

    pub fn seconds(&self) -> String {
        format!("{:02}", self.seconds_part())
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes_part(), self.seconds_part())
    }
}

/// Window/tab title: `MM:SS` while a cycle runs, `idle_label` otherwise.
pub fn title(remaining: Option<Remaining>, idle_label: &str) -> String {
    match remaining {
        Some(r) => r.to_string(),
        None => idle_label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(Remaining::new(600, 4).to_string(), "09:56");
        assert_eq!(Remaining::new(300, 300).to_string(), "00:00");
        assert_eq!(Remaining::new(3600, 0).to_string(), "60:00");
    }

    #[test]
    fn clamps_overshoot() {
        assert_eq!(Remaining::new(300, 305).seconds, 0);
    }

    #[test]
    fn title_switches_on_activity() {
        assert_eq!(title(Some(Remaining::new(600, 4)), "Ignite Timer"), "09:56");
        assert_eq!(title(None, "Ignite Timer"), "Ignite Timer");
    }

    proptest! {
        #[test]
        fn display_is_mm_ss(total in 0u64..=3600, passed in 0u64..=4000) {
            let r = Remaining::new(total, passed);
            let s = r.to_string();
            prop_assert_eq!(s.len(), 5);
            prop_assert_eq!(&s[2..3], ":");
            prop_assert_eq!(format!("{}:{}", r.minutes(), r.seconds()), s.clone());
            let m: u64 = s[..2].parse().unwrap();
            let sec: u64 = s[3..].parse().unwrap();
            prop_assert!(sec < 60);
            prop_assert_eq!(m * 60 + sec, total.saturating_sub(passed));
        }
    }
}
