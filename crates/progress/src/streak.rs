//! Consecutive-day completion streaks.
//!
//! A streak counts day-to-day transitions: completing something the day
//! after the previous completion adds one, a missed day resets to zero and
//! a second completion on the same day changes nothing. The very first
//! completion leaves the streak at zero.

use chrono::{Local, NaiveDate};
use goaltrack_core::Time;
use serde::{Deserialize, Serialize};

/// Zone used to truncate instants to calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTimezone {
    /// The server's ambient zone
    #[default]
    Local,
    /// UTC
    Utc,
}

/// Derives the next streak value from the previous completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakTracker {
    timezone: StreakTimezone,
}

impl StreakTracker {
    /// Create a tracker cutting days in `timezone`.
    pub fn new(timezone: StreakTimezone) -> Self {
        Self { timezone }
    }

    fn day(&self, t: Time) -> NaiveDate {
        match self.timezone {
            StreakTimezone::Local => t.with_timezone(&Local).date_naive(),
            StreakTimezone::Utc => t.date_naive(),
        }
    }

    /// Calendar days between `last` and `now`.
    pub fn day_difference(&self, last: Time, now: Time) -> i64 {
        (self.day(now) - self.day(last)).num_days()
    }

    /// Streak after completing an action at `now`.
    ///
    /// `last_completed` is the completion preceding this one.
    pub fn next_streak(&self, current: u32, last_completed: Option<Time>, now: Time) -> u32 {
        let Some(last) = last_completed else {
            return current;
        };
        match self.day_difference(last, now) {
            1 => current.saturating_add(1),
            d if d > 1 => 0,
            _ => current,
        }
    }

    /// Streak when nothing was completed: only the reset rule applies.
    pub fn decayed(&self, current: u32, last_completed: Option<Time>, now: Time) -> u32 {
        match last_completed {
            Some(last) if self.day_difference(last, now) > 1 => 0,
            _ => current,
        }
    }
}
