//! Tracker configuration.

use serde::{Deserialize, Serialize};

use crate::streak::StreakTimezone;
use crate::trend::Timeframe;

/// Configuration for the progress service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Window used when a trend request names none
    pub default_timeframe: Timeframe,

    /// How many milestones the summary lists
    pub recent_milestone_limit: usize,

    /// Zone used to cut timestamps into calendar days for streaks
    pub streak_timezone: StreakTimezone,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_timeframe: Timeframe::Week,
            recent_milestone_limit: 5,
            streak_timezone: StreakTimezone::Local,
        }
    }
}
