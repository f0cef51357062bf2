//! Daily action model - schedulable tasks that feed streaks and consistency.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::id::ActionId;
use crate::validation::{required_text, ValidationError};
use crate::Time;

/// How often an action is expected to be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every day
    #[default]
    Daily,
    /// Once a week
    Weekly,
    /// On the listed scheduled days
    Custom,
}

impl Frequency {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            other => Err(ValidationError::UnknownVariant {
                kind: "frequency",
                value: other.to_string(),
            }),
        }
    }
}

/// A scheduled task whose completion contributes to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAction {
    /// Unique identifier
    pub id: ActionId,

    /// Action title
    pub title: String,

    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,

    /// Expected cadence
    pub frequency: Frequency,

    /// Days of week (0 = Sunday .. 6 = Saturday)
    pub scheduled_days: Vec<u8>,

    /// Time of day as `HH:MM`
    pub scheduled_time: Option<String>,

    /// Whether the user must check in when done
    #[serde(default)]
    pub requires_check_in: bool,

    /// Completion state, see [`DailyAction::set_completed`]
    completed: bool,

    /// Set iff `completed`
    completed_at: Option<Time>,
}

/// Input for adding a daily action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyAction {
    /// Action title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Cadence
    #[serde(default)]
    pub frequency: Frequency,
    /// Days of week (0-6)
    #[serde(default)]
    pub scheduled_days: Vec<u8>,
    /// Time of day (`HH:MM`)
    #[serde(default)]
    pub scheduled_time: Option<String>,
    /// Check-in required
    #[serde(default)]
    pub requires_check_in: bool,
}

impl DailyAction {
    /// Validate and build a new, uncompleted action.
    pub fn new(input: NewDailyAction) -> Result<Self, ValidationError> {
        let title = required_text("action title", &input.title, 200)?;
        let description = match input.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(d.to_string()),
            _ => None,
        };

        let mut scheduled_days = input.scheduled_days;
        if let Some(day) = scheduled_days.iter().find(|d| **d > 6) {
            return Err(ValidationError::InvalidScheduledDay(*day));
        }
        scheduled_days.sort_unstable();
        scheduled_days.dedup();

        let scheduled_time = match input.scheduled_time {
            Some(t) => Some(validate_scheduled_time(&t)?),
            None => None,
        };

        Ok(Self {
            id: ActionId::new(),
            title,
            description,
            frequency: input.frequency,
            scheduled_days,
            scheduled_time,
            requires_check_in: input.requires_check_in,
            completed: false,
            completed_at: None,
        })
    }

    /// Whether the action is currently completed.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// When the action was completed.
    pub fn completed_at(&self) -> Option<Time> {
        self.completed_at
    }

    /// Toggle completion, keeping `completed_at` in sync.
    ///
    /// Returns true when this call moved the action from not-completed to completed.
    pub fn set_completed(&mut self, completed: bool, now: Time) -> bool {
        let newly_completed = completed && !self.completed;
        self.completed = completed;
        self.completed_at = completed.then_some(now);
        newly_completed
    }
}

fn scheduled_time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("scheduled time pattern is valid")
    })
}

/// Check a time of day is `H:MM` or `HH:MM` on a 24h clock.
pub fn validate_scheduled_time(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if scheduled_time_pattern().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::InvalidScheduledTime(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn input(title: &str) -> NewDailyAction {
        NewDailyAction {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_scheduled_time_formats() {
        assert!(validate_scheduled_time("07:30").is_ok());
        assert!(validate_scheduled_time("7:30").is_ok());
        assert!(validate_scheduled_time("23:59").is_ok());
        assert!(validate_scheduled_time("24:00").is_err());
        assert!(validate_scheduled_time("12:60").is_err());
        assert!(validate_scheduled_time("noon").is_err());
    }

    #[test]
    fn test_invalid_day_rejected() {
        let mut action = input("Stretch");
        action.scheduled_days = vec![1, 7];
        assert_eq!(DailyAction::new(action), Err(ValidationError::InvalidScheduledDay(7)));
    }

    #[test]
    fn test_days_sorted_and_deduplicated() {
        let mut action = input("Stretch");
        action.scheduled_days = vec![5, 1, 5, 0];
        assert_eq!(DailyAction::new(action).unwrap().scheduled_days, vec![0, 1, 5]);
    }

    #[test]
    fn test_completed_at_tracks_completed() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut action = DailyAction::new(input("Read")).unwrap();

        assert!(action.set_completed(true, now));
        assert!(action.is_completed());
        assert_eq!(action.completed_at(), Some(now));

        // Completing again is not a transition
        assert!(!action.set_completed(true, now));

        assert!(!action.set_completed(false, now));
        assert!(!action.is_completed());
        assert_eq!(action.completed_at(), None);
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!("hourly".parse::<Frequency>().is_err());
    }
}
