//! goaltrack core data models.
//!
//! This crate defines the goal aggregate and its value types: metrics,
//! daily actions, the derived progress snapshot and the append-only
//! history log.

#![warn(missing_docs)]

// Core identities
mod id;

// Goal aggregate
mod goal;
mod metric;
mod action;
mod history;
mod patch;

mod validation;

// Re-exports
pub use id::*;

pub use goal::{
    Goal, GoalCategory, GoalStatus, GoalProgress, Milestone, NewGoal, TITLE_MAX, DESCRIPTION_MAX,
};
pub use metric::{Metric, NewMetric};
pub use action::{DailyAction, Frequency, NewDailyAction, validate_scheduled_time};
pub use history::{HistoryEntry, HistoryEntryType, HistoryLog, Metadata, metadata};
pub use patch::GoalPatch;
pub use validation::ValidationError;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
