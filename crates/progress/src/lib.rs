//! Goal progress & milestone tracking engine.
//!
//! Write path: aggregation, streaks and milestone detection run on every
//! goal mutation through [`GoalProgressService`]. Read path: trend
//! analytics and dashboard read models derived from the history log.

#![warn(missing_docs)]

pub mod aggregator;
pub mod streak;
pub mod milestone;
pub mod trend;
pub mod report;
pub mod service;
pub mod clock;
pub mod config;
pub mod error;

pub use aggregator::ProgressAggregator;
pub use streak::{StreakTracker, StreakTimezone};
pub use milestone::{MilestoneDetector, Threshold, MILESTONE_LADDER};
pub use trend::{TrendAnalyzer, TrendReport, ProgressTrends, Timeframe, guarded_ratio};
pub use report::{VisualizationData, ProgressSummary, RecentMilestone, MetricPoint, ActionPoint};
pub use service::GoalProgressService;
pub use clock::{Clock, SystemClock, FixedClock};
pub use config::TrackerConfig;
pub use error::{ProgressError, Result};
