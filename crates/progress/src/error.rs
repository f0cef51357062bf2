//! Error types for progress operations.

use goaltrack_core::{ActionId, GoalId, MetricId, ValidationError};
use goaltrack_storage::StorageError;

/// Result type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors surfaced by [`crate::GoalProgressService`].
///
/// Division-by-zero conditions in analytics never appear here; they are
/// converted to zero by [`crate::trend::guarded_ratio`].
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// No goal with this id for the given owner
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),

    /// The goal has no metric with this id
    #[error("Metric not found: {0}")]
    MetricNotFound(MetricId),

    /// The goal has no action with this id
    #[error("Action not found: {0}")]
    ActionNotFound(ActionId),

    /// Input rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Goal store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ProgressError {
    /// Whether this is one of the not-found conditions.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProgressError::GoalNotFound(_)
                | ProgressError::MetricNotFound(_)
                | ProgressError::ActionNotFound(_)
        )
    }
}
