//! Goal store trait abstraction.

use async_trait::async_trait;
use goaltrack_core::{Goal, GoalId, UserId};
use std::sync::Arc;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The goal was written by someone else since it was loaded
    #[error("Version conflict on goal {goal_id}: expected {expected}, found {found}")]
    Conflict {
        /// Goal being saved
        goal_id: GoalId,
        /// Version the writer loaded
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Persistence collaborator for goals.
///
/// Implementations must guarantee no lost updates among writers sharing the
/// store instance: `save` only succeeds if the stored version still equals
/// `goal.version`, and returns the goal with its version bumped. Neither
/// bundled store coordinates writers across processes.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Load a goal by ID, scoped to its owner.
    ///
    /// A goal owned by someone else resolves to `None`.
    async fn find_by_id(&self, id: GoalId, owner: &UserId) -> Result<Option<Goal>>;

    /// Save a goal (create or update).
    async fn save(&self, goal: &Goal) -> Result<Goal>;

    /// List all goals of a user, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Goal>>;
}

#[async_trait]
impl<S: GoalStore + ?Sized> GoalStore for Arc<S> {
    async fn find_by_id(&self, id: GoalId, owner: &UserId) -> Result<Option<Goal>> {
        (**self).find_by_id(id, owner).await
    }

    async fn save(&self, goal: &Goal) -> Result<Goal> {
        (**self).save(goal).await
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Goal>> {
        (**self).list_by_owner(owner).await
    }
}

/// Check `incoming` against the stored version and return the next one.
pub(crate) fn next_version(incoming: &Goal, stored: Option<u64>) -> Result<u64> {
    let found = stored.unwrap_or(0);
    if incoming.version != found {
        tracing::warn!(
            "Rejected stale write to goal {}: expected version {}, found {}",
            incoming.id,
            incoming.version,
            found
        );
        return Err(StorageError::Conflict {
            goal_id: incoming.id,
            expected: incoming.version,
            found,
        });
    }
    Ok(found + 1)
}
