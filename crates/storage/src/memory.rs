//! In-memory goal store.
//!
//! Used by tests and embedders that persist elsewhere.

use std::collections::HashMap;

use async_trait::async_trait;
use goaltrack_core::{Goal, GoalId, UserId};
use tokio::sync::RwLock;

use super::trait_::{next_version, GoalStore, Result};

/// Goal store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
    goals: RwLock<HashMap<GoalId, Goal>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored goals.
    pub async fn len(&self) -> usize {
        self.goals.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.goals.read().await.is_empty()
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn find_by_id(&self, id: GoalId, owner: &UserId) -> Result<Option<Goal>> {
        let goals = self.goals.read().await;
        Ok(goals.get(&id).filter(|g| &g.owner_id == owner).cloned())
    }

    async fn save(&self, goal: &Goal) -> Result<Goal> {
        // Write lock held across check and insert
        let mut goals = self.goals.write().await;
        let version = next_version(goal, goals.get(&goal.id).map(|g| g.version))?;

        let mut stored = goal.clone();
        stored.version = version;
        goals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Goal>> {
        let goals = self.goals.read().await;
        let mut owned: Vec<Goal> = goals.values().filter(|g| &g.owner_id == owner).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use chrono::{Duration, Utc};
    use goaltrack_core::{GoalCategory, NewGoal};

    fn goal(owner: &str) -> Goal {
        let now = Utc::now();
        Goal::new(
            UserId::new(owner),
            NewGoal {
                title: "Save money".to_string(),
                description: "Build an emergency fund".to_string(),
                category: GoalCategory::Other,
                target_date: now + Duration::days(30),
            },
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find_scoped_to_owner() {
        let store = MemoryStore::new();
        let saved = store.save(&goal("alice")).await.unwrap();
        assert_eq!(saved.version, 1);

        let alice = UserId::new("alice");
        let bob = UserId::new("bob");
        assert!(store.find_by_id(saved.id, &alice).await.unwrap().is_some());
        assert!(store.find_by_id(saved.id, &bob).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stale_write_rejected() {
        let store = MemoryStore::new();
        let saved = store.save(&goal("alice")).await.unwrap();

        let mut first = saved.clone();
        first.title = "First writer".to_string();
        let mut second = saved.clone();
        second.title = "Second writer".to_string();

        store.save(&first).await.unwrap();
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { expected: 1, found: 2, .. }));

        let stored = store.find_by_id(saved.id, &UserId::new("alice")).await.unwrap().unwrap();
        assert_eq!(stored.title, "First writer");
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let store = MemoryStore::new();
        store.save(&goal("alice")).await.unwrap();
        store.save(&goal("alice")).await.unwrap();
        store.save(&goal("bob")).await.unwrap();

        assert_eq!(store.list_by_owner(&UserId::new("alice")).await.unwrap().len(), 2);
        assert_eq!(store.len().await, 3);
    }
}
