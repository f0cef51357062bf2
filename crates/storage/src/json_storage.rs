//! JSON file storage implementation.
//!
//! Stores each goal as a JSON file under `goals/` and keeps a small per-goal
//! meta marker (version + owner + updated_at) under `meta/goals/`.
//!
//! The goal file's own `version` field is the only version authority. The
//! meta marker is informational and may lag behind after a failed write.
//! Writers are serialized within one process only; two processes sharing a
//! data directory can still overwrite each other.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use goaltrack_core::{Goal, GoalId, UserId};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use super::trait_::{next_version, GoalStore, Result};

/// File-based JSON storage backend.
///
/// Safe for any number of tasks in one process. Not safe for concurrent
/// writers in separate processes.
pub struct JsonStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MetaMarker {
    version: u64,
    owner_id: UserId,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directories it needs.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("goals")).await?;
        fs::create_dir_all(root.join("meta").join("goals")).await?;

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }

    fn meta_path(&self, id: GoalId) -> PathBuf {
        self.root.join("meta").join("goals").join(format!("{}.meta.json", id))
    }

    async fn stored_version(&self, id: GoalId) -> Result<Option<u64>> {
        let stored: Option<Goal> = read_json(&self.goal_path(id)).await?;
        Ok(stored.map(|g| g.version))
    }
}

#[async_trait]
impl GoalStore for JsonStorage {
    async fn find_by_id(&self, id: GoalId, owner: &UserId) -> Result<Option<Goal>> {
        let goal: Option<Goal> = read_json(&self.goal_path(id)).await?;
        Ok(goal.filter(|g| &g.owner_id == owner))
    }

    async fn save(&self, goal: &Goal) -> Result<Goal> {
        let _guard = self.write_lock.lock().await;

        let version = next_version(goal, self.stored_version(goal.id).await?)?;
        let mut stored = goal.clone();
        stored.version = version;

        write_json(&self.goal_path(stored.id), &stored).await?;
        let meta = MetaMarker {
            version,
            owner_id: stored.owner_id.clone(),
            updated_at: chrono::Utc::now(),
        };
        if let Err(e) = write_json(&self.meta_path(stored.id), &meta).await {
            tracing::warn!("Goal {} saved but meta marker not updated: {}", stored.id, e);
        }

        tracing::debug!("Saved goal {} at version {}", stored.id, version);
        Ok(stored)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Goal>> {
        let all: Vec<Goal> = list_dir(&self.root.join("goals")).await?;
        let mut owned: Vec<Goal> = all.into_iter().filter(|g| &g.owner_id == owner).collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write to a sibling temp file, then rename over the target.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping unreadable goal file {:?}: {}", entry.path(), e),
        }
    }
    Ok(items)
}
