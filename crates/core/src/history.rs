//! Append-only history log of goal events.
//!
//! The log is the source of truth for trend analytics. Entries are never
//! mutated, removed or reordered once appended, and timestamps are
//! non-decreasing.

use serde::{Deserialize, Serialize};
use crate::Time;

/// Kind of history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntryType {
    /// Goal was created
    Created,
    /// Goal data (metrics, actions, fields) changed
    Modified,
    /// A milestone was achieved
    Milestone,
    /// Goal status changed
    StatusChange,
}

impl HistoryEntryType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryEntryType::Created => "created",
            HistoryEntryType::Modified => "modified",
            HistoryEntryType::Milestone => "milestone",
            HistoryEntryType::StatusChange => "status_change",
        }
    }
}

/// Free-form metadata attached to an entry.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A single immutable event in a goal's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry kind
    #[serde(rename = "type")]
    pub entry_type: HistoryEntryType,

    /// Human-readable description
    pub description: String,

    /// When the event happened
    pub timestamp: Time,

    /// Additional structured data
    #[serde(default)]
    pub metadata: Metadata,
}

/// Ordered, append-only sequence of [`HistoryEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with `now` and return it.
    ///
    /// If `now` is earlier than the last entry the last timestamp is reused
    /// so the log stays ordered.
    pub fn append(
        &mut self,
        entry_type: HistoryEntryType,
        description: impl Into<String>,
        metadata: Metadata,
        now: Time,
    ) -> &HistoryEntry {
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.entries.push(HistoryEntry {
            entry_type,
            description: description.into(),
            timestamp,
            metadata,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries at or after `start` whose type is in `types`.
    pub fn since<'a>(
        &'a self,
        start: Time,
        types: &'a [HistoryEntryType],
    ) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        // Sorted by timestamp, so skip the prefix before `start`
        let first = self.entries.partition_point(|e| e.timestamp < start);
        self.entries[first..]
            .iter()
            .filter(move |e| types.contains(&e.entry_type))
    }
}

/// Build a metadata map from key/value pairs.
pub fn metadata<I, K>(pairs: I) -> Metadata
where
    I: IntoIterator<Item = (K, serde_json::Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_append_keeps_order() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntryType::Created, "Goal created", Metadata::new(), t0());
        log.append(
            HistoryEntryType::Modified,
            "Metric progress updated",
            metadata([("newValue", json!(5))]),
            t0() + Duration::hours(1),
        );

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].metadata["newValue"], json!(5));
        assert!(log.entries()[0].timestamp <= log.entries()[1].timestamp);
    }

    #[test]
    fn test_append_clamps_backwards_clock() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntryType::Created, "Goal created", Metadata::new(), t0());
        let entry = log.append(
            HistoryEntryType::Modified,
            "late",
            Metadata::new(),
            t0() - Duration::minutes(5),
        );
        assert_eq!(entry.timestamp, t0());
    }

    #[test]
    fn test_since_filters_by_time_and_type() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntryType::Created, "Goal created", Metadata::new(), t0());
        log.append(HistoryEntryType::Modified, "old", Metadata::new(), t0() + Duration::days(1));
        log.append(HistoryEntryType::Milestone, "new", Metadata::new(), t0() + Duration::days(5));
        log.append(HistoryEntryType::StatusChange, "paused", Metadata::new(), t0() + Duration::days(6));

        let types = [HistoryEntryType::Modified, HistoryEntryType::Milestone];
        let found: Vec<_> = log
            .since(t0() + Duration::days(1), &types)
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(found, vec!["old", "new"]);
    }

    #[test]
    fn test_entry_type_serialized_snake_case() {
        let mut log = HistoryLog::new();
        log.append(HistoryEntryType::StatusChange, "done", Metadata::new(), t0());
        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value[0]["type"], json!("status_change"));
    }
}
