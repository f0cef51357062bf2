//! Explicit, field-by-field goal modification.

use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::goal::{Goal, GoalCategory, DESCRIPTION_MAX, TITLE_MAX};
use crate::history::Metadata;
use crate::validation::{required_text, ValidationError};
use crate::Time;

/// Changes to apply to a goal's descriptive fields.
///
/// Status is changed through its own operation so it gets a `status_change`
/// history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<GoalCategory>,
    /// New deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<Time>,
}

impl GoalPatch {
    /// Whether the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.target_date.is_none()
    }

    /// Validate every field, then merge into `goal`.
    ///
    /// Returns the `{field: {from, to}}` diff of fields that actually changed.
    /// On error the goal is untouched.
    pub fn apply(&self, goal: &mut Goal, now: Time) -> Result<Metadata, ValidationError> {
        let title = self
            .title
            .as_deref()
            .map(|t| required_text("title", t, TITLE_MAX))
            .transpose()?;
        let description = self
            .description
            .as_deref()
            .map(|d| required_text("description", d, DESCRIPTION_MAX))
            .transpose()?;
        if let Some(target) = self.target_date {
            if target <= now {
                return Err(ValidationError::TargetDateNotInFuture);
            }
            if target <= goal.created_at {
                return Err(ValidationError::InvalidSchedule);
            }
        }

        let mut changes = Metadata::new();
        if let Some(title) = title {
            if title != goal.title {
                changes.insert("title".into(), json!({ "from": goal.title, "to": title }));
                goal.title = title;
            }
        }
        if let Some(description) = description {
            if description != goal.description {
                changes.insert(
                    "description".into(),
                    json!({ "from": goal.description, "to": description }),
                );
                goal.description = description;
            }
        }
        if let Some(category) = self.category {
            if category != goal.category {
                changes.insert(
                    "category".into(),
                    json!({ "from": goal.category, "to": category }),
                );
                goal.category = category;
            }
        }
        if let Some(target) = self.target_date {
            if target != goal.target_date {
                changes.insert(
                    "targetDate".into(),
                    json!({ "from": goal.target_date, "to": target }),
                );
                goal.target_date = target;
            }
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::NewGoal;
    use crate::id::UserId;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()
    }

    fn goal() -> Goal {
        Goal::new(
            UserId::new("u1"),
            NewGoal {
                title: "Learn Spanish".to_string(),
                description: "Hold a 10 minute conversation".to_string(),
                category: GoalCategory::Personal,
                target_date: now() + Duration::days(60),
            },
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_apply_records_diff() {
        let mut goal = goal();
        let patch = GoalPatch {
            title: Some("Learn Portuguese".to_string()),
            category: Some(GoalCategory::Career),
            ..Default::default()
        };

        let changes = patch.apply(&mut goal, now()).unwrap();
        assert_eq!(goal.title, "Learn Portuguese");
        assert_eq!(goal.category, GoalCategory::Career);
        assert_eq!(changes["title"]["from"], json!("Learn Spanish"));
        assert_eq!(changes["category"]["to"], json!("career"));
        assert!(!changes.contains_key("description"));
    }

    #[test]
    fn test_unchanged_fields_not_in_diff() {
        let mut goal = goal();
        let patch = GoalPatch {
            title: Some("  Learn Spanish ".to_string()),
            ..Default::default()
        };
        assert!(patch.apply(&mut goal, now()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_field_leaves_goal_untouched() {
        let mut goal = goal();
        let before = goal.clone();
        let patch = GoalPatch {
            title: Some("Something else".to_string()),
            target_date: Some(now() - Duration::days(1)),
            ..Default::default()
        };

        assert_eq!(patch.apply(&mut goal, now()), Err(ValidationError::TargetDateNotInFuture));
        assert_eq!(goal, before);
    }
}
