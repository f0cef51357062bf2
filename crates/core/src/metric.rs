//! Metric model - a measurable sub-target of a goal.

use serde::{Deserialize, Serialize};
use crate::id::MetricId;
use crate::validation::{required_text, ValidationError};

/// A named, quantified sub-target contributing to goal progress.
///
/// `progress` is private so it can never drift from `current_value / target`.
/// Deserialization re-validates target and value and recomputes progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredMetric")]
pub struct Metric {
    /// Unique identifier
    pub id: MetricId,

    /// Display name
    pub name: String,

    /// Target value, always > 0
    target: f64,

    /// Current value, always >= 0
    current_value: f64,

    /// Unit of measure
    pub unit: String,

    /// Completion percentage (0-100)
    progress: f64,
}

/// Input for adding a metric to a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMetric {
    /// Display name
    pub name: String,
    /// Target value
    pub target: f64,
    /// Unit of measure
    pub unit: String,
    /// Starting value
    #[serde(default)]
    pub current_value: f64,
}

/// Wire shape of a persisted metric; stored `progress` is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMetric {
    id: MetricId,
    name: String,
    target: f64,
    current_value: f64,
    unit: String,
}

impl TryFrom<StoredMetric> for Metric {
    type Error = ValidationError;

    fn try_from(raw: StoredMetric) -> Result<Self, Self::Error> {
        validate_target(raw.target)?;
        validate_value(raw.current_value)?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            target: raw.target,
            current_value: raw.current_value,
            unit: raw.unit,
            progress: metric_progress(raw.current_value, raw.target),
        })
    }
}

impl Metric {
    /// Validate and build a metric.
    pub fn new(input: NewMetric) -> Result<Self, ValidationError> {
        let name = required_text("metric name", &input.name, 100)?;
        let unit = required_text("metric unit", &input.unit, 50)?;
        validate_target(input.target)?;
        validate_value(input.current_value)?;

        Ok(Self {
            id: MetricId::new(),
            name,
            target: input.target,
            current_value: input.current_value,
            unit,
            progress: metric_progress(input.current_value, input.target),
        })
    }

    /// Target value.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current value.
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Completion percentage, clamped to 100.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Set a new current value and recompute progress.
    pub fn set_current_value(&mut self, value: f64) -> Result<(), ValidationError> {
        validate_value(value)?;
        self.current_value = value;
        self.progress = metric_progress(value, self.target);
        Ok(())
    }
}

fn validate_target(target: f64) -> Result<(), ValidationError> {
    if target.is_finite() && target > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveTarget(target))
    }
}

fn validate_value(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeValue(value))
    }
}

/// `min(100, current / target * 100)`; callers guarantee `target > 0`.
fn metric_progress(current: f64, target: f64) -> f64 {
    (current / target * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(target: f64, current: f64) -> Result<Metric, ValidationError> {
        Metric::new(NewMetric {
            name: "Distance".to_string(),
            target,
            unit: "km".to_string(),
            current_value: current,
        })
    }

    #[test]
    fn test_progress_is_ratio() {
        assert_eq!(metric(10.0, 5.0).unwrap().progress(), 50.0);
    }

    #[test]
    fn test_progress_clamped_at_100() {
        assert_eq!(metric(4.0, 12.0).unwrap().progress(), 100.0);
    }

    #[test]
    fn test_zero_target_rejected() {
        assert_eq!(metric(0.0, 1.0), Err(ValidationError::NonPositiveTarget(0.0)));
        assert!(matches!(metric(-3.0, 1.0), Err(ValidationError::NonPositiveTarget(_))));
        assert!(matches!(metric(f64::NAN, 1.0), Err(ValidationError::NonPositiveTarget(_))));
    }

    #[test]
    fn test_set_value_recomputes_progress() {
        let mut m = metric(8.0, 0.0).unwrap();
        m.set_current_value(2.0).unwrap();
        assert_eq!(m.current_value(), 2.0);
        assert_eq!(m.progress(), 25.0);
    }

    #[test]
    fn test_deserialize_recomputes_progress() {
        let m = metric(10.0, 5.0).unwrap();
        let mut json = serde_json::to_value(&m).unwrap();
        json["progress"] = serde_json::json!(99.0);

        let loaded: Metric = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.progress(), 50.0);
        assert_eq!(loaded.id, m.id);
    }

    #[test]
    fn test_deserialize_rejects_invalid_target_and_value() {
        let m = metric(10.0, 5.0).unwrap();

        let mut zero_target = serde_json::to_value(&m).unwrap();
        zero_target["target"] = serde_json::json!(0.0);
        assert!(serde_json::from_value::<Metric>(zero_target).is_err());

        let mut negative = serde_json::to_value(&m).unwrap();
        negative["currentValue"] = serde_json::json!(-1.0);
        assert!(serde_json::from_value::<Metric>(negative).is_err());
    }

    #[test]
    fn test_negative_value_leaves_metric_untouched() {
        let mut m = metric(8.0, 4.0).unwrap();
        assert_eq!(m.set_current_value(-1.0), Err(ValidationError::NegativeValue(-1.0)));
        assert_eq!(m.current_value(), 4.0);
        assert_eq!(m.progress(), 50.0);
    }
}
