//! Field validation shared by every goal mutation.

/// Errors raised when input would violate a goal invariant.
///
/// These are always reported before any state is mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is blank
    #[error("{field} is required")]
    Empty {
        /// Offending field
        field: &'static str,
    },

    /// A text field exceeds its maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field
        field: &'static str,
        /// Maximum number of characters
        max: usize,
    },

    /// Metric target is zero, negative or not a number
    #[error("metric target must be a positive number, got {0}")]
    NonPositiveTarget(f64),

    /// Metric value is negative or not a number
    #[error("metric value must be zero or greater, got {0}")]
    NegativeValue(f64),

    /// Scheduled day outside 0..=6
    #[error("invalid day number {0} (expected 0-6)")]
    InvalidScheduledDay(u8),

    /// Scheduled time is not `HH:MM`
    #[error("invalid time format {0:?} (use HH:MM)")]
    InvalidScheduledTime(String),

    /// Target date is not after the reference instant
    #[error("target date must be in the future")]
    TargetDateNotInFuture,

    /// Target date does not come after the creation date
    #[error("target date must be after the creation date")]
    InvalidSchedule,

    /// Unknown enumerated value
    #[error("invalid {kind}: {value}")]
    UnknownVariant {
        /// Enumeration name
        kind: &'static str,
        /// Rejected input
        value: String,
    },
}

/// Trim `value` and check it is non-empty and at most `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("title", "  Run  ", 100).unwrap(), "Run");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        assert_eq!(
            required_text("title", "   ", 100),
            Err(ValidationError::Empty { field: "title" })
        );
    }

    #[test]
    fn test_required_text_counts_chars() {
        let long = "é".repeat(101);
        assert_eq!(
            required_text("title", &long, 100),
            Err(ValidationError::TooLong { field: "title", max: 100 })
        );
        assert!(required_text("title", &"é".repeat(100), 100).is_ok());
    }
}
