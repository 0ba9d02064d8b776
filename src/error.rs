//! Error taxonomy for the rule-spec engine
//!
//! Every error aborts the enclosing operation (a whole merge batch or a whole
//! series build). Nothing is skipped and nothing is retried.

use thiserror::Error;

/// Broad class of a [`RuleSpecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad timeline construction or lookup
    Validation,
    /// Target does not fit the spec tree
    Structural,
    /// Non-finite or sign-violating numbers
    Numeric,
    /// Series length does not match the timeline
    Shape,
    /// Failure reading plan state, cards or override files
    Input,
}

#[derive(Debug, Error)]
pub enum RuleSpecError {
    #[error("invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("age {age} is outside the timeline [{start_age}, {end_age}]")]
    AgeOutOfRange { age: i64, start_age: u32, end_age: u32 },

    #[error("unknown override target: {0}")]
    UnknownTarget(String),

    #[error("unknown override kind: {0}")]
    UnknownKind(String),

    #[error("target {0} is partner-scoped but the plan has no partner")]
    PartnerDisabled(String),

    #[error("growth-rate target {target} only accepts `set`, got `{kind}`")]
    GrowthKindNotSet { target: String, kind: String },

    #[error("component {0} uses flat growth and cannot take a growth-rate override")]
    GrowthOnFlatComponent(String),

    #[error("override range is inverted: to_age {to_age} < from_age {from_age}")]
    InvalidRange { from_age: u32, to_age: u32 },

    #[error("non-finite value in {context}: {value}")]
    NonFinite { context: String, value: f64 },

    #[error("set override at age {age} has negative value {value}")]
    NegativeSet { age: u32, value: f64 },

    #[error("mult override at age {age} has non-positive factor {value}")]
    NonPositiveMultiplier { age: u32, value: f64 },

    #[error("value went negative at age {age}: {value}")]
    NegativeValue { age: u32, value: f64 },

    #[error("series {component} has {actual} values, timeline has {expected}")]
    LengthMismatch {
        component: String,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RuleSpecError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuleSpecError::InvalidTimeline(_) | RuleSpecError::AgeOutOfRange { .. } => {
                ErrorCategory::Validation
            }
            RuleSpecError::UnknownTarget(_)
            | RuleSpecError::UnknownKind(_)
            | RuleSpecError::PartnerDisabled(_)
            | RuleSpecError::GrowthKindNotSet { .. }
            | RuleSpecError::GrowthOnFlatComponent(_)
            | RuleSpecError::InvalidRange { .. } => ErrorCategory::Structural,
            RuleSpecError::NonFinite { .. }
            | RuleSpecError::NegativeSet { .. }
            | RuleSpecError::NonPositiveMultiplier { .. }
            | RuleSpecError::NegativeValue { .. } => ErrorCategory::Numeric,
            RuleSpecError::LengthMismatch { .. } => ErrorCategory::Shape,
            RuleSpecError::Io(_) | RuleSpecError::Json(_) | RuleSpecError::Csv(_) => {
                ErrorCategory::Input
            }
        }
    }

    /// Shorthand for a non-finite error with a context label
    pub(crate) fn non_finite(context: impl Into<String>, value: f64) -> Self {
        RuleSpecError::NonFinite {
            context: context.into(),
            value,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, RuleSpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            RuleSpecError::PartnerDisabled("income.partner.base".into()).category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            RuleSpecError::NegativeValue { age: 40, value: -1.0 }.category(),
            ErrorCategory::Numeric
        );
        assert_eq!(
            RuleSpecError::LengthMismatch {
                component: "spend.housing".into(),
                expected: 3,
                actual: 2
            }
            .category(),
            ErrorCategory::Shape
        );
    }

    #[test]
    fn test_display_names_the_target() {
        let err = RuleSpecError::GrowthKindNotSet {
            target: "spend.lifestyle.growthRate".into(),
            kind: "add".into(),
        };
        assert!(err.to_string().contains("spend.lifestyle.growthRate"));
    }
}
