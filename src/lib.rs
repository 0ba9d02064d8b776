//! Household Projection - deterministic what-if inputs for household financial plans
//!
//! This library provides:
//! - An age-indexed projection timeline
//! - A series builder that compounds a component forward and applies
//!   time-scoped set/add/mult/cap overrides and growth-rate replacements
//! - Copy-on-write merging of targeted override batches onto a spec tree
//! - Materialization of every tracked income/spend component into dense
//!   per-year records
//! - Scenario composition over enabled cards and a live draft

pub mod error;
pub mod timeline;
pub mod spec;
pub mod series;
pub mod merge;
pub mod materialize;
pub mod plan;
pub mod scenario;

// Re-export commonly used types
pub use error::{ErrorCategory, Result, RuleSpecError};
pub use timeline::Timeline;
pub use spec::{
    ComponentKey, ComponentSpec, GrowthOverride, GrowthRule, Override, OverrideKind,
    RuleSpecInputs, TargetKey, TargetedOverride,
};
pub use series::{AddMode, SeriesBuilder};
pub use merge::apply_targeted_overrides;
pub use materialize::{MaterializedInputs, Materializer, MaterializerConfig, YearInputs};
pub use plan::PlanState;
pub use scenario::{ScenarioCard, ScenarioComposer, ScenarioOutcome};
