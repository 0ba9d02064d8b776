//! Rule-spec data model: components, overrides, targets and the household tree

mod component;
mod inputs;
mod target;

pub use component::{ComponentSpec, GrowthOverride, GrowthRule, Override, OverrideKind};
pub use inputs::{IncomeSpecs, ObservedValue, PersonIncomeSpecs, RuleSpecInputs, SpendSpecs};
pub use target::{ComponentKey, TargetKey, TargetedOverride};
