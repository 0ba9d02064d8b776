//! Override merge: apply a batch of targeted overrides to a spec tree
//!
//! The input tree is never touched. The returned tree shares every subtree
//! that no override reached; only the path from the root to each edited
//! component is copied.

use crate::error::{Result, RuleSpecError};
use crate::spec::{GrowthOverride, OverrideKind, RuleSpecInputs, TargetKey, TargetedOverride};

/// Check a single targeted override against the tree it will land in
fn check_target(inputs: &RuleSpecInputs, ov: &TargetedOverride) -> Result<()> {
    if ov.target.is_partner() && !inputs.partner_enabled {
        return Err(RuleSpecError::PartnerDisabled(ov.target.to_string()));
    }

    if let Some(to_age) = ov.to_age {
        if to_age < ov.from_age {
            return Err(RuleSpecError::InvalidRange {
                from_age: ov.from_age,
                to_age,
            });
        }
    }

    if let TargetKey::GrowthRate(component) = ov.target {
        if ov.kind != OverrideKind::Set {
            return Err(RuleSpecError::GrowthKindNotSet {
                target: ov.target.to_string(),
                kind: ov.kind.to_string(),
            });
        }
        let spec = inputs
            .component(component)
            .ok_or_else(|| RuleSpecError::PartnerDisabled(ov.target.to_string()))?;
        if !spec.growth.is_percentage() {
            return Err(RuleSpecError::GrowthOnFlatComponent(component.to_string()));
        }
    }

    Ok(())
}

/// Apply `batch` in order, returning a new tree
///
/// The batch is validated in full before anything is applied, so an error
/// means nothing was applied.
pub fn apply_targeted_overrides(
    inputs: &RuleSpecInputs,
    batch: &[TargetedOverride],
) -> Result<RuleSpecInputs> {
    for ov in batch {
        check_target(inputs, ov)?;
    }

    let mut merged = inputs.clone();
    for ov in batch {
        let component = ov.target.component();
        let spec = merged
            .component_mut(component)
            .ok_or_else(|| RuleSpecError::PartnerDisabled(ov.target.to_string()))?;

        match ov.target {
            TargetKey::Value(_) => spec.overrides.push(ov.as_override()),
            TargetKey::GrowthRate(_) => {
                if ov.to_age.is_some() {
                    log::debug!(
                        "{}: growth override from age {} ignores to_age",
                        ov.target,
                        ov.from_age
                    );
                }
                spec.growth_overrides.push(GrowthOverride {
                    from_age: ov.from_age,
                    value: ov.value,
                });
            }
        }
    }

    log::debug!("merged {} targeted overrides", batch.len());
    Ok(merged)
}
