//! Fold enabled cards and a draft into one override batch and materialize it

use super::card::ScenarioCard;
use crate::error::Result;
use crate::materialize::{MaterializedInputs, Materializer};
use crate::merge::apply_targeted_overrides;
use crate::plan::PlanState;
use crate::spec::TargetedOverride;
use serde::{Deserialize, Serialize};

/// Result of composing a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ScenarioOutcome {
    /// Nothing to apply: reuse the baseline's own output
    Baseline,
    /// Materialized inputs with every enabled card and the draft applied
    Modified(MaterializedInputs),
}

impl ScenarioOutcome {
    pub fn is_baseline(&self) -> bool {
        matches!(self, ScenarioOutcome::Baseline)
    }

    pub fn modified(&self) -> Option<&MaterializedInputs> {
        match self {
            ScenarioOutcome::Baseline => None,
            ScenarioOutcome::Modified(m) => Some(m),
        }
    }
}

/// Flatten enabled cards (creation order) followed by the draft
pub fn collect_overrides(
    cards: &[ScenarioCard],
    draft: Option<&[TargetedOverride]>,
) -> Vec<TargetedOverride> {
    let mut enabled: Vec<&ScenarioCard> = cards.iter().filter(|c| c.enabled).collect();
    enabled.sort_by(ScenarioCard::creation_order);

    let mut batch: Vec<TargetedOverride> = enabled
        .iter()
        .flat_map(|c| c.overrides.iter().copied())
        .collect();

    // Draft goes last so a live preview wins ties against saved cards
    if let Some(draft) = draft {
        batch.extend_from_slice(draft);
    }
    batch
}

/// Compose a scenario from scratch
///
/// The baseline tree is derived fresh from `plan` on every call, so a plan
/// that cannot produce a baseline fails even when there is nothing to apply.
pub fn compose_scenario(
    plan: &PlanState,
    cards: &[ScenarioCard],
    draft: Option<&[TargetedOverride]>,
    materializer: &Materializer,
) -> Result<ScenarioOutcome> {
    let baseline = plan.derive_inputs()?;

    let batch = collect_overrides(cards, draft);
    if batch.is_empty() {
        log::debug!("no enabled cards and no draft; caller keeps baseline output");
        return Ok(ScenarioOutcome::Baseline);
    }

    let merged = apply_targeted_overrides(&baseline, &batch).map_err(|e| {
        log::warn!("rejected scenario batch of {} overrides: {}", batch.len(), e);
        e
    })?;

    log::debug!(
        "composing {} enabled cards ({} overrides, draft: {})",
        cards.iter().filter(|c| c.enabled).count(),
        batch.len(),
        draft.is_some()
    );
    Ok(ScenarioOutcome::Modified(materializer.materialize(&merged)?))
}
