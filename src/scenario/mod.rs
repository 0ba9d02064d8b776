//! Scenario composition over a caller-owned baseline plan
//!
//! Holds the plan state once, then composes any number of card/draft
//! combinations against it. Every call derives its own spec tree, so calls
//! are independent and may run concurrently.
//!
//! # Example
//! ```ignore
//! let composer = ScenarioComposer::new(plan);
//!
//! match composer.compose(&cards, Some(&draft[..]))? {
//!     ScenarioOutcome::Baseline => reuse_baseline_output(),
//!     ScenarioOutcome::Modified(inputs) => project(inputs),
//! }
//! ```

mod card;
mod compose;

pub use card::ScenarioCard;
pub use compose::{collect_overrides, compose_scenario, ScenarioOutcome};

use crate::error::Result;
use crate::materialize::{MaterializedInputs, Materializer, MaterializerConfig};
use crate::plan::PlanState;
use crate::spec::TargetedOverride;
use rayon::prelude::*;

/// Composer bound to one baseline plan
#[derive(Debug, Clone)]
pub struct ScenarioComposer {
    plan: PlanState,
    materializer: Materializer,
}

impl ScenarioComposer {
    /// Composer with the default materializer config
    pub fn new(plan: PlanState) -> Self {
        Self::with_config(plan, MaterializerConfig::default())
    }

    pub fn with_config(plan: PlanState, config: MaterializerConfig) -> Self {
        Self {
            plan,
            materializer: Materializer::new(config),
        }
    }

    pub fn plan(&self) -> &PlanState {
        &self.plan
    }

    /// Materialize the unmodified baseline
    pub fn baseline(&self) -> Result<MaterializedInputs> {
        self.materializer.materialize(&self.plan.derive_inputs()?)
    }

    /// Compose enabled cards plus an optional draft
    pub fn compose(
        &self,
        cards: &[ScenarioCard],
        draft: Option<&[TargetedOverride]>,
    ) -> Result<ScenarioOutcome> {
        compose_scenario(&self.plan, cards, draft, &self.materializer)
    }

    /// Like [`compose`](Self::compose), but always returns rows
    pub fn resolve(
        &self,
        cards: &[ScenarioCard],
        draft: Option<&[TargetedOverride]>,
    ) -> Result<MaterializedInputs> {
        match self.compose(cards, draft)? {
            ScenarioOutcome::Baseline => self.baseline(),
            ScenarioOutcome::Modified(inputs) => Ok(inputs),
        }
    }

    /// Preview each enabled card on its own, in parallel
    ///
    /// Results come back in input order, paired with the card id.
    pub fn preview_each(&self, cards: &[ScenarioCard]) -> Vec<(String, Result<ScenarioOutcome>)> {
        cards
            .par_iter()
            .filter(|card| card.enabled)
            .map(|card| {
                let outcome = self.compose(std::slice::from_ref(card), None);
                (card.id.clone(), outcome)
            })
            .collect()
    }
}
