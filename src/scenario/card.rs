//! Scenario cards: named, toggleable override bundles

use crate::spec::TargetedOverride;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A saved what-if bundle
///
/// Only `enabled` changes after creation; everything else is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCard {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub enabled: bool,
    pub overrides: Vec<TargetedOverride>,
}

impl ScenarioCard {
    pub fn new(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        title: impl Into<String>,
        overrides: Vec<TargetedOverride>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            title: title.into(),
            summary: String::new(),
            enabled: true,
            overrides,
        }
    }

    /// Promote a previewed draft into a saved card
    pub fn from_draft(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        title: impl Into<String>,
        summary: impl Into<String>,
        draft: &[TargetedOverride],
    ) -> Self {
        Self {
            summary: summary.into(),
            ..Self::new(id, created_at, title, draft.to_vec())
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Copy of this card with a different toggle state
    pub fn toggled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    /// Composition order: creation time, then id
    pub(crate) fn creation_order(a: &&ScenarioCard, b: &&ScenarioCard) -> Ordering {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}
