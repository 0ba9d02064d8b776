//! The household component tree consumed by the materializer
//!
//! Nodes are held behind `Arc` so that a merged tree shares every subtree it
//! did not touch with the tree it was derived from.

use super::component::ComponentSpec;
use super::target::ComponentKey;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Base salary and bonus for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonIncomeSpecs {
    pub base: Arc<ComponentSpec>,
    pub bonus: Arc<ComponentSpec>,
}

impl PersonIncomeSpecs {
    pub fn new(base: ComponentSpec, bonus: ComponentSpec) -> Self {
        Self {
            base: Arc::new(base),
            bonus: Arc::new(bonus),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSpecs {
    pub user: Arc<PersonIncomeSpecs>,
    pub partner: Option<Arc<PersonIncomeSpecs>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendSpecs {
    pub lifestyle: Arc<ComponentSpec>,
    pub housing: Arc<ComponentSpec>,
}

/// An explicitly reported monthly net pay figure for an age range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedValue {
    pub from_age: u32,
    #[serde(default)]
    pub to_age: Option<u32>,
    pub value: f64,
}

impl ObservedValue {
    pub fn applies_at(&self, age: u32) -> bool {
        self.from_age <= age && self.to_age.map_or(true, |to| age <= to)
    }
}

/// Whole-household component tree for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpecInputs {
    pub timeline: Timeline,
    pub partner_enabled: bool,
    pub income: Arc<IncomeSpecs>,
    pub spend: Arc<SpendSpecs>,

    /// Observed monthly net pay, in caller order (not sorted)
    #[serde(default)]
    pub observed_net_pay: Arc<Vec<ObservedValue>>,
}

impl RuleSpecInputs {
    /// Assemble a tree; partner specs are kept iff `partner` is given
    pub fn new(
        timeline: Timeline,
        user: PersonIncomeSpecs,
        partner: Option<PersonIncomeSpecs>,
        lifestyle: ComponentSpec,
        housing: ComponentSpec,
    ) -> Self {
        Self {
            timeline,
            partner_enabled: partner.is_some(),
            income: Arc::new(IncomeSpecs {
                user: Arc::new(user),
                partner: partner.map(Arc::new),
            }),
            spend: Arc::new(SpendSpecs {
                lifestyle: Arc::new(lifestyle),
                housing: Arc::new(housing),
            }),
            observed_net_pay: Arc::new(Vec::new()),
        }
    }

    pub fn with_observed_net_pay(mut self, observed: Vec<ObservedValue>) -> Self {
        self.observed_net_pay = Arc::new(observed);
        self
    }

    /// Look up a component; partner components are `None` without a partner
    pub fn component(&self, key: ComponentKey) -> Option<&ComponentSpec> {
        match key {
            ComponentKey::UserBaseIncome => Some(&*self.income.user.base),
            ComponentKey::UserBonus => Some(&*self.income.user.bonus),
            ComponentKey::PartnerBaseIncome => self.income.partner.as_ref().map(|p| &*p.base),
            ComponentKey::PartnerBonus => self.income.partner.as_ref().map(|p| &*p.bonus),
            ComponentKey::LifestyleSpend => Some(&*self.spend.lifestyle),
            ComponentKey::HousingSpend => Some(&*self.spend.housing),
        }
    }

    /// Mutable access along a copy-on-write path from the root to `key`
    ///
    /// Every `Arc` on the path is cloned if shared; siblings stay shared.
    pub(crate) fn component_mut(&mut self, key: ComponentKey) -> Option<&mut ComponentSpec> {
        match key {
            ComponentKey::UserBaseIncome => {
                let user = Arc::make_mut(&mut Arc::make_mut(&mut self.income).user);
                Some(Arc::make_mut(&mut user.base))
            }
            ComponentKey::UserBonus => {
                let user = Arc::make_mut(&mut Arc::make_mut(&mut self.income).user);
                Some(Arc::make_mut(&mut user.bonus))
            }
            ComponentKey::PartnerBaseIncome => {
                let partner = Arc::make_mut(&mut self.income).partner.as_mut()?;
                Some(Arc::make_mut(&mut Arc::make_mut(partner).base))
            }
            ComponentKey::PartnerBonus => {
                let partner = Arc::make_mut(&mut self.income).partner.as_mut()?;
                Some(Arc::make_mut(&mut Arc::make_mut(partner).bonus))
            }
            ComponentKey::LifestyleSpend => {
                Some(Arc::make_mut(&mut Arc::make_mut(&mut self.spend).lifestyle))
            }
            ComponentKey::HousingSpend => {
                Some(Arc::make_mut(&mut Arc::make_mut(&mut self.spend).housing))
            }
        }
    }

    /// Components present in this tree, in materialization order
    pub fn component_keys(&self) -> Vec<ComponentKey> {
        ComponentKey::ALL
            .iter()
            .copied()
            .filter(|k| self.partner_enabled || !k.is_partner())
            .collect()
    }
}
