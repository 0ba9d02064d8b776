//! Baseline plan state owned by the caller

use crate::error::Result;
use crate::spec::{
    ComponentSpec, GrowthRule, ObservedValue, Override, PersonIncomeSpecs, RuleSpecInputs,
};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Default growth for salaries when a plan omits it
fn default_income_growth() -> f64 {
    0.03
}

/// Default end of the projection horizon
fn default_end_age() -> f64 {
    95.0
}

/// One person's income figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonIncome {
    /// Annual base salary
    pub base_income: f64,

    /// Annual salary growth (decimal)
    #[serde(default = "default_income_growth")]
    pub base_growth_rate: f64,

    /// Annual bonus
    #[serde(default)]
    pub bonus: f64,

    /// Annual bonus growth (decimal)
    #[serde(default)]
    pub bonus_growth_rate: f64,

    /// Age at which salary and bonus stop
    #[serde(default)]
    pub retirement_age: Option<u32>,
}

impl PersonIncome {
    pub fn new(base_income: f64, base_growth_rate: f64) -> Self {
        Self {
            base_income,
            base_growth_rate,
            bonus: 0.0,
            bonus_growth_rate: 0.0,
            retirement_age: None,
        }
    }

    pub fn with_bonus(mut self, bonus: f64, growth_rate: f64) -> Self {
        self.bonus = bonus;
        self.bonus_growth_rate = growth_rate;
        self
    }

    pub fn retiring_at(mut self, age: u32) -> Self {
        self.retirement_age = Some(age);
        self
    }

    fn to_specs(&self) -> PersonIncomeSpecs {
        let mut base = ComponentSpec::percentage(self.base_income, self.base_growth_rate);
        let mut bonus = ComponentSpec::percentage(self.bonus, self.bonus_growth_rate);

        // Retirement is part of the baseline, so scenarios compose on top of it
        if let Some(age) = self.retirement_age {
            base.overrides.push(Override::set(0.0, age, None));
            bonus.overrides.push(Override::set(0.0, age, None));
        }

        PersonIncomeSpecs::new(base, bonus)
    }
}

/// One spending line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendLine {
    pub annual: f64,
    pub growth: GrowthRule,
}

impl SpendLine {
    pub fn new(annual: f64, growth: GrowthRule) -> Self {
        Self { annual, growth }
    }

    fn to_spec(self) -> ComponentSpec {
        ComponentSpec::new(self.annual, self.growth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenses {
    pub lifestyle: SpendLine,
    pub housing: SpendLine,
}

/// The household's current baseline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanState {
    pub current_age: f64,

    #[serde(default = "default_end_age")]
    pub end_age: f64,

    pub user: PersonIncome,

    /// Present iff the household has a partner
    #[serde(default)]
    pub partner: Option<PersonIncome>,

    pub expenses: Expenses,

    /// Reported monthly take-home figures
    #[serde(default)]
    pub observed_net_pay: Vec<ObservedValue>,
}

impl PlanState {
    pub fn new(current_age: u32, user: PersonIncome, expenses: Expenses) -> Self {
        Self {
            current_age: current_age as f64,
            end_age: default_end_age(),
            user,
            partner: None,
            expenses,
            observed_net_pay: Vec::new(),
        }
    }

    pub fn with_end_age(mut self, end_age: u32) -> Self {
        self.end_age = end_age as f64;
        self
    }

    pub fn with_partner(mut self, partner: PersonIncome) -> Self {
        self.partner = Some(partner);
        self
    }

    pub fn with_observed_net_pay(mut self, observed: Vec<ObservedValue>) -> Self {
        self.observed_net_pay = observed;
        self
    }

    pub fn partner_enabled(&self) -> bool {
        self.partner.is_some()
    }

    pub fn timeline(&self) -> Result<Timeline> {
        Timeline::from_ages(self.current_age, self.end_age)
    }

    /// Derive a fresh baseline spec tree
    ///
    /// Called on every computation; nothing derived here is cached.
    pub fn derive_inputs(&self) -> Result<RuleSpecInputs> {
        let timeline = self.timeline()?;
        Ok(RuleSpecInputs::new(
            timeline,
            self.user.to_specs(),
            self.partner.as_ref().map(PersonIncome::to_specs),
            self.expenses.lifestyle.to_spec(),
            self.expenses.housing.to_spec(),
        )
        .with_observed_net_pay(self.observed_net_pay.clone()))
    }
}
