//! Per-year input records handed to the downstream projection engine

use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Inputs for a single projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearInputs {
    /// Always equal to this record's position in the sequence
    pub year_index: usize,
    pub age: u32,

    // Income (annual, gross)
    pub user_base_income: f64,
    pub user_bonus: f64,
    pub partner_base_income: Option<f64>,
    pub partner_bonus: Option<f64>,

    // Spending (annual)
    pub lifestyle_spend: f64,
    pub housing_spend: f64,

    /// Reported monthly take-home, alongside the modeled gross figures
    pub observed_net_pay_monthly: Option<f64>,
}

impl YearInputs {
    /// Gross household income for the year
    pub fn total_income(&self) -> f64 {
        self.user_base_income
            + self.user_bonus
            + self.partner_base_income.unwrap_or(0.0)
            + self.partner_bonus.unwrap_or(0.0)
    }

    pub fn total_spend(&self) -> f64 {
        self.lifestyle_spend + self.housing_spend
    }
}

/// Dense, index-aligned materialized inputs for one computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedInputs {
    pub timeline: Timeline,
    pub years: Vec<YearInputs>,
}

impl MaterializedInputs {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Record for an age, if it falls on the timeline
    pub fn at_age(&self, age: u32) -> Option<&YearInputs> {
        let index = self.timeline.index_of(age as i64).ok()?;
        self.years.get(index)
    }

    /// Summary statistics across all years
    pub fn summary(&self) -> MaterializedSummary {
        let total_income: f64 = self.years.iter().map(|y| y.total_income()).sum();
        let total_spend: f64 = self.years.iter().map(|y| y.total_spend()).sum();
        let observed_years = self
            .years
            .iter()
            .filter(|y| y.observed_net_pay_monthly.is_some())
            .count();

        MaterializedSummary {
            years: self.years.len(),
            start_age: self.timeline.start_age(),
            end_age: self.timeline.end_age(),
            total_income,
            total_spend,
            final_income: self.years.last().map(|y| y.total_income()).unwrap_or(0.0),
            final_spend: self.years.last().map(|y| y.total_spend()).unwrap_or(0.0),
            observed_years,
        }
    }
}

/// Summary statistics for a materialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedSummary {
    pub years: usize,
    pub start_age: u32,
    pub end_age: u32,
    pub total_income: f64,
    pub total_spend: f64,
    pub final_income: f64,
    pub final_spend: f64,
    pub observed_years: usize,
}
