//! Materializer: turn a spec tree into dense per-year input records

mod observed;
mod rows;

pub use observed::resolve_observed;
pub use rows::{MaterializedInputs, MaterializedSummary, YearInputs};

use crate::error::{Result, RuleSpecError};
use crate::series::{AddMode, SeriesBuilder};
use crate::spec::{ComponentKey, RuleSpecInputs};
use std::collections::BTreeMap;

/// Add semantics per component family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterializerConfig {
    /// Base salaries
    pub base_income_mode: AddMode,

    /// Bonuses (one-off adds must not compound)
    pub bonus_mode: AddMode,

    /// Lifestyle and housing spend
    pub spend_mode: AddMode,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            base_income_mode: AddMode::Recurring,
            bonus_mode: AddMode::NonRecurring,
            spend_mode: AddMode::Recurring,
        }
    }
}

impl MaterializerConfig {
    pub fn mode_for(&self, key: ComponentKey) -> AddMode {
        match key {
            ComponentKey::UserBaseIncome | ComponentKey::PartnerBaseIncome => self.base_income_mode,
            ComponentKey::UserBonus | ComponentKey::PartnerBonus => self.bonus_mode,
            ComponentKey::LifestyleSpend | ComponentKey::HousingSpend => self.spend_mode,
        }
    }
}

/// Fail unless a series covers the timeline exactly
pub(crate) fn ensure_len(component: &str, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(RuleSpecError::LengthMismatch {
            component: component.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Runs the series builder for every tracked component
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    config: MaterializerConfig,
}

impl Materializer {
    pub fn new(config: MaterializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// Build every component series and zip them into per-year records
    pub fn materialize(&self, inputs: &RuleSpecInputs) -> Result<MaterializedInputs> {
        let timeline = inputs.timeline;
        let len = timeline.len();

        let mut series: BTreeMap<ComponentKey, Vec<f64>> = BTreeMap::new();
        for key in inputs.component_keys() {
            let spec = inputs
                .component(key)
                .ok_or_else(|| RuleSpecError::PartnerDisabled(key.to_string()))?;
            let values = SeriesBuilder::new(timeline, self.config.mode_for(key))
                .with_label(key.as_str())
                .build(spec)?;
            ensure_len(key.as_str(), len, values.len())?;
            series.insert(key, values);
        }

        let observed = resolve_observed(&inputs.observed_net_pay, &timeline)?;
        ensure_len("observed net pay", len, observed.len())?;

        let value_at = |key: ComponentKey, index: usize| -> Option<f64> {
            series.get(&key).map(|values| values[index])
        };

        let years = (0..len)
            .map(|index| YearInputs {
                year_index: index,
                age: timeline.age_at(index),
                user_base_income: value_at(ComponentKey::UserBaseIncome, index).unwrap_or(0.0),
                user_bonus: value_at(ComponentKey::UserBonus, index).unwrap_or(0.0),
                partner_base_income: value_at(ComponentKey::PartnerBaseIncome, index),
                partner_bonus: value_at(ComponentKey::PartnerBonus, index),
                lifestyle_spend: value_at(ComponentKey::LifestyleSpend, index).unwrap_or(0.0),
                housing_spend: value_at(ComponentKey::HousingSpend, index).unwrap_or(0.0),
                observed_net_pay_monthly: observed[index],
            })
            .collect();

        log::debug!(
            "materialized {} components over {} years (ages {}-{})",
            series.len(),
            len,
            timeline.start_age(),
            timeline.end_age()
        );

        Ok(MaterializedInputs { timeline, years })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ComponentSpec, ObservedValue, Override, PersonIncomeSpecs};
    use crate::timeline::Timeline;
    use approx::assert_relative_eq;

    fn inputs(with_partner: bool) -> RuleSpecInputs {
        let user = PersonIncomeSpecs::new(
            ComponentSpec::percentage(100_000.0, 0.03),
            ComponentSpec::percentage(10_000.0, 0.0)
                .with_override(Override::add(5_000.0, 42, Some(42))),
        );
        let partner = PersonIncomeSpecs::new(
            ComponentSpec::percentage(70_000.0, 0.02),
            ComponentSpec::percentage(0.0, 0.0),
        );
        RuleSpecInputs::new(
            Timeline::new(40, 49).unwrap(),
            user,
            with_partner.then_some(partner),
            ComponentSpec::percentage(60_000.0, 0.025),
            ComponentSpec::flat(24_000.0, 0.0),
        )
        .with_observed_net_pay(vec![ObservedValue {
            from_age: 40,
            to_age: Some(41),
            value: 6_200.0,
        }])
    }

    #[test]
    fn test_rows_are_dense_and_index_aligned() {
        let materialized = Materializer::default().materialize(&inputs(true)).unwrap();
        assert_eq!(materialized.len(), 10);
        for (index, year) in materialized.years.iter().enumerate() {
            assert_eq!(year.year_index, index);
            assert_eq!(year.age, 40 + index as u32);
        }
    }

    #[test]
    fn test_bonus_add_is_one_year_only_by_default() {
        let materialized = Materializer::default().materialize(&inputs(false)).unwrap();
        let bonuses: Vec<f64> = materialized.years.iter().map(|y| y.user_bonus).collect();
        assert_eq!(bonuses[1], 10_000.0);
        assert_eq!(bonuses[2], 15_000.0);
        assert_eq!(bonuses[3], 10_000.0);
    }

    #[test]
    fn test_recurring_bonus_mode_is_configurable() {
        let config = MaterializerConfig {
            bonus_mode: AddMode::Recurring,
            ..Default::default()
        };
        let materialized = Materializer::new(config).materialize(&inputs(false)).unwrap();
        assert_eq!(materialized.years[3].user_bonus, 15_000.0);
    }

    #[test]
    fn test_partner_fields_follow_partner_flag() {
        let single = Materializer::default().materialize(&inputs(false)).unwrap();
        assert!(single.years.iter().all(|y| y.partner_base_income.is_none()));

        let couple = Materializer::default().materialize(&inputs(true)).unwrap();
        assert_relative_eq!(
            couple.years[1].partner_base_income.unwrap(),
            71_400.0,
            max_relative = 1e-12
        );
        assert_eq!(couple.years[0].partner_bonus, Some(0.0));
    }

    #[test]
    fn test_observed_net_pay_sits_beside_gross() {
        let materialized = Materializer::default().materialize(&inputs(false)).unwrap();
        assert_eq!(materialized.years[0].observed_net_pay_monthly, Some(6_200.0));
        assert_eq!(materialized.years[0].user_base_income, 100_000.0);
        assert_eq!(materialized.years[2].observed_net_pay_monthly, None);
        assert_eq!(materialized.summary().observed_years, 2);
    }

    #[test]
    fn test_series_error_aborts_materialization() {
        let mut bad = inputs(false);
        bad.component_mut(ComponentKey::HousingSpend)
            .unwrap()
            .overrides
            .push(Override::mult(-2.0, 45, None));
        assert!(matches!(
            Materializer::default().materialize(&bad),
            Err(RuleSpecError::NonPositiveMultiplier { .. })
        ));
    }

    #[test]
    fn test_length_mismatch_is_shape_error() {
        let err = ensure_len("spend.housing", 10, 9).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Shape);
        assert!(ensure_len("spend.housing", 10, 10).is_ok());
    }

    #[test]
    fn test_at_age_lookup() {
        let materialized = Materializer::default().materialize(&inputs(false)).unwrap();
        assert_eq!(materialized.at_age(45).unwrap().year_index, 5);
        assert!(materialized.at_age(50).is_none());
    }
}
