//! Single forward pass that turns a component spec into a per-year series

use super::ordering::{growth_by_index, ordered_overrides};
use crate::error::{Result, RuleSpecError};
use crate::spec::{ComponentSpec, GrowthRule, Override, OverrideKind};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// How `add` overrides interact with the compounding chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddMode {
    /// Adds join the chain and carry into later years
    #[default]
    Recurring,
    /// Adds are summed per year on top of the chain and never compound
    NonRecurring,
}

/// Full per-index breakdown of a built series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesBreakdown {
    /// Compounding chain (what next year grows from)
    pub recurring: Vec<f64>,

    /// Non-recurring add-ons per index (all zero in recurring mode)
    pub add_ons: Vec<f64>,

    /// Emitted values: recurring + add-ons
    pub values: Vec<f64>,

    /// Growth rule in effect at each index
    pub growth: Vec<GrowthRule>,
}

/// Builds series for components over one timeline
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    timeline: Timeline,
    mode: AddMode,
    label: String,
}

impl SeriesBuilder {
    pub fn new(timeline: Timeline, mode: AddMode) -> Self {
        Self {
            timeline,
            mode,
            label: "component".to_string(),
        }
    }

    /// Name used in error messages and logs
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn mode(&self) -> AddMode {
        self.mode
    }

    /// Build the emitted series (one value per timeline index)
    pub fn build(&self, spec: &ComponentSpec) -> Result<Vec<f64>> {
        Ok(self.build_detailed(spec)?.values)
    }

    /// Build the series and keep the recurring/add-on split
    pub fn build_detailed(&self, spec: &ComponentSpec) -> Result<SeriesBreakdown> {
        self.validate(spec)?;

        let growth = growth_by_index(&self.label, spec, &self.timeline)?;
        let ordered = ordered_overrides(&spec.overrides);
        let len = self.timeline.len();

        let mut recurring: Vec<f64> = Vec::with_capacity(len);
        let mut add_ons = Vec::with_capacity(len);
        let mut values = Vec::with_capacity(len);

        for index in 0..len {
            let age = self.timeline.age_at(index);

            // Growth only ever reads last year's recurring value
            let mut value = match recurring.last() {
                None => spec.start_value,
                Some(&previous) => self.grow(previous, growth[index], age)?,
            };
            let mut add_sum = 0.0;

            for ov in ordered.iter().filter(|o| o.applies_at(age)) {
                if self.mode == AddMode::NonRecurring && ov.kind == OverrideKind::Add {
                    add_sum += ov.value;
                    continue;
                }
                value = self.apply(ov, value, age)?;
            }

            let emitted = self.check(value + add_sum, age, "emitted value")?;
            recurring.push(value);
            add_ons.push(add_sum);
            values.push(emitted);
        }

        log::trace!(
            "built {} over ages {}-{} ({:?}, {} overrides, {} growth overrides)",
            self.label,
            self.timeline.start_age(),
            self.timeline.end_age(),
            self.mode,
            spec.overrides.len(),
            spec.growth_overrides.len()
        );

        Ok(SeriesBreakdown {
            recurring,
            add_ons,
            values,
            growth,
        })
    }

    /// Reject a spec up front so a bad entry aborts the whole series
    fn validate(&self, spec: &ComponentSpec) -> Result<()> {
        if !spec.start_value.is_finite() {
            return Err(RuleSpecError::non_finite(
                format!("{} start value", self.label),
                spec.start_value,
            ));
        }
        if spec.start_value < 0.0 {
            return Err(RuleSpecError::NegativeValue {
                age: self.timeline.start_age(),
                value: spec.start_value,
            });
        }

        let growth_value = match spec.growth {
            GrowthRule::Percentage { rate } => rate,
            GrowthRule::Flat { amount } => amount,
        };
        if !growth_value.is_finite() {
            return Err(RuleSpecError::non_finite(
                format!("{} growth rule", self.label),
                growth_value,
            ));
        }

        for g in &spec.growth_overrides {
            if !g.value.is_finite() {
                return Err(RuleSpecError::non_finite(
                    format!("{} growth override at age {}", self.label, g.from_age),
                    g.value,
                ));
            }
        }

        for ov in &spec.overrides {
            validate_override(&self.label, ov)?;
        }
        Ok(())
    }

    fn grow(&self, previous: f64, rule: GrowthRule, age: u32) -> Result<f64> {
        let next = match rule {
            GrowthRule::Percentage { rate } => previous * (1.0 + rate),
            GrowthRule::Flat { amount } => previous + amount,
        };
        self.check(next, age, "growth")
    }

    fn apply(&self, ov: &Override, current: f64, age: u32) -> Result<f64> {
        let next = match ov.kind {
            OverrideKind::Set => ov.value,
            OverrideKind::Add => current + ov.value,
            OverrideKind::Mult => current * ov.value,
            OverrideKind::Cap => current.min(ov.value),
        };
        self.check(next, age, ov.kind.as_str())
    }

    fn check(&self, value: f64, age: u32, step: &str) -> Result<f64> {
        if !value.is_finite() {
            return Err(RuleSpecError::non_finite(
                format!("{} {} at age {}", self.label, step, age),
                value,
            ));
        }
        if value < 0.0 {
            return Err(RuleSpecError::NegativeValue { age, value });
        }
        Ok(value)
    }
}

/// Structural and sign checks for a single override
fn validate_override(label: &str, ov: &Override) -> Result<()> {
    if let Some(to_age) = ov.to_age {
        if to_age < ov.from_age {
            return Err(RuleSpecError::InvalidRange {
                from_age: ov.from_age,
                to_age,
            });
        }
    }
    if !ov.value.is_finite() {
        return Err(RuleSpecError::non_finite(
            format!("{} {} override at age {}", label, ov.kind, ov.from_age),
            ov.value,
        ));
    }
    match ov.kind {
        OverrideKind::Set if ov.value < 0.0 => Err(RuleSpecError::NegativeSet {
            age: ov.from_age,
            value: ov.value,
        }),
        OverrideKind::Mult if ov.value <= 0.0 => Err(RuleSpecError::NonPositiveMultiplier {
            age: ov.from_age,
            value: ov.value,
        }),
        OverrideKind::Set | OverrideKind::Add | OverrideKind::Mult | OverrideKind::Cap => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn timeline(start: u32, end: u32) -> Timeline {
        Timeline::new(start, end).unwrap()
    }

    #[test]
    fn test_percentage_growth_matches_closed_form() {
        let tl = timeline(30, 99);
        let spec = ComponentSpec::percentage(85_000.0, 0.03);
        let series = SeriesBuilder::new(tl, AddMode::Recurring).build(&spec).unwrap();

        assert_eq!(series.len(), tl.len());
        let mut expected = 85_000.0;
        for (i, value) in series.iter().enumerate() {
            if i > 0 {
                expected *= 1.03;
            }
            assert_eq!(*value, expected, "index {}", i);
        }
        assert_relative_eq!(series[69], 85_000.0 * 1.03_f64.powi(69), max_relative = 1e-12);
    }

    #[test]
    fn test_flat_growth_matches_closed_form() {
        let spec = ComponentSpec::flat(24_000.0, 600.0);
        let series = SeriesBuilder::new(timeline(40, 50), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        for (i, value) in series.iter().enumerate() {
            assert_relative_eq!(*value, 24_000.0 + 600.0 * i as f64);
        }
    }

    #[test]
    fn test_non_recurring_add_hits_one_year_only() {
        // index 2 is age 42
        let spec = ComponentSpec::percentage(100_000.0, 0.0)
            .with_override(Override::add(50_000.0, 42, Some(42)));
        let series = SeriesBuilder::new(timeline(40, 46), AddMode::NonRecurring)
            .build(&spec)
            .unwrap();
        assert_eq!(
            series,
            vec![100_000.0, 100_000.0, 150_000.0, 100_000.0, 100_000.0, 100_000.0, 100_000.0]
        );
    }

    #[test]
    fn test_recurring_add_carries_forward() {
        let spec = ComponentSpec::percentage(100_000.0, 0.0)
            .with_override(Override::add(50_000.0, 42, Some(42)));
        let series = SeriesBuilder::new(timeline(40, 44), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series, vec![100_000.0, 100_000.0, 150_000.0, 150_000.0, 150_000.0]);
    }

    #[test]
    fn test_non_recurring_add_never_feeds_growth() {
        let spec = ComponentSpec::percentage(1_000.0, 0.10)
            .with_override(Override::add(100.0, 41, Some(41)));
        let breakdown = SeriesBuilder::new(timeline(40, 43), AddMode::NonRecurring)
            .build_detailed(&spec)
            .unwrap();

        assert_relative_eq!(breakdown.recurring[2], 1_210.0, max_relative = 1e-12);
        assert_relative_eq!(breakdown.values[1], 1_200.0, max_relative = 1e-12);
        assert_eq!(breakdown.add_ons, vec![0.0, 100.0, 0.0, 0.0]);
        assert_eq!(breakdown.values[2], breakdown.recurring[2]);
    }

    #[test]
    fn test_open_ended_non_recurring_add_is_a_steady_top_up() {
        let spec = ComponentSpec::percentage(10_000.0, 0.0)
            .with_override(Override::add(2_500.0, 41, None));
        let series = SeriesBuilder::new(timeline(40, 43), AddMode::NonRecurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series, vec![10_000.0, 12_500.0, 12_500.0, 12_500.0]);
    }

    #[test]
    fn test_growth_override_switches_rate_without_ghost_track() {
        // index 3 is age 43
        let spec = ComponentSpec::percentage(100_000.0, 0.03).with_growth_override(43, 0.05);
        let breakdown = SeriesBuilder::new(timeline(40, 47), AddMode::Recurring)
            .build_detailed(&spec)
            .unwrap();
        let series = &breakdown.values;

        let at_two = 100_000.0 * 1.03 * 1.03;
        assert_relative_eq!(series[2], at_two, max_relative = 1e-12);
        assert_relative_eq!(series[3], at_two * 1.05, max_relative = 1e-12);
        assert_relative_eq!(series[7], at_two * 1.05_f64.powi(5), max_relative = 1e-12);
        assert_eq!(breakdown.growth[2], GrowthRule::Percentage { rate: 0.03 });
        assert_eq!(breakdown.growth[3], GrowthRule::Percentage { rate: 0.05 });
    }

    #[test]
    fn test_same_age_sets_last_inserted_wins() {
        let spec = ComponentSpec::percentage(60_000.0, 0.02)
            .with_override(Override::set(70_000.0, 41, None))
            .with_override(Override::set(80_000.0, 41, None));
        let series = SeriesBuilder::new(timeline(40, 42), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series[1], 80_000.0);
        assert_eq!(series[2], 80_000.0);
    }

    #[test]
    fn test_open_ended_override_composes_after_bounded_one() {
        let spec = ComponentSpec::percentage(100.0, 0.0)
            .with_override(Override::set(10.0, 41, None))
            .with_override(Override::set(20.0, 41, Some(41)));
        let series = SeriesBuilder::new(timeline(40, 42), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        // bounded set runs first, open-ended set is applied after it
        assert_eq!(series, vec![100.0, 10.0, 10.0]);
    }

    #[test]
    fn test_bounded_set_resumes_growth_from_set_level() {
        let spec = ComponentSpec::percentage(100_000.0, 0.03)
            .with_override(Override::set(50_000.0, 41, Some(42)));
        let series = SeriesBuilder::new(timeline(40, 44), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series[1], 50_000.0);
        assert_eq!(series[2], 50_000.0);
        assert_relative_eq!(series[3], 50_000.0 * 1.03, max_relative = 1e-12);
    }

    #[test]
    fn test_mult_compounds_inside_range() {
        let spec = ComponentSpec::percentage(100.0, 0.0)
            .with_override(Override::mult(1.1, 41, Some(42)));
        let series = SeriesBuilder::new(timeline(40, 43), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_relative_eq!(series[1], 110.0, max_relative = 1e-12);
        assert_relative_eq!(series[2], 121.0, max_relative = 1e-12);
        assert_relative_eq!(series[3], 121.0, max_relative = 1e-12);
    }

    #[test]
    fn test_cap_clamps_growth() {
        let spec = ComponentSpec::percentage(90.0, 0.10)
            .with_override(Override::cap(100.0, 40, None));
        let series = SeriesBuilder::new(timeline(40, 43), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series[0], 90.0);
        assert_relative_eq!(series[1], 99.0, max_relative = 1e-12);
        assert_eq!(series[2], 100.0);
        assert_eq!(series[3], 100.0);
    }

    #[test]
    fn test_override_before_timeline_applies_from_index_zero() {
        let spec = ComponentSpec::percentage(100.0, 0.0)
            .with_override(Override::set(5.0, 20, None));
        let series = SeriesBuilder::new(timeline(40, 41), AddMode::Recurring)
            .build(&spec)
            .unwrap();
        assert_eq!(series, vec![5.0, 5.0]);
    }

    #[test]
    fn test_numeric_errors_abort_the_series() {
        let tl = timeline(40, 45);
        let builder = SeriesBuilder::new(tl, AddMode::Recurring);

        let negative_set = ComponentSpec::percentage(1.0, 0.0)
            .with_override(Override::set(-1.0, 90, None));
        assert!(matches!(
            builder.build(&negative_set),
            Err(RuleSpecError::NegativeSet { age: 90, .. })
        ));

        let zero_mult =
            ComponentSpec::percentage(1.0, 0.0).with_override(Override::mult(0.0, 41, None));
        assert!(matches!(
            builder.build(&zero_mult),
            Err(RuleSpecError::NonPositiveMultiplier { .. })
        ));

        let nan_start = ComponentSpec::percentage(f64::NAN, 0.0);
        assert!(matches!(
            builder.build(&nan_start),
            Err(RuleSpecError::NonFinite { .. })
        ));

        let overdraw = ComponentSpec::percentage(100.0, 0.0)
            .with_override(Override::add(-150.0, 43, Some(43)));
        assert!(matches!(
            builder.build(&overdraw),
            Err(RuleSpecError::NegativeValue { age: 43, .. })
        ));

        let inverted =
            ComponentSpec::percentage(1.0, 0.0).with_override(Override::add(1.0, 44, Some(42)));
        assert!(matches!(
            builder.build(&inverted),
            Err(RuleSpecError::InvalidRange { from_age: 44, to_age: 42 })
        ));

        let collapsing = ComponentSpec::percentage(100.0, -1.5);
        assert!(matches!(
            builder.build(&collapsing),
            Err(RuleSpecError::NegativeValue { age: 41, .. })
        ));
    }

    #[test]
    fn test_non_recurring_negative_add_checks_emitted_value() {
        let spec = ComponentSpec::percentage(100.0, 0.0)
            .with_override(Override::add(-150.0, 41, Some(41)));
        let result = SeriesBuilder::new(timeline(40, 42), AddMode::NonRecurring)
            .with_label("income.user.bonus")
            .build(&spec);
        assert!(matches!(result, Err(RuleSpecError::NegativeValue { age: 41, .. })));
    }

    #[test]
    fn test_builds_are_bit_identical() {
        let spec = ComponentSpec::percentage(123_456.78, 0.0317)
            .with_override(Override::mult(1.07, 45, Some(50)))
            .with_override(Override::add(3_210.5, 52, None))
            .with_growth_override(60, 0.011);
        let builder = SeriesBuilder::new(timeline(30, 100), AddMode::NonRecurring);
        let a = builder.build(&spec).unwrap();
        let b = builder.build(&spec).unwrap();
        let bits_a: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }
}
