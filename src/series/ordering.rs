//! Deterministic ordering of overrides and per-index growth resolution

use crate::error::{Result, RuleSpecError};
use crate::spec::{ComponentSpec, GrowthRule, Override};
use crate::timeline::Timeline;
use std::cmp::Ordering;

/// Sort overrides into composition order
///
/// from_age ascending; at equal from_age a bounded override comes before an
/// open-ended one; then to_age ascending; then insertion order (stable sort).
pub(crate) fn ordered_overrides(overrides: &[Override]) -> Vec<Override> {
    let mut ordered = overrides.to_vec();
    ordered.sort_by(|a, b| {
        a.from_age
            .cmp(&b.from_age)
            .then_with(|| match (a.to_age, b.to_age) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    ordered
}

/// Effective growth rule at every index of the timeline
///
/// For percentage components the latest growth override whose from_age is
/// at or before the index's age replaces the baseline rate. Overrides never
/// stack.
pub(crate) fn growth_by_index(
    label: &str,
    spec: &ComponentSpec,
    timeline: &Timeline,
) -> Result<Vec<GrowthRule>> {
    match spec.growth {
        GrowthRule::Flat { .. } => {
            if !spec.growth_overrides.is_empty() {
                return Err(RuleSpecError::GrowthOnFlatComponent(label.to_string()));
            }
            Ok(vec![spec.growth; timeline.len()])
        }
        GrowthRule::Percentage { rate } => {
            let mut sorted = spec.growth_overrides.clone();
            sorted.sort_by_key(|g| g.from_age);

            Ok(timeline
                .ages()
                .map(|age| {
                    let active = sorted
                        .iter()
                        .take_while(|g| g.from_age <= age)
                        .last()
                        .map_or(rate, |g| g.value);
                    GrowthRule::Percentage { rate: active }
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_sorts_before_open_at_same_age() {
        let open = Override::set(10.0, 40, None);
        let late_bound = Override::set(30.0, 40, Some(50));
        let early_bound = Override::set(20.0, 40, Some(45));
        let earlier = Override::add(1.0, 35, None);

        let ordered = ordered_overrides(&[open, late_bound, early_bound, earlier]);
        assert_eq!(ordered, vec![earlier, early_bound, late_bound, open]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let a = Override::set(1.0, 40, None);
        let b = Override::set(2.0, 40, None);
        assert_eq!(ordered_overrides(&[a, b]), vec![a, b]);
        assert_eq!(ordered_overrides(&[b, a]), vec![b, a]);
    }

    #[test]
    fn test_growth_overrides_replace_in_age_order() {
        let timeline = Timeline::new(40, 46).unwrap();
        let spec = ComponentSpec::percentage(1.0, 0.03)
            .with_growth_override(45, 0.01)
            .with_growth_override(42, 0.05);

        let rates: Vec<f64> = growth_by_index("x", &spec, &timeline)
            .unwrap()
            .into_iter()
            .map(|g| match g {
                GrowthRule::Percentage { rate } => rate,
                GrowthRule::Flat { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(rates, vec![0.03, 0.03, 0.05, 0.05, 0.05, 0.01, 0.01]);
    }

    #[test]
    fn test_same_age_growth_overrides_last_inserted_wins() {
        let timeline = Timeline::new(40, 41).unwrap();
        let spec = ComponentSpec::percentage(1.0, 0.03)
            .with_growth_override(41, 0.04)
            .with_growth_override(41, 0.06);
        let rates = growth_by_index("x", &spec, &timeline).unwrap();
        assert_eq!(rates[1], GrowthRule::Percentage { rate: 0.06 });
    }

    #[test]
    fn test_flat_component_rejects_growth_override() {
        let timeline = Timeline::new(40, 41).unwrap();
        let spec = ComponentSpec::flat(1.0, 100.0).with_growth_override(41, 0.04);
        assert!(matches!(
            growth_by_index("spend.housing", &spec, &timeline),
            Err(RuleSpecError::GrowthOnFlatComponent(ref k)) if k == "spend.housing"
        ));
    }
}
