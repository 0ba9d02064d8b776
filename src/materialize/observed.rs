//! Observed net pay resolution

use crate::error::{Result, RuleSpecError};
use crate::spec::ObservedValue;
use crate::timeline::Timeline;

/// Observed value at each timeline index
///
/// The list is not sorted: for each age the *last* entry in caller order
/// whose range covers that age wins.
pub fn resolve_observed(entries: &[ObservedValue], timeline: &Timeline) -> Result<Vec<Option<f64>>> {
    for entry in entries {
        if !entry.value.is_finite() {
            return Err(RuleSpecError::non_finite(
                format!("observed net pay from age {}", entry.from_age),
                entry.value,
            ));
        }
        if let Some(to_age) = entry.to_age {
            if to_age < entry.from_age {
                return Err(RuleSpecError::InvalidRange {
                    from_age: entry.from_age,
                    to_age,
                });
            }
        }
    }

    Ok(timeline
        .ages()
        .map(|age| {
            entries
                .iter()
                .rev()
                .find(|e| e.applies_at(age))
                .map(|e| e.value)
        })
        .collect())
}
