//! Age-indexed projection timeline
//!
//! A timeline is an inclusive age range `[start_age, end_age]` mapped onto a
//! zero-based index space. Index 0 is always `start_age`.

use crate::error::{Result, RuleSpecError};
use serde::{Deserialize, Serialize};

/// Oldest age a timeline may reach
pub const MAX_AGE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTimeline")]
pub struct Timeline {
    start_age: u32,
    end_age: u32,
}

/// Unchecked wire form; decoding goes through [`Timeline::new`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeline {
    start_age: u32,
    end_age: u32,
}

impl TryFrom<RawTimeline> for Timeline {
    type Error = RuleSpecError;

    fn try_from(raw: RawTimeline) -> Result<Self> {
        Timeline::new(raw.start_age, raw.end_age)
    }
}

impl Timeline {
    /// Create a timeline from integer ages (at most [`MAX_AGE`])
    pub fn new(start_age: u32, end_age: u32) -> Result<Self> {
        if end_age > MAX_AGE {
            return Err(RuleSpecError::InvalidTimeline(format!(
                "end age {} is past the maximum age {}",
                end_age, MAX_AGE
            )));
        }
        if end_age < start_age {
            return Err(RuleSpecError::InvalidTimeline(format!(
                "end age {} is before start age {}",
                end_age, start_age
            )));
        }
        Ok(Self { start_age, end_age })
    }

    /// Create a timeline from floating point ages (e.g. decoded from JSON)
    ///
    /// Both ages must be finite, non-negative whole numbers.
    pub fn from_ages(start_age: f64, end_age: f64) -> Result<Self> {
        let start = whole_age("start age", start_age)?;
        let end = whole_age("end age", end_age)?;
        Self::new(start, end)
    }

    pub fn start_age(&self) -> u32 {
        self.start_age
    }

    pub fn end_age(&self) -> u32 {
        self.end_age
    }

    /// Number of projection years (inclusive of both ends)
    pub fn len(&self) -> usize {
        (self.end_age - self.start_age) as usize + 1
    }

    /// A valid timeline always holds at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Zero-based index of an age
    pub fn index_of(&self, age: i64) -> Result<usize> {
        if age < self.start_age as i64 || age > self.end_age as i64 {
            return Err(RuleSpecError::AgeOutOfRange {
                age,
                start_age: self.start_age,
                end_age: self.end_age,
            });
        }
        Ok((age - self.start_age as i64) as usize)
    }

    /// Age at a zero-based index
    ///
    /// `index` must be below [`len`](Self::len); use [`ages`](Self::ages) to
    /// walk the whole range.
    pub fn age_at(&self, index: usize) -> u32 {
        debug_assert!(index < self.len(), "index {} past timeline end", index);
        self.start_age + index as u32
    }

    /// Whether an age falls inside the timeline
    pub fn contains(&self, age: u32) -> bool {
        age >= self.start_age && age <= self.end_age
    }

    /// Iterate over every age in order
    pub fn ages(&self) -> impl Iterator<Item = u32> {
        self.start_age..=self.end_age
    }
}

fn whole_age(label: &str, age: f64) -> Result<u32> {
    if !age.is_finite() {
        return Err(RuleSpecError::InvalidTimeline(format!(
            "{} is not finite: {}",
            label, age
        )));
    }
    if age.fract() != 0.0 {
        return Err(RuleSpecError::InvalidTimeline(format!(
            "{} is not a whole number: {}",
            label, age
        )));
    }
    if age < 0.0 || age > MAX_AGE as f64 {
        return Err(RuleSpecError::InvalidTimeline(format!(
            "{} is out of range: {}",
            label, age
        )));
    }
    Ok(age as u32)
}
