//! Component specs: starting value, growth rule and time-scoped overrides

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a component grows absent overrides
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GrowthRule {
    /// Compounding annual rate as a decimal (0.03 = 3%)
    Percentage { rate: f64 },
    /// Fixed dollar delta added every year
    Flat { amount: f64 },
}

impl GrowthRule {
    pub fn is_percentage(&self) -> bool {
        matches!(self, GrowthRule::Percentage { .. })
    }
}

/// Operation an override performs on the running value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    /// Replace the value
    Set,
    /// Add a dollar amount
    Add,
    /// Multiply by a positive factor
    Mult,
    /// Clamp the value from above
    Cap,
}

impl OverrideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideKind::Set => "set",
            OverrideKind::Add => "add",
            OverrideKind::Mult => "mult",
            OverrideKind::Cap => "cap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set" => Some(OverrideKind::Set),
            "add" => Some(OverrideKind::Add),
            "mult" => Some(OverrideKind::Mult),
            "cap" => Some(OverrideKind::Cap),
            _ => None,
        }
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-scoped modification of a component's value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    pub kind: OverrideKind,

    /// First age (inclusive) the override applies to
    pub from_age: u32,

    /// Last age (inclusive); `None` means open-ended
    #[serde(default)]
    pub to_age: Option<u32>,

    pub value: f64,
}

impl Override {
    pub fn new(kind: OverrideKind, from_age: u32, to_age: Option<u32>, value: f64) -> Self {
        Self {
            kind,
            from_age,
            to_age,
            value,
        }
    }

    pub fn set(value: f64, from_age: u32, to_age: Option<u32>) -> Self {
        Self::new(OverrideKind::Set, from_age, to_age, value)
    }

    pub fn add(value: f64, from_age: u32, to_age: Option<u32>) -> Self {
        Self::new(OverrideKind::Add, from_age, to_age, value)
    }

    pub fn mult(value: f64, from_age: u32, to_age: Option<u32>) -> Self {
        Self::new(OverrideKind::Mult, from_age, to_age, value)
    }

    pub fn cap(value: f64, from_age: u32, to_age: Option<u32>) -> Self {
        Self::new(OverrideKind::Cap, from_age, to_age, value)
    }

    /// Whether the override is in effect at `age`
    pub fn applies_at(&self, age: u32) -> bool {
        self.from_age <= age && self.to_age.map_or(true, |to| age <= to)
    }
}

/// Replacement growth rate for a percentage component from an age onward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthOverride {
    pub from_age: u32,

    /// Decimal annual rate
    pub value: f64,
}

/// One tracked financial quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub start_value: f64,
    pub growth: GrowthRule,

    /// Overrides in insertion order
    #[serde(default)]
    pub overrides: Vec<Override>,

    /// Growth-rate replacements in insertion order
    #[serde(default)]
    pub growth_overrides: Vec<GrowthOverride>,
}

impl ComponentSpec {
    pub fn new(start_value: f64, growth: GrowthRule) -> Self {
        Self {
            start_value,
            growth,
            overrides: Vec::new(),
            growth_overrides: Vec::new(),
        }
    }

    pub fn percentage(start_value: f64, rate: f64) -> Self {
        Self::new(start_value, GrowthRule::Percentage { rate })
    }

    pub fn flat(start_value: f64, amount: f64) -> Self {
        Self::new(start_value, GrowthRule::Flat { amount })
    }

    pub fn with_override(mut self, ov: Override) -> Self {
        self.overrides.push(ov);
        self
    }

    pub fn with_growth_override(mut self, from_age: u32, value: f64) -> Self {
        self.growth_overrides.push(GrowthOverride { from_age, value });
        self
    }
}
