//! Closed set of override targets

use super::component::{Override, OverrideKind};
use crate::error::RuleSpecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked financial component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKey {
    UserBaseIncome,
    UserBonus,
    PartnerBaseIncome,
    PartnerBonus,
    LifestyleSpend,
    HousingSpend,
}

impl ComponentKey {
    pub const ALL: [ComponentKey; 6] = [
        ComponentKey::UserBaseIncome,
        ComponentKey::UserBonus,
        ComponentKey::PartnerBaseIncome,
        ComponentKey::PartnerBonus,
        ComponentKey::LifestyleSpend,
        ComponentKey::HousingSpend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKey::UserBaseIncome => "income.user.base",
            ComponentKey::UserBonus => "income.user.bonus",
            ComponentKey::PartnerBaseIncome => "income.partner.base",
            ComponentKey::PartnerBonus => "income.partner.bonus",
            ComponentKey::LifestyleSpend => "spend.lifestyle",
            ComponentKey::HousingSpend => "spend.housing",
        }
    }

    pub fn is_partner(&self) -> bool {
        matches!(
            self,
            ComponentKey::PartnerBaseIncome | ComponentKey::PartnerBonus
        )
    }

    pub fn is_bonus(&self) -> bool {
        matches!(self, ComponentKey::UserBonus | ComponentKey::PartnerBonus)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const GROWTH_SUFFIX: &str = ".growthRate";

/// Where a targeted override lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetKey {
    /// The component's value (override list)
    Value(ComponentKey),
    /// The component's growth rate (growth override list)
    GrowthRate(ComponentKey),
}

impl TargetKey {
    pub fn component(&self) -> ComponentKey {
        match self {
            TargetKey::Value(c) | TargetKey::GrowthRate(c) => *c,
        }
    }

    pub fn is_partner(&self) -> bool {
        self.component().is_partner()
    }

    pub fn is_growth_rate(&self) -> bool {
        matches!(self, TargetKey::GrowthRate(_))
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Value(c) => f.write_str(c.as_str()),
            TargetKey::GrowthRate(c) => write!(f, "{}{}", c.as_str(), GROWTH_SUFFIX),
        }
    }
}

impl FromStr for TargetKey {
    type Err = RuleSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, growth) = match trimmed.strip_suffix(GROWTH_SUFFIX) {
            Some(base) => (base, true),
            None => (trimmed, false),
        };
        let component = ComponentKey::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == base)
            .ok_or_else(|| RuleSpecError::UnknownTarget(trimmed.to_string()))?;
        Ok(if growth {
            TargetKey::GrowthRate(component)
        } else {
            TargetKey::Value(component)
        })
    }
}

impl TryFrom<String> for TargetKey {
    type Error = RuleSpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetKey> for String {
    fn from(key: TargetKey) -> Self {
        key.to_string()
    }
}

/// An override tagged with the component it targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedOverride {
    pub target: TargetKey,
    pub kind: OverrideKind,
    pub from_age: u32,
    #[serde(default)]
    pub to_age: Option<u32>,
    pub value: f64,
}

impl TargetedOverride {
    pub fn new(
        target: TargetKey,
        kind: OverrideKind,
        from_age: u32,
        to_age: Option<u32>,
        value: f64,
    ) -> Self {
        Self {
            target,
            kind,
            from_age,
            to_age,
            value,
        }
    }

    /// The untargeted override carried by this entry
    pub fn as_override(&self) -> Override {
        Override::new(self.kind, self.from_age, self.to_age, self.value)
    }
}
