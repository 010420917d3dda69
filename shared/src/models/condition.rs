//! Extreme weather conditions a user can ask about

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of extreme conditions offered on the intake form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtremeCondition {
    #[serde(rename = "Very Hot", alias = "very_hot")]
    VeryHot,
    #[serde(rename = "Very Cold", alias = "very_cold")]
    VeryCold,
    #[serde(rename = "Very Windy", alias = "very_windy")]
    VeryWindy,
    #[serde(rename = "Very Wet", alias = "very_wet")]
    VeryWet,
    #[serde(rename = "Very Uncomfortable", alias = "very_uncomfortable")]
    VeryUncomfortable,
}

impl ExtremeCondition {
    pub const ALL: [ExtremeCondition; 5] = [
        ExtremeCondition::VeryHot,
        ExtremeCondition::VeryCold,
        ExtremeCondition::VeryWindy,
        ExtremeCondition::VeryWet,
        ExtremeCondition::VeryUncomfortable,
    ];

    /// Display label, as shown on the intake form
    pub fn label(&self) -> &'static str {
        match self {
            ExtremeCondition::VeryHot => "Very Hot",
            ExtremeCondition::VeryCold => "Very Cold",
            ExtremeCondition::VeryWindy => "Very Windy",
            ExtremeCondition::VeryWet => "Very Wet",
            ExtremeCondition::VeryUncomfortable => "Very Uncomfortable",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExtremeCondition::VeryHot => "very_hot",
            ExtremeCondition::VeryCold => "very_cold",
            ExtremeCondition::VeryWindy => "very_windy",
            ExtremeCondition::VeryWet => "very_wet",
            ExtremeCondition::VeryUncomfortable => "very_uncomfortable",
        }
    }
}

impl std::fmt::Display for ExtremeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a condition label is not part of the enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown weather condition: {0}")]
pub struct UnknownCondition(pub String);

impl FromStr for ExtremeCondition {
    type Err = UnknownCondition;

    /// Accepts both the form label ("Very Hot") and the code ("very_hot"),
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ExtremeCondition::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.code().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

/// Purpose presets offered next to the free-text purpose field
pub const PURPOSE_PRESETS: [&str; 8] = [
    "Hiking",
    "Vacation",
    "Fishing",
    "Camping",
    "Outdoor Event",
    "Agriculture",
    "Construction",
    "Other",
];
