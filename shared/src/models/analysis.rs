//! Compound extreme analysis
//!
//! Turns a weather series and a list of requested conditions into a
//! probability, threshold and severity tier per condition. All numbers come
//! from a declarative [`PolicyTable`]; the same series and table always give
//! the same result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::condition::ExtremeCondition;
use super::weather::{WeatherSeries, WeatherVariable};

/// Ordered severity classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Moderate,
    High,
    Extreme,
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "low"),
            SeverityTier::Moderate => write!(f, "moderate"),
            SeverityTier::High => write!(f, "high"),
            SeverityTier::Extreme => write!(f, "extreme"),
        }
    }
}

/// Which side of a value counts as "beyond" it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

/// A variable compared against a fixed value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VariableCheck {
    pub variable: WeatherVariable,
    pub direction: Direction,
    pub value: f64,
}

impl VariableCheck {
    /// Strict comparison, used for baseline predicates
    pub fn holds_strictly(&self, observed: f64) -> bool {
        match self.direction {
            Direction::Above => observed > self.value,
            Direction::Below => observed < self.value,
        }
    }

    /// Inclusive comparison, used for threshold exceedance
    pub fn reached(&self, observed: f64) -> bool {
        match self.direction {
            Direction::Above => observed >= self.value,
            Direction::Below => observed <= self.value,
        }
    }
}

/// Closed probability interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProbabilityRange {
    pub min: f64,
    pub max: f64,
}

impl ProbabilityRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear position inside the range; `ratio` is clamped to [0, 1]
    pub fn interpolate(&self, ratio: f64) -> f64 {
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
        (self.min + (self.max - self.min) * ratio).clamp(0.0, 1.0)
    }

    fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.min) && (0.0..=1.0).contains(&self.max) && self.min <= self.max
    }
}

/// Probability cut points separating the four severity tiers.
///
/// A probability strictly above a cut point moves to the next tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeverityCutPoints {
    pub moderate: f64,
    pub high: f64,
    pub extreme: f64,
}

impl SeverityCutPoints {
    pub const fn new(moderate: f64, high: f64, extreme: f64) -> Self {
        Self {
            moderate,
            high,
            extreme,
        }
    }

    pub fn classify(&self, probability: f64) -> SeverityTier {
        if probability > self.extreme {
            SeverityTier::Extreme
        } else if probability > self.high {
            SeverityTier::High
        } else if probability > self.moderate {
            SeverityTier::Moderate
        } else {
            SeverityTier::Low
        }
    }

    fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.moderate)
            && (0.0..=1.0).contains(&self.extreme)
            && self.moderate < self.high
            && self.high < self.extreme
    }
}

/// Policy for a single condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConditionPolicy {
    /// Trigger variable and the value that counts as extreme
    pub trigger: VariableCheck,
    /// Predicate on the series baseline selecting the elevated range
    pub baseline_check: VariableCheck,
    pub elevated_range: ProbabilityRange,
    pub baseline_range: ProbabilityRange,
    pub cut_points: SeverityCutPoints,
}

impl ConditionPolicy {
    /// Numeric trigger value, in the trigger variable's units
    pub fn threshold(&self) -> f64 {
        self.trigger.value
    }

    /// Default policy for a condition
    pub fn default_for(condition: ExtremeCondition) -> Self {
        use Direction::{Above, Below};
        use WeatherVariable::{Humidity, Precipitation, Temperature, WindSpeed};

        let (variable, direction, threshold, baseline, elevated, base, cuts) = match condition {
            ExtremeCondition::VeryHot => (
                Temperature,
                Above,
                35.0,
                30.0,
                ProbabilityRange::new(0.6, 0.9),
                ProbabilityRange::new(0.2, 0.5),
                SeverityCutPoints::new(0.4, 0.6, 0.75),
            ),
            ExtremeCondition::VeryCold => (
                Temperature,
                Below,
                5.0,
                10.0,
                ProbabilityRange::new(0.6, 0.9),
                ProbabilityRange::new(0.1, 0.3),
                SeverityCutPoints::new(0.3, 0.5, 0.7),
            ),
            ExtremeCondition::VeryWindy => (
                WindSpeed,
                Above,
                40.0,
                35.0,
                ProbabilityRange::new(0.65, 0.9),
                ProbabilityRange::new(0.15, 0.45),
                SeverityCutPoints::new(0.35, 0.55, 0.75),
            ),
            ExtremeCondition::VeryWet => (
                Precipitation,
                Above,
                50.0,
                6.0,
                ProbabilityRange::new(0.7, 0.95),
                ProbabilityRange::new(0.2, 0.5),
                SeverityCutPoints::new(0.35, 0.5, 0.7),
            ),
            ExtremeCondition::VeryUncomfortable => (
                Humidity,
                Above,
                80.0,
                75.0,
                ProbabilityRange::new(0.65, 0.9),
                ProbabilityRange::new(0.25, 0.55),
                SeverityCutPoints::new(0.4, 0.55, 0.7),
            ),
        };

        Self {
            trigger: VariableCheck {
                variable,
                direction,
                value: threshold,
            },
            baseline_check: VariableCheck {
                variable,
                direction,
                value: baseline,
            },
            elevated_range: elevated,
            baseline_range: base,
            cut_points: cuts,
        }
    }

    /// Share of samples at or beyond the trigger threshold
    pub fn exceedance_ratio(&self, series: &WeatherSeries) -> f64 {
        let values = series.values(self.trigger.variable);
        if values.is_empty() {
            return 0.0;
        }
        let hits = values.iter().filter(|v| self.trigger.reached(**v)).count();
        hits as f64 / values.len() as f64
    }

    /// Whether the series baseline selects the elevated range
    pub fn is_elevated(&self, series: &WeatherSeries) -> bool {
        let observed = series.baseline().get(self.baseline_check.variable);
        self.baseline_check.holds_strictly(observed)
    }

    pub fn probability(&self, series: &WeatherSeries) -> f64 {
        let range = if self.is_elevated(series) {
            self.elevated_range
        } else {
            self.baseline_range
        };
        range.interpolate(self.exceedance_ratio(series))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.elevated_range.is_valid() || !self.baseline_range.is_valid() {
            return Err(PolicyError::InvalidRange);
        }
        if !self.cut_points.is_valid() {
            return Err(PolicyError::UnorderedCutPoints);
        }
        if !self.trigger.value.is_finite() || !self.baseline_check.value.is_finite() {
            return Err(PolicyError::NonFiniteValue);
        }
        Ok(())
    }
}

/// Policy table rejected on load
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("Probability ranges must lie in [0, 1] with min <= max")]
    InvalidRange,

    #[error("Severity cut points must be strictly increasing within [0, 1]")]
    UnorderedCutPoints,

    #[error("Threshold values must be finite")]
    NonFiniteValue,

    #[error("Policy for {condition} is invalid: {reason}")]
    Condition {
        condition: ExtremeCondition,
        reason: Box<PolicyError>,
    },
}

/// Condition → policy lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PolicyTable {
    policies: BTreeMap<ExtremeCondition, ConditionPolicy>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let policies = ExtremeCondition::ALL
            .into_iter()
            .map(|c| (c, ConditionPolicy::default_for(c)))
            .collect();
        Self { policies }
    }
}

impl PolicyTable {
    /// Build a table from overrides; conditions not overridden keep defaults
    pub fn with_overrides(
        overrides: BTreeMap<ExtremeCondition, ConditionPolicy>,
    ) -> Result<Self, PolicyError> {
        let mut table = Self::default();
        for (condition, policy) in overrides {
            policy.validate().map_err(|reason| PolicyError::Condition {
                condition,
                reason: Box::new(reason),
            })?;
            table.policies.insert(condition, policy);
        }
        Ok(table)
    }

    pub fn get(&self, condition: ExtremeCondition) -> ConditionPolicy {
        self.policies
            .get(&condition)
            .copied()
            .unwrap_or_else(|| ConditionPolicy::default_for(condition))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtremeCondition, &ConditionPolicy)> {
        self.policies.iter().map(|(c, p)| (*c, p))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        for (condition, policy) in self.iter() {
            policy.validate().map_err(|reason| PolicyError::Condition {
                condition,
                reason: Box::new(reason),
            })?;
        }
        Ok(())
    }
}

/// Analysis outcome for one requested condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtremeAnalysisResult {
    pub condition: ExtremeCondition,
    pub probability: f64,
    pub threshold: f64,
    pub severity: SeverityTier,
}

/// Deterministic classifier over a policy table
#[derive(Debug, Clone, Default)]
pub struct ExtremeAnalyzer {
    policies: PolicyTable,
}

impl ExtremeAnalyzer {
    pub fn new(policies: PolicyTable) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// One result per requested condition, in request order
    pub fn analyze(
        &self,
        series: &WeatherSeries,
        conditions: &[ExtremeCondition],
    ) -> Vec<ExtremeAnalysisResult> {
        conditions
            .iter()
            .map(|condition| self.evaluate(series, *condition))
            .collect()
    }

    pub fn evaluate(&self, series: &WeatherSeries, condition: ExtremeCondition) -> ExtremeAnalysisResult {
        let policy = self.policies.get(condition);
        let probability = policy.probability(series);
        ExtremeAnalysisResult {
            condition,
            probability,
            threshold: policy.threshold(),
            severity: policy.cut_points.classify(probability),
        }
    }

    pub fn classify(&self, condition: ExtremeCondition, probability: f64) -> SeverityTier {
        self.policies.get(condition).cut_points.classify(probability)
    }
}
