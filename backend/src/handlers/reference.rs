//! Reference data: conditions, purpose presets and the active policy table

use axum::{extract::State, Json};
use serde::Serialize;
use shared::{ConditionPolicy, Direction, ExtremeCondition, WeatherVariable, PURPOSE_PRESETS};
use std::collections::BTreeMap;

use crate::AppState;

/// A selectable condition and what triggers it
#[derive(Debug, Serialize)]
pub struct ConditionInfo {
    pub label: &'static str,
    pub code: &'static str,
    pub variable: WeatherVariable,
    pub direction: Direction,
    pub threshold: f64,
    pub unit: &'static str,
}

/// List the five extreme conditions with their active thresholds
pub async fn list_conditions(State(state): State<AppState>) -> Json<Vec<ConditionInfo>> {
    let policies = state.insights.policies();
    let conditions = ExtremeCondition::ALL
        .into_iter()
        .map(|condition| {
            let policy = policies.get(condition);
            ConditionInfo {
                label: condition.label(),
                code: condition.code(),
                variable: policy.trigger.variable,
                direction: policy.trigger.direction,
                threshold: policy.threshold(),
                unit: policy.trigger.variable.unit(),
            }
        })
        .collect();
    Json(conditions)
}

/// Purpose presets offered by the intake form
pub async fn list_purposes() -> Json<Vec<&'static str>> {
    Json(PURPOSE_PRESETS.to_vec())
}

/// The policy table used for analysis, keyed by condition code
///
/// Same shape as an `analysis.policy_file`, so a dump can be edited and loaded back.
pub async fn get_policy(
    State(state): State<AppState>,
) -> Json<BTreeMap<&'static str, ConditionPolicy>> {
    let policies = state
        .insights
        .policies()
        .iter()
        .map(|(condition, policy)| (condition.code(), *policy))
        .collect();
    Json(policies)
}
