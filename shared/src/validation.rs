//! Validation utilities for the Weather Insight Platform
//!
//! Intake checks shared by the backend normalizer and the browser bindings.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{ExtremeCondition, WeatherQuery, PURPOSE_PRESETS};

/// Failure while turning intake input into a query
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Please fill in all fields: {field} is required")]
    Missing { field: &'static str },

    #[error("Invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl IntakeError {
    pub fn field(&self) -> &'static str {
        match self {
            IntakeError::Missing { field } => field,
            IntakeError::Invalid { field, .. } => field,
        }
    }

    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        IntakeError::Invalid {
            field,
            message: message.into(),
        }
    }
}

// ============================================================================
// Intake request
// ============================================================================

/// Raw intake form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WeatherQueryRequest {
    #[validate(length(min = 1, message = "location is required"))]
    #[serde(default)]
    pub location: String,

    #[validate(length(min = 1, message = "purpose is required"))]
    #[serde(default)]
    pub purpose: String,

    #[validate(length(min = 1, message = "select at least one condition"))]
    #[serde(default)]
    pub conditions: Vec<String>,

    #[serde(default)]
    pub date: Option<String>,
}

impl WeatherQueryRequest {
    /// Validate every field and build an unresolved query.
    ///
    /// Fields are checked in form order so the reported field is stable.
    pub fn into_query(self, today: NaiveDate) -> Result<WeatherQuery, IntakeError> {
        if let Err(errors) = self.validate() {
            let failed = errors.field_errors();
            for field in ["location", "purpose", "conditions"] {
                if failed.contains_key(field) {
                    return Err(IntakeError::Missing { field });
                }
            }
        }

        let location = validate_location(&self.location)?;
        let purpose = validate_purpose(&self.purpose)?;
        let conditions = parse_conditions(&self.conditions)?;
        let date = parse_intake_date(self.date.as_deref())?;
        validate_not_past(date, today)?;

        WeatherQuery::new(&location, &purpose, conditions, date)
    }
}

// ============================================================================
// Field validations
// ============================================================================

/// Validate location text, returning it trimmed
pub fn validate_location(location: &str) -> Result<String, IntakeError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::Missing { field: "location" });
    }
    Ok(trimmed.to_string())
}

/// Validate purpose text, returning it trimmed
pub fn validate_purpose(purpose: &str) -> Result<String, IntakeError> {
    let trimmed = purpose.trim();
    if trimmed.is_empty() {
        return Err(IntakeError::Missing { field: "purpose" });
    }
    Ok(trimmed.to_string())
}

/// Check whether a purpose is one of the form presets
pub fn is_preset_purpose(purpose: &str) -> bool {
    PURPOSE_PRESETS
        .iter()
        .any(|preset| preset.eq_ignore_ascii_case(purpose.trim()))
}

/// Parse condition labels, keeping request order and dropping repeats
pub fn parse_conditions<S: AsRef<str>>(labels: &[S]) -> Result<Vec<ExtremeCondition>, IntakeError> {
    let parsed = labels
        .iter()
        .map(|label| {
            label
                .as_ref()
                .parse::<ExtremeCondition>()
                .map_err(|e| IntakeError::invalid("conditions", e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    dedup_conditions(parsed)
}

/// Drop repeated conditions (first occurrence wins); the result is never empty
pub fn dedup_conditions(
    conditions: Vec<ExtremeCondition>,
) -> Result<Vec<ExtremeCondition>, IntakeError> {
    let mut unique = Vec::with_capacity(conditions.len());
    for condition in conditions {
        if !unique.contains(&condition) {
            unique.push(condition);
        }
    }
    if unique.is_empty() {
        return Err(IntakeError::Missing { field: "conditions" });
    }
    Ok(unique)
}

/// Parse the target date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_intake_date(raw: Option<&str>) -> Result<NaiveDate, IntakeError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(IntakeError::Missing { field: "date" });
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| IntakeError::invalid("date", format!("cannot parse date '{}'", raw)))
}

/// Reject target dates before `today`
pub fn validate_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), IntakeError> {
    if date < today {
        return Err(IntakeError::invalid(
            "date",
            format!("{} is in the past", date),
        ));
    }
    Ok(())
}

/// 1-based ordinal day of the year (proleptic Gregorian)
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}
