//! WebAssembly module for the Weather Insight Platform
//!
//! Provides client-side computation for:
//! - Intake validation before submit
//! - Day-of-year and severity classification
//! - Re-analysis of an already fetched series
//!
//! Each export has a plain-Rust counterpart returning `Result<_, String>` so
//! the logic can be tested on native targets.

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("weather-insight wasm ready"));
}

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    parse_intake_date(Some(date)).map_err(|e| e.to_string())
}

// ============================================================================
// Plain-Rust implementations
// ============================================================================

pub fn day_of_year_for(date: &str) -> Result<u32, String> {
    parse_date(date).map(day_of_year)
}

pub fn severity_for(condition: &str, probability: f64) -> Result<String, String> {
    let condition: ExtremeCondition = condition.parse().map_err(|e: UnknownCondition| e.to_string())?;
    Ok(ExtremeAnalyzer::default()
        .classify(condition, probability)
        .to_string())
}

pub fn validate_request(request_json: &str, today: &str) -> Result<String, String> {
    let request: WeatherQueryRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Invalid request JSON: {}", e))?;
    let today = parse_date(today)?;
    let query = request.into_query(today).map_err(|e| e.to_string())?;
    serde_json::to_string(&query).map_err(|e| e.to_string())
}

pub fn analyze_series_json(series_json: &str, conditions_json: &str) -> Result<String, String> {
    let series: WeatherSeries = serde_json::from_str(series_json)
        .map_err(|e| format!("Invalid series JSON: {}", e))?;
    let labels: Vec<String> = serde_json::from_str(conditions_json)
        .map_err(|e| format!("Invalid conditions JSON: {}", e))?;
    let conditions = parse_conditions(&labels).map_err(|e| e.to_string())?;

    let results = ExtremeAnalyzer::default().analyze(&series, &conditions);
    serde_json::to_string(&results).map_err(|e| e.to_string())
}

pub fn summarize_series_json(series_json: &str) -> Result<String, String> {
    let series: WeatherSeries = serde_json::from_str(series_json)
        .map_err(|e| format!("Invalid series JSON: {}", e))?;
    serde_json::to_string(&series.summary()).map_err(|e| e.to_string())
}

// ============================================================================
// JavaScript bindings
// ============================================================================

/// 1-based day of year for a `YYYY-MM-DD` or RFC 3339 date
#[wasm_bindgen]
pub fn day_of_year_of(date: &str) -> Result<u32, JsValue> {
    day_of_year_for(date).map_err(to_js)
}

/// Severity tier ("low" … "extreme") for a condition label and probability
#[wasm_bindgen]
pub fn classify_severity(condition: &str, probability: f64) -> Result<String, JsValue> {
    severity_for(condition, probability).map_err(to_js)
}

/// Validate an intake form; returns the normalized query as JSON
#[wasm_bindgen]
pub fn validate_intake(request_json: &str, today: &str) -> Result<String, JsValue> {
    validate_request(request_json, today).map_err(to_js)
}

/// Validate an intake form against the browser's current UTC date
#[wasm_bindgen]
pub fn validate_intake_now(request_json: &str) -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let today = NaiveDate::from_ymd_opt(
        now.get_utc_full_year() as i32,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
    .ok_or_else(|| JsValue::from_str("Browser clock returned an invalid date"))?;
    validate_request(request_json, &today.to_string()).map_err(to_js)
}

/// Analyze a series JSON against a JSON array of condition labels
#[wasm_bindgen]
pub fn analyze_series(series_json: &str, conditions_json: &str) -> Result<String, JsValue> {
    analyze_series_json(series_json, conditions_json).map_err(to_js)
}

/// Summary statistics for a series JSON
#[wasm_bindgen]
pub fn summarize_series(series_json: &str) -> Result<String, JsValue> {
    summarize_series_json(series_json).map_err(to_js)
}

/// Condition labels as a JSON array
#[wasm_bindgen]
pub fn list_conditions() -> String {
    let labels: Vec<&str> = ExtremeCondition::ALL.iter().map(|c| c.label()).collect();
    serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
}

/// Purpose presets as a JSON array
#[wasm_bindgen]
pub fn list_purposes() -> String {
    serde_json::to_string(&PURPOSE_PRESETS).unwrap_or_else(|_| "[]".to_string())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_validate_intake_now_rejects_past_date() {
        let err = validate_intake_now(
            r#"{"location": "Tokyo", "purpose": "Hiking", "conditions": ["Very Hot"], "date": "2000-01-01"}"#,
        )
        .unwrap_err();
        assert!(err.as_string().unwrap_or_default().contains("past"));
    }

    #[wasm_bindgen_test]
    fn test_classify_severity_binding() {
        assert_eq!(classify_severity("Very Windy", 0.9).unwrap(), "extreme");
    }
}
