//! Report export
//!
//! JSON and CSV renderings of a query and its weather series.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::{ExtremeCondition, WeatherQuery, WeatherSeries, WeatherVariable};

use crate::error::{AppError, AppResult};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    query: ExportedQuery<'a>,
    weather_data: ExportedSeries<'a>,
    exported_at: String,
}

#[derive(Debug, Serialize)]
struct ExportedQuery<'a> {
    location: &'a str,
    purpose: &'a str,
    conditions: &'a [ExtremeCondition],
    date: String,
}

#[derive(Debug, Serialize)]
struct ExportedSeries<'a> {
    temperature: &'a [f64],
    windspeed: &'a [f64],
    rainfall: &'a [f64],
    humidity: &'a [f64],
    timestamps: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CsvRow {
    timestamp: String,
    temperature: f64,
    windspeed: f64,
    rainfall: f64,
    humidity: f64,
}

fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn date_instant(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Pretty-printed JSON document nesting the query and the series
pub fn to_json(
    query: &WeatherQuery,
    series: &WeatherSeries,
    exported_at: DateTime<Utc>,
) -> AppResult<String> {
    let document = JsonExport {
        query: ExportedQuery {
            location: query.location(),
            purpose: query.purpose(),
            conditions: query.conditions(),
            date: iso(date_instant(query.date())),
        },
        weather_data: ExportedSeries {
            temperature: series.values(WeatherVariable::Temperature),
            windspeed: series.values(WeatherVariable::WindSpeed),
            rainfall: series.values(WeatherVariable::Precipitation),
            humidity: series.values(WeatherVariable::Humidity),
            timestamps: series.timestamps().iter().copied().map(iso).collect(),
        },
        exported_at: iso(exported_at),
    };

    serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::Internal(format!("JSON serialization error: {}", e)))
}

/// One row per day under a `timestamp,temperature,windspeed,rainfall,humidity` header
pub fn to_csv(series: &WeatherSeries) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for sample in series.samples() {
        wtr.serialize(CsvRow {
            timestamp: iso(sample.timestamp),
            temperature: sample.temperature,
            windspeed: sample.windspeed,
            rainfall: sample.rainfall,
            humidity: sample.humidity,
        })
        .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}

/// `weather-data-{location}-{YYYY-MM-DD}.{ext}` keyed on the query date
pub fn filename(query: &WeatherQuery, format: ExportFormat) -> String {
    let location: String = query
        .location()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ' | ',') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "weather-data-{}-{}.{}",
        location,
        query.date().format("%Y-%m-%d"),
        format.extension()
    )
}
