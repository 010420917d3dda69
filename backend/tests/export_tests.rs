//! Export integration tests

use chrono::{NaiveDate, TimeZone, Utc};
use shared::{ExtremeCondition, WeatherQuery, WeatherVariable};
use weather_insight_backend::services::export::{self, ExportFormat};
use weather_insight_backend::services::SyntheticDataSource;

fn fixture() -> (WeatherQuery, shared::WeatherSeries) {
    let query = WeatherQuery::new(
        "Tokyo",
        "Hiking",
        vec![ExtremeCondition::VeryHot, ExtremeCondition::VeryWet],
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
    )
    .unwrap();
    let series = SyntheticDataSource::new(42).generate(&query).unwrap();
    (query, series)
}

#[test]
fn test_csv_has_header_and_fourteen_rows() {
    let (_, series) = fixture();
    let csv = export::to_csv(&series).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0], "timestamp,temperature,windspeed,rainfall,humidity");
    assert!(lines[1].starts_with("2025-06-24T00:00:00.000Z,"));
    assert!(lines[14].starts_with("2025-07-07T00:00:00.000Z,"));
    assert!(lines[1..].iter().all(|row| row.split(',').count() == 5));
}

#[test]
fn test_json_carries_series_values() {
    let (query, series) = fixture();
    let exported_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&export::to_json(&query, &series, exported_at).unwrap()).unwrap();

    assert_eq!(json["query"]["purpose"], "Hiking");
    assert_eq!(
        json["query"]["conditions"],
        serde_json::json!(["Very Hot", "Very Wet"])
    );

    let temperatures: Vec<f64> = json["weatherData"]["temperature"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    let expected = series.values(WeatherVariable::Temperature);
    assert_eq!(temperatures.len(), expected.len());
    assert!(temperatures
        .iter()
        .zip(expected)
        .all(|(a, b)| (a - b).abs() < 1e-9));
    assert_eq!(json["weatherData"]["timestamps"].as_array().unwrap().len(), 14);
    assert_eq!(json["exportedAt"], "2025-06-01T08:30:00.000Z");
}

#[test]
fn test_filename_uses_query_date() {
    let (query, _) = fixture();
    assert_eq!(
        export::filename(&query, ExportFormat::Csv),
        "weather-data-Tokyo-2025-07-01.csv"
    );
}
