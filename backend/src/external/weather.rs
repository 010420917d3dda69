//! Weather API client for fetching daily observations
//!
//! Integrates with the Open-Meteo daily API. Fully historical windows go to
//! the archive endpoint; windows reaching today or later go to the forecast
//! endpoint. Both return the same `daily` block.

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DAILY_FIELDS: &str =
    "temperature_2m_mean,wind_speed_10m_max,precipitation_sum,relative_humidity_2m_mean";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    archive_url: String,
    forecast_url: String,
}

/// Which Open-Meteo daily endpoint serves a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyEndpoint {
    /// Observed history, ends before today
    Archive,
    /// Recent past plus the forecast horizon
    Forecast,
}

impl DailyEndpoint {
    /// The archive has no data for today or later
    pub fn for_window(end: NaiveDate, today: NaiveDate) -> Self {
        if end < today {
            DailyEndpoint::Archive
        } else {
            DailyEndpoint::Forecast
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            DailyEndpoint::Archive => "archive",
            DailyEndpoint::Forecast => "forecast",
        }
    }
}

/// Daily observations for a date range, one entry per day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservations {
    pub dates: Vec<NaiveDate>,
    pub temperature_celsius: Vec<f64>,
    pub wind_speed_kmh: Vec<f64>,
    pub precipitation_mm: Vec<f64>,
    pub humidity_percent: Vec<f64>,
}

/// Open-Meteo API response
#[derive(Debug, Deserialize)]
struct OMResponse {
    daily: OMDaily,
}

#[derive(Debug, Deserialize)]
struct OMDaily {
    time: Vec<NaiveDate>,
    temperature_2m_mean: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(archive_url: String, forecast_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            archive_url: archive_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, endpoint: DailyEndpoint) -> String {
        let base = match endpoint {
            DailyEndpoint::Archive => &self.archive_url,
            DailyEndpoint::Forecast => &self.forecast_url,
        };
        format!("{}/{}", base, endpoint.path())
    }

    /// Fetch daily observations by GPS coordinates for an inclusive date range
    ///
    /// `today` picks the endpoint: see [`DailyEndpoint::for_window`].
    pub async fn get_daily(
        &self,
        latitude: Decimal,
        longitude: Decimal,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<DailyObservations> {
        let endpoint = DailyEndpoint::for_window(end, today);
        let url = self.endpoint_url(endpoint);
        tracing::debug!(%url, %start, %end, "Fetching daily observations");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", start.to_string()),
                ("end_date", end.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::DataUnavailable(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DataUnavailable(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OMResponse = response.json().await.map_err(|e| {
            AppError::DataUnavailable(format!("Failed to parse weather response: {}", e))
        })?;

        convert_daily(data.daily)
    }
}

/// Convert the Open-Meteo daily block, rejecting gaps
fn convert_daily(daily: OMDaily) -> AppResult<DailyObservations> {
    let n = daily.time.len();

    let column = |name: &str, values: Vec<Option<f64>>| -> AppResult<Vec<f64>> {
        if values.len() != n {
            return Err(AppError::DataUnavailable(format!(
                "Weather API returned {} {} values for {} days",
                values.len(),
                name,
                n
            )));
        }
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    AppError::DataUnavailable(format!("Missing {} for day {}", name, i))
                })
            })
            .collect()
    };

    Ok(DailyObservations {
        temperature_celsius: column("temperature", daily.temperature_2m_mean)?,
        wind_speed_kmh: column("wind speed", daily.wind_speed_10m_max)?,
        precipitation_mm: column("precipitation", daily.precipitation_sum)?,
        humidity_percent: column("humidity", daily.relative_humidity_2m_mean)?,
        dates: daily.time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(humidity: Vec<Option<f64>>) -> OMDaily {
        OMDaily {
            time: vec![
                NaiveDate::from_ymd_opt(2025, 6, 24).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 25).unwrap(),
            ],
            temperature_2m_mean: vec![Some(21.5), Some(23.0)],
            wind_speed_10m_max: vec![Some(12.0), Some(18.4)],
            precipitation_sum: vec![Some(0.0), Some(4.2)],
            relative_humidity_2m_mean: humidity,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_endpoint_for_window() {
        let today = date(2026, 10, 18);
        assert_eq!(DailyEndpoint::for_window(date(2026, 10, 17), today), DailyEndpoint::Archive);
        assert_eq!(DailyEndpoint::for_window(today, today), DailyEndpoint::Forecast);
        assert_eq!(DailyEndpoint::for_window(date(2026, 10, 24), today), DailyEndpoint::Forecast);
    }

    #[test]
    fn test_endpoint_urls() {
        let client = WeatherClient::new(
            "https://archive-api.open-meteo.com/v1/".to_string(),
            "https://api.open-meteo.com/v1".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            client.endpoint_url(DailyEndpoint::Archive),
            "https://archive-api.open-meteo.com/v1/archive"
        );
        assert_eq!(
            client.endpoint_url(DailyEndpoint::Forecast),
            "https://api.open-meteo.com/v1/forecast"
        );
    }

    #[test]
    fn test_convert_daily() {
        let obs = convert_daily(daily(vec![Some(60.0), Some(72.0)])).unwrap();
        assert_eq!(obs.dates.len(), 2);
        assert_eq!(obs.wind_speed_kmh, vec![12.0, 18.4]);
        assert_eq!(obs.humidity_percent, vec![60.0, 72.0]);
    }

    #[test]
    fn test_convert_daily_rejects_gaps() {
        let err = convert_daily(daily(vec![Some(60.0), None])).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn test_convert_daily_rejects_short_columns() {
        let err = convert_daily(daily(vec![Some(60.0)])).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
