//! Weather series models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of daily samples in a query window: 7 days back through 6 days ahead
pub const SERIES_LENGTH: usize = 14;
pub const LOOKBACK_DAYS: i64 = 7;
pub const LOOKAHEAD_DAYS: i64 = 6;

/// Lower bound applied to relative humidity samples (%)
pub const HUMIDITY_MIN: f64 = 20.0;
/// Upper bound applied to relative humidity samples (%)
pub const HUMIDITY_MAX: f64 = 100.0;

/// The four variables carried by a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WeatherVariable {
    /// Air temperature in °C
    Temperature,
    /// Wind speed in km/h
    WindSpeed,
    /// Precipitation in mm
    Precipitation,
    /// Relative humidity in %
    Humidity,
}

impl WeatherVariable {
    pub fn unit(&self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "°C",
            WeatherVariable::WindSpeed => "km/h",
            WeatherVariable::Precipitation => "mm",
            WeatherVariable::Humidity => "%",
        }
    }

    /// Clamp a raw sample into the variable's valid range
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            WeatherVariable::Humidity => value.clamp(HUMIDITY_MIN, HUMIDITY_MAX),
            _ => value.max(0.0),
        }
    }
}

/// Representative magnitude of each variable for a query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Baseline {
    pub temperature: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub humidity: f64,
}

impl Baseline {
    pub fn get(&self, variable: WeatherVariable) -> f64 {
        match variable {
            WeatherVariable::Temperature => self.temperature,
            WeatherVariable::WindSpeed => self.wind_speed,
            WeatherVariable::Precipitation => self.precipitation,
            WeatherVariable::Humidity => self.humidity,
        }
    }
}

/// Failure while assembling a series
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("Series is empty")]
    Empty,

    #[error("Series length mismatch: {variable:?} has {actual} samples, expected {expected}")]
    LengthMismatch {
        variable: WeatherVariable,
        expected: usize,
        actual: usize,
    },

    #[error("Timestamps must be strictly increasing (index {index})")]
    Unordered { index: usize },

    #[error("Non-finite {variable:?} sample at index {index}")]
    NonFinite { variable: WeatherVariable, index: usize },
}

/// One day of the series, as exported to tabular form
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub windspeed: f64,
    pub rainfall: f64,
    pub humidity: f64,
}

/// Time-indexed weather samples for a query window.
///
/// All sequences share one length, timestamps are strictly increasing and
/// every sample is inside its variable's valid range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "WeatherSeriesRecord")]
pub struct WeatherSeries {
    temperature: Vec<f64>,
    windspeed: Vec<f64>,
    rainfall: Vec<f64>,
    humidity: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
    baseline: Baseline,
}

impl WeatherSeries {
    /// Assemble a series, clamping every sample into range
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        temperature: Vec<f64>,
        windspeed: Vec<f64>,
        rainfall: Vec<f64>,
        humidity: Vec<f64>,
        baseline: Baseline,
    ) -> Result<Self, SeriesError> {
        let expected = timestamps.len();
        if expected == 0 {
            return Err(SeriesError::Empty);
        }

        if let Some(index) = timestamps.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SeriesError::Unordered { index: index + 1 });
        }

        let temperature = checked(WeatherVariable::Temperature, temperature, expected)?;
        let windspeed = checked(WeatherVariable::WindSpeed, windspeed, expected)?;
        let rainfall = checked(WeatherVariable::Precipitation, rainfall, expected)?;
        let humidity = checked(WeatherVariable::Humidity, humidity, expected)?;

        Ok(Self {
            temperature,
            windspeed,
            rainfall,
            humidity,
            timestamps,
            baseline,
        })
    }

    /// Assemble a series whose baseline is the mean of its own samples
    pub fn with_mean_baseline(
        timestamps: Vec<DateTime<Utc>>,
        temperature: Vec<f64>,
        windspeed: Vec<f64>,
        rainfall: Vec<f64>,
        humidity: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let placeholder = Baseline {
            temperature: 0.0,
            wind_speed: 0.0,
            precipitation: 0.0,
            humidity: 0.0,
        };
        let mut series = Self::new(timestamps, temperature, windspeed, rainfall, humidity, placeholder)?;
        series.baseline = Baseline {
            temperature: mean(&series.temperature),
            wind_speed: mean(&series.windspeed),
            precipitation: mean(&series.rainfall),
            humidity: mean(&series.humidity),
        };
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn values(&self, variable: WeatherVariable) -> &[f64] {
        match variable {
            WeatherVariable::Temperature => &self.temperature,
            WeatherVariable::WindSpeed => &self.windspeed,
            WeatherVariable::Precipitation => &self.rainfall,
            WeatherVariable::Humidity => &self.humidity,
        }
    }

    /// Iterate the series one day at a time
    pub fn samples(&self) -> impl Iterator<Item = DailySample> + '_ {
        self.timestamps.iter().enumerate().map(|(i, ts)| DailySample {
            timestamp: *ts,
            temperature: self.temperature[i],
            windspeed: self.windspeed[i],
            rainfall: self.rainfall[i],
            humidity: self.humidity[i],
        })
    }

    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            avg_temperature: mean(&self.temperature),
            min_temperature: min(&self.temperature),
            max_temperature: max(&self.temperature),
            avg_wind_speed: mean(&self.windspeed),
            max_wind_speed: max(&self.windspeed),
            total_rainfall: self.rainfall.iter().sum(),
            avg_humidity: mean(&self.humidity),
        }
    }
}

fn checked(
    variable: WeatherVariable,
    values: Vec<f64>,
    expected: usize,
) -> Result<Vec<f64>, SeriesError> {
    if values.len() != expected {
        return Err(SeriesError::LengthMismatch {
            variable,
            expected,
            actual: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(SeriesError::NonFinite { variable, index });
    }
    Ok(values.into_iter().map(|v| variable.clamp(v)).collect())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[derive(Debug, Deserialize)]
struct WeatherSeriesRecord {
    temperature: Vec<f64>,
    windspeed: Vec<f64>,
    rainfall: Vec<f64>,
    humidity: Vec<f64>,
    timestamps: Vec<DateTime<Utc>>,
    #[serde(default)]
    baseline: Option<Baseline>,
}

impl TryFrom<WeatherSeriesRecord> for WeatherSeries {
    type Error = SeriesError;

    fn try_from(r: WeatherSeriesRecord) -> Result<Self, Self::Error> {
        match r.baseline {
            Some(baseline) => WeatherSeries::new(
                r.timestamps,
                r.temperature,
                r.windspeed,
                r.rainfall,
                r.humidity,
                baseline,
            ),
            None => WeatherSeries::with_mean_baseline(
                r.timestamps,
                r.temperature,
                r.windspeed,
                r.rainfall,
                r.humidity,
            ),
        }
    }
}

/// Headline statistics shown above the charts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_wind_speed: f64,
    pub max_wind_speed: f64,
    pub total_rainfall: f64,
    pub avg_humidity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn days(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2025, 6, 24, 0, 0, 0).unwrap();
        (0..n as i64).map(|i| start + Duration::days(i)).collect()
    }

    fn baseline() -> Baseline {
        Baseline {
            temperature: 22.0,
            wind_speed: 15.0,
            precipitation: 2.0,
            humidity: 60.0,
        }
    }

    #[test]
    fn test_new_clamps_samples() {
        let series = WeatherSeries::new(
            days(3),
            vec![-4.0, 10.0, 20.0],
            vec![-1.0, 5.0, 9.0],
            vec![0.0, -0.5, 3.0],
            vec![5.0, 60.0, 130.0],
            baseline(),
        )
        .unwrap();

        assert_eq!(series.values(WeatherVariable::Temperature), &[0.0, 10.0, 20.0]);
        assert_eq!(series.values(WeatherVariable::WindSpeed), &[0.0, 5.0, 9.0]);
        assert_eq!(series.values(WeatherVariable::Precipitation), &[0.0, 0.0, 3.0]);
        assert_eq!(series.values(WeatherVariable::Humidity), &[20.0, 60.0, 100.0]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = WeatherSeries::new(
            days(3),
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0],
            vec![1.0, 2.0, 3.0],
            vec![50.0, 50.0, 50.0],
            baseline(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                variable: WeatherVariable::WindSpeed,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let mut ts = days(3);
        ts.swap(1, 2);
        let err = WeatherSeries::new(
            ts,
            vec![1.0; 3],
            vec![1.0; 3],
            vec![1.0; 3],
            vec![50.0; 3],
            baseline(),
        )
        .unwrap_err();
        assert_eq!(err, SeriesError::Unordered { index: 2 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = WeatherSeries::new(
            days(2),
            vec![1.0, f64::NAN],
            vec![1.0; 2],
            vec![1.0; 2],
            vec![50.0; 2],
            baseline(),
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::NonFinite { index: 1, .. }));
    }

    #[test]
    fn test_empty_rejected() {
        let err = WeatherSeries::new(vec![], vec![], vec![], vec![], vec![], baseline()).unwrap_err();
        assert_eq!(err, SeriesError::Empty);
    }

    #[test]
    fn test_mean_baseline_and_summary() {
        let series = WeatherSeries::with_mean_baseline(
            days(4),
            vec![10.0, 20.0, 30.0, 40.0],
            vec![5.0, 15.0, 10.0, 10.0],
            vec![0.0, 2.0, 4.0, 6.0],
            vec![40.0, 60.0, 80.0, 100.0],
        )
        .unwrap();

        assert_eq!(series.baseline().temperature, 25.0);
        assert_eq!(series.baseline().precipitation, 3.0);

        let summary = series.summary();
        assert_eq!(summary.min_temperature, 10.0);
        assert_eq!(summary.max_temperature, 40.0);
        assert_eq!(summary.max_wind_speed, 15.0);
        assert_eq!(summary.total_rainfall, 12.0);
        assert_eq!(summary.avg_humidity, 70.0);
    }

    #[test]
    fn test_serde_revalidates() {
        let json = r#"{
            "temperature": [1.0, 2.0],
            "windspeed": [1.0, 2.0],
            "rainfall": [1.0],
            "humidity": [50.0, 50.0],
            "timestamps": ["2025-06-24T00:00:00Z", "2025-06-25T00:00:00Z"]
        }"#;
        assert!(serde_json::from_str::<WeatherSeries>(json).is_err());
    }

    #[test]
    fn test_samples_rows() {
        let series = WeatherSeries::new(
            days(2),
            vec![21.0, 22.0],
            vec![10.0, 11.0],
            vec![0.5, 0.0],
            vec![55.0, 65.0],
            baseline(),
        )
        .unwrap();

        let rows: Vec<_> = series.samples().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].temperature, 22.0);
        assert_eq!(rows[1].humidity, 65.0);
    }
}
