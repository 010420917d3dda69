//! Weather data sources
//!
//! A data source turns a query into a 14-day `WeatherSeries`. The synthetic
//! source is deterministic for a given seed and query; the Open-Meteo source
//! reads real daily observations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shared::{
    Baseline, DateRange, ExtremeCondition, WeatherQuery, WeatherSeries, LOOKAHEAD_DAYS,
    LOOKBACK_DAYS, SERIES_LENGTH,
};
use std::time::Duration;

use crate::config::{DataSourceConfig, DataSourceKind};
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

/// Produces the weather series for a query
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    /// Short identifier for logs and health output
    fn name(&self) -> &'static str;

    async fn fetch_series(&self, query: &WeatherQuery) -> AppResult<WeatherSeries>;
}

/// Build the data source selected by configuration
pub fn from_config(config: &DataSourceConfig) -> AppResult<Box<dyn WeatherDataSource>> {
    match config.kind {
        DataSourceKind::Synthetic => Ok(Box::new(SyntheticDataSource::new(config.seed))),
        DataSourceKind::OpenMeteo => {
            let client = WeatherClient::new(
                config.archive_url.clone(),
                config.forecast_url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            Ok(Box::new(OpenMeteoDataSource::new(client)))
        }
    }
}

/// Days covered by a query's series
pub fn series_window(date: NaiveDate) -> DateRange {
    DateRange::around(date, LOOKBACK_DAYS, LOOKAHEAD_DAYS)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

// ============================================================================
// Synthetic source
// ============================================================================

/// Periodic term and perturbation bound for one variable
struct Shape {
    amplitude: f64,
    period: f64,
    phase: fn(f64) -> f64,
    jitter: f64,
}

const TEMPERATURE_SHAPE: Shape = Shape {
    amplitude: 3.0,
    period: 2.0,
    phase: f64::sin,
    jitter: 2.0,
};
const WIND_SHAPE: Shape = Shape {
    amplitude: 8.0,
    period: 3.0,
    phase: f64::cos,
    jitter: 2.5,
};
const HUMIDITY_SHAPE: Shape = Shape {
    amplitude: 10.0,
    period: 1.5,
    phase: f64::sin,
    jitter: 2.5,
};
const RAIN_PERIOD: f64 = 2.5;
const RAIN_JITTER: f64 = 1.0;

/// Deterministic seeded generator shaped like the four-variable schema
#[derive(Debug, Clone)]
pub struct SyntheticDataSource {
    seed: u64,
}

impl SyntheticDataSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Baseline magnitudes chosen by the requested conditions
    pub fn baseline_for(query: &WeatherQuery) -> Baseline {
        let temperature = if query.has_condition(ExtremeCondition::VeryHot) {
            35.0
        } else if query.has_condition(ExtremeCondition::VeryCold) {
            5.0
        } else {
            22.0
        };

        Baseline {
            temperature,
            wind_speed: if query.has_condition(ExtremeCondition::VeryWindy) { 45.0 } else { 15.0 },
            precipitation: if query.has_condition(ExtremeCondition::VeryWet) { 8.0 } else { 2.0 },
            humidity: if query.has_condition(ExtremeCondition::VeryUncomfortable) {
                85.0
            } else {
                60.0
            },
        }
    }

    /// Generate the series without going through the async trait
    pub fn generate(&self, query: &WeatherQuery) -> AppResult<WeatherSeries> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ query_fingerprint(query));
        let baseline = Self::baseline_for(query);

        let mut temperature = Vec::with_capacity(SERIES_LENGTH);
        let mut windspeed = Vec::with_capacity(SERIES_LENGTH);
        let mut rainfall = Vec::with_capacity(SERIES_LENGTH);
        let mut humidity = Vec::with_capacity(SERIES_LENGTH);

        for i in 0..SERIES_LENGTH {
            let t = i as f64;
            temperature.push(sample(&mut rng, baseline.temperature, &TEMPERATURE_SHAPE, t));
            windspeed.push(sample(&mut rng, baseline.wind_speed, &WIND_SHAPE, t));

            let rain_shape = Shape {
                amplitude: baseline.precipitation * 0.5,
                period: RAIN_PERIOD,
                phase: f64::sin,
                jitter: RAIN_JITTER,
            };
            rainfall.push(sample(&mut rng, baseline.precipitation, &rain_shape, t));
            humidity.push(sample(&mut rng, baseline.humidity, &HUMIDITY_SHAPE, t));
        }

        let timestamps = series_window(query.date()).days().map(midnight_utc).collect();

        Ok(WeatherSeries::new(
            timestamps,
            temperature,
            windspeed,
            rainfall,
            humidity,
            baseline,
        )?)
    }
}

fn sample(rng: &mut ChaCha8Rng, baseline: f64, shape: &Shape, t: f64) -> f64 {
    let periodic = shape.amplitude * (shape.phase)(t / shape.period);
    let noise = rng.gen_range(-shape.jitter..=shape.jitter);
    baseline + periodic + noise
}

/// FNV-1a over the fields that determine a synthetic series
fn query_fingerprint(query: &WeatherQuery) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let date = query.date().to_string();
    let conditions = query
        .conditions()
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(",");

    [query.location().to_lowercase().as_str(), date.as_str(), conditions.as_str()]
        .iter()
        .flat_map(|part| part.bytes().chain(std::iter::once(0u8)))
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

#[async_trait]
impl WeatherDataSource for SyntheticDataSource {
    fn name(&self) -> &'static str {
        DataSourceKind::Synthetic.as_str()
    }

    async fn fetch_series(&self, query: &WeatherQuery) -> AppResult<WeatherSeries> {
        self.generate(query)
    }
}

// ============================================================================
// Open-Meteo source
// ============================================================================

/// Real observations from the Open-Meteo daily API
#[derive(Clone)]
pub struct OpenMeteoDataSource {
    client: WeatherClient,
}

impl OpenMeteoDataSource {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    /// Fetch the query's window as seen from `today` (UTC)
    pub async fn fetch_series_on(
        &self,
        query: &WeatherQuery,
        today: NaiveDate,
    ) -> AppResult<WeatherSeries> {
        let coordinates = query.coordinates().ok_or_else(|| {
            AppError::DataUnavailable(format!("No coordinates for '{}'", query.location()))
        })?;
        let window = series_window(query.date());

        let obs = self
            .client
            .get_daily(
                coordinates.latitude,
                coordinates.longitude,
                window.start,
                window.end,
                today,
            )
            .await?;

        let expected: Vec<NaiveDate> = window.days().collect();
        if obs.dates != expected {
            return Err(AppError::DataUnavailable(format!(
                "Weather API returned {} days for a {}-day window",
                obs.dates.len(),
                expected.len()
            )));
        }

        Ok(WeatherSeries::with_mean_baseline(
            obs.dates.into_iter().map(midnight_utc).collect(),
            obs.temperature_celsius,
            obs.wind_speed_kmh,
            obs.precipitation_mm,
            obs.humidity_percent,
        )?)
    }
}

#[async_trait]
impl WeatherDataSource for OpenMeteoDataSource {
    fn name(&self) -> &'static str {
        DataSourceKind::OpenMeteo.as_str()
    }

    async fn fetch_series(&self, query: &WeatherQuery) -> AppResult<WeatherSeries> {
        self.fetch_series_on(query, Utc::now().date_naive()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::WeatherVariable;

    fn query(location: &str, conditions: Vec<ExtremeCondition>) -> WeatherQuery {
        WeatherQuery::new(
            location,
            "Hiking",
            conditions,
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_baseline_selection() {
        let hot = SyntheticDataSource::baseline_for(&query("Tokyo", vec![ExtremeCondition::VeryHot]));
        assert_eq!(hot.temperature, 35.0);
        assert_eq!(hot.wind_speed, 15.0);

        let cold = SyntheticDataSource::baseline_for(&query(
            "Oslo",
            vec![ExtremeCondition::VeryCold, ExtremeCondition::VeryWindy],
        ));
        assert_eq!(cold.temperature, 5.0);
        assert_eq!(cold.wind_speed, 45.0);

        // hot wins when both temperature extremes are requested
        let both = SyntheticDataSource::baseline_for(&query(
            "Denver",
            vec![ExtremeCondition::VeryCold, ExtremeCondition::VeryHot],
        ));
        assert_eq!(both.temperature, 35.0);

        let wet = SyntheticDataSource::baseline_for(&query(
            "Mumbai",
            vec![ExtremeCondition::VeryWet, ExtremeCondition::VeryUncomfortable],
        ));
        assert_eq!(wet.precipitation, 8.0);
        assert_eq!(wet.humidity, 85.0);
    }

    #[test]
    fn test_generated_window() {
        let q = query("Tokyo", vec![ExtremeCondition::VeryHot]);
        let series = SyntheticDataSource::new(42).generate(&q).unwrap();

        assert_eq!(series.len(), SERIES_LENGTH);
        assert_eq!(
            series.timestamps()[0],
            midnight_utc(NaiveDate::from_ymd_opt(2025, 6, 24).unwrap())
        );
        assert_eq!(
            series.timestamps()[SERIES_LENGTH - 1],
            midnight_utc(NaiveDate::from_ymd_opt(2025, 7, 7).unwrap())
        );
    }

    #[test]
    fn test_same_seed_same_series() {
        let q = query("Tokyo", vec![ExtremeCondition::VeryHot]);
        let a = SyntheticDataSource::new(7).generate(&q).unwrap();
        let b = SyntheticDataSource::new(7).generate(&q).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_differs() {
        let q = query("Tokyo", vec![ExtremeCondition::VeryHot]);
        let a = SyntheticDataSource::new(1).generate(&q).unwrap();
        let b = SyntheticDataSource::new(2).generate(&q).unwrap();
        assert_ne!(
            a.values(WeatherVariable::Temperature),
            b.values(WeatherVariable::Temperature)
        );
    }

    #[test]
    fn test_samples_stay_near_baseline() {
        let q = query("Tokyo", vec![ExtremeCondition::VeryHot]);
        let series = SyntheticDataSource::new(42).generate(&q).unwrap();
        for t in series.values(WeatherVariable::Temperature) {
            assert!((30.0..=40.0).contains(t), "temperature {} out of band", t);
        }
    }

    #[tokio::test]
    async fn test_open_meteo_requires_coordinates() {
        let client = WeatherClient::new(
            "http://127.0.0.1:9".to_string(),
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let source = OpenMeteoDataSource::new(client);
        let err = source
            .fetch_series(&query("Tokyo", vec![ExtremeCondition::VeryHot]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
