//! Insight pipeline integration tests
//!
//! Tests for the end-to-end pipeline including:
//! - Normalization failures stop the pipeline before any fetch
//! - Series fetches are bounded by the configured timeout
//! - Reports carry one analysis per requested condition

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    AdvisorySource, ExtremeAnalyzer, ExtremeCondition, SeverityTier, WeatherQuery,
    WeatherQueryRequest, WeatherSeries, SERIES_LENGTH,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use weather_insight_backend::external::GazetteerGeocoder;
use weather_insight_backend::services::{
    AdvisoryService, InsightService, QueryNormalizer, SyntheticDataSource, WeatherDataSource,
};
use weather_insight_backend::{AppError, AppResult};

/// Synthetic source that counts how often it is asked
struct CountingSource {
    inner: SyntheticDataSource,
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherDataSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch_series(&self, query: &WeatherQuery) -> AppResult<WeatherSeries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(query)
    }
}

/// Source that never answers in time
struct StalledSource;

#[async_trait]
impl WeatherDataSource for StalledSource {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn fetch_series(&self, _query: &WeatherQuery) -> AppResult<WeatherSeries> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(AppError::DataUnavailable("unreachable".into()))
    }
}

fn service(source: Arc<dyn WeatherDataSource>, timeout: Duration) -> InsightService {
    InsightService::new(
        QueryNormalizer::new(Arc::new(GazetteerGeocoder::new())),
        source,
        AdvisoryService::new(None),
        ExtremeAnalyzer::default(),
        timeout,
    )
}

fn counting() -> Arc<CountingSource> {
    Arc::new(CountingSource {
        inner: SyntheticDataSource::new(42),
        calls: AtomicUsize::new(0),
    })
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn request(location: &str, conditions: &[&str], date: &str) -> WeatherQueryRequest {
    WeatherQueryRequest {
        location: location.to_string(),
        purpose: "Hiking".to_string(),
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        date: Some(date.to_string()),
    }
}

#[tokio::test]
async fn test_tokyo_hot_hiking_report() {
    let source = counting();
    let insights = service(source.clone(), Duration::from_secs(10));

    let report = insights
        .run_on(request("Tokyo", &["Very Hot"], "2025-07-01"), today())
        .await
        .unwrap();

    assert_eq!(report.query.day_of_year(), 182);
    assert!(report.query.is_resolved());
    assert_eq!(report.series.len(), SERIES_LENGTH);
    assert_eq!(report.analysis.len(), 1);

    let hot = &report.analysis[0];
    assert_eq!(hot.condition, ExtremeCondition::VeryHot);
    assert!(hot.probability >= 0.6);
    assert!(hot.severity >= SeverityTier::High);

    assert_eq!(report.advisory.source, AdvisorySource::FallbackNoCredential);
    assert!(report.advisory.text.starts_with("For your hiking in Tokyo"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_summary_matches_series() {
    let insights = service(counting(), Duration::from_secs(10));
    let report = insights
        .run_on(
            request("London", &["Very Wet", "Very Windy"], "2025-09-15"),
            today(),
        )
        .await
        .unwrap();

    assert_eq!(report.summary, report.series.summary());
    assert!(report.summary.min_temperature <= report.summary.avg_temperature);
    assert!(report.summary.avg_temperature <= report.summary.max_temperature);
    assert_eq!(report.analysis.len(), 2);
}

#[tokio::test]
async fn test_empty_conditions_stop_before_fetch() {
    let source = counting();
    let insights = service(source.clone(), Duration::from_secs(10));

    let err = insights
        .run_on(request("Tokyo", &[], "2025-07-01"), today())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "conditions"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_past_date_rejected() {
    let source = counting();
    let insights = service(source.clone(), Duration::from_secs(10));

    let err = insights
        .run_on(request("Tokyo", &["Very Hot"], "2025-05-31"), today())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "date"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fetch_timeout_is_data_unavailable() {
    let insights = service(Arc::new(StalledSource), Duration::from_millis(50));

    let err = insights
        .run_on(request("Tokyo", &["Very Hot"], "2025-07-01"), today())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DataUnavailable(_)));
}

#[test]
fn test_unknown_location_still_reports() {
    let insights = service(counting(), Duration::from_secs(10));
    let report = tokio_test::block_on(
        insights.run_on(request("Atlantis", &["Very Cold"], "2025-12-24"), today()),
    )
    .unwrap();

    assert!(report.query.is_resolved());
    assert_eq!(report.analysis[0].condition, ExtremeCondition::VeryCold);
}
