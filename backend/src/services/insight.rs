//! Insight pipeline
//!
//! normalize → (series fetch ‖ advisory) → analyze → summarize

use chrono::{NaiveDate, Utc};
use config::File;
use shared::{
    ConditionPolicy, ExtremeAnalyzer, ExtremeCondition, InsightReport, PolicyTable, WeatherQuery,
    WeatherQueryRequest, WeatherSeries,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::{AnalysisConfig, Config};
use crate::error::{AppError, AppResult};
use crate::external::GazetteerGeocoder;
use crate::services::advisory::AdvisoryService;
use crate::services::data_source::{self, WeatherDataSource};
use crate::services::normalizer::QueryNormalizer;

/// Runs one query through every stage and assembles the report
#[derive(Clone)]
pub struct InsightService {
    normalizer: QueryNormalizer,
    data_source: Arc<dyn WeatherDataSource>,
    advisory: AdvisoryService,
    analyzer: ExtremeAnalyzer,
    fetch_timeout: Duration,
}

impl InsightService {
    pub fn new(
        normalizer: QueryNormalizer,
        data_source: Arc<dyn WeatherDataSource>,
        advisory: AdvisoryService,
        analyzer: ExtremeAnalyzer,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            normalizer,
            data_source,
            advisory,
            analyzer,
            fetch_timeout,
        }
    }

    /// Wire the production collaborators from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let policies = load_policy_table(&config.analysis)?;
        let data_source: Arc<dyn WeatherDataSource> =
            Arc::from(data_source::from_config(&config.data_source)?);

        Ok(Self::new(
            QueryNormalizer::new(Arc::new(GazetteerGeocoder::new())),
            data_source,
            AdvisoryService::from_config(&config.advisory)?,
            ExtremeAnalyzer::new(policies),
            Duration::from_secs(config.data_source.timeout_secs),
        ))
    }

    pub fn data_source_name(&self) -> &'static str {
        self.data_source.name()
    }

    pub fn advisory_configured(&self) -> bool {
        self.advisory.is_configured()
    }

    pub fn policies(&self) -> &PolicyTable {
        self.analyzer.policies()
    }

    pub async fn run(&self, request: WeatherQueryRequest) -> AppResult<InsightReport> {
        self.run_on(request, Utc::now().date_naive()).await
    }

    /// Run with an explicit "today" for the past-date check
    pub async fn run_on(
        &self,
        request: WeatherQueryRequest,
        today: NaiveDate,
    ) -> AppResult<InsightReport> {
        let query = self.normalizer.normalize_on(request, today).await?;
        tracing::info!(
            location = query.location(),
            date = %query.date(),
            conditions = query.conditions().len(),
            "Query normalized"
        );
        self.process(query).await
    }

    /// Everything after normalization
    pub async fn process(&self, query: WeatherQuery) -> AppResult<InsightReport> {
        let (series, advisory) = tokio::join!(
            self.fetch_series(&query),
            self.advisory
                .generate(query.location(), query.purpose(), query.conditions()),
        );
        let series = series?;

        let analysis = self.analyzer.analyze(&series, query.conditions());
        tracing::debug!(results = analysis.len(), "Extreme analysis complete");

        let summary = series.summary();

        Ok(InsightReport {
            id: Uuid::new_v4(),
            query,
            series,
            summary,
            analysis,
            advisory,
            generated_at: Utc::now(),
        })
    }

    async fn fetch_series(&self, query: &WeatherQuery) -> AppResult<WeatherSeries> {
        let source = self.data_source.name();
        match tokio::time::timeout(self.fetch_timeout, self.data_source.fetch_series(query)).await
        {
            Ok(Ok(series)) => {
                tracing::debug!(source, samples = series.len(), "Series fetched");
                Ok(series)
            }
            Ok(Err(e)) => {
                tracing::warn!(source, error = %e, "Series fetch failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(source, timeout = ?self.fetch_timeout, "Series fetch timed out");
                Err(AppError::DataUnavailable(format!(
                    "{} did not respond within {}s",
                    source,
                    self.fetch_timeout.as_secs()
                )))
            }
        }
    }
}

/// Default table, overridden by the configured policy file if any.
///
/// Files are keyed on condition codes (`very_hot`, ...) and may be TOML or JSON.
pub fn load_policy_table(config: &AnalysisConfig) -> AppResult<PolicyTable> {
    let Some(path) = config.policy_file.as_deref() else {
        return Ok(PolicyTable::default());
    };

    let overrides: BTreeMap<ExtremeCondition, ConditionPolicy> = config::Config::builder()
        .add_source(File::with_name(path))
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| {
            AppError::Configuration(format!("Failed to load policy file '{}': {}", path, e))
        })?;

    tracing::info!(path, overridden = overrides.len(), "Loaded policy overrides");
    Ok(PolicyTable::with_overrides(overrides)?)
}
