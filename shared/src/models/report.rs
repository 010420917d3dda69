//! Insight report returned to the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::ExtremeAnalysisResult;
use super::query::WeatherQuery;
use super::weather::{SeriesSummary, WeatherSeries};

/// Where the advisory text came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorySource {
    Generated,
    FallbackNoCredential,
    FallbackError,
}

/// Short natural-language advice for the query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Advisory {
    pub text: String,
    pub source: AdvisorySource,
}

impl Advisory {
    pub fn is_fallback(&self) -> bool {
        self.source != AdvisorySource::Generated
    }
}

/// Everything the dashboard renders for one submitted query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub id: Uuid,
    pub query: WeatherQuery,
    pub series: WeatherSeries,
    pub summary: SeriesSummary,
    pub analysis: Vec<ExtremeAnalysisResult>,
    pub advisory: Advisory,
    pub generated_at: DateTime<Utc>,
}
