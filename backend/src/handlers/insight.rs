//! HTTP handlers for insight reports and exports

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{InsightReport, WeatherQueryRequest};

use crate::error::AppResult;
use crate::services::export::{self, ExportFormat};
use crate::AppState;

/// Run the full pipeline for one intake submission
pub async fn create_insight(
    State(state): State<AppState>,
    Json(request): Json<WeatherQueryRequest>,
) -> AppResult<Json<InsightReport>> {
    let report = state.insights.run(request).await?;
    tracing::info!(report_id = %report.id, "Insight report generated");
    Ok(Json(report))
}

/// Query parameters for exports
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Run the pipeline and return the series as a downloadable file
pub async fn export_insight(
    State(state): State<AppState>,
    Query(params): Query<ExportQuery>,
    Json(request): Json<WeatherQueryRequest>,
) -> AppResult<Response> {
    let report = state.insights.run(request).await?;

    let body = match params.format {
        ExportFormat::Json => export::to_json(&report.query, &report.series, Utc::now())?,
        ExportFormat::Csv => export::to_csv(&report.series)?,
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export::filename(&report.query, params.format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, params.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
