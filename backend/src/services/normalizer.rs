//! Query normalization
//!
//! Turns a raw intake submission into a validated, geocoded `WeatherQuery`.

use chrono::{NaiveDate, Utc};
use shared::{WeatherQuery, WeatherQueryRequest};
use std::sync::Arc;

use crate::error::AppResult;
use crate::external::geocoding::{default_coordinates, Geocoder};

/// Validates intake input and resolves its location
#[derive(Clone)]
pub struct QueryNormalizer {
    geocoder: Arc<dyn Geocoder>,
}

impl QueryNormalizer {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    /// Normalize against today's UTC date
    pub async fn normalize(&self, request: WeatherQueryRequest) -> AppResult<WeatherQuery> {
        self.normalize_on(request, Utc::now().date_naive()).await
    }

    /// Normalize with an explicit "today", rejecting earlier target dates
    pub async fn normalize_on(
        &self,
        request: WeatherQueryRequest,
        today: NaiveDate,
    ) -> AppResult<WeatherQuery> {
        let mut query = request.into_query(today)?;
        self.resolve(&mut query).await;
        Ok(query)
    }

    /// Back-fill coordinates; unknown locations get the default coordinate
    pub async fn resolve(&self, query: &mut WeatherQuery) {
        if query.is_resolved() {
            return;
        }

        let coordinates = match self.geocoder.resolve(query.location()).await {
            Some(coordinates) => coordinates,
            None => {
                tracing::info!(
                    location = query.location(),
                    "Location not in gazetteer, using default coordinates"
                );
                default_coordinates()
            }
        };
        query.backfill_coordinates(coordinates);
    }
}
