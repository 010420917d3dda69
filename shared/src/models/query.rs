//! Weather query models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::condition::ExtremeCondition;
use crate::types::GpsCoordinates;
use crate::validation::{dedup_conditions, validate_location, validate_purpose, IntakeError};

/// A validated request for weather insight.
///
/// Created once per submission. The only field that may change afterwards is
/// `coordinates`, which is back-filled once geocoding resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "WeatherQueryRecord")]
pub struct WeatherQuery {
    location: String,
    coordinates: Option<GpsCoordinates>,
    purpose: String,
    conditions: Vec<ExtremeCondition>,
    date: NaiveDate,
    day_of_year: u32,
}

impl WeatherQuery {
    /// Build a query, trimming text fields and dropping repeated conditions.
    pub fn new(
        location: &str,
        purpose: &str,
        conditions: Vec<ExtremeCondition>,
        date: NaiveDate,
    ) -> Result<Self, IntakeError> {
        let location = validate_location(location)?;
        let purpose = validate_purpose(purpose)?;
        let conditions = dedup_conditions(conditions)?;

        Ok(Self {
            location,
            coordinates: None,
            purpose,
            conditions,
            date,
            day_of_year: date.ordinal(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        self.coordinates
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Requested conditions, in the order they were asked for
    pub fn conditions(&self) -> &[ExtremeCondition] {
        &self.conditions
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// 1-based day within the target date's year
    pub fn day_of_year(&self) -> u32 {
        self.day_of_year
    }

    pub fn has_condition(&self, condition: ExtremeCondition) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Fill in coordinates if they are still unresolved.
    ///
    /// Returns `true` when the coordinates were written.
    pub fn backfill_coordinates(&mut self, coordinates: GpsCoordinates) -> bool {
        if self.coordinates.is_some() {
            return false;
        }
        self.coordinates = Some(coordinates);
        true
    }

    /// Builder-style variant of [`WeatherQuery::backfill_coordinates`]
    pub fn with_coordinates(mut self, coordinates: GpsCoordinates) -> Self {
        self.backfill_coordinates(coordinates);
        self
    }
}

/// Wire form of a query; `day_of_year` is never trusted from input.
#[derive(Debug, Deserialize)]
struct WeatherQueryRecord {
    location: String,
    #[serde(default)]
    coordinates: Option<GpsCoordinates>,
    purpose: String,
    conditions: Vec<ExtremeCondition>,
    date: NaiveDate,
}

impl TryFrom<WeatherQueryRecord> for WeatherQuery {
    type Error = IntakeError;

    fn try_from(record: WeatherQueryRecord) -> Result<Self, Self::Error> {
        let mut query = WeatherQuery::new(
            &record.location,
            &record.purpose,
            record.conditions,
            record.date,
        )?;
        if let Some(coordinates) = record.coordinates {
            query.backfill_coordinates(coordinates);
        }
        Ok(query)
    }
}
