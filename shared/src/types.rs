//! Common types used across the platform

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates from decimal degrees.
    ///
    /// Non-finite input collapses to zero rather than failing.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Decimal::from_f64_retain(latitude).unwrap_or_default().round_dp(4),
            longitude: Decimal::from_f64_retain(longitude).unwrap_or_default().round_dp(4),
        }
    }

    pub fn latitude_f64(&self) -> f64 {
        self.latitude.to_f64().unwrap_or_default()
    }

    pub fn longitude_f64(&self) -> f64 {
        self.longitude.to_f64().unwrap_or_default()
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Window of `lookback` days before `date` through `lookahead` days after it
    pub fn around(date: NaiveDate, lookback: i64, lookahead: i64) -> Self {
        Self {
            start: date - Duration::days(lookback),
            end: date + Duration::days(lookahead),
        }
    }

    /// Number of days in the range, counting both ends
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len_days() as i64).map(move |offset| start + Duration::days(offset))
    }
}
