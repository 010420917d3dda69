//! Location lookup
//!
//! Resolves free-text locations against a small gazetteer of known cities.

use async_trait::async_trait;
use shared::GpsCoordinates;

/// Coordinate used when a location cannot be resolved (San Francisco)
pub const DEFAULT_COORDINATES: (f64, f64) = (37.7749, -122.4194);

/// Known cities, searched in order
const KNOWN_CITIES: [(&str, f64, f64); 10] = [
    ("New York", 40.7128, -74.0060),
    ("London", 51.5074, -0.1278),
    ("Tokyo", 35.6762, 139.6503),
    ("Paris", 48.8566, 2.3522),
    ("Sydney", -33.8688, 151.2093),
    ("Mumbai", 19.0760, 72.8777),
    ("Dubai", 25.2048, 55.2708),
    ("Singapore", 1.3521, 103.8198),
    ("Los Angeles", 34.0522, -118.2437),
    ("Chicago", 41.8781, -87.6298),
];

/// Location text → coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `None` when the location is unknown
    async fn resolve(&self, location: &str) -> Option<GpsCoordinates>;
}

/// Case-insensitive substring match against the known-city table
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder;

impl GazetteerGeocoder {
    pub fn new() -> Self {
        Self
    }

    pub fn lookup(location: &str) -> Option<GpsCoordinates> {
        let needle = location.to_lowercase();
        KNOWN_CITIES
            .iter()
            .find(|(city, _, _)| needle.contains(&city.to_lowercase()))
            .map(|(_, lat, lon)| GpsCoordinates::from_degrees(*lat, *lon))
    }
}

#[async_trait]
impl Geocoder for GazetteerGeocoder {
    async fn resolve(&self, location: &str) -> Option<GpsCoordinates> {
        Self::lookup(location)
    }
}

pub fn default_coordinates() -> GpsCoordinates {
    GpsCoordinates::from_degrees(DEFAULT_COORDINATES.0, DEFAULT_COORDINATES.1)
}
