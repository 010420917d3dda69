//! External API integrations

pub mod gemini;
pub mod geocoding;
pub mod weather;

pub use gemini::GeminiClient;
pub use geocoding::{GazetteerGeocoder, Geocoder};
pub use weather::{DailyEndpoint, WeatherClient};
