//! Pipeline services for the Weather Insight Platform

pub mod advisory;
pub mod data_source;
pub mod export;
pub mod insight;
pub mod normalizer;

pub use advisory::{AdvisoryProvider, AdvisoryService};
pub use data_source::{OpenMeteoDataSource, SyntheticDataSource, WeatherDataSource};
pub use export::ExportFormat;
pub use insight::InsightService;
pub use normalizer::QueryNormalizer;
