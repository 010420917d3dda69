//! HTTP handlers

pub mod health;
pub mod insight;
pub mod reference;

pub use health::health_check;
pub use insight::{create_insight, export_insight};
pub use reference::{get_policy, list_conditions, list_purposes};
