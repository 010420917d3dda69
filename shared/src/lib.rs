//! Shared types and models for the Weather Insight Platform
//!
//! This crate contains the domain types and the pure analytics core shared
//! between the backend, the browser dashboard (via WASM), and tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
