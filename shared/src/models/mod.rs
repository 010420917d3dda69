//! Domain models for the Weather Insight Platform

mod analysis;
mod condition;
mod query;
mod report;
mod weather;

pub use analysis::*;
pub use condition::*;
pub use query::*;
pub use report::*;
pub use weather::*;
