//! QuickAHJ - building-permit jurisdiction lookup for US addresses.
//!
//! This library provides shared types and modules for the query and ahj binaries.

pub mod config;
pub mod export;
pub mod geocode;
pub mod history;
pub mod jurisdiction;
pub mod models;

pub use config::Settings;
pub use jurisdiction::{ResolutionPipeline, SupportedState};
pub use models::{AhjResult, GeocodedAddress};
