//! Jurisdiction resolution over static per-state tables.
//!
//! A coordinate picks a county/region by bounding box, the city name picks a
//! building department, and the two are merged with per-state defaults.

mod catalog;
mod defaults;
mod geo_lookup;
mod merge;
mod pipeline;
mod state;

pub use catalog::{
    display_city, normalize_city_key, title_case, CodeVersions, JurisdictionCatalog,
    JurisdictionRecord, RecordSource, UNKNOWN_CITY, UNKNOWN_PHONE,
};
pub use defaults::{StateDefaults, GLOBAL_DEFAULTS};
pub use geo_lookup::{Area, GeoLookup, RegionTable, UtilityDirectory, UtilityKey};
pub use merge::{RecordMerger, UNKNOWN_COUNTY, UNKNOWN_ZIP};
pub use pipeline::{ResolutionPipeline, UNKNOWN_STATE};
pub use state::{normalize_state, SupportedState};
