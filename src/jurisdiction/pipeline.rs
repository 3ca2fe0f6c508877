//! Address → AHJ resolution over the static tables.

use tracing::{debug, info};

use super::{
    normalize_city_key, normalize_state, CodeVersions, GeoLookup, JurisdictionCatalog,
    JurisdictionRecord, RecordMerger, SupportedState, UNKNOWN_CITY,
};
use crate::config::{DataSource, Settings};
use crate::models::{AhjResult, GeocodedAddress, RegionRecord};

pub const UNKNOWN_STATE: &str = "Unknown State";

/// Region used when the nationwide fallback answers for a state without tables.
const NATIONWIDE_REGION: RegionRecord = RegionRecord {
    county: "Unknown County",
    region: "United States",
    utility_name: "Local electric utility",
    utility_phone: "(Contact utility for current number)",
};

/// Resolves geocoded addresses to AHJ results.
///
/// Stateless: identical inputs give identical results apart from the date.
pub struct ResolutionPipeline {
    geo: &'static GeoLookup,
    catalog: &'static JurisdictionCatalog,
    merger: RecordMerger,
    sources: Vec<DataSource>,
    nationwide_fallback: bool,
}

impl Default for ResolutionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionPipeline {
    /// Pipeline over the built-in tables with only municipal data enabled.
    pub fn new() -> Self {
        Self {
            geo: GeoLookup::builtin(),
            catalog: JurisdictionCatalog::builtin(),
            merger: RecordMerger,
            sources: vec![DataSource::Municipal],
            nationwide_fallback: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .with_sources(settings.active_data_sources())
            .with_nationwide_fallback(settings.nationwide_fallback)
    }

    /// Remote data sources to consult, in priority order. They only decide
    /// what is tried ahead of the bundled municipal tables, which answer for
    /// every supported state regardless of this list.
    pub fn with_sources(mut self, sources: Vec<DataSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_nationwide_fallback(mut self, enabled: bool) -> Self {
        self.nationwide_fallback = enabled;
        self
    }

    /// Resolve an address. `None` means no coverage for the address's state,
    /// which is an expected outcome rather than an error.
    pub fn resolve(&self, address: &GeocodedAddress) -> Option<AhjResult> {
        for source in self.sources.iter().take_while(|s| **s != DataSource::Municipal) {
            debug!("Data source {} has no data, trying next source", source);
        }

        let result = self.resolve_municipal(address);
        match &result {
            Some(_) => debug!("Resolved '{}' from municipal tables", address.display_name),
            None => info!("No coverage for '{}'", address.display_name),
        }
        result
    }

    fn resolve_municipal(&self, address: &GeocodedAddress) -> Option<AhjResult> {
        let parts = &address.address;
        let state = parts.state.as_deref().and_then(normalize_state);
        let city = parts
            .locality_name()
            .unwrap_or_else(|| UNKNOWN_CITY.to_string());
        let city_key = normalize_city_key(&city);

        match state.and_then(|(_, abbr)| SupportedState::from_abbr(abbr)) {
            Some(supported) => {
                let region = self
                    .geo
                    .resolve_region(supported, address.lat, address.lon);
                let record = self.catalog.lookup_city(supported, &city_key, &region);
                Some(
                    self.merger
                        .merge(&record, &region, address, supported.name()),
                )
            }
            None if self.nationwide_fallback => {
                let (name, abbr) = state.unwrap_or((UNKNOWN_STATE, "us"));
                debug!("Nationwide fallback for '{}' in {}", city_key, name);
                let record = JurisdictionRecord::synthesize(&city_key, abbr, nationwide_codes());
                Some(
                    self.merger
                        .merge(&record, &NATIONWIDE_REGION, address, name),
                )
            }
            None => None,
        }
    }
}

/// Model codes without state amendments; the IFC edition comes from the
/// global defaults.
fn nationwide_codes() -> CodeVersions {
    CodeVersions {
        building: "2018 International Building Code".to_string(),
        electrical: "2017 National Electrical Code".to_string(),
        fire: None,
        ifc: None,
    }
}
