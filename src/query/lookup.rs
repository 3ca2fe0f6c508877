//! Lookup execution shared by the HTTP handlers.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use quickahj::geocode::{GeocodeError, NominatimClient};
use quickahj::models::{AddressParts, AhjResult, GeocodedAddress};
use quickahj::ResolutionPipeline;

/// Lookup response. `result` is absent when the state has no coverage.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub coverage: bool,
    pub address: GeocodedAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AhjResult>,
}

impl LookupResponse {
    pub fn new(address: GeocodedAddress, result: Option<AhjResult>) -> Self {
        Self {
            coverage: result.is_some(),
            address,
            result,
        }
    }
}

/// Parameters for resolving an already-geocoded point
#[derive(Debug, Deserialize)]
pub struct PointParams {
    pub lat: f64,
    pub lon: f64,
    pub display_name: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

impl PointParams {
    pub fn into_address(self) -> GeocodedAddress {
        let display_name = self
            .display_name
            .unwrap_or_else(|| format!("{}, {}", self.lat, self.lon));
        GeocodedAddress::new(
            display_name,
            self.lat,
            self.lon,
            AddressParts {
                city: self.city,
                town: self.town,
                county: self.county,
                state: self.state,
                postcode: self.postcode,
                ..Default::default()
            },
        )
    }
}

pub fn status_for(err: &GeocodeError) -> StatusCode {
    match err {
        GeocodeError::EmptyQuery => StatusCode::BAD_REQUEST,
        GeocodeError::NotFound(_) => StatusCode::NOT_FOUND,
        GeocodeError::Url(_) => StatusCode::INTERNAL_SERVER_ERROR,
        GeocodeError::Status(_) | GeocodeError::Http(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Geocode free text, then resolve the best match.
pub async fn execute_lookup(
    geocoder: &NominatimClient,
    pipeline: &ResolutionPipeline,
    text: &str,
) -> Result<LookupResponse, GeocodeError> {
    let address = geocoder.geocode(text).await?;
    debug!("Geocoded '{}' to {}", text, address.display_name);
    Ok(execute_point(pipeline, address))
}

pub fn execute_point(pipeline: &ResolutionPipeline, address: GeocodedAddress) -> LookupResponse {
    let result = pipeline.resolve(&address);
    LookupResponse::new(address, result)
}
