//! Address geocoding.

mod nominatim;

pub use nominatim::{NominatimClient, MIN_QUERY_LEN, SUGGESTION_LIMIT};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("empty address query")]
    EmptyQuery,

    #[error("could not find location for '{0}'")]
    NotFound(String),

    #[error("geocoder returned HTTP {0}")]
    Status(u16),

    #[error("invalid geocoder URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
}
