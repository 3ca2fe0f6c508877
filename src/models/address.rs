//! Geocoded address structures as returned by Nominatim-style geocoders.

use serde::{Deserialize, Deserializer, Serialize};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lon, p.lat)
    }
}

/// Address components
///
/// Every field is optional: geocoders omit whatever they could not resolve,
/// and small places come back as `town`/`village`/`municipality` instead of `city`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressParts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

impl AddressParts {
    /// Name to use as the city when probing the jurisdiction tables.
    ///
    /// Falls back through town, village and municipality, then the county with
    /// the word "county" removed.
    pub fn locality_name(&self) -> Option<String> {
        if let Some(name) = non_empty(&self.city)
            .or_else(|| non_empty(&self.town))
            .or_else(|| non_empty(&self.village))
            .or_else(|| non_empty(&self.municipality))
        {
            return Some(name.to_string());
        }

        non_empty(&self.county)
            .map(strip_county_word)
            .filter(|s| !s.is_empty())
    }
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Remove the standalone word "county" (any case) from a county name.
fn strip_county_word(name: &str) -> String {
    name.split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case("county"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A geocoded address: display string, coordinates and structured parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub display_name: String,

    /// Nominatim sends coordinates as strings; numbers are accepted too.
    #[serde(deserialize_with = "de_coordinate")]
    pub lat: f64,

    #[serde(deserialize_with = "de_coordinate")]
    pub lon: f64,

    #[serde(default)]
    pub address: AddressParts,
}

impl GeocodedAddress {
    pub fn new(display_name: impl Into<String>, lat: f64, lon: f64, address: AddressParts) -> Self {
        Self {
            display_name: display_name.into(),
            lat,
            lon,
            address,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

fn de_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Coordinate::deserialize(deserializer)? {
        Coordinate::Number(n) => Ok(n),
        Coordinate::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
