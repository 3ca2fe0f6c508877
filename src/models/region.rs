//! Coarse geographic regions used to pick a county and its electric utility.

use geo::{Intersects, Point, Rect};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Bounding box envelope in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBbox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBbox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.min_lon, y: self.min_lat },
            geo::coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Inclusive containment: points on any edge are inside.
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.to_rect().intersects(&Point::from(point))
    }
}

/// County/metro area a coordinate falls in, with its utility contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionRecord {
    pub county: &'static str,
    /// Metro or region name; equals the county where a state has no regions.
    pub region: &'static str,
    pub utility_name: &'static str,
    pub utility_phone: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_contains_interior_and_edges() {
        let bbox = GeoBbox::new(33.5, -112.3, 34.0, -111.6);
        assert!(bbox.contains(GeoPoint::new(33.7, -112.0)));
        assert!(bbox.contains(GeoPoint::new(33.5, -112.3)));
        assert!(bbox.contains(GeoPoint::new(34.0, -111.6)));
        assert!(!bbox.contains(GeoPoint::new(33.4484, -112.0740)));
        assert!(!bbox.contains(GeoPoint::new(33.7, -111.5)));
    }
}
