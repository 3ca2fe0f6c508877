//! Coordinate → county/region lookup over ordered bounding boxes.
//!
//! Boxes are coarse, may overlap and do not cover each state. The first box
//! in declaration order that contains the point wins, so the order of each
//! table decides which metro owns an ambiguous border coordinate.

use hashbrown::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use super::SupportedState;
use crate::models::{GeoBbox, GeoPoint, RegionRecord};

/// County and region names attached to a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub county: &'static str,
    pub region: &'static str,
}

impl Area {
    pub const fn new(county: &'static str, region: &'static str) -> Self {
        Self { county, region }
    }

    /// Area for states that have no metro regions: the county is the region.
    pub const fn county(county: &'static str) -> Self {
        Self {
            county,
            region: county,
        }
    }
}

/// Which area name a utility directory is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKey {
    County,
    Region,
}

/// Utility name or phone table for one state.
#[derive(Debug, Clone)]
pub struct UtilityDirectory {
    pub key: UtilityKey,
    pub entries: HashMap<&'static str, &'static str>,
    pub fallback: &'static str,
}

impl UtilityDirectory {
    pub fn new(key: UtilityKey, entries: &[(&'static str, &'static str)], fallback: &'static str) -> Self {
        Self {
            key,
            entries: entries.iter().copied().collect(),
            fallback,
        }
    }

    /// Same value everywhere in the state.
    pub fn constant(value: &'static str) -> Self {
        Self {
            key: UtilityKey::County,
            entries: HashMap::new(),
            fallback: value,
        }
    }

    pub fn get(&self, area: &Area) -> &'static str {
        let name = match self.key {
            UtilityKey::County => area.county,
            UtilityKey::Region => area.region,
        };
        self.entries.get(name).copied().unwrap_or(self.fallback)
    }
}

/// Ordered bounding boxes for one state plus its fallback area and utilities.
#[derive(Debug, Clone)]
pub struct RegionTable {
    boxes: Vec<(GeoBbox, Area)>,
    default_area: Area,
    utility_names: UtilityDirectory,
    utility_phones: UtilityDirectory,
}

impl RegionTable {
    pub fn new(
        boxes: Vec<(GeoBbox, Area)>,
        default_area: Area,
        utility_names: UtilityDirectory,
        utility_phones: UtilityDirectory,
    ) -> Self {
        Self {
            boxes,
            default_area,
            utility_names,
            utility_phones,
        }
    }

    /// First containing box, or the default area.
    pub fn area_at(&self, point: GeoPoint) -> Area {
        self.boxes
            .iter()
            .find(|(bbox, _)| bbox.contains(point))
            .map(|(_, area)| *area)
            .unwrap_or(self.default_area)
    }

    pub fn resolve(&self, point: GeoPoint) -> RegionRecord {
        let area = self.area_at(point);
        RegionRecord {
            county: area.county,
            region: area.region,
            utility_name: self.utility_names.get(&area),
            utility_phone: self.utility_phones.get(&area),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Region lookup across all supported states.
pub struct GeoLookup {
    tables: HashMap<SupportedState, RegionTable>,
}

static BUILTIN: LazyLock<GeoLookup> = LazyLock::new(GeoLookup::build);

impl GeoLookup {
    /// Shared lookup over the built-in tables.
    pub fn builtin() -> &'static GeoLookup {
        &BUILTIN
    }

    fn build() -> Self {
        let mut tables = HashMap::new();
        tables.insert(SupportedState::Arizona, arizona());
        tables.insert(SupportedState::Texas, texas());
        tables.insert(SupportedState::Florida, florida());
        tables.insert(SupportedState::Nevada, nevada());
        Self { tables }
    }

    pub fn table(&self, state: SupportedState) -> &RegionTable {
        // Every supported state is inserted by `build`.
        &self.tables[&state]
    }

    /// Resolve the region for a coordinate. Never fails: points outside every
    /// box get the state's default region.
    pub fn resolve_region(&self, state: SupportedState, lat: f64, lon: f64) -> RegionRecord {
        let record = self.table(state).resolve(GeoPoint::new(lat, lon));
        debug!(
            "Region lookup in {} at ({}, {}): {} / {}",
            state, lat, lon, record.county, record.region
        );
        record
    }
}

fn arizona() -> RegionTable {
    const MARICOPA: Area = Area::county("Maricopa County");

    RegionTable::new(
        vec![
            (GeoBbox::new(33.5, -112.3, 34.0, -111.6), MARICOPA),
            (GeoBbox::new(32.0, -111.2, 32.5, -110.7), Area::county("Pima County")),
            (GeoBbox::new(31.3, -109.1, 32.0, -109.0), Area::county("Cochise County")),
            (GeoBbox::new(33.0, -114.8, 34.5, -113.9), Area::county("Mohave County")),
            (GeoBbox::new(34.0, -111.5, 37.0, -110.0), Area::county("Navajo County")),
            (GeoBbox::new(34.0, -112.5, 36.0, -111.0), Area::county("Coconino County")),
            (GeoBbox::new(33.0, -114.0, 34.5, -112.8), Area::county("Yuma County")),
        ],
        MARICOPA,
        UtilityDirectory::new(
            UtilityKey::County,
            &[
                ("Maricopa County", "Arizona Public Service (APS) / Salt River Project (SRP)"),
                ("Pima County", "Tucson Electric Power (TEP)"),
                ("Cochise County", "Tucson Electric Power (TEP)"),
                ("Mohave County", "Arizona Public Service (APS)"),
                ("Navajo County", "Arizona Public Service (APS)"),
                ("Coconino County", "Arizona Public Service (APS)"),
                ("Yuma County", "Arizona Public Service (APS)"),
            ],
            "Arizona Public Service (APS)",
        ),
        UtilityDirectory::new(
            UtilityKey::County,
            &[
                ("Maricopa County", "(602) 371-7171"),
                ("Pima County", "(520) 623-7711"),
                ("Cochise County", "(520) 623-7711"),
                ("Mohave County", "(602) 371-7171"),
                ("Navajo County", "(602) 371-7171"),
                ("Coconino County", "(602) 371-7171"),
                ("Yuma County", "(602) 371-7171"),
            ],
            "(602) 371-7171",
        ),
    )
}

fn texas() -> RegionTable {
    const DFW: &str = "Dallas-Fort Worth Metro";

    RegionTable::new(
        vec![
            (GeoBbox::new(29.5, -95.8, 30.2, -95.0), Area::new("Harris County", "Houston Metro")),
            (GeoBbox::new(32.6, -97.0, 33.0, -96.5), Area::new("Dallas County", DFW)),
            (GeoBbox::new(32.5, -97.5, 32.9, -97.0), Area::new("Tarrant County", DFW)),
            (GeoBbox::new(30.1, -98.0, 30.5, -97.5), Area::new("Travis County", "Austin Metro")),
            (GeoBbox::new(29.3, -98.7, 29.6, -98.3), Area::new("Bexar County", "San Antonio Metro")),
            (GeoBbox::new(31.6, -106.8, 32.0, -106.2), Area::new("El Paso County", "West Texas")),
            (GeoBbox::new(25.8, -98.3, 26.3, -97.8), Area::new("Cameron County", "Rio Grande Valley")),
        ],
        Area::new("Texas County", "Texas"),
        UtilityDirectory::new(
            UtilityKey::Region,
            &[
                ("Houston Metro", "CenterPoint Energy"),
                (DFW, "Oncor Electric Delivery"),
                ("Austin Metro", "Austin Energy"),
                ("San Antonio Metro", "CPS Energy"),
                ("West Texas", "El Paso Electric"),
                ("Rio Grande Valley", "AEP Texas"),
                ("Texas", "Oncor Electric Delivery"),
            ],
            "Oncor Electric Delivery",
        ),
        UtilityDirectory::new(
            UtilityKey::Region,
            &[
                ("Houston Metro", "(713) 659-2111"),
                (DFW, "(888) 313-4747"),
                ("Austin Metro", "(512) 494-9400"),
                ("San Antonio Metro", "(210) 353-2222"),
                ("West Texas", "(915) 543-5970"),
                ("Rio Grande Valley", "(866) 223-8508"),
                ("Texas", "(888) 313-4747"),
            ],
            "(888) 313-4747",
        ),
    )
}

fn florida() -> RegionTable {
    const SOUTH: &str = "South Florida";
    const TAMPA_BAY: &str = "Tampa Bay";

    RegionTable::new(
        vec![
            (GeoBbox::new(25.4, -80.9, 26.0, -80.1), Area::new("Miami-Dade County", SOUTH)),
            (GeoBbox::new(26.0, -80.5, 26.7, -79.8), Area::new("Broward County", SOUTH)),
            (GeoBbox::new(27.6, -82.8, 28.3, -82.2), Area::new("Hillsborough County", TAMPA_BAY)),
            (GeoBbox::new(27.5, -82.9, 28.2, -82.4), Area::new("Pinellas County", TAMPA_BAY)),
            (GeoBbox::new(28.3, -81.6, 28.8, -81.1), Area::new("Orange County", "Central Florida")),
            (GeoBbox::new(30.0, -81.8, 30.7, -81.3), Area::new("Duval County", "Northeast Florida")),
            (GeoBbox::new(30.3, -84.5, 30.8, -84.0), Area::new("Leon County", "North Florida")),
        ],
        Area::new("Florida County", "Florida"),
        UtilityDirectory::new(
            UtilityKey::Region,
            &[
                (SOUTH, "Florida Power & Light (FPL)"),
                (TAMPA_BAY, "Tampa Electric (TECO) / Duke Energy Florida"),
                ("Central Florida", "Orlando Utilities Commission (OUC)"),
                ("Northeast Florida", "JEA (Jacksonville Electric Authority)"),
                ("North Florida", "Tallahassee Utilities"),
                ("Florida", "Florida Power & Light (FPL)"),
            ],
            "Florida Power & Light (FPL)",
        ),
        UtilityDirectory::new(
            UtilityKey::Region,
            &[
                (SOUTH, "(800) 468-8243"),
                (TAMPA_BAY, "(813) 223-0800"),
                ("Central Florida", "(407) 423-9018"),
                ("Northeast Florida", "(904) 665-6000"),
                ("North Florida", "(850) 891-4968"),
                ("Florida", "(800) 468-8243"),
            ],
            "(800) 468-8243",
        ),
    )
}

fn nevada() -> RegionTable {
    const CLARK: Area = Area::new("Clark County", "Las Vegas Metro");
    const NORTHERN: &str = "Northern Nevada";

    RegionTable::new(
        vec![
            (GeoBbox::new(35.8, -115.5, 36.5, -114.8), CLARK),
            (GeoBbox::new(39.2, -120.2, 39.8, -119.5), Area::new("Washoe County", "Reno-Sparks Metro")),
            (GeoBbox::new(39.0, -118.0, 40.0, -117.0), Area::new("Pershing County", NORTHERN)),
            (GeoBbox::new(38.0, -117.5, 39.5, -116.5), Area::new("Nye County", "Central Nevada")),
            (GeoBbox::new(40.5, -118.0, 42.0, -116.0), Area::new("Humboldt County", NORTHERN)),
        ],
        CLARK,
        UtilityDirectory::constant("NV Energy"),
        UtilityDirectory::new(
            UtilityKey::Region,
            &[
                ("Las Vegas Metro", "(702) 402-5555"),
                ("Reno-Sparks Metro", "(775) 834-4100"),
                (NORTHERN, "(775) 834-4100"),
                ("Central Nevada", "(702) 402-5555"),
            ],
            "(702) 402-5555",
        ),
    )
}
