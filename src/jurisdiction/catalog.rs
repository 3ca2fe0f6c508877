//! Per-state city → building department tables.

use hashbrown::HashMap;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use super::SupportedState;
use crate::models::RegionRecord;

/// Phone placeholder used for synthesized records.
pub const UNKNOWN_PHONE: &str = "(Contact city hall for current number)";
/// Locality used when an address names no city, town or county.
pub const UNKNOWN_CITY: &str = "Unknown City";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Lowercase a city name and drop all whitespace: "San Antonio" → "sanantonio".
pub fn normalize_city_key(name: &str) -> String {
    WHITESPACE.replace_all(&name.to_lowercase(), "").into_owned()
}

/// Upper-case the first character only ("sanantonio" → "Sanantonio").
pub fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display name for a normalized city key. The missing-locality key keeps
/// its spaced form.
pub fn display_city(city_key: &str) -> String {
    if city_key == normalize_city_key(UNKNOWN_CITY) {
        UNKNOWN_CITY.to_string()
    } else {
        title_case(city_key)
    }
}

/// Model code editions adopted by a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeVersions {
    pub building: String,
    pub electrical: String,
    pub fire: Option<String>,
    pub ifc: Option<String>,
}

impl CodeVersions {
    /// Current code set used across a state.
    pub fn for_state(state: SupportedState) -> Self {
        let (building, electrical, fire) = match state {
            SupportedState::Arizona => (
                "2018 International Building Code (Arizona amendments)",
                "2017 National Electrical Code",
                "2018 International Fire Code",
            ),
            SupportedState::Texas => (
                "2018 International Building Code (Texas amendments)",
                "2017 National Electrical Code",
                "2018 International Fire Code",
            ),
            SupportedState::Florida => (
                "2020 Florida Building Code",
                "2020 Florida Building Code - Electrical",
                "2018 International Fire Code (Florida amendments)",
            ),
            SupportedState::Nevada => (
                "2018 International Building Code (Nevada amendments)",
                "2017 National Electrical Code",
                "2018 International Fire Code",
            ),
        };

        Self {
            building: building.to_string(),
            electrical: electrical.to_string(),
            fire: Some(fire.to_string()),
            ifc: Some(fire.to_string()),
        }
    }
}

/// Where a jurisdiction record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Stored city entry
    Catalog,
    /// Unincorporated area handled by the county building department
    County,
    /// Generated from the city name
    Synthesized,
}

/// Building department contact and code set for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionRecord {
    pub display_name: String,
    pub department_name: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub api_available: bool,
    pub codes: CodeVersions,
    pub source: RecordSource,
}

impl JurisdictionRecord {
    /// Generic record for a city without a stored entry.
    pub fn synthesize(city_key: &str, state_abbr: &str, codes: CodeVersions) -> Self {
        let name = display_city(city_key);
        let domain = format!(
            "{}{}.gov",
            normalize_city_key(city_key),
            state_abbr.to_lowercase()
        );

        Self {
            department_name: format!("{} Building Department", name),
            display_name: name,
            phone: UNKNOWN_PHONE.to_string(),
            email: format!("permits@{}", domain),
            website: format!("https://www.{}", domain),
            api_available: false,
            codes,
            source: RecordSource::Synthesized,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CityEntry {
    name: &'static str,
    department: &'static str,
    phone: &'static str,
    email: &'static str,
    website: &'static str,
    api_available: bool,
}

const fn city(
    name: &'static str,
    department: &'static str,
    phone: &'static str,
    email: &'static str,
    website: &'static str,
) -> CityEntry {
    CityEntry {
        name,
        department,
        phone,
        email,
        website,
        api_available: false,
    }
}

const fn with_api(entry: CityEntry) -> CityEntry {
    CityEntry {
        api_available: true,
        ..entry
    }
}

/// City tables for all supported states.
pub struct JurisdictionCatalog {
    cities: HashMap<SupportedState, HashMap<&'static str, CityEntry>>,
}

static BUILTIN: LazyLock<JurisdictionCatalog> = LazyLock::new(JurisdictionCatalog::build);

impl JurisdictionCatalog {
    pub fn builtin() -> &'static JurisdictionCatalog {
        &BUILTIN
    }

    fn build() -> Self {
        let mut cities = HashMap::new();
        cities.insert(SupportedState::Arizona, index(ARIZONA_CITIES));
        cities.insert(SupportedState::Texas, index(TEXAS_CITIES));
        cities.insert(SupportedState::Florida, index(FLORIDA_CITIES));
        cities.insert(SupportedState::Nevada, index(NEVADA_CITIES));
        Self { cities }
    }

    /// Whether a normalized city key has a stored entry.
    pub fn contains(&self, state: SupportedState, city_key: &str) -> bool {
        self.cities
            .get(&state)
            .is_some_and(|m| m.contains_key(city_key))
    }

    /// Number of stored cities for a state.
    pub fn city_count(&self, state: SupportedState) -> usize {
        self.cities.get(&state).map_or(0, |m| m.len())
    }

    /// Look up a normalized city key, synthesizing a record on a miss.
    ///
    /// Exact match only. The region is consulted for Nevada, where unknown
    /// places inside Clark County fall under the county building department.
    pub fn lookup_city(
        &self,
        state: SupportedState,
        city_key: &str,
        region: &RegionRecord,
    ) -> JurisdictionRecord {
        let codes = CodeVersions::for_state(state);

        if let Some(entry) = self.cities.get(&state).and_then(|m| m.get(city_key)) {
            debug!("Catalog hit for '{}' in {}", city_key, state);
            return JurisdictionRecord {
                display_name: entry.name.to_string(),
                department_name: entry.department.to_string(),
                phone: entry.phone.to_string(),
                email: entry.email.to_string(),
                website: entry.website.to_string(),
                api_available: entry.api_available,
                codes,
                source: RecordSource::Catalog,
            };
        }

        if state == SupportedState::Nevada && region.county == "Clark County" {
            debug!("'{}' treated as unincorporated Clark County", city_key);
            return JurisdictionRecord {
                display_name: format!("{} (Clark County)", display_city(city_key)),
                department_name: "Clark County Building Department".to_string(),
                phone: "(702) 455-3000".to_string(),
                email: "building@clarkcountynv.gov".to_string(),
                website: "https://www.clarkcountynv.gov/government/departments/building_department/"
                    .to_string(),
                api_available: false,
                codes,
                source: RecordSource::County,
            };
        }

        debug!("No catalog entry for '{}' in {}, synthesizing", city_key, state);
        JurisdictionRecord::synthesize(city_key, state.abbr(), codes)
    }
}

fn index(entries: &[(&'static str, CityEntry)]) -> HashMap<&'static str, CityEntry> {
    entries.iter().copied().collect()
}

const ARIZONA_CITIES: &[(&str, CityEntry)] = &[
    (
        "phoenix",
        with_api(city(
            "Phoenix",
            "City of Phoenix Planning & Development Department",
            "(602) 262-7811",
            "pdd@phoenix.gov",
            "https://www.phoenix.gov/pdd",
        )),
    ),
    (
        "tucson",
        city(
            "Tucson",
            "City of Tucson Development Services Department",
            "(520) 791-5550",
            "devservices@tucsonaz.gov",
            "https://www.tucsonaz.gov/pdsd",
        ),
    ),
    (
        "mesa",
        city(
            "Mesa",
            "City of Mesa Development & Sustainability Department",
            "(480) 644-2411",
            "development@mesaaz.gov",
            "https://www.mesaaz.gov/departments/development-sustainability",
        ),
    ),
    (
        "chandler",
        city(
            "Chandler",
            "City of Chandler Development Services Department",
            "(480) 782-3000",
            "devservices@chandleraz.gov",
            "https://www.chandleraz.gov/government/departments/development-services",
        ),
    ),
    (
        "scottsdale",
        city(
            "Scottsdale",
            "City of Scottsdale Planning & Development Services",
            "(480) 312-2308",
            "currentplanning@scottsdaleaz.gov",
            "https://www.scottsdaleaz.gov/building",
        ),
    ),
    (
        "glendale",
        city(
            "Glendale",
            "City of Glendale Development Services Department",
            "(623) 930-2920",
            "devservices@glendaleaz.com",
            "https://www.glendaleaz.com/government/departments/development_services",
        ),
    ),
    (
        "tempe",
        city(
            "Tempe",
            "City of Tempe Development Services Department",
            "(480) 350-8625",
            "devservices@tempe.gov",
            "https://www.tempe.gov/government/community-development",
        ),
    ),
    (
        "peoria",
        city(
            "Peoria",
            "City of Peoria Community Development Department",
            "(623) 773-7756",
            "planning@peoriaaz.gov",
            "https://www.peoriaaz.gov/government/departments/community-development",
        ),
    ),
];

const TEXAS_CITIES: &[(&str, CityEntry)] = &[
    (
        "houston",
        with_api(city(
            "Houston",
            "City of Houston Planning and Development Department",
            "(832) 393-6000",
            "pdd@houstontx.gov",
            "https://www.houstontx.gov/planning/",
        )),
    ),
    (
        "dallas",
        with_api(city(
            "Dallas",
            "City of Dallas Development Services Department",
            "(214) 948-4480",
            "devservices@dallascityhall.com",
            "https://dallascityhall.com/departments/sustainabledevelopment/",
        )),
    ),
    (
        "austin",
        with_api(city(
            "Austin",
            "City of Austin Development Services Department",
            "(512) 978-4000",
            "devservices@austintexas.gov",
            "https://www.austintexas.gov/department/development-services",
        )),
    ),
    (
        "sanantonio",
        city(
            "San Antonio",
            "City of San Antonio Development Services Department",
            "(210) 207-1111",
            "dsd@sanantonio.gov",
            "https://www.sanantonio.gov/DSD",
        ),
    ),
    (
        "fortworth",
        with_api(city(
            "Fort Worth",
            "City of Fort Worth Development Services Department",
            "(817) 392-7851",
            "planning@fortworthtexas.gov",
            "https://www.fortworthtexas.gov/departments/development-services",
        )),
    ),
    (
        "elpaso",
        city(
            "El Paso",
            "City of El Paso Planning and Inspections Department",
            "(915) 212-1553",
            "planning@elpasotexas.gov",
            "https://www.elpasotexas.gov/planning-and-inspections",
        ),
    ),
    (
        "arlington",
        city(
            "Arlington",
            "City of Arlington Planning & Development Services",
            "(817) 459-6100",
            "planning@arlingtontx.gov",
            "https://www.arlingtontx.gov/city_hall/departments/planning_and_development_services",
        ),
    ),
    (
        "plano",
        city(
            "Plano",
            "City of Plano Planning Department",
            "(972) 941-7151",
            "planning@plano.gov",
            "https://www.plano.gov/departments/planning",
        ),
    ),
    (
        "laredo",
        with_api(city(
            "Laredo",
            "City of Laredo Building Development Services",
            "(956) 795-2680",
            "bds@ci.laredo.tx.us",
            "https://www.cityoflaredo.com/departments/building-development-services/",
        )),
    ),
];

const FLORIDA_CITIES: &[(&str, CityEntry)] = &[
    (
        "miami",
        with_api(city(
            "Miami",
            "City of Miami Building Department",
            "(305) 416-1100",
            "building@miamigov.com",
            "https://www.miami.gov/Government/Departments/Building",
        )),
    ),
    (
        "tampa",
        with_api(city(
            "Tampa",
            "City of Tampa Construction Services Center",
            "(813) 274-3100",
            "construction.services@tampagov.net",
            "https://www.tampagov.net/construction-services",
        )),
    ),
    (
        "orlando",
        city(
            "Orlando",
            "City of Orlando Development Services Department",
            "(407) 246-2269",
            "devservices@cityoforlando.net",
            "https://www.orlando.gov/Building-Development/Development-Services",
        ),
    ),
    (
        "jacksonville",
        city(
            "Jacksonville",
            "City of Jacksonville Planning & Development Department",
            "(904) 255-7800",
            "planning@coj.net",
            "https://www.coj.net/departments/planning-and-development",
        ),
    ),
    (
        "fortlauderdale",
        city(
            "Fort Lauderdale",
            "City of Fort Lauderdale Development Services Department",
            "(954) 828-5200",
            "devservices@fortlauderdale.gov",
            "https://www.fortlauderdale.gov/departments/development-services",
        ),
    ),
    (
        "stpetersburg",
        city(
            "St. Petersburg",
            "City of St. Petersburg Development Services Department",
            "(727) 893-7285",
            "devservices@stpete.org",
            "https://www.stpete.org/residents/building_and_development/",
        ),
    ),
    (
        "hialeah",
        city(
            "Hialeah",
            "City of Hialeah Building Department",
            "(305) 883-5822",
            "building@hialeahfl.gov",
            "https://www.hialeahfl.gov/departments/building",
        ),
    ),
    (
        "tallahassee",
        city(
            "Tallahassee",
            "City of Tallahassee Growth Management Department",
            "(850) 891-6400",
            "growth@talgov.com",
            "https://www.talgov.com/place/",
        ),
    ),
];

const NEVADA_CITIES: &[(&str, CityEntry)] = &[
    (
        "lasvegas",
        with_api(city(
            "Las Vegas",
            "City of Las Vegas Building & Safety Department",
            "(702) 229-6615",
            "building@lasvegasnevada.gov",
            "https://www.lasvegasnevada.gov/Government/Departments/Building-Safety",
        )),
    ),
    (
        "henderson",
        with_api(city(
            "Henderson",
            "City of Henderson Development Services Department",
            "(702) 267-1500",
            "devservices@cityofhenderson.com",
            "https://www.cityofhenderson.com/government/departments/development-services",
        )),
    ),
    (
        "reno",
        with_api(city(
            "Reno",
            "City of Reno Planning & Building Department",
            "(775) 334-2262",
            "planning@reno.gov",
            "https://www.reno.gov/government/departments/community-development/planning-building",
        )),
    ),
    (
        "northlasvegas",
        city(
            "North Las Vegas",
            "City of North Las Vegas Development Services Department",
            "(702) 633-1612",
            "devservices@cityofnorthlasvegas.com",
            "https://www.cityofnorthlasvegas.com/departments/development_services/",
        ),
    ),
    (
        "sparks",
        city(
            "Sparks",
            "City of Sparks Building Department",
            "(775) 353-2376",
            "building@cityofsparks.us",
            "https://www.cityofsparks.us/government/departments/building",
        ),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::GeoLookup;

    fn region(state: SupportedState, lat: f64, lon: f64) -> RegionRecord {
        GeoLookup::builtin().resolve_region(state, lat, lon)
    }

    #[test]
    fn test_normalize_city_key() {
        assert_eq!(normalize_city_key("San Antonio"), "sanantonio");
        assert_eq!(normalize_city_key("  North  Las\tVegas "), "northlasvegas");
        assert_eq!(normalize_city_key("PEORIA"), "peoria");
    }

    #[test]
    fn test_title_case_first_char_only() {
        assert_eq!(title_case("flagstaff"), "Flagstaff");
        assert_eq!(title_case("sanmarcos"), "Sanmarcos");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_display_city_keeps_unknown_placeholder() {
        assert_eq!(display_city("unknowncity"), UNKNOWN_CITY);
        assert_eq!(display_city("sanmarcos"), "Sanmarcos");

        let record = JurisdictionRecord::synthesize(
            "unknowncity",
            "AZ",
            CodeVersions::for_state(SupportedState::Arizona),
        );
        assert_eq!(record.display_name, "Unknown City");
        assert_eq!(record.department_name, "Unknown City Building Department");
        assert_eq!(record.email, "permits@unknowncityaz.gov");
    }

    #[test]
    fn test_stored_city_hit() {
        let catalog = JurisdictionCatalog::builtin();
        let r = region(SupportedState::Arizona, 33.4484, -112.0740);
        let record = catalog.lookup_city(SupportedState::Arizona, "phoenix", &r);

        assert_eq!(record.source, RecordSource::Catalog);
        assert_eq!(record.display_name, "Phoenix");
        assert_eq!(
            record.department_name,
            "City of Phoenix Planning & Development Department"
        );
        assert!(record.api_available);
        assert_eq!(
            record.codes.building,
            "2018 International Building Code (Arizona amendments)"
        );
    }

    #[test]
    fn test_case_insensitive_key() {
        let catalog = JurisdictionCatalog::builtin();
        let r = region(SupportedState::Arizona, 33.58, -112.24);
        let record = catalog.lookup_city(SupportedState::Arizona, &normalize_city_key("PEORIA"), &r);
        assert_eq!(record.display_name, "Peoria");
        assert!(!record.api_available);
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let catalog = JurisdictionCatalog::builtin();
        let r = region(SupportedState::Texas, 29.76, -95.37);
        let a = catalog.lookup_city(SupportedState::Texas, "houston", &r);
        let b = catalog.lookup_city(SupportedState::Texas, "houston", &r);
        assert_eq!(a, b);

        let a = catalog.lookup_city(SupportedState::Texas, "waco", &r);
        let b = catalog.lookup_city(SupportedState::Texas, "waco", &r);
        assert_eq!(a, b);
    }

    #[test]
    fn test_miss_synthesizes_generic_record() {
        let catalog = JurisdictionCatalog::builtin();
        let r = region(SupportedState::Arizona, 35.2, -111.65);
        let record = catalog.lookup_city(SupportedState::Arizona, "flagstaff", &r);

        assert_eq!(record.source, RecordSource::Synthesized);
        assert_eq!(record.display_name, "Flagstaff");
        assert_eq!(record.department_name, "Flagstaff Building Department");
        assert_eq!(record.phone, UNKNOWN_PHONE);
        assert_eq!(record.email, "permits@flagstaffaz.gov");
        assert_eq!(record.website, "https://www.flagstaffaz.gov");
        assert_eq!(record.codes, CodeVersions::for_state(SupportedState::Arizona));
    }

    #[test]
    fn test_no_prefix_matching() {
        let catalog = JurisdictionCatalog::builtin();
        assert!(catalog.contains(SupportedState::Nevada, "lasvegas"));
        assert!(!catalog.contains(SupportedState::Nevada, "lasveg"));
        assert!(!catalog.contains(SupportedState::Arizona, "lasvegas"));
    }

    #[test]
    fn test_nevada_clark_county_carve_out() {
        let catalog = JurisdictionCatalog::builtin();

        let clark = region(SupportedState::Nevada, 36.1, -115.1);
        let record = catalog.lookup_city(SupportedState::Nevada, "paradise", &clark);
        assert_eq!(record.source, RecordSource::County);
        assert_eq!(record.display_name, "Paradise (Clark County)");
        assert_eq!(record.department_name, "Clark County Building Department");

        let washoe = region(SupportedState::Nevada, 39.5, -119.8);
        let record = catalog.lookup_city(SupportedState::Nevada, "sunvalley", &washoe);
        assert_eq!(record.source, RecordSource::Synthesized);
        assert_eq!(record.email, "permits@sunvalleynv.gov");
    }

    #[test]
    fn test_city_counts() {
        let catalog = JurisdictionCatalog::builtin();
        assert_eq!(catalog.city_count(SupportedState::Arizona), 8);
        assert_eq!(catalog.city_count(SupportedState::Texas), 9);
        assert_eq!(catalog.city_count(SupportedState::Florida), 8);
        assert_eq!(catalog.city_count(SupportedState::Nevada), 5);
    }
}
