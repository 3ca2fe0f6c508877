//! Merge a region and a jurisdiction record into an [`AhjResult`].

use chrono::{Local, NaiveDate};

use super::{JurisdictionRecord, StateDefaults};
use crate::models::address::non_empty;
use crate::models::{
    AddressInfo, AhjInfo, AhjResult, CodesAndStandards, ContactInfo, GeocodedAddress,
    InspectionRequirements, PermitRequirements, RegionRecord, UtilityContact, UtilityInfo,
};

pub const UNKNOWN_COUNTY: &str = "Unknown County";
pub const UNKNOWN_ZIP: &str = "Unknown";

const UTILITY_EMAIL: &str = "interconnection@utility.com";
const UTILITY_WEBSITE: &str = "https://www.utility.com/solar";

/// Builds the normalized result shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMerger;

impl RecordMerger {
    /// Merge using today's local date for `last_updated`.
    pub fn merge(
        &self,
        jurisdiction: &JurisdictionRecord,
        region: &RegionRecord,
        address: &GeocodedAddress,
        state: &str,
    ) -> AhjResult {
        self.merge_on(jurisdiction, region, address, state, Local::now().date_naive())
    }

    /// `state` is the full state name; names without defaults use the global row.
    pub fn merge_on(
        &self,
        jurisdiction: &JurisdictionRecord,
        region: &RegionRecord,
        address: &GeocodedAddress,
        state: &str,
        today: NaiveDate,
    ) -> AhjResult {
        let defaults = StateDefaults::lookup(state);
        let codes = &jurisdiction.codes;

        let ifc_version = codes
            .ifc
            .clone()
            .or_else(|| codes.fire.clone())
            .unwrap_or_else(|| defaults.ifc_default.to_string());

        let parts = &address.address;

        AhjResult {
            address: AddressInfo {
                full_address: address.display_name.clone(),
                latitude: address.lat,
                longitude: address.lon,
                city: non_empty(&parts.city)
                    .unwrap_or(jurisdiction.display_name.as_str())
                    .to_string(),
                state: non_empty(&parts.state).unwrap_or(state).to_string(),
                county: non_empty(&parts.county).unwrap_or(UNKNOWN_COUNTY).to_string(),
                zipcode: non_empty(&parts.postcode).unwrap_or(UNKNOWN_ZIP).to_string(),
            },
            ahj_info: AhjInfo {
                jurisdiction_name: jurisdiction.department_name.clone(),
                jurisdiction_type: "Municipal".to_string(),
                authority_type: "Building Department".to_string(),
                contact_info: ContactInfo {
                    name: jurisdiction.department_name.clone(),
                    phone: jurisdiction.phone.clone(),
                    email: jurisdiction.email.clone(),
                    website: jurisdiction.website.clone(),
                    address: format!("{}, {}", jurisdiction.display_name, state),
                },
                permit_requirements: PermitRequirements {
                    electrical_permit_required: true,
                    building_permit_required: true,
                    fire_permit_required: defaults.fire_permit_required,
                    estimated_review_time: defaults.review_time.to_string(),
                    permit_fees: defaults.permit_fees.to_string(),
                },
                inspection_requirements: InspectionRequirements {
                    rough_inspection: true,
                    final_inspection: true,
                    utility_interconnection: true,
                    special_requirements: defaults.special_requirements.to_string(),
                },
                codes_and_standards: CodesAndStandards {
                    building_code: codes.building.clone(),
                    electrical_code: codes.electrical.clone(),
                    fire_code: codes.fire.clone(),
                    ifc_version,
                    zoning_restrictions: "Local zoning ordinance requirements apply".to_string(),
                },
            },
            utility_info: UtilityInfo {
                utility_name: region.utility_name.to_string(),
                interconnection_process: "Net Metering Available".to_string(),
                application_required: true,
                estimated_timeline: defaults.utility_timeline.to_string(),
                contact: UtilityContact {
                    phone: region.utility_phone.to_string(),
                    email: UTILITY_EMAIL.to_string(),
                    website: UTILITY_WEBSITE.to_string(),
                },
            },
            additional_notes: vec![
                format!("Real municipal data for {}, {}", jurisdiction.display_name, state),
                if jurisdiction.api_available {
                    "API data available".to_string()
                } else {
                    "Contact building department for current requirements".to_string()
                },
                "Building codes and requirements subject to local amendments".to_string(),
                "Check local historic district restrictions".to_string(),
            ],
            last_updated: today.format("%Y-%m-%d").to_string(),
            data_source: format!("{} Municipal Data", jurisdiction.display_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::{CodeVersions, GeoLookup, JurisdictionCatalog, SupportedState};
    use crate::models::AddressParts;

    fn phoenix() -> GeocodedAddress {
        GeocodedAddress::new(
            "Phoenix, Maricopa County, Arizona, United States",
            33.4484,
            -112.0740,
            AddressParts {
                city: Some("Phoenix".into()),
                state: Some("Arizona".into()),
                ..Default::default()
            },
        )
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn merged(state: SupportedState, key: &str, address: &GeocodedAddress) -> AhjResult {
        let region = GeoLookup::builtin().resolve_region(state, address.lat, address.lon);
        let record = JurisdictionCatalog::builtin().lookup_city(state, key, &region);
        RecordMerger.merge_on(&record, &region, address, state.name(), day())
    }

    #[test]
    fn test_phoenix_result() {
        let result = merged(SupportedState::Arizona, "phoenix", &phoenix());

        let codes = &result.ahj_info.codes_and_standards;
        assert_eq!(
            codes.building_code,
            "2018 International Building Code (Arizona amendments)"
        );
        assert_eq!(codes.ifc_version, "2018 International Fire Code");
        assert!(!result.ahj_info.permit_requirements.fire_permit_required);
        assert_eq!(
            result.utility_info.utility_name,
            "Arizona Public Service (APS) / Salt River Project (SRP)"
        );
        assert_eq!(result.address.county, UNKNOWN_COUNTY);
        assert_eq!(result.address.zipcode, UNKNOWN_ZIP);
        assert_eq!(result.last_updated, "2024-03-09");
        assert_eq!(result.data_source, "Phoenix Municipal Data");
        assert_eq!(result.ahj_info.contact_info.address, "Phoenix, Arizona");
    }

    #[test]
    fn test_notes_order() {
        let result = merged(SupportedState::Arizona, "phoenix", &phoenix());
        assert_eq!(
            result.additional_notes,
            vec![
                "Real municipal data for Phoenix, Arizona",
                "API data available",
                "Building codes and requirements subject to local amendments",
                "Check local historic district restrictions",
            ]
        );

        let result = merged(SupportedState::Arizona, "tucson", &phoenix());
        assert_eq!(
            result.additional_notes[1],
            "Contact building department for current requirements"
        );
    }

    #[test]
    fn test_florida_carve_outs() {
        let miami = GeocodedAddress::new("Miami, FL", 25.77, -80.19, AddressParts::default());
        let result = merged(SupportedState::Florida, "miami", &miami);

        let permits = &result.ahj_info.permit_requirements;
        assert!(permits.fire_permit_required);
        assert_eq!(permits.estimated_review_time, "7-14 business days");
        assert_eq!(permits.permit_fees, "$100-$500 (varies by system size)");
        assert_eq!(result.utility_info.estimated_timeline, "30-60 days");
        assert_eq!(result.utility_info.utility_name, "Florida Power & Light (FPL)");
        assert_eq!(result.address.city, "Miami");
        assert_eq!(result.address.state, "Florida");
    }

    #[test]
    fn test_ifc_falls_through_to_fire_then_state_default() {
        let region = GeoLookup::builtin().resolve_region(SupportedState::Florida, 25.77, -80.19);
        let address = GeocodedAddress::new("x", 25.77, -80.19, AddressParts::default());

        let mut codes = CodeVersions::for_state(SupportedState::Florida);
        codes.ifc = None;
        codes.fire = Some("Fire Code X".into());
        let mut record = JurisdictionRecord::synthesize("doral", "FL", codes);
        let result = RecordMerger.merge_on(&record, &region, &address, "Florida", day());
        assert_eq!(result.ahj_info.codes_and_standards.ifc_version, "Fire Code X");

        record.codes.fire = None;
        let result = RecordMerger.merge_on(&record, &region, &address, "Florida", day());
        assert_eq!(
            result.ahj_info.codes_and_standards.ifc_version,
            "2018 International Fire Code (Florida amendments)"
        );
        assert!(result.ahj_info.codes_and_standards.fire_code.is_none());

        let result = RecordMerger.merge_on(&record, &region, &address, "Oregon", day());
        assert_eq!(
            result.ahj_info.codes_and_standards.ifc_version,
            "2018 International Fire Code"
        );
    }

    #[test]
    fn test_unknown_state_uses_global_defaults() {
        let region = GeoLookup::builtin().resolve_region(SupportedState::Texas, 0.0, 0.0);
        let address = GeocodedAddress::new("x", 0.0, 0.0, AddressParts::default());
        let record =
            JurisdictionRecord::synthesize("salem", "OR", CodeVersions::for_state(SupportedState::Texas));
        let result = RecordMerger.merge_on(&record, &region, &address, "Oregon", day());

        let permits = &result.ahj_info.permit_requirements;
        assert_eq!(permits.permit_fees, "$150-$600 (varies by system size)");
        assert_eq!(permits.estimated_review_time, "5-10 business days");
        assert!(!permits.fire_permit_required);
    }

    #[test]
    fn test_blank_address_fields_use_placeholders() {
        let address = GeocodedAddress::new(
            "Tempe, AZ",
            33.42,
            -111.94,
            AddressParts {
                city: Some(String::new()),
                town: Some("Tempe".into()),
                county: Some("".into()),
                postcode: Some("  ".into()),
                state: Some("Arizona".into()),
                ..Default::default()
            },
        );
        let result = merged(SupportedState::Arizona, "tempe", &address);

        assert_eq!(result.address.city, "Tempe");
        assert_eq!(result.address.county, UNKNOWN_COUNTY);
        assert_eq!(result.address.zipcode, UNKNOWN_ZIP);
        assert_eq!(result.address.state, "Arizona");
    }
}
