//! The merged jurisdiction result handed to renderers and exporters.

use serde::{Deserialize, Serialize};

/// Full AHJ lookup result for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhjResult {
    pub address: AddressInfo,
    pub ahj_info: AhjInfo,
    pub utility_info: UtilityInfo,
    /// Rendered and exported in this order
    pub additional_notes: Vec<String>,
    /// ISO date (YYYY-MM-DD)
    pub last_updated: String,
    pub data_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub county: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhjInfo {
    pub jurisdiction_name: String,
    pub jurisdiction_type: String,
    pub authority_type: String,
    pub contact_info: ContactInfo,
    pub permit_requirements: PermitRequirements,
    pub inspection_requirements: InspectionRequirements,
    pub codes_and_standards: CodesAndStandards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitRequirements {
    pub electrical_permit_required: bool,
    pub building_permit_required: bool,
    pub fire_permit_required: bool,
    pub estimated_review_time: String,
    pub permit_fees: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRequirements {
    pub rough_inspection: bool,
    pub final_inspection: bool,
    pub utility_interconnection: bool,
    pub special_requirements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodesAndStandards {
    pub building_code: String,
    pub electrical_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_code: Option<String>,
    pub ifc_version: String,
    pub zoning_restrictions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityInfo {
    pub utility_name: String,
    pub interconnection_process: String,
    pub application_required: bool,
    pub estimated_timeline: String,
    pub contact: UtilityContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityContact {
    pub phone: String,
    pub email: String,
    pub website: String,
}
