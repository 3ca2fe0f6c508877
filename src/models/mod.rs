//! Core data models for the jurisdiction lookup.

pub mod address;
pub mod ahj;
pub mod region;

pub use address::{AddressParts, GeoPoint, GeocodedAddress};
pub use ahj::{
    AddressInfo, AhjInfo, AhjResult, CodesAndStandards, ContactInfo, InspectionRequirements,
    PermitRequirements, UtilityContact, UtilityInfo,
};
pub use region::{GeoBbox, RegionRecord};
