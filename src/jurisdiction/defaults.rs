//! Per-state permit, review and utility defaults.

use serde::Serialize;

use super::SupportedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateDefaults {
    pub permit_fees: &'static str,
    pub review_time: &'static str,
    pub special_requirements: &'static str,
    pub utility_timeline: &'static str,
    pub ifc_default: &'static str,
    pub fire_permit_required: bool,
}

/// Row used for states without their own defaults.
pub const GLOBAL_DEFAULTS: StateDefaults = StateDefaults {
    permit_fees: "$150-$600 (varies by system size)",
    review_time: "5-10 business days",
    special_requirements: "Structural engineer approval may be required",
    utility_timeline: "30-45 days",
    ifc_default: "2018 International Fire Code",
    fire_permit_required: false,
};

impl StateDefaults {
    pub fn for_state(state: SupportedState) -> &'static StateDefaults {
        match state {
            SupportedState::Arizona => &ARIZONA,
            SupportedState::Texas => &TEXAS,
            SupportedState::Florida => &FLORIDA,
            SupportedState::Nevada => &NEVADA,
        }
    }

    /// Look up by state name or abbreviation, falling back to the global row.
    pub fn lookup(state: &str) -> &'static StateDefaults {
        SupportedState::parse(state)
            .map(Self::for_state)
            .unwrap_or(&GLOBAL_DEFAULTS)
    }
}

const ARIZONA: StateDefaults = StateDefaults {
    permit_fees: "$150-$600 (varies by system size)",
    special_requirements:
        "HOA approval may be required; structural engineer approval for older homes",
    ..GLOBAL_DEFAULTS
};

const TEXAS: StateDefaults = StateDefaults {
    permit_fees: "$200-$800 (varies by system size and jurisdiction)",
    special_requirements:
        "Energy code compliance required; structural engineer approval for roof-mounted systems",
    utility_timeline: "45-60 days",
    ..GLOBAL_DEFAULTS
};

// Florida requires fire permits more often and reviews take longer.
const FLORIDA: StateDefaults = StateDefaults {
    permit_fees: "$100-$500 (varies by system size)",
    review_time: "7-14 business days",
    special_requirements:
        "Hurricane-rated equipment required; structural engineer approval mandatory",
    utility_timeline: "30-60 days",
    ifc_default: "2018 International Fire Code (Florida amendments)",
    fire_permit_required: true,
};

const NEVADA: StateDefaults = StateDefaults {
    permit_fees: "$200-$700 (varies by system size)",
    special_requirements:
        "High wind zone considerations; structural engineer approval recommended",
    ..GLOBAL_DEFAULTS
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_florida_requires_fire_permit() {
        for state in SupportedState::all() {
            let d = StateDefaults::for_state(*state);
            assert_eq!(d.fire_permit_required, *state == SupportedState::Florida);
        }
    }

    #[test]
    fn test_every_row_is_complete() {
        for state in SupportedState::all() {
            let d = StateDefaults::for_state(*state);
            assert!(!d.permit_fees.is_empty());
            assert!(!d.review_time.is_empty());
            assert!(!d.special_requirements.is_empty());
            assert!(!d.utility_timeline.is_empty());
            assert!(!d.ifc_default.is_empty());
        }
    }

    #[test]
    fn test_lookup_by_name_and_fallback() {
        assert_eq!(StateDefaults::lookup("TX").utility_timeline, "45-60 days");
        assert_eq!(StateDefaults::lookup("Florida").review_time, "7-14 business days");
        assert_eq!(StateDefaults::lookup("Oregon"), &GLOBAL_DEFAULTS);
    }
}
