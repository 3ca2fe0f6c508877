//! US state normalization and the set of states with jurisdiction tables.

use serde::{Deserialize, Serialize};

/// Full name and postal abbreviation for every state plus DC.
const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Resolve a state given as full name or postal abbreviation (any case,
/// surrounding whitespace ignored) to its `(name, abbreviation)` pair.
pub fn normalize_state(input: &str) -> Option<(&'static str, &'static str)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    US_STATES
        .iter()
        .find(|(name, abbr)| name.eq_ignore_ascii_case(input) || abbr.eq_ignore_ascii_case(input))
        .copied()
}

/// States with hand-authored jurisdiction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedState {
    Arizona,
    Texas,
    Florida,
    Nevada,
}

impl SupportedState {
    pub fn all() -> &'static [SupportedState] {
        &[
            SupportedState::Arizona,
            SupportedState::Texas,
            SupportedState::Florida,
            SupportedState::Nevada,
        ]
    }

    /// Parse a full name or abbreviation; `None` for states without tables.
    pub fn parse(input: &str) -> Option<Self> {
        let (_, abbr) = normalize_state(input)?;
        Self::from_abbr(abbr)
    }

    pub fn from_abbr(abbr: &str) -> Option<Self> {
        match abbr.to_ascii_uppercase().as_str() {
            "AZ" => Some(SupportedState::Arizona),
            "TX" => Some(SupportedState::Texas),
            "FL" => Some(SupportedState::Florida),
            "NV" => Some(SupportedState::Nevada),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupportedState::Arizona => "Arizona",
            SupportedState::Texas => "Texas",
            SupportedState::Florida => "Florida",
            SupportedState::Nevada => "Nevada",
        }
    }

    pub fn abbr(&self) -> &'static str {
        match self {
            SupportedState::Arizona => "AZ",
            SupportedState::Texas => "TX",
            SupportedState::Florida => "FL",
            SupportedState::Nevada => "NV",
        }
    }
}

impl std::fmt::Display for SupportedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_name_and_abbr() {
        assert_eq!(normalize_state("Arizona"), Some(("Arizona", "AZ")));
        assert_eq!(normalize_state("  tx "), Some(("Texas", "TX")));
        assert_eq!(normalize_state("NEW MEXICO"), Some(("New Mexico", "NM")));
        assert_eq!(normalize_state("Atlantis"), None);
        assert_eq!(normalize_state(""), None);
    }

    #[test]
    fn test_supported_set() {
        assert_eq!(SupportedState::parse("florida"), Some(SupportedState::Florida));
        assert_eq!(SupportedState::parse("NV"), Some(SupportedState::Nevada));
        assert_eq!(SupportedState::parse("Oregon"), None);
        assert_eq!(SupportedState::parse("OR"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for state in SupportedState::all() {
            assert_eq!(SupportedState::parse(state.name()), Some(*state));
            assert_eq!(SupportedState::parse(state.abbr()), Some(*state));
        }
    }
}
