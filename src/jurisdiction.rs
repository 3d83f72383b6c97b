// 🗺️ Jurisdiction Normalizer - free-form state names → two-letter codes
//
// Unknown names pass through upper-cased instead of being rejected, so a
// misspelled or foreign jurisdiction still gets its own row in the summary.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Full name (lower-case) → code, 50 states plus DC
static STATE_NAME_TO_CODE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("alabama", "AL"),
        ("alaska", "AK"),
        ("arizona", "AZ"),
        ("arkansas", "AR"),
        ("california", "CA"),
        ("colorado", "CO"),
        ("connecticut", "CT"),
        ("delaware", "DE"),
        ("florida", "FL"),
        ("georgia", "GA"),
        ("hawaii", "HI"),
        ("idaho", "ID"),
        ("illinois", "IL"),
        ("indiana", "IN"),
        ("iowa", "IA"),
        ("kansas", "KS"),
        ("kentucky", "KY"),
        ("louisiana", "LA"),
        ("maine", "ME"),
        ("maryland", "MD"),
        ("massachusetts", "MA"),
        ("michigan", "MI"),
        ("minnesota", "MN"),
        ("mississippi", "MS"),
        ("missouri", "MO"),
        ("montana", "MT"),
        ("nebraska", "NE"),
        ("nevada", "NV"),
        ("new hampshire", "NH"),
        ("new jersey", "NJ"),
        ("new mexico", "NM"),
        ("new york", "NY"),
        ("north carolina", "NC"),
        ("north dakota", "ND"),
        ("ohio", "OH"),
        ("oklahoma", "OK"),
        ("oregon", "OR"),
        ("pennsylvania", "PA"),
        ("rhode island", "RI"),
        ("south carolina", "SC"),
        ("south dakota", "SD"),
        ("tennessee", "TN"),
        ("texas", "TX"),
        ("utah", "UT"),
        ("vermont", "VT"),
        ("virginia", "VA"),
        ("washington", "WA"),
        ("west virginia", "WV"),
        ("wisconsin", "WI"),
        ("wyoming", "WY"),
        ("district of columbia", "DC"),
        ("dc", "DC"),
    ])
});

/// Normalize a jurisdiction to its code
///
/// - empty / whitespace → `None` (the record is unattributable)
/// - exactly two characters → upper-cased as-is, no validation
/// - known full name (any case) → its code
/// - anything else → the upper-cased input
///
/// # Examples:
/// ```
/// use ifta_calc::normalize_state;
///
/// assert_eq!(normalize_state("California").as_deref(), Some("CA"));
/// assert_eq!(normalize_state(" ca ").as_deref(), Some("CA"));
/// assert_eq!(normalize_state("   "), None);
/// ```
pub fn normalize_state(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    if upper.chars().count() == 2 {
        return Some(upper);
    }

    let code = STATE_NAME_TO_CODE
        .get(trimmed.to_lowercase().as_str())
        .map(|code| code.to_string())
        .unwrap_or(upper);

    Some(code)
}

/// True when the code is one of the 50 states or DC
pub fn is_known_code(code: &str) -> bool {
    let upper = code.trim().to_uppercase();
    STATE_NAME_TO_CODE.values().any(|known| *known == upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_names_map_to_codes() {
        assert_eq!(normalize_state("California").as_deref(), Some("CA"));
        assert_eq!(normalize_state("NEW YORK").as_deref(), Some("NY"));
        assert_eq!(normalize_state("  west virginia ").as_deref(), Some("WV"));
    }

    #[test]
    fn test_two_letter_codes_upper_cased() {
        assert_eq!(normalize_state("ca").as_deref(), Some("CA"));
        assert_eq!(normalize_state("Tx").as_deref(), Some("TX"));
    }

    #[test]
    fn test_two_letter_input_not_validated() {
        assert_eq!(normalize_state("zz").as_deref(), Some("ZZ"));
        assert_eq!(normalize_state("ON").as_deref(), Some("ON"));
    }

    #[test]
    fn test_district_of_columbia() {
        assert_eq!(normalize_state("District of Columbia").as_deref(), Some("DC"));
        assert_eq!(normalize_state("dc").as_deref(), Some("DC"));
    }

    #[test]
    fn test_unknown_name_passes_through_upper_cased() {
        assert_eq!(normalize_state("Ontario").as_deref(), Some("ONTARIO"));
        assert_eq!(normalize_state("Calif.").as_deref(), Some("CALIF."));
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(normalize_state(""), None);
        assert_eq!(normalize_state(" \t "), None);
    }

    #[test]
    fn test_table_covers_states_and_dc() {
        let codes: std::collections::HashSet<&str> = STATE_NAME_TO_CODE.values().copied().collect();
        assert_eq!(codes.len(), 51);
        assert!(is_known_code("dc"));
        assert!(!is_known_code("ON"));
    }
}
