// 💲 Fuel Tax Rate Table - dollars per gallon by jurisdiction
//
// Static for the life of the process. A code with no configured rate owes
// nothing, no matter how many gallons are apportioned to it.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

static STATE_TAX_RATES: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("AL", 0.29),
        ("AK", 0.08),
        ("AZ", 0.26),
        ("AR", 0.285),
        ("CA", 0.47),
        ("CO", 0.22),
        ("CT", 0.417),
        ("DE", 0.23),
        ("FL", 0.345),
        ("GA", 0.311),
        ("HI", 0.16),
        ("ID", 0.32),
        ("IL", 0.392),
        ("IN", 0.55),
        ("IA", 0.325),
        ("KS", 0.26),
        ("KY", 0.287),
        ("LA", 0.2),
        ("ME", 0.311),
        ("MD", 0.36),
        ("MA", 0.24),
        ("MI", 0.285),
        ("MN", 0.285),
        ("MS", 0.18),
        ("MO", 0.245),
        ("MT", 0.294),
        ("NE", 0.299),
        ("NV", 0.27),
        ("NH", 0.238),
        ("NJ", 0.338),
        ("NM", 0.21),
        ("NY", 0.385),
        ("NC", 0.385),
        ("ND", 0.23),
        ("OH", 0.38),
        ("OK", 0.19),
        ("OR", 0.0),
        ("PA", 0.741),
        ("RI", 0.34),
        ("SC", 0.28),
        ("SD", 0.28),
        ("TN", 0.27),
        ("TX", 0.2),
        ("UT", 0.362),
        ("VT", 0.32),
        ("VA", 0.404),
        ("WA", 0.494),
        ("WV", 0.357),
        ("WI", 0.329),
        ("WY", 0.24),
        ("DC", 0.235),
    ])
});

/// One entry of the rate table, for listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxRate {
    pub state: String,
    pub rate: f64,
}

/// Rate for a code (trimmed, case-insensitive); unknown codes are 0
pub fn rate_for(code: &str) -> f64 {
    let normalized = code.trim().to_uppercase();
    STATE_TAX_RATES.get(normalized.as_str()).copied().unwrap_or(0.0)
}

/// Whether the table has an entry for this code
pub fn has_rate(code: &str) -> bool {
    STATE_TAX_RATES.contains_key(code.trim().to_uppercase().as_str())
}

/// Every configured rate, ascending by code
pub fn all_rates() -> Vec<TaxRate> {
    STATE_TAX_RATES
        .iter()
        .map(|(state, rate)| TaxRate {
            state: state.to_string(),
            rate: *rate,
        })
        .collect()
}
