// 🧹 Record Standardizer - provider columns → canonical schema
//
// Fuel-card vendors and ELD providers never agree on column names. Each
// canonical field carries a fixed, ordered alias list; the first alias present
// in a row's headers wins.

use crate::parser::RawRecord;
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// RecordKind - Which export a dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Fuel,
    Mileage,
}

impl RecordKind {
    /// Human-readable name for display
    pub fn name(&self) -> &str {
        match self {
            RecordKind::Fuel => "Fuel purchases",
            RecordKind::Mileage => "Mileage (ELD)",
        }
    }

    /// Short code for internal use
    pub fn code(&self) -> &str {
        match self {
            RecordKind::Fuel => "fuel",
            RecordKind::Mileage => "mileage",
        }
    }
}

/// Canonical columns and the headers accepted for each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    State,
    Gallons,
    TaxPaid,
    Miles,
}

impl CanonicalField {
    /// Accepted header names, highest priority first
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::State => &["state", "jurisdiction", "province", "region"],
            CanonicalField::Gallons => &["gallons", "gals", "qty", "quantity", "fuel_gallons"],
            CanonicalField::TaxPaid => &["tax_paid", "taxpaid", "fuel_tax_paid", "iftataxpaid", "tax"],
            CanonicalField::Miles => &["miles", "distance", "trip_miles", "total_miles"],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CanonicalField::State => "state",
            CanonicalField::Gallons => "gallons",
            CanonicalField::TaxPaid => "tax_paid",
            CanonicalField::Miles => "miles",
        }
    }
}

/// FuelRecord - One fuel purchase
///
/// `state` is the raw cell text; normalization happens at aggregation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    pub state: String,
    pub gallons: f64,
    pub tax_paid: f64,
}

/// MileageRecord - Distance driven in one jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageRecord {
    pub state: String,
    pub miles: f64,
}

/// Why a raw row did not become a canonical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RowRejection {
    MissingColumn { field: CanonicalField },
    EmptyState,
    NonPositiveQuantity { field: CanonicalField, value: f64 },
}

impl RowRejection {
    pub fn describe(&self) -> String {
        match self {
            RowRejection::MissingColumn { field } => format!(
                "no {} column (accepted: {})",
                field.name(),
                field.aliases().join(", ")
            ),
            RowRejection::EmptyState => "state is empty".to_string(),
            RowRejection::NonPositiveQuantity { field, value } => {
                format!("{} must be greater than zero (got {})", field.name(), value)
            }
        }
    }
}

// ============================================================================
// COLUMN RESOLUTION & COERCION
// ============================================================================

/// First alias of `field` that is a column of `record`
pub fn resolve_column(record: &RawRecord, field: CanonicalField) -> Option<&'static str> {
    field
        .aliases()
        .iter()
        .copied()
        .find(|alias| record.contains_key(alias))
}

/// Coerce free text into a number
///
/// Everything except digits, `.` and `-` is stripped ("$1,234.50" → 1234.5),
/// then the longest numeric prefix is read. Anything unreadable becomes 0.
pub fn to_number(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let mut chars = cleaned.chars().peekable();
    let negative = chars.peek() == Some(&'-');
    if negative {
        chars.next();
    }

    let mut whole = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        whole.push(c);
        chars.next();
    }

    let mut fraction = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
            fraction.push(c);
            chars.next();
        }
    }

    if whole.is_empty() && fraction.is_empty() {
        return 0.0;
    }

    let literal = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if whole.is_empty() { "0" } else { whole.as_str() },
        if fraction.is_empty() { "0" } else { fraction.as_str() },
    );

    match literal.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => 0.0,
    }
}

fn cell<'a>(record: &'a RawRecord, column: &str) -> &'a str {
    record.get(column).unwrap_or("")
}

// ============================================================================
// ROW CONVERSION
// ============================================================================

/// Convert one raw row into a FuelRecord, or explain why not
pub fn fuel_from_raw(record: &RawRecord) -> Result<FuelRecord, RowRejection> {
    let state_key = resolve_column(record, CanonicalField::State).ok_or(RowRejection::MissingColumn {
        field: CanonicalField::State,
    })?;
    let gallons_key = resolve_column(record, CanonicalField::Gallons).ok_or(RowRejection::MissingColumn {
        field: CanonicalField::Gallons,
    })?;

    let state = cell(record, state_key).trim().to_string();
    if state.is_empty() {
        return Err(RowRejection::EmptyState);
    }

    let gallons = to_number(cell(record, gallons_key));
    if gallons <= 0.0 {
        return Err(RowRejection::NonPositiveQuantity {
            field: CanonicalField::Gallons,
            value: gallons,
        });
    }

    let tax_paid = resolve_column(record, CanonicalField::TaxPaid)
        .map(|key| to_number(cell(record, key)))
        .unwrap_or(0.0);

    Ok(FuelRecord {
        state,
        gallons,
        tax_paid,
    })
}

/// Convert one raw row into a MileageRecord, or explain why not
pub fn mileage_from_raw(record: &RawRecord) -> Result<MileageRecord, RowRejection> {
    let state_key = resolve_column(record, CanonicalField::State).ok_or(RowRejection::MissingColumn {
        field: CanonicalField::State,
    })?;
    let miles_key = resolve_column(record, CanonicalField::Miles).ok_or(RowRejection::MissingColumn {
        field: CanonicalField::Miles,
    })?;

    let state = cell(record, state_key).trim().to_string();
    if state.is_empty() {
        return Err(RowRejection::EmptyState);
    }

    let miles = to_number(cell(record, miles_key));
    if miles <= 0.0 {
        return Err(RowRejection::NonPositiveQuantity {
            field: CanonicalField::Miles,
            value: miles,
        });
    }

    Ok(MileageRecord { state, miles })
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Standardize raw fuel rows, silently dropping rows that don't qualify
pub fn standardize_fuel(records: &[RawRecord]) -> Vec<FuelRecord> {
    records.iter().filter_map(|r| fuel_from_raw(r).ok()).collect()
}

/// Standardize raw mileage rows, silently dropping rows that don't qualify
pub fn standardize_mileage(records: &[RawRecord]) -> Vec<MileageRecord> {
    records.iter().filter_map(|r| mileage_from_raw(r).ok()).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_record_kind_names() {
        assert_eq!(RecordKind::Fuel.name(), "Fuel purchases");
        assert_eq!(RecordKind::Mileage.code(), "mileage");
    }

    #[test]
    fn test_to_number_plain() {
        assert_eq!(to_number("100"), 100.0);
        assert_eq!(to_number("12.5"), 12.5);
        assert_eq!(to_number("-3.25"), -3.25);
    }

    #[test]
    fn test_to_number_strips_currency_and_separators() {
        assert_eq!(to_number("$1,234.50"), 1234.5);
        assert_eq!(to_number(" 42 gal "), 42.0);
        assert_eq!(to_number("USD -7"), -7.0);
    }

    #[test]
    fn test_to_number_unreadable_is_zero() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("n/a"), 0.0);
        assert_eq!(to_number("-"), 0.0);
        assert_eq!(to_number("."), 0.0);
    }

    #[test]
    fn test_to_number_reads_leading_number_only() {
        assert_eq!(to_number("1.2.3"), 1.2);
        assert_eq!(to_number("10-20"), 10.0);
        assert_eq!(to_number(".5"), 0.5);
        assert_eq!(to_number("7."), 7.0);
    }

    #[test]
    fn test_standardize_fuel_basic() {
        let raw = parse("state,gallons,tax_paid\nCA,100,40\nTX,50,10");
        let fuel = standardize_fuel(&raw);

        assert_eq!(fuel.len(), 2);
        assert_eq!(
            fuel[0],
            FuelRecord {
                state: "CA".to_string(),
                gallons: 100.0,
                tax_paid: 40.0
            }
        );
        assert_eq!(fuel[1].state, "TX");
        assert_eq!(fuel[1].tax_paid, 10.0);
    }

    #[test]
    fn test_alias_resolution_province_and_qty() {
        let raw = parse("Province,Qty\nOntario,25");
        let fuel = standardize_fuel(&raw);

        assert_eq!(fuel.len(), 1);
        assert_eq!(fuel[0].state, "Ontario");
        assert_eq!(fuel[0].gallons, 25.0);
        assert_eq!(fuel[0].tax_paid, 0.0, "missing tax column defaults to 0");
    }

    #[test]
    fn test_alias_priority_order() {
        // "state" outranks "region" regardless of header position
        let raw = parse("region,state,miles,distance\nWest,NV,100,999");
        let miles = standardize_mileage(&raw);

        assert_eq!(miles[0].state, "NV");
        assert_eq!(miles[0].miles, 100.0);
    }

    #[test]
    fn test_fuel_missing_required_column_dropped() {
        let raw = parse("state,tax_paid\nCA,40");
        assert!(standardize_fuel(&raw).is_empty());

        let rejection = fuel_from_raw(&raw[0]).unwrap_err();
        assert_eq!(
            rejection,
            RowRejection::MissingColumn {
                field: CanonicalField::Gallons
            }
        );
    }

    #[test]
    fn test_fuel_zero_and_negative_gallons_dropped() {
        let raw = parse("state,gallons\nCA,0\nTX,-5\nNV,abc\nOR,3");
        let fuel = standardize_fuel(&raw);

        assert_eq!(fuel.len(), 1);
        assert_eq!(fuel[0].state, "OR");
    }

    #[test]
    fn test_empty_state_dropped() {
        let raw = parse("state,miles\n,100\n   ,50\nCA,10");
        let miles = standardize_mileage(&raw);

        assert_eq!(miles.len(), 1);
        assert_eq!(mileage_from_raw(&raw[0]).unwrap_err(), RowRejection::EmptyState);
    }

    #[test]
    fn test_mileage_zero_miles_dropped() {
        let raw = parse("jurisdiction,total_miles\nCA,0\nTX,1500");
        let miles = standardize_mileage(&raw);

        assert_eq!(miles.len(), 1);
        assert_eq!(
            miles[0],
            MileageRecord {
                state: "TX".to_string(),
                miles: 1500.0
            }
        );
    }

    #[test]
    fn test_tax_alias_and_currency_text() {
        let raw = parse("state,gals,Tax\nPA,\"1,000\",\"$741.00\"");
        let fuel = standardize_fuel(&raw);

        assert_eq!(fuel[0].gallons, 1000.0);
        assert_eq!(fuel[0].tax_paid, 741.0);
    }

    #[test]
    fn test_rejection_describe() {
        let missing = RowRejection::MissingColumn {
            field: CanonicalField::Miles,
        };
        assert!(missing.describe().contains("trip_miles"));

        let zero = RowRejection::NonPositiveQuantity {
            field: CanonicalField::Gallons,
            value: 0.0,
        };
        assert_eq!(zero.describe(), "gallons must be greater than zero (got 0)");
    }

    #[test]
    fn test_standardize_empty_input() {
        assert!(standardize_fuel(&[]).is_empty());
        assert!(standardize_mileage(&[]).is_empty());
    }
}
