// ⚖️ IFTA Calculator - per-jurisdiction apportionment and tax
//
// Fuel bought in one state is often burned in another, so tax owed is not
// computed from gallons purchased. Instead the fleet's blended MPG converts
// each jurisdiction's miles into gallons *used* there:
//
//   mpg          = total_miles / total_gallons
//   gallons_used = miles / mpg
//   tax_owed     = gallons_used * rate
//   net_tax      = tax_owed - tax_paid      (positive = owe, negative = refund)

use crate::jurisdiction::normalize_state;
use crate::standardizer::{FuelRecord, MileageRecord};
use crate::tax_rates::rate_for;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// AggregateRow - One jurisdiction of the quarterly summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub state: String,
    pub miles: f64,
    /// Apportioned by mileage share, not gallons purchased here
    pub gallons_used: f64,
    pub tax_rate: f64,
    pub tax_paid: f64,
    pub tax_owed: f64,
    pub net_tax: f64,
}

impl AggregateRow {
    pub fn is_liability(&self) -> bool {
        self.net_tax > 0.0
    }

    pub fn is_refund(&self) -> bool {
        self.net_tax < 0.0
    }
}

/// CalculationResult - Fleet totals plus rows sorted by state code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub mpg: f64,
    pub total_miles: f64,
    pub total_gallons: f64,
    pub total_tax_paid: f64,
    /// Sum of row `tax_owed`
    pub total_tax_owed: f64,
    /// Sum of row `net_tax`
    pub total_net_tax: f64,
    pub rows: Vec<AggregateRow>,
}

impl CalculationResult {
    /// Row for a jurisdiction code, if present
    pub fn row(&self, state: &str) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| row.state == state)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} jurisdictions, {:.2} miles, {:.2} gallons, {:.2} MPG, owed ${:.2}, paid ${:.2}, net ${:.2}",
            self.rows.len(),
            self.total_miles,
            self.total_gallons,
            self.mpg,
            self.total_tax_owed,
            self.total_tax_paid,
            self.total_net_tax
        )
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Sum `value` per normalized state code; unattributable records are skipped
fn aggregate<T>(
    records: &[T],
    state: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> BTreeMap<String, f64> {
    let mut sums = BTreeMap::new();
    for record in records {
        let Some(code) = normalize_state(state(record)) else {
            continue;
        };
        *sums.entry(code).or_insert(0.0) += value(record);
    }
    sums
}

/// Compute the quarterly summary
///
/// Pure: no I/O, no state between calls, never fails. Empty inputs give an
/// all-zero result with no rows.
///
/// # Example:
/// ```
/// use ifta_calc::{calculate, FuelRecord, MileageRecord};
///
/// let fuel = vec![FuelRecord { state: "CA".into(), gallons: 100.0, tax_paid: 40.0 }];
/// let miles = vec![MileageRecord { state: "California".into(), miles: 2000.0 }];
///
/// let result = calculate(&fuel, &miles);
/// assert_eq!(result.mpg, 20.0);
/// assert_eq!(result.rows.len(), 1);
/// ```
pub fn calculate(fuel_records: &[FuelRecord], mileage_records: &[MileageRecord]) -> CalculationResult {
    let gallons_by_state = aggregate(fuel_records, |r| r.state.as_str(), |r| r.gallons);
    let tax_paid_by_state = aggregate(fuel_records, |r| r.state.as_str(), |r| r.tax_paid);
    let miles_by_state = aggregate(mileage_records, |r| r.state.as_str(), |r| r.miles);

    let total_gallons: f64 = gallons_by_state.values().sum();
    let total_miles: f64 = miles_by_state.values().sum();
    let total_tax_paid: f64 = tax_paid_by_state.values().sum();

    let mpg = if total_gallons > 0.0 {
        total_miles / total_gallons
    } else {
        0.0
    };

    let states: BTreeSet<&String> = gallons_by_state
        .keys()
        .chain(miles_by_state.keys())
        .chain(tax_paid_by_state.keys())
        .collect();

    let rows: Vec<AggregateRow> = states
        .into_iter()
        .map(|state| {
            let miles = miles_by_state.get(state).copied().unwrap_or(0.0);
            let gallons_used = if mpg > 0.0 { miles / mpg } else { 0.0 };
            let tax_rate = rate_for(state);
            let tax_paid = tax_paid_by_state.get(state).copied().unwrap_or(0.0);
            let tax_owed = gallons_used * tax_rate;

            AggregateRow {
                state: state.clone(),
                miles,
                gallons_used,
                tax_rate,
                tax_paid,
                tax_owed,
                net_tax: tax_owed - tax_paid,
            }
        })
        .collect();

    let (total_tax_owed, total_net_tax) = rows
        .iter()
        .fold((0.0, 0.0), |(owed, net), row| (owed + row.tax_owed, net + row.net_tax));

    debug!(
        fuel_records = fuel_records.len(),
        mileage_records = mileage_records.len(),
        jurisdictions = rows.len(),
        mpg,
        "calculated IFTA summary"
    );

    CalculationResult {
        mpg,
        total_miles,
        total_gallons,
        total_tax_paid,
        total_tax_owed,
        total_net_tax,
        rows,
    }
}

// ============================================================================
// TESTS
// ============================================================================
