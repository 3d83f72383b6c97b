// 📤 Export - the downloadable tax summary
//
// Column set and precision are a compatibility contract with downstream
// spreadsheets: miles and money at 2 decimals, gallons_used at 4,
// tax_rate at 3. Ties round away from zero on the exact binary value
// (10.125 → 10.13), not to even.

use crate::batch::FilingReport;
use crate::calculator::{AggregateRow, CalculationResult};
use crate::error::{IftaError, Result};
use csv::{Terminator, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs;
use std::path::Path;

pub const DEFAULT_EXPORT_FILENAME: &str = "ifta-tax-summary.csv";

pub const EXPORT_HEADER: [&str; 7] = [
    "state",
    "miles",
    "gallons_used",
    "tax_rate",
    "tax_paid",
    "tax_owed",
    "net_tax",
];

/// Fixed-point text with `digits` decimals, half away from zero
///
/// The sign is applied after rounding the magnitude, so -0.001 at 2 digits
/// is "-0.00" and -0.0 is "0.00".
pub fn to_fixed(value: f64, digits: u32) -> String {
    let precision = digits as usize;
    let Some(magnitude) = Decimal::from_f64_retain(value.abs()) else {
        return format!("{:.*}", precision, value);
    };

    let rounded = magnitude.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{:.*}", sign, precision, rounded)
}

fn export_fields(row: &AggregateRow) -> [String; 7] {
    [
        row.state.clone(),
        to_fixed(row.miles, 2),
        to_fixed(row.gallons_used, 4),
        to_fixed(row.tax_rate, 3),
        to_fixed(row.tax_paid, 2),
        to_fixed(row.tax_owed, 2),
        to_fixed(row.net_tax, 2),
    ]
}

/// Render the summary as CSV text
///
/// Lines are joined with `\n`; the last data row has no trailing newline.
pub fn to_csv_string(result: &CalculationResult) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|e| IftaError::Export(e.to_string()))?;
    for row in &result.rows {
        writer
            .write_record(export_fields(row))
            .map_err(|e| IftaError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IftaError::Export(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| IftaError::Export(e.to_string()))?;

    if !result.rows.is_empty() && text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// Write the CSV summary to a file
pub fn write_csv(result: &CalculationResult, path: &Path) -> Result<()> {
    let text = to_csv_string(result)?;
    fs::write(path, text).map_err(|source| IftaError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Full report as pretty JSON
pub fn to_json(report: &FilingReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| IftaError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str) -> AggregateRow {
        AggregateRow {
            state: state.to_string(),
            miles: 2000.0,
            gallons_used: 85.714285714,
            tax_rate: 0.47,
            tax_paid: 40.0,
            tax_owed: 40.285714285,
            net_tax: 0.285714285,
        }
    }

    #[test]
    fn test_csv_precision() {
        let result = CalculationResult {
            rows: vec![row("CA")],
            ..Default::default()
        };
        let csv = to_csv_string(&result).unwrap();

        assert_eq!(
            csv,
            "state,miles,gallons_used,tax_rate,tax_paid,tax_owed,net_tax\n\
             CA,2000.00,85.7143,0.470,40.00,40.29,0.29"
        );
    }

    #[test]
    fn test_csv_ties_round_away_from_zero() {
        let result = CalculationResult {
            rows: vec![AggregateRow {
                state: "CA".to_string(),
                miles: 10.125,
                gallons_used: 1.03125,
                tax_rate: 0.47,
                tax_paid: 0.375,
                tax_owed: 2.625,
                net_tax: -1.125,
            }],
            ..Default::default()
        };

        let csv = to_csv_string(&result).unwrap();
        assert_eq!(csv.lines().nth(1).unwrap(), "CA,10.13,1.0313,0.470,0.38,2.63,-1.13");
    }

    #[test]
    fn test_to_fixed_matches_exact_binary_value() {
        // 1.005 is stored as 1.00499999999999989..., so it rounds down
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(0.625, 2), "0.63");
        assert_eq!(to_fixed(-0.625, 2), "-0.63");
        assert_eq!(to_fixed(10.0, 2), "10.00");
        assert_eq!(to_fixed(0.2, 3), "0.200");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
    }

    #[test]
    fn test_csv_negative_net_tax() {
        let mut refund = row("TX");
        refund.net_tax = -17.142857;
        let result = CalculationResult {
            rows: vec![refund],
            ..Default::default()
        };

        let csv = to_csv_string(&result).unwrap();
        assert!(csv.ends_with(",-17.14"));
    }

    #[test]
    fn test_csv_rows_joined_without_trailing_newline() {
        let result = CalculationResult {
            rows: vec![row("CA"), row("TX")],
            ..Default::default()
        };
        let csv = to_csv_string(&result).unwrap();

        assert_eq!(csv.lines().count(), 3);
        assert!(!csv.ends_with('\n'));
        assert!(csv.lines().nth(2).unwrap().starts_with("TX,"));
    }

    #[test]
    fn test_csv_empty_result_is_header_line() {
        let csv = to_csv_string(&CalculationResult::default()).unwrap();
        assert_eq!(csv, "state,miles,gallons_used,tax_rate,tax_paid,tax_owed,net_tax\n");
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILENAME);
        let result = CalculationResult {
            rows: vec![row("CA")],
            ..Default::default()
        };

        write_csv(&result, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&result).unwrap());
    }

    #[test]
    fn test_write_csv_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_csv(&CalculationResult::default(), &path).unwrap_err();
        assert!(matches!(err, IftaError::Write { .. }));
        assert!(err.to_string().starts_with("Failed to write"));
    }
}
