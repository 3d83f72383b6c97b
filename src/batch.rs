// 📦 Filing Batch - many uploads in, one quarterly report out
//
// Each upload is parsed and standardized as soon as it is added. Records of
// the same kind are concatenated in the order sources were added, then
// handed to the calculator once both sides have data.

use crate::calculator::{calculate, CalculationResult};
use crate::data_quality::{audit_fuel, audit_mileage, IntakeReport};
use crate::error::{IftaError, Result};
use crate::insights::Insights;
use crate::parser::parse;
use crate::quarter::QuarterContext;
use crate::standardizer::{standardize_fuel, standardize_mileage, FuelRecord, MileageRecord, RecordKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// SOURCE SUMMARY
// ============================================================================

/// SourceSummary - Upload status for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// File name or caller-supplied label
    pub label: String,
    pub kind: RecordKind,
    /// SHA-256 of the raw text, hex
    pub fingerprint: String,
    pub intake: IntakeReport,
}

impl SourceSummary {
    pub fn raw_rows(&self) -> usize {
        self.intake.total_rows
    }

    pub fn accepted(&self) -> usize {
        self.intake.accepted
    }

    pub fn is_complete(&self) -> bool {
        self.intake.accepted > 0
    }
}

fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| IftaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn label_for(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
        .to_string()
}

// ============================================================================
// FILING REPORT
// ============================================================================

/// FilingReport - Everything produced by one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub quarter: QuarterContext,
    pub result: CalculationResult,
    pub insights: Insights,
    pub sources: Vec<SourceSummary>,
}

// ============================================================================
// FILING BATCH
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FilingBatch {
    fuel_records: Vec<FuelRecord>,
    mileage_records: Vec<MileageRecord>,
    sources: Vec<SourceSummary>,
}

impl FilingBatch {
    pub fn new() -> Self {
        FilingBatch::default()
    }

    /// Add fuel CSV text already in memory
    pub fn add_fuel_text(&mut self, label: &str, text: &str) -> &SourceSummary {
        let raw = parse(text);
        let records = standardize_fuel(&raw);
        let intake = audit_fuel(&raw);
        self.fuel_records.extend(records);
        self.push_source(label, RecordKind::Fuel, text, intake)
    }

    /// Add mileage CSV text already in memory
    pub fn add_mileage_text(&mut self, label: &str, text: &str) -> &SourceSummary {
        let raw = parse(text);
        let records = standardize_mileage(&raw);
        let intake = audit_mileage(&raw);
        self.mileage_records.extend(records);
        self.push_source(label, RecordKind::Mileage, text, intake)
    }

    pub fn add_fuel_file(&mut self, path: &Path) -> Result<&SourceSummary> {
        let text = read_source(path)?;
        Ok(self.add_fuel_text(&label_for(path), &text))
    }

    pub fn add_mileage_file(&mut self, path: &Path) -> Result<&SourceSummary> {
        let text = read_source(path)?;
        Ok(self.add_mileage_text(&label_for(path), &text))
    }

    fn push_source(&mut self, label: &str, kind: RecordKind, text: &str, intake: IntakeReport) -> &SourceSummary {
        info!(
            source = label,
            kind = kind.code(),
            rows = intake.total_rows,
            accepted = intake.accepted,
            "added source"
        );
        for outcome in intake.dropped_rows() {
            warn!(source = label, row = outcome.row, "dropped row: {}", outcome.message);
        }

        self.sources.push(SourceSummary {
            label: label.to_string(),
            kind,
            fingerprint: fingerprint(text),
            intake,
        });
        &self.sources[self.sources.len() - 1]
    }

    pub fn fuel_records(&self) -> &[FuelRecord] {
        &self.fuel_records
    }

    pub fn mileage_records(&self) -> &[MileageRecord] {
        &self.mileage_records
    }

    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    fn has_sources(&self, kind: RecordKind) -> bool {
        self.sources.iter().any(|s| s.kind == kind)
    }

    /// Check the batch is ready to calculate
    ///
    /// Both kinds must have at least one source, and each kind must have
    /// produced at least one standardized record.
    pub fn validate(&self) -> Result<()> {
        for kind in [RecordKind::Fuel, RecordKind::Mileage] {
            if !self.has_sources(kind) {
                return Err(IftaError::NoSources { kind });
            }
        }
        if self.fuel_records.is_empty() {
            return Err(IftaError::NoFuelData);
        }
        if self.mileage_records.is_empty() {
            return Err(IftaError::NoMileageData);
        }
        Ok(())
    }

    /// Validate, calculate, and wrap the result for the current quarter
    pub fn calculate(&self) -> Result<FilingReport> {
        self.calculate_for(QuarterContext::current())
    }

    pub fn calculate_for(&self, quarter: QuarterContext) -> Result<FilingReport> {
        self.validate()?;

        let result = calculate(&self.fuel_records, &self.mileage_records);
        let insights = Insights::from_result(&result);
        debug!(summary = %result.summary(), "batch calculated");

        Ok(FilingReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            quarter,
            result,
            insights,
            sources: self.sources.clone(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FUEL: &str = "state,gallons,tax_paid\nCA,100,40\nTX,50,10";
    const MILEAGE: &str = "state,miles\nCA,2000\nTX,1500";

    fn q3() -> QuarterContext {
        QuarterContext::for_date(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap())
    }

    #[test]
    fn test_sources_concatenate_in_order() {
        let mut batch = FilingBatch::new();
        batch.add_fuel_text("a.csv", "state,gallons\nCA,10");
        batch.add_fuel_text("b.csv", "jurisdiction,qty\nTX,20\nNV,0");

        let states: Vec<&str> = batch.fuel_records().iter().map(|r| r.state.as_str()).collect();
        assert_eq!(states, vec!["CA", "TX"]);
        assert_eq!(batch.sources().len(), 2);
        assert_eq!(batch.sources()[1].raw_rows(), 2);
        assert_eq!(batch.sources()[1].accepted(), 1);
    }

    #[test]
    fn test_source_summary_fingerprint() {
        let mut batch = FilingBatch::new();
        let summary = batch.add_mileage_text("eld.csv", MILEAGE).clone();

        assert_eq!(summary.kind, RecordKind::Mileage);
        assert_eq!(summary.fingerprint.len(), 64);
        assert_eq!(summary.fingerprint, fingerprint(MILEAGE));
        assert!(summary.is_complete());
    }

    #[test]
    fn test_validate_requires_both_kinds() {
        let mut batch = FilingBatch::new();
        assert!(matches!(
            batch.validate(),
            Err(IftaError::NoSources {
                kind: RecordKind::Fuel
            })
        ));

        batch.add_fuel_text("fuel.csv", FUEL);
        assert!(matches!(
            batch.validate(),
            Err(IftaError::NoSources {
                kind: RecordKind::Mileage
            })
        ));
    }

    #[test]
    fn test_validate_empty_fuel_data() {
        let mut batch = FilingBatch::new();
        batch.add_fuel_text("fuel.csv", "state,tax_paid\nCA,4");
        batch.add_mileage_text("eld.csv", MILEAGE);

        let err = batch.calculate_for(q3()).unwrap_err();
        assert!(matches!(err, IftaError::NoFuelData));
    }

    #[test]
    fn test_validate_empty_mileage_data() {
        let mut batch = FilingBatch::new();
        batch.add_fuel_text("fuel.csv", FUEL);
        batch.add_mileage_text("eld.csv", "state,miles\nCA,0");

        assert!(matches!(batch.validate(), Err(IftaError::NoMileageData)));
    }

    #[test]
    fn test_calculate_report() {
        let mut batch = FilingBatch::new();
        batch.add_fuel_text("fuel.csv", FUEL);
        batch.add_mileage_text("eld.csv", MILEAGE);

        let report = batch.calculate_for(q3()).unwrap();

        assert_eq!(report.result.total_gallons, 150.0);
        assert_eq!(report.result.total_miles, 3500.0);
        assert_eq!(report.result.rows.len(), 2);
        assert_eq!(report.quarter.quarter, 3);
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.insights.rate_hotspot.as_ref().unwrap().state, "CA");
    }

    #[test]
    fn test_run_ids_differ_but_results_match() {
        let mut batch = FilingBatch::new();
        batch.add_fuel_text("fuel.csv", FUEL);
        batch.add_mileage_text("eld.csv", MILEAGE);

        let first = batch.calculate_for(q3()).unwrap();
        let second = batch.calculate_for(q3()).unwrap();
        assert_ne!(first.run_id, second.run_id);
        assert_eq!(first.result, second.result);
    }

    #[test]
    fn test_add_file_reads_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fuel_q3.csv");
        std::fs::write(&path, FUEL).unwrap();

        let mut batch = FilingBatch::new();
        let summary = batch.add_fuel_file(&path).unwrap();
        assert_eq!(summary.label, "fuel_q3.csv");
        assert_eq!(summary.accepted(), 2);
    }

    #[test]
    fn test_add_missing_file_is_io_error() {
        let mut batch = FilingBatch::new();
        let err = batch.add_mileage_file(Path::new("/nonexistent/eld.csv")).unwrap_err();

        assert!(matches!(err, IftaError::Io { .. }));
        assert!(batch.sources().is_empty());
    }
}
