// ✅ Intake Audit - why each uploaded row was kept or dropped
//
// The standardizer drops bad rows silently. This module replays the same
// admission rules row by row so a caller can show what happened to each
// upload. It never changes which rows are admitted.

use crate::parser::RawRecord;
use crate::standardizer::{fuel_from_raw, mileage_from_raw, RecordKind, RowRejection};
use serde::{Deserialize, Serialize};

// ============================================================================
// ROW OUTCOME
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning, // Row was dropped from the totals
    Info,    // Row was accepted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowOutcome {
    /// 1-based index among the data rows (header excluded)
    pub row: usize,
    pub accepted: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RowRejection>,
    pub message: String,
}

impl RowOutcome {
    fn accept(row: usize) -> Self {
        RowOutcome {
            row,
            accepted: true,
            severity: Severity::Info,
            rejection: None,
            message: "accepted".to_string(),
        }
    }

    fn reject(row: usize, rejection: RowRejection) -> Self {
        RowOutcome {
            row,
            accepted: false,
            severity: Severity::Warning,
            message: rejection.describe(),
            rejection: Some(rejection),
        }
    }
}

// ============================================================================
// INTAKE REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeReport {
    pub kind: RecordKind,
    pub total_rows: usize,
    pub accepted: usize,
    pub dropped: usize,
    pub outcomes: Vec<RowOutcome>,
}

impl IntakeReport {
    fn from_outcomes(kind: RecordKind, outcomes: Vec<RowOutcome>) -> Self {
        let accepted = outcomes.iter().filter(|o| o.accepted).count();
        IntakeReport {
            kind,
            total_rows: outcomes.len(),
            accepted,
            dropped: outcomes.len() - accepted,
            outcomes,
        }
    }

    /// Share of rows accepted, 0.0 when there were no rows
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.total_rows as f64
    }

    /// Outcomes for dropped rows only
    pub fn dropped_rows(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes.iter().filter(|o| !o.accepted)
    }

    /// True when no row carried a required column (wrong file picked, etc.)
    pub fn missing_required_columns(&self) -> bool {
        self.total_rows > 0
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o.rejection, Some(RowRejection::MissingColumn { .. })))
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} of {} rows accepted ({:.1}%), {} dropped",
            self.kind.name(),
            self.accepted,
            self.total_rows,
            self.acceptance_rate() * 100.0,
            self.dropped
        )
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Audit raw fuel rows against the fuel admission rules
pub fn audit_fuel(records: &[RawRecord]) -> IntakeReport {
    let outcomes = records
        .iter()
        .enumerate()
        .map(|(index, record)| match fuel_from_raw(record) {
            Ok(_) => RowOutcome::accept(index + 1),
            Err(rejection) => RowOutcome::reject(index + 1, rejection),
        })
        .collect();
    IntakeReport::from_outcomes(RecordKind::Fuel, outcomes)
}

/// Audit raw mileage rows against the mileage admission rules
pub fn audit_mileage(records: &[RawRecord]) -> IntakeReport {
    let outcomes = records
        .iter()
        .enumerate()
        .map(|(index, record)| match mileage_from_raw(record) {
            Ok(_) => RowOutcome::accept(index + 1),
            Err(rejection) => RowOutcome::reject(index + 1, rejection),
        })
        .collect();
    IntakeReport::from_outcomes(RecordKind::Mileage, outcomes)
}

// ============================================================================
// TESTS
// ============================================================================
