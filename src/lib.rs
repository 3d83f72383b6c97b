// IFTA Calculator - Core Library
// Exposes all modules for use in the CLI, the API server, and tests
//
// Pipeline: raw CSV text → parser → standardizer (+ jurisdiction)
//           → calculator (+ tax_rates) → export / insights

pub mod parser;
pub mod standardizer;
pub mod data_quality;
pub mod jurisdiction;
pub mod tax_rates;
pub mod calculator;
pub mod insights;
pub mod quarter;
pub mod export;
pub mod batch;
pub mod error;

// Re-export commonly used types
pub use parser::{parse, RawRecord};
pub use standardizer::{
    standardize_fuel, standardize_mileage, to_number,
    CanonicalField, FuelRecord, MileageRecord, RecordKind, RowRejection,
};
pub use data_quality::{
    audit_fuel, audit_mileage, IntakeReport, RowOutcome, Severity,
};
pub use jurisdiction::normalize_state;
pub use tax_rates::{all_rates, rate_for, TaxRate};
pub use calculator::{calculate, AggregateRow, CalculationResult};
pub use insights::{Headline, Insights};
pub use quarter::QuarterContext;
pub use export::{to_csv_string, to_json, write_csv, DEFAULT_EXPORT_FILENAME};
pub use batch::{FilingBatch, FilingReport, SourceSummary};
pub use error::IftaError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
