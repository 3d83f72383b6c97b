// 🏗️ CSV Parser - header-driven tokenizer
// Turns raw export text into RawRecords. Knows nothing about fuel or miles.
//
// Permissive by contract: malformed input never errors, it degrades to
// partial records or gets filtered out as an empty row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BYTE_ORDER_MARK: char = '\u{feff}';

// ============================================================================
// CORE TYPES
// ============================================================================

/// RawRecord - One data row keyed by lower-cased header name
///
/// Lookups are case-insensitive: the key is lower-cased before matching,
/// so `get("State")` and `get("state")` hit the same cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        RawRecord::default()
    }

    /// Builder pattern: add a cell (key is lower-cased)
    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a cell, overwriting any earlier cell with the same header
    pub fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_lowercase(), value.to_string());
    }

    /// Cell value for a column, if the column exists
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(&key.to_lowercase())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse raw CSV text into records
///
/// The first non-empty row is the header. Every later row is zipped against
/// it by position; short rows get "" for the missing trailing columns and
/// extra cells beyond the header are ignored.
///
/// # Examples:
/// ```
/// use ifta_calc::parse;
///
/// let records = parse("State,Gallons\nCA,100\n");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].get("state"), Some("CA"));
/// ```
pub fn parse(raw_text: &str) -> Vec<RawRecord> {
    if raw_text.is_empty() {
        return Vec::new();
    }

    let text = raw_text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw_text);
    let rows = tokenize(&normalize_line_endings(text));

    let mut rows = rows.into_iter();
    let header: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|cell| cell.to_lowercase()).collect(),
        None => return Vec::new(),
    };

    rows.filter(|row| !row.is_empty())
        .map(|row| {
            let mut record = RawRecord::new();
            for (index, key) in header.iter().enumerate() {
                let value = row.get(index).map(String::as_str).unwrap_or("");
                record.insert(key, value);
            }
            record
        })
        .collect()
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Fold `\r\n` and bare `\r` into `\n`
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split text into rows of trimmed fields, dropping rows that are all empty
fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                current_row.push(current_field.trim().to_string());
                current_field.clear();
            }
            '\n' if !in_quotes => {
                current_row.push(current_field.trim().to_string());
                rows.push(std::mem::take(&mut current_row));
                current_field.clear();
            }
            _ => current_field.push(ch),
        }
    }

    // Last row without a trailing newline
    if !current_field.is_empty() || !current_row.is_empty() {
        current_row.push(current_field.trim().to_string());
        rows.push(current_row);
    }

    rows.into_iter()
        .filter(|row| row.iter().any(|value| !value.is_empty()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
