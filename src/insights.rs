// 💡 Insights - headline figures drawn from a finished calculation

use crate::calculator::{AggregateRow, CalculationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Jurisdiction with the largest positive net tax
    pub largest_liability: Option<AggregateRow>,
    /// Jurisdiction with the most negative net tax
    pub strongest_refund: Option<AggregateRow>,
    /// Jurisdiction with the highest rate
    pub rate_hotspot: Option<AggregateRow>,
    /// Tax owed per gallon purchased, fleet-wide
    pub effective_rate: f64,
    pub avg_miles_per_state: f64,
}

impl Insights {
    pub fn from_result(result: &CalculationResult) -> Self {
        let rows = &result.rows;
        if rows.is_empty() {
            return Insights::default();
        }

        let largest_liability = first_max_by(rows, |row| row.net_tax).filter(|row| row.net_tax > 0.0);
        let strongest_refund = first_max_by(rows, |row| -row.net_tax).filter(|row| row.net_tax < 0.0);
        let rate_hotspot = first_max_by(rows, |row| row.tax_rate);

        let effective_rate = if result.total_gallons > 0.0 {
            result.total_tax_owed / result.total_gallons
        } else {
            0.0
        };

        Insights {
            largest_liability: largest_liability.cloned(),
            strongest_refund: strongest_refund.cloned(),
            rate_hotspot: rate_hotspot.cloned(),
            effective_rate,
            avg_miles_per_state: result.total_miles / rows.len() as f64,
        }
    }

    /// Display lines for the three headline cards
    pub fn headlines(&self) -> Vec<Headline> {
        let (liability, liability_meta) = match &self.largest_liability {
            Some(row) => (
                format!("{} • {}", row.state, format_money(row.net_tax)),
                "Jurisdiction owes remittance",
            ),
            None => ("All clear".to_string(), "No jurisdictions owe remittance"),
        };
        let (refund, refund_meta) = match &self.strongest_refund {
            Some(row) => (format!("{} • ${:.2}", row.state, row.net_tax.abs()), "Refund expected"),
            None => ("Pending".to_string(), "No refunds detected this run"),
        };
        let exposure = if self.effective_rate > 0.0 {
            format!("{:.3} $/gal", self.effective_rate)
        } else {
            "—".to_string()
        };
        let hotspot = match &self.rate_hotspot {
            Some(row) => format!("{} @ ${:.3}/gal", row.state, row.tax_rate),
            None => "No rate hotspots detected".to_string(),
        };
        let exposure_meta = format!(
            "{} • {} avg miles per state",
            hotspot,
            group_thousands(self.avg_miles_per_state)
        );

        vec![
            Headline::new("Largest Liability", liability, liability_meta),
            Headline::new("Strongest Refund", refund, refund_meta),
            Headline::new("Blended Exposure", exposure, exposure_meta),
        ]
    }
}

/// One insight card: title, headline figure, and a supporting line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub value: String,
    pub meta: String,
}

impl Headline {
    fn new(title: &str, value: String, meta: impl Into<String>) -> Self {
        Headline {
            title: title.to_string(),
            value,
            meta: meta.into(),
        }
    }
}

/// "Net Tax Owed" for a zero or positive balance, "Net Tax Refund" otherwise
pub fn net_tax_label(net_tax: f64) -> &'static str {
    if net_tax >= 0.0 {
        "Net Tax Owed"
    } else {
        "Net Tax Refund"
    }
}

/// Fleet MPG at 2 decimals; "N/A" when no fuel was bought
pub fn mpg_display(mpg: f64) -> String {
    if mpg == 0.0 {
        "N/A".to_string()
    } else {
        format!("{:.2}", mpg)
    }
}

/// Whole number with comma grouping, e.g. `1,750`
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0.0 && digits.chars().any(|c| c != '0') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Signed dollar amount, e.g. `-$12.50`
pub fn format_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${:.2}", sign, value.abs())
}

/// Row with the greatest key; the earliest row wins ties
fn first_max_by(rows: &[AggregateRow], key: impl Fn(&AggregateRow) -> f64) -> Option<&AggregateRow> {
    rows.iter().fold(None, |best: Option<&AggregateRow>, row| match best {
        Some(current) if key(row) <= key(current) => Some(current),
        _ => Some(row),
    })
}
