// 📅 Filing Quarter - which quarter a run belongs to and when it is due
//
// IFTA returns are due the last day of the month after quarter end:
// Q1 → Apr 30, Q2 → Jul 31, Q3 → Oct 31, Q4 → Jan 31 of the next year.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterContext {
    pub quarter: u32,
    pub year: i32,
    pub due_date: NaiveDate,
}

impl QuarterContext {
    pub fn for_date(date: NaiveDate) -> Self {
        let quarter = date.month0() / 3 + 1;
        let year = date.year();

        let (due_year, due_month, due_day) = match quarter {
            1 => (year, 4, 30),
            2 => (year, 7, 31),
            3 => (year, 10, 31),
            _ => (year + 1, 1, 31),
        };

        // Every (month, day) pair above exists in every year
        let due_date = NaiveDate::from_ymd_opt(due_year, due_month, due_day).unwrap_or(date);

        QuarterContext {
            quarter,
            year,
            due_date,
        }
    }

    /// Quarter for today's local date
    pub fn current() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    /// e.g. "Quarter 3 • 2025"
    pub fn chip(&self) -> String {
        format!("Quarter {} • {}", self.quarter, self.year)
    }

    /// e.g. "Due October 31, 2025"
    pub fn context(&self) -> String {
        format!("Due {}", self.due_date.format("%B %-d, %Y"))
    }
}
