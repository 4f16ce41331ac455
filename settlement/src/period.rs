//! Settlement periods
//!
//! Closed date intervals with the two input formats the callers use:
//! dashboard requests send ISO `YYYY-MM-DD`, chat commands send
//! `DD/MM/YYYY`. Both bounds are inclusive on the expense date.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed date interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day covered
    pub start: NaiveDate,

    /// Last day covered
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDate(format!(
                "start {} after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar month, first day through last day
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidDate(format!("invalid month {}-{}", year, month)))?;
        let first_of_next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| Error::InvalidDate(format!("invalid month {}-{}", year, month)))?;
        let end = first_of_next.pred_opt().ok_or_else(|| {
            Error::InvalidDate(format!("invalid month {}-{}", year, month))
        })?;
        Ok(Self { start, end })
    }

    /// Whether the date falls inside the range (inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Human-readable period label, stored on the settlement row
    pub fn reference(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Parse a calendar date in either `DD/MM/YYYY` or ISO `YYYY-MM-DD` form
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if input.contains('/') {
        return NaiveDate::parse_from_str(input, "%d/%m/%Y")
            .map_err(|_| Error::InvalidDate(format!("unparseable date: {}", input)));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(format!("unparseable date: {}", input)))
}
