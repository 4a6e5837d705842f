// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date calculators: add/subtract, difference, business days and a
// multi-row difference table. Calendar dates only; no time of day.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolverse_core::error::ToolverseError;

/// Most rows the multi-difference table holds.
pub const MAX_ROWS: usize = 8;

/// Row colors, assigned in turn as rows are added.
pub const ROW_COLORS: [&str; MAX_ROWS] = [
    "#ef4444", "#f97316", "#eab308", "#84cc16", "#22c55e", "#14b8a6", "#06b6d4", "#3b82f6",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("resulting date is out of range")]
    OutOfRange,

    #[error("at most {MAX_ROWS} rows are allowed")]
    TooManyRows,

    #[error("no row with id {0}")]
    NoRow(u32),

    #[error("the last row cannot be removed")]
    LastRow,
}

impl From<DateError> for ToolverseError {
    fn from(err: DateError) -> Self {
        ToolverseError::InvalidInput(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    Days,
    Weeks,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOperation {
    Add,
    Subtract,
}

/// Move `date` by `amount` units. Month and year steps that land past the
/// end of a month clamp to its last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_subtract(
    date: NaiveDate,
    amount: i64,
    unit: DateUnit,
    op: DateOperation,
) -> Result<NaiveDate, DateError> {
    let signed = match op {
        DateOperation::Add => amount,
        DateOperation::Subtract => amount.checked_neg().ok_or(DateError::OutOfRange)?,
    };

    match unit {
        DateUnit::Days => shift_days(date, signed),
        DateUnit::Weeks => shift_days(date, signed.checked_mul(7).ok_or(DateError::OutOfRange)?),
        DateUnit::Months => shift_months(date, signed),
        DateUnit::Years => shift_months(date, signed.checked_mul(12).ok_or(DateError::OutOfRange)?),
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, DateError> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
    .ok_or(DateError::OutOfRange)
}

fn shift_months(date: NaiveDate, months: i64) -> Result<NaiveDate, DateError> {
    let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_| DateError::OutOfRange)?;
    if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    }
    .ok_or(DateError::OutOfRange)
}

/// Distance between two dates in complete units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateDifference {
    pub days: i64,
    pub weeks: i64,
    pub months: i64,
    pub years: i64,
}

/// Difference between `a` and `b`, whichever comes first. A month counts
/// once adding it to the earlier date no longer passes the later one.
pub fn difference(a: NaiveDate, b: NaiveDate) -> DateDifference {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    let days = (end - start).num_days();

    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    while months > 0 && shift_months(start, months).map_or(true, |shifted| shifted > end) {
        months -= 1;
    }

    DateDifference {
        days,
        weeks: days / 7,
        months,
        years: months / 12,
    }
}

/// Move `date` by `n` working days, skipping Saturdays and Sundays.
/// Negative `n` goes backwards; zero returns `date` unchanged.
pub fn add_business_days(date: NaiveDate, n: i64) -> Result<NaiveDate, DateError> {
    let step = if n >= 0 { 1 } else { -1 };
    let mut remaining = n.unsigned_abs();
    let mut current = date;

    // Land on a working day first; from there every 5 working days is
    // exactly one calendar week, so large counts skip ahead in weeks.
    if remaining > 0 {
        current = next_working_day(current, step)?;
        remaining -= 1;
    }

    let weeks = remaining / 5;
    if weeks > 0 {
        let span = weeks
            .checked_mul(7)
            .and_then(|days| i64::try_from(days).ok())
            .ok_or(DateError::OutOfRange)?;
        current = shift_days(current, step * span)?;
        remaining -= weeks * 5;
    }

    while remaining > 0 {
        current = next_working_day(current, step)?;
        remaining -= 1;
    }
    Ok(current)
}

/// The first Monday-to-Friday date strictly after (`step` 1) or before
/// (`step` -1) `date`.
fn next_working_day(date: NaiveDate, step: i64) -> Result<NaiveDate, DateError> {
    let mut current = shift_days(date, step)?;
    while is_weekend(current) {
        current = shift_days(current, step)?;
    }
    Ok(current)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// One start/end pair in the multi-difference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRow {
    pub id: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub color: &'static str,
}

/// Result for a row with both dates set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowResult {
    pub id: u32,
    pub color: &'static str,
    pub days: i64,
    /// The earlier date.
    pub from: NaiveDate,
    /// The later date.
    pub to: NaiveDate,
}

/// Up to [`MAX_ROWS`] independent date pairs, each with its own color.
#[derive(Debug, Clone)]
pub struct MultiDifference {
    rows: Vec<DateRow>,
    next_id: u32,
}

impl MultiDifference {
    /// A table with one row, optionally pre-filled with a start date.
    pub fn new(start: Option<NaiveDate>) -> Self {
        Self {
            rows: vec![DateRow {
                id: 0,
                start,
                end: None,
                color: ROW_COLORS[0],
            }],
            next_id: 1,
        }
    }

    pub fn rows(&self) -> &[DateRow] {
        &self.rows
    }

    /// Append an empty row; returns its id.
    pub fn add_row(&mut self) -> Result<u32, DateError> {
        if self.rows.len() >= MAX_ROWS {
            return Err(DateError::TooManyRows);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.rows.push(DateRow {
            id,
            start: None,
            end: None,
            color: ROW_COLORS[self.rows.len() % ROW_COLORS.len()],
        });
        Ok(id)
    }

    /// Remove a row. The table always keeps at least one.
    pub fn remove_row(&mut self, id: u32) -> Result<(), DateError> {
        if self.rows.len() <= 1 {
            return Err(DateError::LastRow);
        }
        let index = self.index_of(id)?;
        self.rows.remove(index);
        Ok(())
    }

    pub fn set_start(&mut self, id: u32, date: Option<NaiveDate>) -> Result<(), DateError> {
        let index = self.index_of(id)?;
        self.rows[index].start = date;
        Ok(())
    }

    pub fn set_end(&mut self, id: u32, date: Option<NaiveDate>) -> Result<(), DateError> {
        let index = self.index_of(id)?;
        self.rows[index].end = date;
        Ok(())
    }

    /// Day counts for every complete row, in row order. Rows missing a date
    /// are left out.
    pub fn results(&self) -> Vec<RowResult> {
        self.rows
            .iter()
            .filter_map(|row| {
                let (start, end) = (row.start?, row.end?);
                let (from, to) = if start <= end { (start, end) } else { (end, start) };
                Some(RowResult {
                    id: row.id,
                    color: row.color,
                    days: (to - from).num_days(),
                    from,
                    to,
                })
            })
            .collect()
    }

    fn index_of(&self, id: u32) -> Result<usize, DateError> {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(DateError::NoRow(id))
    }
}
