use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive span of days that accept interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl ValidRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Nearest day inside the range.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCell {
    pub date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub label: String,
}

impl DateCell {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            day: date.day(),
            month: date.month(),
            year: date.year(),
            label: month_label(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGroup {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub cells: Range<usize>,
}

/// Every day of every month between two boundary months, with no gaps.
#[derive(Debug, Clone)]
pub struct DateStrip {
    cells: Vec<DateCell>,
    months: Vec<MonthGroup>,
}

impl DateStrip {
    pub fn for_months(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        if first > last {
            return Err(Error::InvertedRange {
                start: first,
                end: last,
            });
        }

        let mut cells = Vec::new();
        let mut months = Vec::new();
        let (mut year, mut month) = (first.year(), first.month());

        while (year, month) <= (last.year(), last.month()) {
            let begin = cells.len();
            for day in 1..=days_in_month(year, month) {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    cells.push(DateCell::new(date));
                }
            }
            if let Some(first_cell) = cells.get(begin) {
                months.push(MonthGroup {
                    label: first_cell.label.clone(),
                    year,
                    month,
                    cells: begin..cells.len(),
                });
            }
            (year, month) = next_month(year, month);
        }

        Ok(Self { cells, months })
    }

    pub fn cells(&self) -> &[DateCell] {
        &self.cells
    }

    pub fn months(&self) -> &[MonthGroup] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.cells.first()?.date;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.cells
            .get(offset)
            .filter(|cell| cell.date == date)
            .map(|_| offset)
    }

    pub fn month_of(&self, cell_index: usize) -> Option<usize> {
        self.months
            .iter()
            .position(|m| m.cells.contains(&cell_index))
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// "Mar 1, 2024"
pub fn short_label(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%b"), date.day(), date.year())
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
