//! Date → media item resolution.
//!
//! Lookups never fail. A date outside the valid range is first pulled to
//! the nearest boundary. An exact match wins; otherwise the latest item
//! dated on or before the target is chosen. Items after the target are
//! never substituted. With nothing at or before the target the first
//! item is used.

use chrono::NaiveDate;

use crate::calendar::ValidRange;
use crate::catalog::Catalog;

#[derive(Debug, Clone)]
pub struct TemporalIndex {
    dates: Vec<NaiveDate>,
    range: ValidRange,
}

impl TemporalIndex {
    pub fn new(catalog: &Catalog, range: ValidRange) -> Self {
        Self {
            dates: catalog.items().iter().map(|item| item.date).collect(),
            range,
        }
    }

    pub fn range(&self) -> &ValidRange {
        &self.range
    }

    pub fn resolve(&self, date: NaiveDate) -> usize {
        let target = self.range.clamp(date);

        if let Some(exact) = self.dates.iter().position(|d| *d == target) {
            return exact;
        }

        let mut best: Option<(usize, NaiveDate)> = None;
        for (index, &item_date) in self.dates.iter().enumerate() {
            if item_date > target {
                continue;
            }
            // Strictly later only, so the earliest index wins among equal dates.
            if best.map_or(true, |(_, best_date)| item_date > best_date) {
                best = Some((index, item_date));
            }
        }

        best.map(|(index, _)| index).unwrap_or(0)
    }
}
