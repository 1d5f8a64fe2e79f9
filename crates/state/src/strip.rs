//! Horizontal geometry of the date strip.
//!
//! Cells are laid out left to right with a fixed pitch, an extra gap
//! between months, and half a viewport of padding on each side so any
//! day can be centered.

use chrono::NaiveDate;

use crate::calendar::DateStrip;
use crate::scroll::StripGeometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripMetrics {
    pub cell_pitch: f32,
    pub month_gap: f32,
}

impl Default for StripMetrics {
    fn default() -> Self {
        Self {
            cell_pitch: 44.0,
            month_gap: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    metrics: StripMetrics,
    viewport_width: f32,
    first_date: Option<NaiveDate>,
    centers: Vec<f32>,
    month_starts: Vec<f32>,
    content_width: f32,
}

impl StripLayout {
    pub fn new(strip: &DateStrip, metrics: StripMetrics, viewport_width: f32) -> Self {
        let padding = viewport_width * 0.5;
        let mut centers = Vec::with_capacity(strip.len());
        let mut month_starts = Vec::with_capacity(strip.months().len());
        let mut x = padding;
        for (i, month) in strip.months().iter().enumerate() {
            if i > 0 {
                x += metrics.month_gap;
            }
            month_starts.push(x);
            for _ in month.cells.clone() {
                centers.push(x + metrics.cell_pitch * 0.5);
                x += metrics.cell_pitch;
            }
        }
        Self {
            metrics,
            viewport_width,
            first_date: strip.cells().first().map(|cell| cell.date),
            centers,
            month_starts,
            content_width: x + padding,
        }
    }

    pub fn metrics(&self) -> StripMetrics {
        self.metrics
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn cell_center_at(&self, index: usize) -> Option<f32> {
        self.centers.get(index).copied()
    }

    pub fn month_start(&self, month: usize) -> Option<f32> {
        self.month_starts.get(month).copied()
    }

    /// Cell under a content-space x, if any. Month gaps and padding hit nothing.
    pub fn cell_at(&self, content_x: f32) -> Option<usize> {
        let half = self.metrics.cell_pitch * 0.5;
        let index = self.centers.partition_point(|&center| center + half <= content_x);
        self.centers
            .get(index)
            .filter(|&&center| (content_x - center).abs() <= half)
            .map(|_| index)
    }

    /// Cell indices whose pitch box overlaps `offset..offset + viewport`.
    pub fn visible_cells(&self, offset: f32) -> std::ops::Range<usize> {
        let half = self.metrics.cell_pitch * 0.5;
        let left = offset;
        let right = offset + self.viewport_width;
        let start = self.centers.partition_point(|&c| c + half < left);
        let end = self.centers.partition_point(|&c| c - half < right);
        start..end.max(start)
    }
}

impl StripGeometry for StripLayout {
    fn cell_center(&self, date: NaiveDate) -> Option<f32> {
        let first = self.first_date?;
        let index = usize::try_from((date - first).num_days()).ok()?;
        self.cell_center_at(index)
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn max_offset(&self) -> f32 {
        (self.content_width - self.viewport_width).max(0.0)
    }
}

/// Closeness of a cell to the viewport center: 1 at the center, 0 at or
/// beyond `reach`.
pub fn proximity(distance: f32, reach: f32) -> f32 {
    if reach <= 0.0 {
        return 0.0;
    }
    (1.0 - distance.abs() / reach).clamp(0.0, 1.0)
}

/// Scale and opacity for a cell at the given proximity.
pub fn proximity_style(proximity: f32) -> (f32, f32) {
    let p = proximity.clamp(0.0, 1.0);
    (1.0 + 0.3 * p, 0.5 + 0.5 * p)
}
