//! Scrolling the date strip to a target day.
//!
//! `ScrollConvergence` issues a smooth scroll toward a day, watches the
//! offset until it stops moving, then corrects any residual misalignment
//! once. A quiet timer and an absolute fallback guarantee the "scrolling
//! to" indicator always clears. `SmoothScroll` is the animator that plays
//! the requested scrolls.

use chrono::NaiveDate;

use crate::config::ScrollSettings;
use crate::easing::ease_out_quad;
use crate::timer::Deadline;

/// Measurements of the laid-out strip, in content coordinates.
pub trait StripGeometry {
    /// Horizontal center of the day's cell, if the cell exists.
    fn cell_center(&self, date: NaiveDate) -> Option<f32>;
    fn viewport_width(&self) -> f32;
    fn max_offset(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f32,
    pub smooth: bool,
}

/// Offset that puts the day's cell in the middle of the viewport.
pub fn centering_offset(geometry: &impl StripGeometry, date: NaiveDate) -> Option<f32> {
    let center = geometry.cell_center(date)?;
    let offset = center - geometry.viewport_width() * 0.5;
    Some(offset.clamp(0.0, geometry.max_offset().max(0.0)))
}

#[derive(Debug, Clone)]
pub struct ScrollConvergence {
    settings: ScrollSettings,
    target: Option<NaiveDate>,
    last_offset: f32,
    still_samples: u32,
    quiet: Deadline,
    fallback: Deadline,
}

impl ScrollConvergence {
    pub fn new(settings: &ScrollSettings) -> Self {
        Self {
            settings: settings.clone(),
            target: None,
            last_offset: 0.0,
            still_samples: 0,
            quiet: Deadline::default(),
            fallback: Deadline::default(),
        }
    }

    /// The day being scrolled to, while a convergence is in flight.
    pub fn scrolling_to(&self) -> Option<NaiveDate> {
        self.target
    }

    /// Supersedes any in-flight convergence. Returns the scroll to play, or
    /// `None` when the cell is missing; the indicator still shows until the
    /// fallback clears it.
    pub fn begin(
        &mut self,
        date: NaiveDate,
        current_offset: f32,
        geometry: &impl StripGeometry,
        now_ms: f64,
    ) -> Option<ScrollRequest> {
        self.target = Some(date);
        self.last_offset = current_offset;
        self.still_samples = 0;
        self.quiet.cancel();
        self.fallback.arm(now_ms, self.settings.fallback_ms);

        let request = centering_offset(geometry, date).map(|offset| ScrollRequest {
            offset,
            smooth: true,
        });
        if request.is_none() {
            log::warn!("no strip cell for {date}, waiting for fallback");
        }
        request
    }

    /// Feeds one offset sample. Returns a corrective scroll when the strip
    /// settled off target by more than the threshold.
    pub fn on_scroll(
        &mut self,
        offset: f32,
        geometry: &impl StripGeometry,
        now_ms: f64,
    ) -> Option<ScrollRequest> {
        let target = self.target?;

        if (offset - self.last_offset).abs() < self.settings.settle_epsilon {
            self.still_samples += 1;
        } else {
            self.still_samples = 0;
        }
        self.last_offset = offset;
        self.quiet.arm(now_ms, self.settings.quiet_ms);

        if self.still_samples < self.settings.settle_samples {
            return None;
        }

        self.finish();
        let center = geometry.cell_center(target)?;
        let misalignment = center - (offset + geometry.viewport_width() * 0.5);
        if misalignment.abs() <= self.settings.correction_threshold {
            return None;
        }
        let corrected = (offset + misalignment).clamp(0.0, geometry.max_offset().max(0.0));
        if (corrected - offset).abs() <= self.settings.correction_threshold {
            return None;
        }
        log::debug!("correcting strip by {misalignment:.1}px for {target}");
        Some(ScrollRequest {
            offset: corrected,
            smooth: true,
        })
    }

    /// Clears the indicator when the quiet timer or the fallback expires.
    pub fn tick(&mut self, now_ms: f64) {
        if self.target.is_none() {
            return;
        }
        let quiet = self.quiet.fire(now_ms);
        let fallback = self.fallback.fire(now_ms);
        if quiet || fallback {
            log::trace!("scroll convergence cleared (quiet: {quiet}, fallback: {fallback})");
            self.finish();
        }
    }

    pub fn cancel(&mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.target = None;
        self.still_samples = 0;
        self.quiet.cancel();
        self.fallback.cancel();
    }
}

/// Eased scroll animation between two offsets.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    from: f32,
    to: f32,
    started_at_ms: f64,
    duration_ms: f64,
    active: bool,
}

impl SmoothScroll {
    pub fn start(&mut self, from: f32, to: f32, now_ms: f64, duration_ms: f64) {
        self.from = from;
        self.to = to;
        self.started_at_ms = now_ms;
        self.duration_ms = duration_ms;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> Option<f32> {
        self.active.then_some(self.to)
    }

    /// Current offset, or `None` when idle. The final frame lands exactly
    /// on the target and deactivates.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if !self.active {
            return None;
        }
        let t = if self.duration_ms > 0.0 {
            ((now_ms - self.started_at_ms) / self.duration_ms) as f32
        } else {
            1.0
        };
        if t >= 1.0 {
            self.active = false;
            return Some(self.to);
        }
        Some(self.from + (self.to - self.from) * ease_out_quad(t))
    }
}
