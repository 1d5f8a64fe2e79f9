//! Landing and loading screens shown before the carousel.

use crate::config::LaunchSettings;
use crate::timer::Deadline;

pub const TAGLINE: &str = "A journey through your cherished moments, captured in time.";
pub const LOADING_LINE: &str = "Putting your memories together...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Landing,
    LogoOut,
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub struct LaunchSequence {
    settings: LaunchSettings,
    stage: LaunchStage,
    stage_started_ms: f64,
    logo_out: Deadline,
    loading: Deadline,
}

impl LaunchSequence {
    pub fn new(settings: &LaunchSettings, now_ms: f64) -> Self {
        let stage = if settings.skip_landing {
            LaunchStage::Ready
        } else {
            LaunchStage::Landing
        };
        Self {
            settings: settings.clone(),
            stage,
            stage_started_ms: now_ms,
            logo_out: Deadline::default(),
            loading: Deadline::default(),
        }
    }

    pub fn stage(&self) -> LaunchStage {
        self.stage
    }

    pub fn is_ready(&self) -> bool {
        self.stage == LaunchStage::Ready
    }

    pub fn stage_elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.stage_started_ms).max(0.0)
    }

    /// The user dismissed the landing screen. Ignored in any other stage.
    pub fn launch(&mut self, now_ms: f64) {
        if self.stage != LaunchStage::Landing {
            return;
        }
        self.enter(LaunchStage::LogoOut, now_ms);
        self.logo_out.arm(now_ms, self.settings.logo_out_ms);
    }

    /// Returns the stage just entered, if any.
    pub fn tick(&mut self, now_ms: f64) -> Option<LaunchStage> {
        if self.logo_out.fire(now_ms) {
            self.enter(LaunchStage::Loading, now_ms);
            self.loading.arm(now_ms, self.settings.loading_ms);
            return Some(LaunchStage::Loading);
        }
        if self.loading.fire(now_ms) {
            self.enter(LaunchStage::Ready, now_ms);
            return Some(LaunchStage::Ready);
        }
        None
    }

    fn enter(&mut self, stage: LaunchStage, now_ms: f64) {
        log::debug!("launch stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.stage_started_ms = now_ms;
    }
}

/// Reveals `text` one character at a time after an initial delay.
#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    text: &'static str,
    char_ms: f64,
    delay_ms: f64,
}

impl Typewriter {
    pub const fn new(text: &'static str, char_ms: f64, delay_ms: f64) -> Self {
        Self {
            text,
            char_ms,
            delay_ms,
        }
    }

    pub const fn tagline() -> Self {
        Self::new(TAGLINE, 30.0, 500.0)
    }

    pub const fn loading() -> Self {
        Self::new(LOADING_LINE, 40.0, 200.0)
    }

    pub fn visible(&self, elapsed_ms: f64) -> &'static str {
        let shown = if elapsed_ms < self.delay_ms || self.char_ms <= 0.0 {
            0
        } else {
            ((elapsed_ms - self.delay_ms) / self.char_ms) as usize
        };
        match self.text.char_indices().nth(shown) {
            Some((byte, _)) => &self.text[..byte],
            None => self.text,
        }
    }

    pub fn is_complete(&self, elapsed_ms: f64) -> bool {
        self.visible(elapsed_ms).len() == self.text.len()
    }
}
