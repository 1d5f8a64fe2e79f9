/// Press-and-hold detector for the center card.
///
/// Progress runs from 0 to 100 over the configured duration and never
/// decreases within a hold. Completion is reported exactly once, after
/// which the machine is idle again with progress reset.
#[derive(Debug, Clone)]
pub struct HoldMachine {
    duration_ms: f64,
    started_at_ms: Option<f64>,
    progress: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    Idle,
    Holding,
    Completed,
}

impl HoldMachine {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            started_at_ms: None,
            progress: 0.0,
        }
    }

    pub fn begin(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
        self.progress = 0.0;
    }

    pub fn cancel(&mut self) {
        if self.started_at_ms.take().is_some() {
            log::trace!("hold cancelled at {:.0}%", self.progress);
        }
        self.progress = 0.0;
    }

    pub fn is_holding(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn tick(&mut self, now_ms: f64) -> HoldOutcome {
        let Some(started) = self.started_at_ms else {
            return HoldOutcome::Idle;
        };
        let raw = if self.duration_ms > 0.0 {
            ((now_ms - started) / self.duration_ms * 100.0) as f32
        } else {
            100.0
        };
        self.progress = raw.clamp(self.progress, 100.0);
        if self.progress >= 100.0 {
            self.started_at_ms = None;
            self.progress = 0.0;
            return HoldOutcome::Completed;
        }
        HoldOutcome::Holding
    }
}
