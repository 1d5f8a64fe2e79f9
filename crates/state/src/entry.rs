//! Staged entry animation for the three cards.
//!
//! A restart hides every slot, then the center falls in, the sides slide
//! in, and finally all three are marked live. Each stage is a cancellable
//! deadline, so a restart mid-sequence discards the pending stages.

use crate::config::EntrySettings;
use crate::selection::CardSlot;
use crate::timer::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryPhase {
    #[default]
    Hidden,
    Falling,
    Sliding,
    Complete,
}

#[derive(Debug, Clone)]
pub struct EntryChoreographer {
    settings: EntrySettings,
    phases: [EntryPhase; 3],
    entered_at_ms: [f64; 3],
    center_falls: Deadline,
    sides_slide: Deadline,
    complete: Deadline,
}

impl EntryChoreographer {
    /// Starts with every slot live; nothing animates until `restart`.
    pub fn new(settings: &EntrySettings) -> Self {
        Self {
            settings: settings.clone(),
            phases: [EntryPhase::Complete; 3],
            entered_at_ms: [0.0; 3],
            center_falls: Deadline::default(),
            sides_slide: Deadline::default(),
            complete: Deadline::default(),
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        log::debug!("entry sequence restarted");
        self.phases = [EntryPhase::Hidden; 3];
        self.entered_at_ms = [now_ms; 3];
        self.center_falls.arm(now_ms, self.settings.center_falls_at_ms);
        self.sides_slide.arm(now_ms, self.settings.sides_slide_at_ms);
        self.complete.arm(now_ms, self.settings.complete_at_ms);
    }

    /// Advances due stages in order. Returns true when any slot changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        if self.center_falls.fire(now_ms) {
            self.enter(CardSlot::Center, EntryPhase::Falling, now_ms);
            changed = true;
        }
        if self.sides_slide.fire(now_ms) {
            self.enter(CardSlot::Left, EntryPhase::Sliding, now_ms);
            self.enter(CardSlot::Right, EntryPhase::Sliding, now_ms);
            changed = true;
        }
        if self.complete.fire(now_ms) {
            for slot in CardSlot::ALL {
                self.enter(slot, EntryPhase::Complete, now_ms);
            }
            changed = true;
        }
        changed
    }

    fn enter(&mut self, slot: CardSlot, phase: EntryPhase, now_ms: f64) {
        self.phases[slot.index()] = phase;
        self.entered_at_ms[slot.index()] = now_ms;
    }

    pub fn phase(&self, slot: CardSlot) -> EntryPhase {
        self.phases[slot.index()]
    }

    /// Live slots respond to idle motion and show their full styling.
    pub fn is_live(&self, slot: CardSlot) -> bool {
        self.phase(slot) == EntryPhase::Complete
    }

    pub fn is_running(&self) -> bool {
        self.complete.is_armed()
    }

    /// Milliseconds since the slot entered its current phase.
    pub fn phase_elapsed_ms(&self, slot: CardSlot, now_ms: f64) -> f64 {
        (now_ms - self.entered_at_ms[slot.index()]).max(0.0)
    }
}
