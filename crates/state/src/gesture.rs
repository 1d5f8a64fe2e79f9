//! Unified pointer recognizer for mouse and touch.
//!
//! A contact is claimed at press time by whichever region it lands in:
//! the timeline strip (horizontal drag-to-scroll) or a card (tilt, tap,
//! hold). Only one contact is tracked; presses while it is alive are
//! ignored, so the two domains never overlap.

use egui::{Pos2, Rect};

use crate::compositor::OrientationVector;
use crate::config::GestureSettings;
use crate::selection::CardSlot;
use crate::timer::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// The mouse left the window.
    Leave,
    /// The platform abandoned the contact.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub pos: Pos2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, phase: PointerPhase, pos: Pos2) -> Self {
        Self { kind, phase, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Card(CardSlot),
    Timeline,
    Elsewhere,
}

/// Screen rectangles of everything that accepts gestures this frame.
/// Hidden surfaces are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitRegions {
    pub cards: [Option<Rect>; 3],
    pub timeline: Option<Rect>,
}

impl HitRegions {
    pub fn card(&self, slot: CardSlot) -> Option<Rect> {
        self.cards[slot.index()]
    }

    pub fn set_card(&mut self, slot: CardSlot, rect: Rect) {
        self.cards[slot.index()] = Some(rect);
    }

    /// Cards sit above the strip, so they win overlaps. The center card is
    /// drawn last and is checked first.
    pub fn classify(&self, pos: Pos2) -> Region {
        for slot in [CardSlot::Center, CardSlot::Left, CardSlot::Right] {
            if self.card(slot).is_some_and(|rect| rect.contains(pos)) {
                return Region::Card(slot);
            }
        }
        if self.timeline.is_some_and(|rect| rect.contains(pos)) {
            return Region::Timeline;
        }
        Region::Elsewhere
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    TimelineDragStarted,
    /// New unclamped strip offset.
    TimelineScrolled(f32),
    /// A press and release on the strip without a drag, at the press point.
    TimelineClicked(Pos2),
    HoldStarted,
    HoldCancelled,
    TiltStarted(CardSlot),
    Tilted(CardSlot, OrientationVector),
    TiltReleased(CardSlot),
    SideSelected(CardSlot),
    CenterTapped,
    CenterDoubleTapped,
}

#[derive(Debug, Clone, Copy)]
struct TimelineContact {
    kind: PointerKind,
    press: Pos2,
    start_offset: f32,
    moved: bool,
}

#[derive(Debug, Clone, Copy)]
struct CardContact {
    slot: CardSlot,
    start: Pos2,
    dragging: bool,
    holding: bool,
    /// Set once the contact has been consumed by a completed hold.
    spent: bool,
}

#[derive(Debug, Clone, Copy)]
enum Contact {
    Timeline(TimelineContact),
    Card(CardContact),
}

/// Turns raw pointer events into carousel gestures.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    settings: GestureSettings,
    contact: Option<Contact>,
    just_dragged: Deadline,
    pending_tap: Deadline,
}

impl GestureRecognizer {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            settings: settings.clone(),
            contact: None,
            just_dragged: Deadline::default(),
            pending_tap: Deadline::default(),
        }
    }

    pub fn has_contact(&self) -> bool {
        self.contact.is_some()
    }

    pub fn is_timeline_dragging(&self) -> bool {
        matches!(self.contact, Some(Contact::Timeline(c)) if c.moved)
    }

    pub fn tilting_slot(&self) -> Option<CardSlot> {
        match self.contact {
            Some(Contact::Card(c)) if c.dragging => Some(c.slot),
            _ => None,
        }
    }

    /// Marks the live card contact as used up: no tap, tilt or hold
    /// signal will come from it until it is released.
    pub fn consume_contact(&mut self) {
        if let Some(Contact::Card(card)) = &mut self.contact {
            card.spent = true;
            card.holding = false;
        }
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        regions: &HitRegions,
        strip_offset: f32,
        now_ms: f64,
    ) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        match event.phase {
            PointerPhase::Press => self.press(event, regions, strip_offset, &mut out),
            PointerPhase::Move => self.motion(event, regions, &mut out),
            PointerPhase::Release => self.release(event, regions, now_ms, &mut out),
            PointerPhase::Leave | PointerPhase::Cancel => self.abandon(now_ms, &mut out),
        }
        out
    }

    /// Fires the deferred single tap once the double-tap window closes.
    pub fn poll(&mut self, now_ms: f64) -> Option<GestureEvent> {
        self.just_dragged.fire(now_ms);
        self.pending_tap
            .fire(now_ms)
            .then_some(GestureEvent::CenterTapped)
    }

    fn press(
        &mut self,
        event: PointerEvent,
        regions: &HitRegions,
        strip_offset: f32,
        out: &mut Vec<GestureEvent>,
    ) {
        if self.contact.is_some() {
            return;
        }
        match regions.classify(event.pos) {
            Region::Timeline => {
                self.contact = Some(Contact::Timeline(TimelineContact {
                    kind: event.kind,
                    press: event.pos,
                    start_offset: strip_offset,
                    moved: false,
                }));
            }
            Region::Card(slot) => {
                let holding = slot.is_center();
                if holding {
                    out.push(GestureEvent::HoldStarted);
                }
                self.contact = Some(Contact::Card(CardContact {
                    slot,
                    start: event.pos,
                    dragging: false,
                    holding,
                    spent: false,
                }));
            }
            Region::Elsewhere => {}
        }
    }

    fn motion(&mut self, event: PointerEvent, regions: &HitRegions, out: &mut Vec<GestureEvent>) {
        let settings = &self.settings;
        match &mut self.contact {
            Some(Contact::Timeline(timeline)) => {
                let threshold = match timeline.kind {
                    PointerKind::Mouse => settings.timeline_mouse_threshold,
                    PointerKind::Touch => settings.timeline_touch_threshold,
                };
                let dx = event.pos.x - timeline.press.x;
                if dx.abs() <= threshold {
                    return;
                }
                if !timeline.moved {
                    timeline.moved = true;
                    out.push(GestureEvent::TimelineDragStarted);
                }
                out.push(GestureEvent::TimelineScrolled(
                    timeline.start_offset - dx * settings.scroll_damping,
                ));
            }
            Some(Contact::Card(card)) if !card.spent => {
                if !card.dragging {
                    let threshold = if card.slot.is_center() {
                        settings.center_tilt_threshold
                    } else {
                        settings.side_tilt_threshold
                    };
                    if card.start.distance(event.pos) <= threshold {
                        return;
                    }
                    card.dragging = true;
                    if card.holding {
                        card.holding = false;
                        out.push(GestureEvent::HoldCancelled);
                    }
                    out.push(GestureEvent::TiltStarted(card.slot));
                }
                if let Some(rect) = regions.card(card.slot) {
                    out.push(GestureEvent::Tilted(
                        card.slot,
                        tilt_toward(event.pos, rect, settings.max_rotation),
                    ));
                }
            }
            _ => {}
        }
    }

    fn release(
        &mut self,
        event: PointerEvent,
        regions: &HitRegions,
        now_ms: f64,
        out: &mut Vec<GestureEvent>,
    ) {
        let Some(contact) = self.contact.take() else {
            return;
        };
        match contact {
            Contact::Timeline(timeline) => {
                if timeline.moved {
                    return;
                }
                let inside = match timeline.kind {
                    PointerKind::Touch => true,
                    PointerKind::Mouse => regions.timeline.is_some_and(|r| r.contains(event.pos)),
                };
                if inside {
                    out.push(GestureEvent::TimelineClicked(timeline.press));
                }
            }
            Contact::Card(card) => {
                if card.holding {
                    out.push(GestureEvent::HoldCancelled);
                }
                if card.dragging {
                    out.push(GestureEvent::TiltReleased(card.slot));
                    self.just_dragged.arm(now_ms, self.settings.just_dragged_ms);
                    return;
                }
                if card.spent || self.just_dragged.is_pending(now_ms) {
                    return;
                }
                if !card.slot.is_center() {
                    out.push(GestureEvent::SideSelected(card.slot));
                } else if self.pending_tap.is_pending(now_ms) {
                    self.pending_tap.cancel();
                    out.push(GestureEvent::CenterDoubleTapped);
                } else {
                    // An earlier tap whose window closed before `poll` ran.
                    if self.pending_tap.fire(now_ms) {
                        out.push(GestureEvent::CenterTapped);
                    }
                    self.pending_tap
                        .arm(now_ms, self.settings.double_tap_window_ms);
                }
            }
        }
    }

    /// Drops the live contact without a release: no click, tap or select.
    fn abandon(&mut self, now_ms: f64, out: &mut Vec<GestureEvent>) {
        if self.contact.is_some() {
            log::debug!("pointer contact abandoned");
        }
        match self.contact.take() {
            Some(Contact::Card(card)) => {
                if card.holding {
                    out.push(GestureEvent::HoldCancelled);
                }
                if card.dragging {
                    out.push(GestureEvent::TiltReleased(card.slot));
                    self.just_dragged.arm(now_ms, self.settings.just_dragged_ms);
                }
            }
            Some(Contact::Timeline(_)) | None => {}
        }
    }
}

/// Rotation that tips the card toward `pos`, normalised by the card's
/// half extents and clamped to `max` degrees per axis.
pub fn tilt_toward(pos: Pos2, rect: Rect, max: f32) -> OrientationVector {
    let half = rect.size() * 0.5;
    if half.x <= 0.0 || half.y <= 0.0 {
        return OrientationVector::ZERO;
    }
    let center = rect.center();
    let dx = (pos.x - center.x) / half.x;
    let dy = (pos.y - center.y) / half.y;
    OrientationVector::new(-dy * max, dx * max).clamped(max)
}
