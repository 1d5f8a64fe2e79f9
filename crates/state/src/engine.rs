//! The carousel engine.
//!
//! Owns every state machine and is driven by two inputs: pointer events
//! (`pointer`) and the frame clock (`frame`). Within a frame, gesture
//! timers resolve first, then hold progress, idle and spring motion,
//! entry stages and finally strip scrolling. Outward effects are queued
//! as `EngineEvent`s for the host to drain.

use chrono::{Datelike, NaiveDate};

use crate::calendar::{same_month, DateStrip, ValidRange};
use crate::catalog::{Catalog, MediaItem};
use crate::compositor::{Compositor, OrientationVector};
use crate::config::{CenterTapAction, Settings};
use crate::entry::{EntryChoreographer, EntryPhase};
use crate::error::{Error, Result};
use crate::gesture::{GestureEvent, GestureRecognizer, HitRegions, PointerEvent};
use crate::hold::{HoldMachine, HoldOutcome};
use crate::launch::{LaunchSequence, LaunchStage};
use crate::scroll::{centering_offset, ScrollConvergence, ScrollRequest, SmoothScroll, StripGeometry};
use crate::selection::{CardSlot, Selection, SlotTriple};
use crate::strip::{StripLayout, StripMetrics};
use crate::temporal::TemporalIndex;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Show the detail view for a catalog item.
    Reveal {
        index: usize,
        detail: Option<String>,
    },
    VoiceModeChanged(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub index: usize,
    pub detail: Option<String>,
}

/// `available` is false until the host has opened a capture device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoiceMode {
    pub active: bool,
    pub available: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellDecoration {
    pub interactive: bool,
    pub selected: bool,
    pub today: bool,
    pub scrolling_to: bool,
}

impl CellDecoration {
    pub fn is_plain(&self) -> bool {
        self.interactive && !self.selected && !self.today && !self.scrolling_to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    pub memories: usize,
    pub selected_day: Option<u32>,
}

pub struct CarouselEngine {
    settings: Settings,
    catalog: Catalog,
    range: ValidRange,
    index: TemporalIndex,
    strip: DateStrip,
    today: NaiveDate,
    selection: Selection,
    gestures: GestureRecognizer,
    hold: HoldMachine,
    compositor: Compositor,
    entry: EntryChoreographer,
    convergence: ScrollConvergence,
    smooth: SmoothScroll,
    launch: LaunchSequence,
    regions: HitRegions,
    layout: Option<StripLayout>,
    strip_offset: f32,
    centered_once: bool,
    shown_center: usize,
    detail: Option<DetailView>,
    voice: VoiceMode,
    events: Vec<EngineEvent>,
}

impl CarouselEngine {
    pub fn new(settings: Settings, catalog: Catalog, today: NaiveDate, now_ms: f64) -> Result<Self> {
        let range = settings.range.valid_range()?;
        let (strip_first, strip_last) = settings.range.strip_bounds();
        let strip = DateStrip::for_months(strip_first, strip_last)?;
        let index = TemporalIndex::new(&catalog, range);
        let launch = LaunchSequence::new(&settings.launch, now_ms);
        let mut entry = EntryChoreographer::new(&settings.entry);
        if launch.is_ready() {
            entry.restart(now_ms);
        }
        let selection = Selection::default();
        let shown_center = selection.center_index(&index, today);

        log::info!(
            "carousel ready: {} items, range {} to {}, {} strip days",
            catalog.len(),
            range.start(),
            range.end(),
            strip.len()
        );

        Ok(Self {
            gestures: GestureRecognizer::new(&settings.gesture),
            hold: HoldMachine::new(settings.hold.duration_ms),
            compositor: Compositor::new(&settings.idle, settings.gesture.spring_back_ms),
            convergence: ScrollConvergence::new(&settings.scroll),
            smooth: SmoothScroll::default(),
            settings,
            catalog,
            range,
            index,
            strip,
            today,
            selection,
            entry,
            launch,
            regions: HitRegions::default(),
            layout: None,
            strip_offset: 0.0,
            centered_once: false,
            shown_center,
            detail: None,
            voice: VoiceMode::default(),
            events: Vec::new(),
        })
    }

    // --- inputs ---

    /// Reports this frame's layout. Rebuilds strip geometry when the
    /// viewport changes and centers today's cell on the first layout.
    pub fn set_layout(&mut self, regions: HitRegions, metrics: StripMetrics, viewport_width: f32) {
        self.regions = regions;
        if viewport_width <= 0.0 {
            return;
        }
        let stale = match &self.layout {
            Some(layout) => {
                layout.metrics() != metrics || layout.viewport_width() != viewport_width
            }
            None => true,
        };
        if stale {
            let layout = StripLayout::new(&self.strip, metrics, viewport_width);
            self.strip_offset = self.strip_offset.clamp(0.0, layout.max_offset());
            self.layout = Some(layout);
        }
        if !self.centered_once {
            self.centered_once = true;
            self.center_initially();
        }
    }

    pub fn pointer(&mut self, event: PointerEvent, now_ms: f64) {
        let regions = self.active_regions();
        let gestures = self.gestures.handle(event, &regions, self.strip_offset, now_ms);
        for gesture in gestures {
            self.apply(gesture, now_ms);
        }
    }

    pub fn frame(&mut self, now_ms: f64) {
        if self.launch.tick(now_ms) == Some(LaunchStage::Ready) {
            self.entry.restart(now_ms);
        }

        if let Some(tap) = self.gestures.poll(now_ms) {
            self.apply(tap, now_ms);
        }

        if self.hold.tick(now_ms) == HoldOutcome::Completed {
            log::debug!("hold completed");
            self.gestures.consume_contact();
            self.reveal(self.center_index());
        }

        self.compositor.tick(now_ms);
        self.entry.tick(now_ms);

        if let Some(offset) = self.smooth.tick(now_ms) {
            self.scroll_strip(offset, now_ms);
        }
        self.convergence.tick(now_ms);
    }

    /// Dismisses the landing screen.
    pub fn launch(&mut self, now_ms: f64) {
        self.launch.launch(now_ms);
    }

    /// Picks a day from the strip and scrolls it to the middle.
    pub fn click_date(&mut self, date: NaiveDate, now_ms: f64) -> Result<()> {
        self.selection.pick_date(date, &self.range)?;
        log::debug!("picked {date}");
        self.restart_entry(now_ms);
        self.scroll_to(date, now_ms);
        Ok(())
    }

    pub fn pick_item(&mut self, index: usize, now_ms: f64) -> Result<()> {
        if index >= self.catalog.len() {
            return Err(Error::ItemOutOfRange {
                index,
                len: self.catalog.len(),
            });
        }
        self.selection.pick_item(index);
        if self.center_index() != self.shown_center {
            self.restart_entry(now_ms);
        }
        Ok(())
    }

    pub fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            log::debug!("detail view closed");
        }
    }

    /// Outcome of opening the capture device after voice mode turned on.
    pub fn set_voice_available(&mut self, available: bool) {
        self.voice.available = available && self.voice.active;
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // --- queries ---

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn item(&self, index: usize) -> Option<&MediaItem> {
        self.catalog.get(index)
    }

    pub fn range(&self) -> &ValidRange {
        &self.range
    }

    pub fn strip(&self) -> &DateStrip {
        &self.strip
    }

    pub fn strip_layout(&self) -> Option<&StripLayout> {
        self.layout.as_ref()
    }

    pub fn strip_offset(&self) -> f32 {
        self.strip_offset
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn center_index(&self) -> usize {
        self.selection.center_index(&self.index, self.today)
    }

    pub fn triple(&self) -> SlotTriple {
        SlotTriple::around(self.center_index(), self.catalog.len(), self.settings.neighbors)
    }

    pub fn hold_progress(&self) -> f32 {
        self.hold.progress()
    }

    pub fn rotation(&self, slot: CardSlot) -> OrientationVector {
        self.compositor.final_rotation(slot)
    }

    pub fn entry_phase(&self, slot: CardSlot) -> EntryPhase {
        self.entry.phase(slot)
    }

    pub fn entry_elapsed_ms(&self, slot: CardSlot, now_ms: f64) -> f64 {
        self.entry.phase_elapsed_ms(slot, now_ms)
    }

    pub fn scrolling_to(&self) -> Option<NaiveDate> {
        self.convergence.scrolling_to()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn voice(&self) -> VoiceMode {
        self.voice
    }

    pub fn launch_sequence(&self) -> &LaunchSequence {
        &self.launch
    }

    pub fn is_timeline_dragging(&self) -> bool {
        self.gestures.is_timeline_dragging()
    }

    pub fn cell_decoration(&self, cell_index: usize) -> Option<CellDecoration> {
        let cell = self.strip.cells().get(cell_index)?;
        let picked = self.selection.picked_date();
        Some(CellDecoration {
            interactive: self.range.contains(cell.date),
            selected: picked == Some(cell.date),
            today: picked.is_none() && cell.date == self.today,
            scrolling_to: self.convergence.scrolling_to() == Some(cell.date),
        })
    }

    pub fn month_summary(&self, month_index: usize) -> Option<MonthSummary> {
        let month = self.strip.months().get(month_index)?;
        let first_day = self.strip.cells().get(month.cells.start)?.date;
        let selected_day = self
            .selection
            .picked_date()
            .filter(|&picked| same_month(picked, first_day))
            .map(|picked| picked.day());
        Some(MonthSummary {
            memories: self
                .catalog
                .memories_in_month(month.year, month.month, &self.range),
            selected_day,
        })
    }

    // --- internals ---

    /// Hidden surfaces take no gestures: nothing before launch completes,
    /// no cards or strip under the detail view, no strip in voice mode.
    fn active_regions(&self) -> HitRegions {
        if !self.launch.is_ready() || self.detail.is_some() {
            return HitRegions::default();
        }
        let mut regions = self.regions.clone();
        let triple = self.triple();
        for slot in CardSlot::ALL {
            if triple.get(slot).is_none() {
                regions.cards[slot.index()] = None;
            }
        }
        if self.voice.active {
            regions.timeline = None;
        }
        regions
    }

    fn apply(&mut self, gesture: GestureEvent, now_ms: f64) {
        match gesture {
            GestureEvent::TimelineDragStarted => {
                log::debug!("timeline drag started");
                // The user owns the strip now; no settle correction may follow.
                self.smooth.cancel();
                self.convergence.cancel();
            }
            GestureEvent::TimelineScrolled(offset) => self.scroll_strip(offset, now_ms),
            GestureEvent::TimelineClicked(pos) => {
                let Some(date) = self.date_at(pos) else {
                    return;
                };
                if let Err(err) = self.click_date(date, now_ms) {
                    log::debug!("ignored strip click: {err}");
                }
            }
            GestureEvent::HoldStarted => {
                log::debug!("hold started");
                self.hold.begin(now_ms);
            }
            GestureEvent::HoldCancelled => self.hold.cancel(),
            GestureEvent::TiltStarted(slot) => {
                log::debug!("tilting {} card", slot.label());
                self.compositor.begin_drag(slot);
            }
            GestureEvent::Tilted(slot, rotation) => self.compositor.set_drag(slot, rotation),
            GestureEvent::TiltReleased(slot) => self.compositor.end_drag(slot, now_ms),
            GestureEvent::SideSelected(slot) => {
                if let Some(index) = self.triple().get(slot) {
                    // Index comes from the triple, so it is in bounds.
                    let _ = self.pick_item(index, now_ms);
                }
            }
            GestureEvent::CenterTapped => {
                if self.detail.is_some() {
                    return;
                }
                match self.settings.center_tap {
                    CenterTapAction::ToggleVoice => self.toggle_voice(),
                    CenterTapAction::Inert => {}
                }
            }
            GestureEvent::CenterDoubleTapped => self.reveal(self.center_index()),
        }
    }

    fn date_at(&self, pos: egui::Pos2) -> Option<NaiveDate> {
        let layout = self.layout.as_ref()?;
        let timeline = self.regions.timeline?;
        let content_x = pos.x - timeline.left() + self.strip_offset;
        let cell = layout.cell_at(content_x)?;
        self.strip.cells().get(cell).map(|cell| cell.date)
    }

    fn restart_entry(&mut self, now_ms: f64) {
        self.shown_center = self.center_index();
        if self.launch.is_ready() {
            self.entry.restart(now_ms);
        }
    }

    fn reveal(&mut self, index: usize) {
        if self.detail.is_some() {
            return;
        }
        let Some(item) = self.catalog.get(index) else {
            return;
        };
        let detail = item
            .detail
            .clone()
            .or_else(|| self.settings.fallback_detail.clone());
        log::info!("revealing \"{}\"", item.caption);
        self.hold.cancel();
        self.detail = Some(DetailView {
            index,
            detail: detail.clone(),
        });
        self.events.push(EngineEvent::Reveal { index, detail });
    }

    fn toggle_voice(&mut self) {
        self.voice.active = !self.voice.active;
        self.voice.available = false;
        log::debug!("voice mode {}", if self.voice.active { "on" } else { "off" });
        self.events
            .push(EngineEvent::VoiceModeChanged(self.voice.active));
    }

    fn center_initially(&mut self) {
        if self.selection.picked_date().is_some() {
            return;
        }
        let Some(layout) = &self.layout else {
            return;
        };
        let target = if layout.cell_center(self.today).is_some() {
            self.today
        } else {
            self.range.clamp(self.today)
        };
        if let Some(offset) = centering_offset(layout, target) {
            self.strip_offset = offset;
        }
    }

    fn scroll_to(&mut self, date: NaiveDate, now_ms: f64) {
        let Some(layout) = &self.layout else {
            return;
        };
        if let Some(request) = self.convergence.begin(date, self.strip_offset, layout, now_ms) {
            self.play(request, now_ms);
        }
    }

    fn play(&mut self, request: ScrollRequest, now_ms: f64) {
        if request.smooth {
            self.smooth.start(
                self.strip_offset,
                request.offset,
                now_ms,
                self.settings.scroll.smooth_duration_ms,
            );
        } else {
            self.smooth.cancel();
            self.scroll_strip(request.offset, now_ms);
        }
    }

    /// Moves the strip and feeds the convergence loop one sample.
    fn scroll_strip(&mut self, offset: f32, now_ms: f64) {
        let Some(layout) = &self.layout else {
            return;
        };
        let clamped = offset.clamp(0.0, layout.max_offset());
        if clamped == self.strip_offset {
            return;
        }
        self.strip_offset = clamped;
        if let Some(correction) = self.convergence.on_scroll(clamped, layout, now_ms) {
            self.play(correction, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{PointerKind, PointerPhase};
    use egui::{pos2, Rect};

    const TIMELINE_TOP: f32 = 500.0;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    fn regions() -> HitRegions {
        let mut regions = HitRegions {
            timeline: Some(Rect::from_min_max(
                pos2(0.0, TIMELINE_TOP),
                pos2(800.0, TIMELINE_TOP + 60.0),
            )),
            ..HitRegions::default()
        };
        regions.set_card(
            CardSlot::Left,
            Rect::from_min_max(pos2(50.0, 100.0), pos2(250.0, 400.0)),
        );
        regions.set_card(
            CardSlot::Center,
            Rect::from_min_max(pos2(300.0, 100.0), pos2(500.0, 400.0)),
        );
        regions.set_card(
            CardSlot::Right,
            Rect::from_min_max(pos2(550.0, 100.0), pos2(750.0, 400.0)),
        );
        regions
    }

    fn engine_with(settings: Settings) -> CarouselEngine {
        let mut engine = CarouselEngine::new(settings, Catalog::sample(), d(2024, 6, 1), 0.0)
            .expect("engine should build");
        engine.set_layout(regions(), StripMetrics::default(), 800.0);
        engine
    }

    fn engine() -> CarouselEngine {
        let mut settings = Settings::default();
        settings.launch.skip_landing = true;
        engine_with(settings)
    }

    fn touch(engine: &mut CarouselEngine, phase: PointerPhase, x: f32, y: f32, now: f64) {
        engine.pointer(PointerEvent::new(PointerKind::Touch, phase, pos2(x, y)), now);
    }

    fn mouse(engine: &mut CarouselEngine, phase: PointerPhase, x: f32, y: f32, now: f64) {
        engine.pointer(PointerEvent::new(PointerKind::Mouse, phase, pos2(x, y)), now);
    }

    fn run_frames(engine: &mut CarouselEngine, from: f64, to: f64) {
        let mut t = from;
        while t <= to {
            engine.frame(t);
            t += 16.0;
        }
    }

    fn reveals(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::Reveal { .. }))
            .count()
    }

    fn screen_x_of(engine: &CarouselEngine, date: NaiveDate) -> f32 {
        let layout = engine.strip_layout().expect("layout");
        layout.cell_center(date).expect("cell") - engine.strip_offset()
    }

    #[test]
    fn today_resolves_the_initial_center() {
        let engine = engine();
        // 2024-06-01 falls back to the 2024-05-15 item.
        assert_eq!(engine.center_index(), 2);
        let triple = engine.triple();
        assert_eq!((triple.left, triple.right), (Some(1), Some(3)));
    }

    #[test]
    fn first_layout_centers_today_instantly() {
        let engine = engine();
        let layout = engine.strip_layout().expect("layout");
        let center = layout.cell_center(d(2024, 6, 1)).expect("cell");
        assert!((center - engine.strip_offset() - 400.0).abs() < 1e-3);
        assert_eq!(engine.scrolling_to(), None);
    }

    #[test]
    fn hold_for_2100ms_reveals_exactly_once() {
        let mut engine = engine();
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        let mut first_reveal_at = None;
        let mut t = 0.0;
        while t <= 2_100.0 {
            engine.frame(t);
            let events = engine.drain_events();
            if reveals(&events) > 0 {
                assert!(first_reveal_at.is_none(), "second reveal at {t}");
                first_reveal_at = Some(t);
                assert_eq!(engine.hold_progress(), 0.0);
            }
            t += 16.0;
        }
        let at = first_reveal_at.expect("hold should reveal");
        assert!((2_000.0..2_016.0).contains(&at));
        touch(&mut engine, PointerPhase::Release, 400.0, 250.0, 2_100.0);
        run_frames(&mut engine, 2_116.0, 3_000.0);
        assert_eq!(reveals(&engine.drain_events()), 0);
        assert_eq!(
            engine.detail(),
            Some(&DetailView {
                index: 2,
                detail: Some("media/video_with_5_ref.mp4".to_string())
            })
        );
    }

    #[test]
    fn sub_threshold_jitter_keeps_the_hold_alive() {
        let mut engine = engine();
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        run_frames(&mut engine, 0.0, 500.0);
        touch(&mut engine, PointerPhase::Move, 403.0, 250.0, 500.0);
        assert_eq!(engine.compositor.drag(CardSlot::Center), OrientationVector::ZERO);
        run_frames(&mut engine, 512.0, 2_010.0);
        assert_eq!(reveals(&engine.drain_events()), 1);
    }

    #[test]
    fn drag_past_threshold_cancels_the_hold() {
        let mut engine = engine();
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        run_frames(&mut engine, 0.0, 500.0);
        touch(&mut engine, PointerPhase::Move, 408.0, 250.0, 500.0);
        assert_eq!(engine.hold_progress(), 0.0);
        run_frames(&mut engine, 512.0, 3_000.0);
        assert_eq!(reveals(&engine.drain_events()), 0);
        assert!(engine.detail().is_none());
    }

    #[test]
    fn below_threshold_motion_never_sets_drag_rotation() {
        let mut engine = engine();
        mouse(&mut engine, PointerPhase::Press, 600.0, 200.0, 0.0);
        for (i, dx) in [2.0, -4.0, 9.0, 0.0].into_iter().enumerate() {
            mouse(&mut engine, PointerPhase::Move, 600.0 + dx, 200.0, i as f64 * 16.0);
            engine.frame(i as f64 * 16.0);
            for slot in CardSlot::ALL {
                assert_eq!(engine.compositor.drag(slot), OrientationVector::ZERO);
            }
        }
    }

    #[test]
    fn tilting_a_side_card_freezes_idle_and_springs_back() {
        let mut engine = engine();
        run_frames(&mut engine, 0.0, 1_400.0);
        mouse(&mut engine, PointerPhase::Press, 150.0, 250.0, 1_400.0);
        mouse(&mut engine, PointerPhase::Move, 250.0, 250.0, 1_416.0);
        assert!(engine.compositor.is_dragging(CardSlot::Left));
        let rotation = engine.rotation(CardSlot::Left);
        assert!((rotation.rotate_y - (-20.0 + 25.0)).abs() < 1e-3);

        mouse(&mut engine, PointerPhase::Release, 250.0, 250.0, 1_432.0);
        run_frames(&mut engine, 1_432.0, 2_100.0);
        assert_eq!(engine.compositor.drag(CardSlot::Left), OrientationVector::ZERO);
        // The release right after the drag did not select the card.
        assert_eq!(engine.center_index(), 2);
    }

    #[test]
    fn side_tap_selects_neighbor_and_replays_entry() {
        let mut engine = engine();
        run_frames(&mut engine, 0.0, 1_400.0);
        assert!(engine.entry.is_live(CardSlot::Center));

        mouse(&mut engine, PointerPhase::Press, 650.0, 250.0, 1_500.0);
        mouse(&mut engine, PointerPhase::Release, 650.0, 250.0, 1_550.0);
        assert_eq!(engine.center_index(), 3);
        assert_eq!(engine.selection().picked_date(), None);
        assert_eq!(engine.entry_phase(CardSlot::Center), EntryPhase::Hidden);
        run_frames(&mut engine, 1_560.0, 2_900.0);
        assert_eq!(engine.entry_phase(CardSlot::Right), EntryPhase::Complete);
    }

    #[test]
    fn last_item_has_no_right_slot_to_click() {
        let mut engine = engine();
        engine.pick_item(6, 0.0).unwrap();
        assert_eq!(engine.triple().right, None);
        mouse(&mut engine, PointerPhase::Press, 650.0, 250.0, 10.0);
        mouse(&mut engine, PointerPhase::Release, 650.0, 250.0, 20.0);
        assert_eq!(engine.center_index(), 6);
        assert!(matches!(
            engine.pick_item(7, 30.0),
            Err(Error::ItemOutOfRange { index: 7, len: 7 })
        ));
    }

    #[test]
    fn strip_click_picks_date_and_converges() {
        let mut engine = engine();
        let target = d(2024, 6, 4);
        let x = screen_x_of(&engine, target);
        mouse(&mut engine, PointerPhase::Press, x, TIMELINE_TOP + 30.0, 0.0);
        mouse(&mut engine, PointerPhase::Release, x + 2.0, TIMELINE_TOP + 30.0, 30.0);

        assert_eq!(engine.selection().picked_date(), Some(target));
        assert_eq!(engine.scrolling_to(), Some(target));
        assert_eq!(engine.entry_phase(CardSlot::Center), EntryPhase::Hidden);
        let decoration = engine
            .cell_decoration(engine.strip().position_of(target).unwrap())
            .unwrap();
        assert!(decoration.selected && decoration.scrolling_to && !decoration.today);

        run_frames(&mut engine, 32.0, 2_000.0);
        assert_eq!(engine.scrolling_to(), None);
        let layout = engine.strip_layout().unwrap();
        let center = layout.cell_center(target).unwrap();
        assert!((center - engine.strip_offset() - 400.0).abs() <= 2.0);
    }

    #[test]
    fn rapid_date_clicks_restart_entry_and_supersede_scroll() {
        let mut engine = engine();
        engine.click_date(d(2024, 8, 1), 0.0).unwrap();
        run_frames(&mut engine, 0.0, 200.0);
        assert_eq!(engine.entry_phase(CardSlot::Center), EntryPhase::Falling);

        engine.click_date(d(2024, 3, 1), 210.0).unwrap();
        assert_eq!(engine.entry_phase(CardSlot::Center), EntryPhase::Hidden);
        assert_eq!(engine.scrolling_to(), Some(d(2024, 3, 1)));
        assert_eq!(engine.center_index(), 1);
    }

    #[test]
    fn out_of_range_date_is_a_no_op() {
        let mut engine = engine();
        let before = engine.center_index();
        assert!(matches!(
            engine.click_date(d(2025, 11, 15), 0.0),
            Err(Error::DateOutOfRange(_))
        ));
        assert_eq!(engine.center_index(), before);
        assert_eq!(engine.scrolling_to(), None);
        assert!(engine.strip().position_of(d(2025, 10, 31)).is_some());
        assert!(engine.strip().position_of(d(2025, 11, 1)).is_none());
    }

    #[test]
    fn timeline_drag_scrolls_clamped_and_cancels_smooth_scroll() {
        let mut engine = engine();
        engine.click_date(d(2024, 1, 15), 0.0).unwrap();
        assert!(engine.smooth.is_active());
        let start = engine.strip_offset();

        mouse(&mut engine, PointerPhase::Press, 400.0, TIMELINE_TOP + 10.0, 5.0);
        mouse(&mut engine, PointerPhase::Move, 500.0, TIMELINE_TOP + 10.0, 10.0);
        assert!(!engine.smooth.is_active());
        assert!(engine.is_timeline_dragging());
        assert!((engine.strip_offset() - (start - 80.0)).abs() < 1e-3);

        mouse(&mut engine, PointerPhase::Move, 100_000.0, TIMELINE_TOP + 10.0, 20.0);
        assert_eq!(engine.strip_offset(), 0.0);
        mouse(&mut engine, PointerPhase::Release, 100_000.0, TIMELINE_TOP + 10.0, 30.0);
        assert_eq!(engine.selection().picked_date(), Some(d(2024, 1, 15)));
    }

    #[test]
    fn slow_drag_during_convergence_never_restarts_a_scroll() {
        let mut engine = engine();
        engine.click_date(d(2024, 1, 15), 0.0).unwrap();
        run_frames(&mut engine, 16.0, 48.0);
        assert_eq!(engine.scrolling_to(), Some(d(2024, 1, 15)));

        mouse(&mut engine, PointerPhase::Press, 400.0, TIMELINE_TOP + 10.0, 50.0);
        let start = engine.strip_offset();
        let mut t = 50.0;
        for step in 1..=20 {
            t += 10.0;
            mouse(&mut engine, PointerPhase::Move, 400.0 + step as f32, TIMELINE_TOP + 10.0, t);
            engine.frame(t + 5.0);
            if engine.is_timeline_dragging() {
                assert!(!engine.smooth.is_active(), "strip moved under the pointer at {t}");
            }
        }
        assert!(engine.is_timeline_dragging());
        assert_eq!(engine.scrolling_to(), None);
        assert!((engine.strip_offset() - (start - 16.0)).abs() < 1e-3);

        run_frames(&mut engine, t + 16.0, t + 2_000.0);
        assert!((engine.strip_offset() - (start - 16.0)).abs() < 1e-3);
        mouse(&mut engine, PointerPhase::Release, 420.0, TIMELINE_TOP + 10.0, t + 2_000.0);
        assert_eq!(engine.selection().picked_date(), Some(d(2024, 1, 15)));
    }

    #[test]
    fn center_taps_just_past_the_window_both_toggle_voice() {
        let mut engine = engine();
        mouse(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        mouse(&mut engine, PointerPhase::Release, 400.0, 250.0, 0.0);
        engine.frame(399.0);
        mouse(&mut engine, PointerPhase::Press, 400.0, 250.0, 406.0);
        mouse(&mut engine, PointerPhase::Release, 400.0, 250.0, 406.0);
        engine.frame(411.0);
        engine.frame(1_000.0);
        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::VoiceModeChanged(true),
                EngineEvent::VoiceModeChanged(false)
            ]
        );
    }

    #[test]
    fn single_center_tap_toggles_voice_and_hides_strip() {
        let mut engine = engine();
        mouse(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        mouse(&mut engine, PointerPhase::Release, 400.0, 250.0, 50.0);
        engine.frame(300.0);
        assert!(!engine.voice().active, "waits for the double-tap window");
        engine.frame(460.0);
        assert!(engine.voice().active);
        assert_eq!(engine.drain_events(), vec![EngineEvent::VoiceModeChanged(true)]);

        engine.set_voice_available(false);
        assert!(!engine.voice().available);

        let before = engine.strip_offset();
        mouse(&mut engine, PointerPhase::Press, 400.0, TIMELINE_TOP + 10.0, 500.0);
        mouse(&mut engine, PointerPhase::Move, 600.0, TIMELINE_TOP + 10.0, 510.0);
        assert_eq!(engine.strip_offset(), before, "strip ignores gestures in voice mode");
    }

    #[test]
    fn inert_center_tap_does_nothing() {
        let mut settings = Settings::default();
        settings.launch.skip_landing = true;
        settings.center_tap = CenterTapAction::Inert;
        let mut engine = engine_with(settings);
        mouse(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        mouse(&mut engine, PointerPhase::Release, 400.0, 250.0, 50.0);
        run_frames(&mut engine, 60.0, 1_000.0);
        assert!(!engine.voice().active);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn double_tap_reveals_and_blocks_card_gestures_until_closed() {
        let mut engine = engine();
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        touch(&mut engine, PointerPhase::Release, 400.0, 250.0, 40.0);
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 150.0);
        touch(&mut engine, PointerPhase::Release, 400.0, 250.0, 190.0);
        engine.frame(200.0);
        assert_eq!(reveals(&engine.drain_events()), 1);
        assert!(engine.detail().is_some());

        touch(&mut engine, PointerPhase::Press, 650.0, 250.0, 300.0);
        touch(&mut engine, PointerPhase::Release, 650.0, 250.0, 320.0);
        assert_eq!(engine.center_index(), 2);
        run_frames(&mut engine, 330.0, 800.0);
        assert!(!engine.voice().active);

        engine.close_detail();
        touch(&mut engine, PointerPhase::Press, 650.0, 250.0, 900.0);
        touch(&mut engine, PointerPhase::Release, 650.0, 250.0, 920.0);
        assert_eq!(engine.center_index(), 3);
    }

    #[test]
    fn reveal_uses_fallback_detail_when_item_has_none() {
        let items = vec![MediaItem::new("a.jpg", d(2024, 3, 1), "Only", None)];
        let mut settings = Settings::default();
        settings.launch.skip_landing = true;
        let mut engine = CarouselEngine::new(
            settings,
            Catalog::new(items).unwrap(),
            d(2024, 6, 1),
            0.0,
        )
        .unwrap();
        engine.set_layout(regions(), StripMetrics::default(), 800.0);
        engine.reveal(0);
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::Reveal {
                index: 0,
                detail: Some("media/hero.mp4".to_string())
            }]
        );
    }

    #[test]
    fn landing_blocks_input_and_ready_replays_entry() {
        let mut engine = engine_with(Settings::default());
        assert_eq!(engine.launch_sequence().stage(), LaunchStage::Landing);
        touch(&mut engine, PointerPhase::Press, 400.0, 250.0, 0.0);
        run_frames(&mut engine, 0.0, 2_500.0);
        touch(&mut engine, PointerPhase::Release, 400.0, 250.0, 2_500.0);
        assert_eq!(reveals(&engine.drain_events()), 0);

        engine.launch(3_000.0);
        run_frames(&mut engine, 3_000.0, 6_100.0);
        assert!(engine.launch_sequence().is_ready());
        assert_eq!(engine.entry_phase(CardSlot::Center), EntryPhase::Hidden);
        run_frames(&mut engine, 6_104.0, 7_400.0);
        assert!(engine.entry.is_live(CardSlot::Left));
    }

    #[test]
    fn month_summary_counts_memories_and_selected_day() {
        let mut engine = engine();
        let march = engine
            .strip()
            .months()
            .iter()
            .position(|m| m.year == 2024 && m.month == 3)
            .unwrap();
        assert_eq!(
            engine.month_summary(march),
            Some(MonthSummary {
                memories: 1,
                selected_day: None
            })
        );
        engine.click_date(d(2024, 3, 9), 0.0).unwrap();
        assert_eq!(engine.month_summary(march).unwrap().selected_day, Some(9));
        assert_eq!(engine.month_summary(march + 1).unwrap().selected_day, None);
    }

    #[test]
    fn today_decoration_yields_to_a_picked_date() {
        let mut engine = engine();
        let today = engine.strip().position_of(d(2024, 6, 1)).unwrap();
        assert!(engine.cell_decoration(today).unwrap().today);
        engine.click_date(d(2024, 6, 2), 0.0).unwrap();
        assert!(!engine.cell_decoration(today).unwrap().today);
        assert!(engine.cell_decoration(today).unwrap().is_plain());
    }
}
