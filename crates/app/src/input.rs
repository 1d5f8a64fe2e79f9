use egui::{Event, PointerButton, Pos2, TouchPhase};
use memoir_state::gesture::{PointerEvent, PointerKind, PointerPhase};

/// Turns raw egui events into engine pointer events.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    last_mouse: Option<Pos2>,
}

impl PointerTranslator {
    /// egui mirrors touches as synthetic mouse events. Frames carrying any
    /// touch only report the touches so one contact is never seen twice.
    pub fn translate(&mut self, events: &[Event]) -> Vec<PointerEvent> {
        let has_touch = events.iter().any(|e| matches!(e, Event::Touch { .. }));
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::Touch { phase, pos, .. } => {
                    let phase = match phase {
                        TouchPhase::Start => PointerPhase::Press,
                        TouchPhase::Move => PointerPhase::Move,
                        TouchPhase::End => PointerPhase::Release,
                        TouchPhase::Cancel => PointerPhase::Cancel,
                    };
                    out.push(PointerEvent::new(PointerKind::Touch, phase, *pos));
                }
                _ if has_touch => {}
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    self.last_mouse = Some(*pos);
                    let phase = if *pressed {
                        PointerPhase::Press
                    } else {
                        PointerPhase::Release
                    };
                    out.push(PointerEvent::new(PointerKind::Mouse, phase, *pos));
                }
                Event::PointerMoved(pos) => {
                    self.last_mouse = Some(*pos);
                    out.push(PointerEvent::new(PointerKind::Mouse, PointerPhase::Move, *pos));
                }
                Event::PointerGone => {
                    if let Some(pos) = self.last_mouse.take() {
                        out.push(PointerEvent::new(PointerKind::Mouse, PointerPhase::Leave, pos));
                    }
                }
                _ => {}
            }
        }
        out
    }
}
