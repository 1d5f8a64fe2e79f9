//! Per-slot card orientation.
//!
//! Each frame a slot's rotation is `base + drag + idle`. The center slot
//! never floats, and a slot being dragged shows no idle contribution.
//! While any slot is mid-drag the idle waveform is frozen for all slots.

use std::ops::{Add, Mul};

use crate::config::IdleSettings;
use crate::easing::CubicBezier;
use crate::selection::CardSlot;

pub const BASE_ROTATION_Y: f32 = 20.0;

/// Rotation in degrees around the X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationVector {
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl OrientationVector {
    pub const ZERO: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    pub fn new(rotate_x: f32, rotate_y: f32) -> Self {
        Self { rotate_x, rotate_y }
    }

    pub fn clamped(self, max: f32) -> Self {
        Self {
            rotate_x: self.rotate_x.clamp(-max, max),
            rotate_y: self.rotate_y.clamp(-max, max),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.rotate_x == 0.0 && self.rotate_y == 0.0
    }
}

impl Add for OrientationVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            rotate_x: self.rotate_x + rhs.rotate_x,
            rotate_y: self.rotate_y + rhs.rotate_y,
        }
    }
}

impl Mul<f32> for OrientationVector {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            rotate_x: self.rotate_x * rhs,
            rotate_y: self.rotate_y * rhs,
        }
    }
}

pub fn base_orientation(slot: CardSlot) -> OrientationVector {
    match slot {
        CardSlot::Left => OrientationVector::new(0.0, -BASE_ROTATION_Y),
        CardSlot::Center => OrientationVector::ZERO,
        CardSlot::Right => OrientationVector::new(0.0, BASE_ROTATION_Y),
    }
}

#[derive(Debug, Clone, Copy)]
struct SpringBack {
    from: OrientationVector,
    started_at_ms: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotMotion {
    drag: OrientationVector,
    idle: OrientationVector,
    phase: f32,
    dragging: bool,
    spring: Option<SpringBack>,
}

#[derive(Debug, Clone)]
pub struct Compositor {
    slots: [SlotMotion; 3],
    last_frame_ms: Option<f64>,
    idle: IdleSettings,
    spring_back_ms: f64,
}

impl Compositor {
    pub fn new(idle: &IdleSettings, spring_back_ms: f64) -> Self {
        let mut slots = [SlotMotion::default(); 3];
        for (motion, offset) in slots.iter_mut().zip(idle.phase_offsets) {
            motion.phase = offset;
        }
        Self {
            slots,
            last_frame_ms: None,
            idle: idle.clone(),
            spring_back_ms,
        }
    }

    pub fn begin_drag(&mut self, slot: CardSlot) {
        let motion = &mut self.slots[slot.index()];
        motion.dragging = true;
        motion.spring = None;
    }

    pub fn set_drag(&mut self, slot: CardSlot, rotation: OrientationVector) {
        let motion = &mut self.slots[slot.index()];
        if motion.dragging {
            motion.drag = rotation;
        }
    }

    /// Starts easing the drag rotation back to zero.
    pub fn end_drag(&mut self, slot: CardSlot, now_ms: f64) {
        let motion = &mut self.slots[slot.index()];
        if !motion.dragging {
            return;
        }
        motion.dragging = false;
        if !motion.drag.is_zero() {
            motion.spring = Some(SpringBack {
                from: motion.drag,
                started_at_ms: now_ms,
            });
        }
    }

    pub fn is_dragging(&self, slot: CardSlot) -> bool {
        self.slots[slot.index()].dragging
    }

    pub fn any_dragging(&self) -> bool {
        self.slots.iter().any(|m| m.dragging)
    }

    pub fn tick(&mut self, now_ms: f64) {
        let dt = self
            .last_frame_ms
            .map(|last| (now_ms - last).max(0.0))
            .unwrap_or(0.0);
        self.last_frame_ms = Some(now_ms);

        for motion in &mut self.slots {
            let Some(spring) = motion.spring else {
                continue;
            };
            let t = if self.spring_back_ms > 0.0 {
                ((now_ms - spring.started_at_ms) / self.spring_back_ms) as f32
            } else {
                1.0
            };
            if t >= 1.0 {
                motion.drag = OrientationVector::ZERO;
                motion.spring = None;
            } else {
                motion.drag = spring.from * (1.0 - CubicBezier::SPRING_BACK.ease(t));
            }
        }

        if self.any_dragging() {
            return;
        }

        let max = self.idle.max_rotation;
        let (amp_x, amp_y) = (max * self.idle.amplitude_x, max * self.idle.amplitude_y);
        let advance = self.idle.speed * dt as f32;
        for slot in CardSlot::ALL {
            let motion = &mut self.slots[slot.index()];
            if slot.is_center() {
                motion.idle = OrientationVector::ZERO;
                continue;
            }
            motion.idle = OrientationVector::new(
                motion.phase.sin() * amp_x,
                (motion.phase * 0.7).cos() * amp_y,
            );
            motion.phase += advance;
        }
    }

    pub fn drag(&self, slot: CardSlot) -> OrientationVector {
        self.slots[slot.index()].drag
    }

    pub fn idle(&self, slot: CardSlot) -> OrientationVector {
        if slot.is_center() {
            return OrientationVector::ZERO;
        }
        self.slots[slot.index()].idle
    }

    pub fn final_rotation(&self, slot: CardSlot) -> OrientationVector {
        let base = base_orientation(slot) + self.drag(slot);
        if slot.is_center() || self.is_dragging(slot) {
            base
        } else {
            base + self.idle(slot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compositor() -> Compositor {
        Compositor::new(&IdleSettings::default(), 600.0)
    }

    fn run(c: &mut Compositor, from_ms: f64, to_ms: f64) {
        let mut t = from_ms;
        while t <= to_ms {
            c.tick(t);
            t += 16.0;
        }
    }

    #[test]
    fn center_never_floats() {
        let mut c = compositor();
        for step in 0..500 {
            c.tick(step as f64 * 37.0);
            assert_eq!(c.idle(CardSlot::Center), OrientationVector::ZERO);
            assert_eq!(c.final_rotation(CardSlot::Center), OrientationVector::ZERO);
        }
    }

    #[test]
    fn side_slots_float_out_of_phase() {
        let mut c = compositor();
        run(&mut c, 0.0, 3_000.0);
        let left = c.idle(CardSlot::Left);
        let right = c.idle(CardSlot::Right);
        assert!(!left.is_zero());
        assert_ne!(left, right);
        let bound_x = 8.0 * 1.2 + 1e-3;
        let bound_y = 8.0 * 1.5 + 1e-3;
        assert!(left.rotate_x.abs() <= bound_x && left.rotate_y.abs() <= bound_y);
    }

    #[test]
    fn idle_follows_phase_waveform() {
        let mut c = compositor();
        c.tick(0.0);
        // First frame samples the initial phase (0 for the left slot).
        let left = c.idle(CardSlot::Left);
        assert!((left.rotate_x - 0.0).abs() < 1e-6);
        assert!((left.rotate_y - 12.0).abs() < 1e-4);

        c.tick(1_000.0);
        let left = c.idle(CardSlot::Left);
        assert!((left.rotate_x - 0.0).abs() < 1e-6, "phase advances after sampling");
        c.tick(1_000.0);
        let phase = 0.4_f32;
        let left = c.idle(CardSlot::Left);
        assert!((left.rotate_x - phase.sin() * 9.6).abs() < 1e-4);
        assert!((left.rotate_y - (phase * 0.7).cos() * 12.0).abs() < 1e-4);
    }

    #[test]
    fn final_rotation_adds_base_drag_and_idle() {
        let mut c = compositor();
        run(&mut c, 0.0, 500.0);
        let expected = base_orientation(CardSlot::Right) + c.idle(CardSlot::Right);
        assert_eq!(c.final_rotation(CardSlot::Right), expected);
    }

    #[test]
    fn any_drag_freezes_idle_for_every_slot() {
        let mut c = compositor();
        run(&mut c, 0.0, 800.0);
        let frozen_left = c.idle(CardSlot::Left);
        let frozen_right = c.idle(CardSlot::Right);

        c.begin_drag(CardSlot::Left);
        c.set_drag(CardSlot::Left, OrientationVector::new(5.0, -10.0));
        run(&mut c, 816.0, 2_000.0);
        assert_eq!(c.idle(CardSlot::Left), frozen_left);
        assert_eq!(c.idle(CardSlot::Right), frozen_right);

        // The dragged slot shows no idle at all.
        assert_eq!(
            c.final_rotation(CardSlot::Left),
            base_orientation(CardSlot::Left) + OrientationVector::new(5.0, -10.0)
        );
    }

    #[test]
    fn drag_is_ignored_unless_dragging() {
        let mut c = compositor();
        c.set_drag(CardSlot::Right, OrientationVector::new(3.0, 3.0));
        assert_eq!(c.drag(CardSlot::Right), OrientationVector::ZERO);
    }

    #[test]
    fn release_springs_back_to_zero() {
        let mut c = compositor();
        c.tick(0.0);
        c.begin_drag(CardSlot::Center);
        c.set_drag(CardSlot::Center, OrientationVector::new(20.0, -25.0));
        c.end_drag(CardSlot::Center, 100.0);

        c.tick(400.0);
        let mid = c.drag(CardSlot::Center);
        assert!(mid.rotate_x > 0.0 && mid.rotate_x < 20.0);
        assert!(mid.rotate_y < 0.0 && mid.rotate_y > -25.0);

        c.tick(700.0);
        assert_eq!(c.drag(CardSlot::Center), OrientationVector::ZERO);
    }

    #[test]
    fn clamp_bounds_each_axis() {
        let v = OrientationVector::new(40.0, -90.0).clamped(25.0);
        assert_eq!(v, OrientationVector::new(25.0, -25.0));
    }
}
