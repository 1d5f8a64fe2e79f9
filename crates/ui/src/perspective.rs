//! Card geometry: 3D tilt projection, entry offsets and the hold border path.

use egui::{pos2, vec2, Pos2, Rect, Vec2};
use memoir_state::compositor::OrientationVector;
use memoir_state::easing::CubicBezier;
use memoir_state::entry::EntryPhase;
use memoir_state::selection::CardSlot;

use crate::constants::{FALL_DISTANCE, FALL_MS, SLIDE_DISTANCE, SLIDE_MS};

/// Projects a point on the card, given in unit coordinates (`u`, `v` in
/// 0..=1 from the top-left), after `rotateX` then `rotateY` about the
/// card's center, viewed from `perspective` px away. Positive `rotate_x`
/// tips the top edge away; positive `rotate_y` tips the right edge away.
pub fn project(rect: Rect, rotation: OrientationVector, perspective: f32, u: f32, v: f32) -> Pos2 {
    let center = rect.center();
    let x = (u - 0.5) * rect.width();
    let y = (v - 0.5) * rect.height();

    let (sin_y, cos_y) = rotation.rotate_y.to_radians().sin_cos();
    let x1 = x * cos_y;
    let z1 = -x * sin_y;

    let (sin_x, cos_x) = rotation.rotate_x.to_radians().sin_cos();
    let y2 = y * cos_x - z1 * sin_x;
    let z2 = y * sin_x + z1 * cos_x;

    let depth = (perspective - z2).max(1.0);
    let scale = perspective / depth;
    pos2(center.x + x1 * scale, center.y + y2 * scale)
}

/// Corners clockwise from the top-left.
pub fn project_quad(rect: Rect, rotation: OrientationVector, perspective: f32) -> [Pos2; 4] {
    [
        project(rect, rotation, perspective, 0.0, 0.0),
        project(rect, rotation, perspective, 1.0, 0.0),
        project(rect, rotation, perspective, 1.0, 1.0),
        project(rect, rotation, perspective, 0.0, 1.0),
    ]
}

/// A textured grid mesh of the projected card. Subdividing keeps the
/// affine texture mapping close to true perspective.
pub fn card_mesh(
    rect: Rect,
    rotation: OrientationVector,
    perspective: f32,
    subdivisions: usize,
    texture: egui::TextureId,
    tint: egui::Color32,
) -> egui::Mesh {
    let n = subdivisions.max(1);
    let mut mesh = egui::Mesh::with_texture(texture);
    for row in 0..=n {
        for col in 0..=n {
            let u = col as f32 / n as f32;
            let v = row as f32 / n as f32;
            mesh.vertices.push(egui::epaint::Vertex {
                pos: project(rect, rotation, perspective, u, v),
                uv: pos2(u, v),
                color: tint,
            });
        }
    }
    let stride = (n + 1) as u32;
    for row in 0..n as u32 {
        for col in 0..n as u32 {
            let top_left = row * stride + col;
            let top_right = top_left + 1;
            let bottom_left = top_left + stride;
            let bottom_right = bottom_left + 1;
            mesh.add_triangle(top_left, top_right, bottom_right);
            mesh.add_triangle(top_left, bottom_right, bottom_left);
        }
    }
    mesh
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryTransform {
    pub offset: Vec2,
    pub opacity: f32,
}

impl EntryTransform {
    pub const REST: Self = Self {
        offset: Vec2::ZERO,
        opacity: 1.0,
    };
}

/// Fixed entry transform for a slot that has not finished entering.
pub fn entry_transform(phase: EntryPhase, slot: CardSlot, elapsed_ms: f64) -> EntryTransform {
    match phase {
        EntryPhase::Hidden => EntryTransform {
            offset: Vec2::ZERO,
            opacity: 0.0,
        },
        EntryPhase::Falling => {
            let t = eased(elapsed_ms, FALL_MS);
            EntryTransform {
                offset: vec2(0.0, -FALL_DISTANCE * (1.0 - t)),
                opacity: t,
            }
        }
        EntryPhase::Sliding => {
            let t = eased(elapsed_ms, SLIDE_MS);
            let from = match slot {
                CardSlot::Left => -SLIDE_DISTANCE,
                CardSlot::Right => SLIDE_DISTANCE,
                CardSlot::Center => 0.0,
            };
            EntryTransform {
                offset: vec2(from * (1.0 - t), 0.0),
                opacity: t,
            }
        }
        EntryPhase::Complete => EntryTransform::REST,
    }
}

fn eased(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    CubicBezier::EASE_OUT.ease((elapsed_ms / duration_ms) as f32)
}

/// The part of the closed outline `corners` covered by `fraction`,
/// traced clockwise from the first corner.
pub fn border_path(corners: [Pos2; 4], fraction: f32) -> Vec<Pos2> {
    let fraction = fraction.clamp(0.0, 1.0);
    let edges: Vec<(Pos2, Pos2)> = (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect();
    let perimeter: f32 = edges.iter().map(|(a, b)| a.distance(*b)).sum();
    let mut remaining = perimeter * fraction;

    let mut path = vec![corners[0]];
    for (a, b) in edges {
        if remaining <= 0.0 {
            break;
        }
        let len = a.distance(b);
        if remaining >= len {
            path.push(b);
            remaining -= len;
            continue;
        }
        if len > 0.0 {
            path.push(a + (b - a) * (remaining / len));
        }
        break;
    }
    path
}
