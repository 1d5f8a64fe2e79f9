use egui::{pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};
use memoir_state::calendar::short_label;
use memoir_state::catalog::MediaItem;
use memoir_state::compositor::OrientationVector;
use memoir_state::entry::EntryPhase;
use memoir_state::selection::CardSlot;
use memoir_state::CarouselEngine;

use crate::constants::{
    CARD_GAP, CENTER_CARD, HOLD_BORDER_WIDTH, LARGE_CAPTION_MAX_WORDS, MESH_SUBDIVISIONS,
    PERSPECTIVE_PX, SIDE_CARD,
};
use crate::perspective::{border_path, card_mesh, entry_transform, project_quad};
use crate::theme;
use crate::TextureLookup;

/// Resting card rectangles, scaled down to fit `area`. Left, center, right.
pub fn card_rects(area: Rect) -> [Rect; 3] {
    let needed = vec2(
        CENTER_CARD.x + 2.0 * (SIDE_CARD.x + CARD_GAP) + 40.0,
        CENTER_CARD.y + 40.0,
    );
    let scale = (area.width() / needed.x)
        .min(area.height() / needed.y)
        .clamp(0.1, 1.0);

    let center = area.center();
    let side_dx = (CENTER_CARD.x * 0.5 + CARD_GAP + SIDE_CARD.x * 0.5) * scale;
    [
        Rect::from_center_size(pos2(center.x - side_dx, center.y), SIDE_CARD * scale),
        Rect::from_center_size(center, CENTER_CARD * scale),
        Rect::from_center_size(pos2(center.x + side_dx, center.y), SIDE_CARD * scale),
    ]
}

/// Whether a caption is drawn in the large style.
pub fn is_large_caption(slot: CardSlot, item: &MediaItem) -> bool {
    slot.is_center() && item.caption_word_count() <= LARGE_CAPTION_MAX_WORDS
}

/// Paints the three cards and returns their on-screen hit rectangles.
pub fn carousel(
    ui: &mut egui::Ui,
    engine: &CarouselEngine,
    textures: &dyn TextureLookup,
    now_ms: f64,
) -> [Option<Rect>; 3] {
    let area = ui.available_rect_before_wrap();
    ui.allocate_rect(area, Sense::hover());
    let painter = ui.painter().with_clip_rect(area);

    let rects = card_rects(area);
    let triple = engine.triple();
    let mut hits = [None; 3];

    // Center last so it overlaps its neighbours.
    for slot in [CardSlot::Left, CardSlot::Right, CardSlot::Center] {
        let Some(item) = triple.get(slot).and_then(|index| engine.item(index)) else {
            continue;
        };
        let phase = engine.entry_phase(slot);
        let entry = entry_transform(phase, slot, engine.entry_elapsed_ms(slot, now_ms));
        if entry.opacity <= 0.0 {
            continue;
        }

        let rect = rects[slot.index()].translate(entry.offset);
        let rotation = if phase == EntryPhase::Complete {
            engine.rotation(slot)
        } else {
            OrientationVector::ZERO
        };
        let quad = project_quad(rect, rotation, PERSPECTIVE_PX);

        paint_card(&painter, item, rect, rotation, quad, entry.opacity, textures);
        paint_caption(&painter, engine, slot, item, quad, entry.opacity);

        if slot.is_center() && engine.hold_progress() > 0.0 {
            let path = border_path(quad, engine.hold_progress() / 100.0);
            painter.add(Shape::line(
                path,
                Stroke::new(HOLD_BORDER_WIDTH, theme::HOLD_BORDER),
            ));
        }

        hits[slot.index()] = Some(Rect::from_points(&quad));
    }
    hits
}

fn paint_card(
    painter: &egui::Painter,
    item: &MediaItem,
    rect: Rect,
    rotation: OrientationVector,
    quad: [Pos2; 4],
    opacity: f32,
    textures: &dyn TextureLookup,
) {
    let shadow: Vec<Pos2> = quad.iter().map(|p| *p + vec2(0.0, 12.0)).collect();
    painter.add(Shape::convex_polygon(
        shadow,
        theme::CARD_SHADOW.gamma_multiply(opacity),
        Stroke::NONE,
    ));

    match textures.image(&item.id) {
        Some(texture) => {
            painter.add(Shape::mesh(card_mesh(
                rect,
                rotation,
                PERSPECTIVE_PX,
                MESH_SUBDIVISIONS,
                texture.id(),
                Color32::WHITE.gamma_multiply(opacity),
            )));
        }
        None => {
            painter.add(Shape::convex_polygon(
                quad.to_vec(),
                theme::CARD_PLACEHOLDER.gamma_multiply(opacity),
                Stroke::new(1.0, theme::BG_SURFACE),
            ));
            let label = if textures.is_pending(&item.id) {
                "Loading..."
            } else {
                "No image"
            };
            painter.text(
                Rect::from_points(&quad).center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(13.0),
                theme::TEXT_DIM.gamma_multiply(opacity),
            );
        }
    }
}

fn paint_caption(
    painter: &egui::Painter,
    engine: &CarouselEngine,
    slot: CardSlot,
    item: &MediaItem,
    quad: [Pos2; 4],
    opacity: f32,
) {
    let bottom_mid = pos2((quad[2].x + quad[3].x) * 0.5, (quad[2].y + quad[3].y) * 0.5);
    let size = if is_large_caption(slot, item) { 26.0 } else { 15.0 };
    painter.text(
        bottom_mid - vec2(0.0, 16.0),
        Align2::CENTER_BOTTOM,
        &item.caption,
        FontId::proportional(size),
        theme::TEXT_PRIMARY.gamma_multiply(opacity),
    );

    if engine.range().contains(item.date) {
        let top_left = quad[0] + vec2(12.0, 12.0);
        let galley = painter.layout_no_wrap(
            short_label(item.date),
            FontId::proportional(12.0),
            theme::TEXT_PRIMARY.gamma_multiply(opacity),
        );
        let badge = Rect::from_min_size(top_left, galley.size() + vec2(12.0, 6.0));
        painter.rect_filled(badge, theme::ROUNDING_SM, theme::BACKDROP.gamma_multiply(opacity * 0.6));
        painter.galley(badge.min + vec2(6.0, 3.0), galley, theme::TEXT_PRIMARY);
    }
}
