use egui::{vec2, Align2, Color32, FontId, Id, Order, Rect, Sense};
use memoir_state::calendar::short_label;
use memoir_state::engine::VoiceMode;
use memoir_state::launch::{LaunchStage, Typewriter};
use memoir_state::CarouselEngine;

use crate::constants::HEADER_HEIGHT;
use crate::theme;
use crate::TextureLookup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    Launch,
    CloseDetail,
}

pub fn header(ui: &mut egui::Ui, engine: &CarouselEngine) {
    ui.set_height(HEADER_HEIGHT);
    ui.horizontal_centered(|ui| {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("Memoir")
                .size(24.0)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(16.0);

        let (label, color) = match engine.selection().picked_date() {
            Some(date) => (short_label(date), theme::ACCENT),
            None => (format!("Today · {}", short_label(engine.today())), theme::TEXT_DIM),
        };
        ui.colored_label(color, label);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(12.0);
            if engine.voice().active {
                ui.colored_label(theme::ACCENT_SOFT, "Listening");
            }
            if engine.is_timeline_dragging() {
                ui.colored_label(theme::TEXT_DIM, "Scrubbing");
            }
        });
    });
}

/// Full-window launch screens. Nothing is drawn once the launch is ready.
pub fn launch_screen(ctx: &egui::Context, engine: &CarouselEngine, now_ms: f64) -> OverlayAction {
    let launch = engine.launch_sequence();
    let elapsed = launch.stage_elapsed_ms(now_ms);
    let mut action = OverlayAction::None;

    match launch.stage() {
        LaunchStage::Ready => {}
        LaunchStage::Landing => {
            let tagline = Typewriter::tagline();
            full_screen(ctx, "landing", |ui, rect| {
                logo(ui, rect, 1.0);
                ui.painter().text(
                    rect.center() + vec2(0.0, 30.0),
                    Align2::CENTER_TOP,
                    tagline.visible(elapsed),
                    FontId::proportional(18.0),
                    theme::TEXT_DIM,
                );

                let button_rect = Rect::from_center_size(rect.center() + vec2(0.0, 110.0), vec2(160.0, 44.0));
                let ready = tagline.is_complete(elapsed);
                let button = egui::Button::new(egui::RichText::new("Launch").size(18.0))
                    .fill(theme::ACCENT)
                    .corner_radius(theme::ROUNDING);
                if ui.put(button_rect, |ui: &mut egui::Ui| ui.add_enabled(ready, button)).clicked() {
                    action = OverlayAction::Launch;
                }
            });
        }
        LaunchStage::LogoOut => {
            let total = engine.settings().launch.logo_out_ms.max(1.0);
            let fade = (1.0 - elapsed / total).clamp(0.0, 1.0) as f32;
            full_screen(ctx, "logo_out", |ui, rect| logo(ui, rect, fade));
        }
        LaunchStage::Loading => {
            let line = Typewriter::loading();
            full_screen(ctx, "loading", |ui, rect| {
                ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    line.visible(elapsed),
                    FontId::proportional(18.0),
                    theme::TEXT_PRIMARY,
                );
            });
        }
    }
    action
}

fn full_screen(ctx: &egui::Context, id: &str, add_contents: impl FnOnce(&mut egui::Ui, Rect)) {
    let screen = ctx.screen_rect();
    egui::Area::new(Id::new(("launch", id)))
        .order(Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.set_min_size(screen.size());
            ui.painter().rect_filled(screen, egui::CornerRadius::ZERO, theme::BG_DARK);
            add_contents(ui, screen);
        });
}

fn logo(ui: &egui::Ui, rect: Rect, opacity: f32) {
    ui.painter().text(
        rect.center() - vec2(0.0, 20.0),
        Align2::CENTER_BOTTOM,
        "Memoir",
        FontId::proportional(56.0),
        theme::TEXT_PRIMARY.gamma_multiply(opacity),
    );
}

/// The full-screen view of a revealed memory.
pub fn detail_view(
    ctx: &egui::Context,
    engine: &CarouselEngine,
    textures: &dyn TextureLookup,
) -> OverlayAction {
    let Some(detail) = engine.detail() else {
        return OverlayAction::None;
    };
    let mut action = OverlayAction::None;
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = OverlayAction::CloseDetail;
    }

    let screen = ctx.screen_rect();
    egui::Area::new(Id::new("detail_view"))
        .order(Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.set_min_size(screen.size());
            // Swallow clicks so nothing underneath reacts.
            ui.interact(screen, Id::new("detail_backdrop"), Sense::click());
            ui.painter().rect_filled(screen, egui::CornerRadius::ZERO, theme::BACKDROP);

            let item = engine.item(detail.index);
            let frame = Rect::from_center_size(screen.center(), screen.size() * 0.7);
            match item.and_then(|item| textures.image(&item.id)) {
                Some(texture) => {
                    let size = fit(texture.size_vec2(), frame.size());
                    egui::Image::new((texture.id(), size))
                        .corner_radius(theme::ROUNDING)
                        .paint_at(ui, Rect::from_center_size(frame.center(), size));
                }
                None => {
                    ui.painter().rect_filled(frame, theme::ROUNDING, theme::CARD_PLACEHOLDER);
                }
            }

            if let Some(item) = item {
                ui.painter().text(
                    frame.center_bottom() + vec2(0.0, 16.0),
                    Align2::CENTER_TOP,
                    format!("{} · {}", item.caption, short_label(item.date)),
                    FontId::proportional(18.0),
                    theme::TEXT_PRIMARY,
                );
            }
            if let Some(reference) = &detail.detail {
                ui.painter().text(
                    frame.center_bottom() + vec2(0.0, 44.0),
                    Align2::CENTER_TOP,
                    reference,
                    FontId::monospace(12.0),
                    theme::TEXT_DIM,
                );
            }

            let close = Rect::from_min_size(screen.right_top() + vec2(-56.0, 16.0), vec2(40.0, 40.0));
            if ui
                .put(close, egui::Button::new("✕").corner_radius(theme::ROUNDING))
                .on_hover_text("Close")
                .clicked()
            {
                action = OverlayAction::CloseDetail;
            }
        });
    action
}

/// Largest size with `image`'s aspect ratio that fits in `bounds`.
pub fn fit(image: egui::Vec2, bounds: egui::Vec2) -> egui::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.x / image.x).min(bounds.y / image.y);
    image * scale
}

/// Amplitude bars in place of the date strip while voice mode is on.
pub fn voice_indicator(ui: &mut egui::Ui, voice: VoiceMode, levels: &[f32], height: f32) {
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter().with_clip_rect(rect);
    painter.rect_filled(rect, egui::CornerRadius::ZERO, theme::BG_PANEL);

    if !voice.available {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Microphone unavailable",
            FontId::proportional(14.0),
            theme::TEXT_DISABLED,
        );
        return;
    }

    for (bar, bar_rect) in bar_rects(rect, levels).into_iter().enumerate() {
        let color = if bar + 1 == levels.len() {
            theme::ACCENT
        } else {
            theme::ACCENT_SOFT.gamma_multiply(0.8)
        };
        painter.rect_filled(bar_rect, egui::CornerRadius::same(2), color);
    }
    if levels.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Listening...",
            FontId::proportional(14.0),
            Color32::from_gray(160),
        );
    }
}

/// One bar per level, centered vertically, with a minimum visible height.
pub fn bar_rects(rect: Rect, levels: &[f32]) -> Vec<Rect> {
    const BAR_WIDTH: f32 = 6.0;
    const BAR_GAP: f32 = 4.0;
    let total = levels.len() as f32 * (BAR_WIDTH + BAR_GAP) - BAR_GAP;
    let mut x = rect.center().x - total * 0.5;
    let max_height = rect.height() - 16.0;
    levels
        .iter()
        .map(|level| {
            let height = (level.clamp(0.0, 1.0) * max_height).max(4.0);
            let bar = Rect::from_center_size(
                egui::pos2(x + BAR_WIDTH * 0.5, rect.center().y),
                vec2(BAR_WIDTH, height),
            );
            x += BAR_WIDTH + BAR_GAP;
            bar
        })
        .collect()
}
