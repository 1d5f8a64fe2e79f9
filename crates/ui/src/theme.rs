use egui::{Color32, CornerRadius, Stroke, Style, Visuals};

pub const BG_DARK: Color32 = Color32::from_rgb(14, 14, 22);
pub const BG_PANEL: Color32 = Color32::from_rgb(20, 20, 32);
pub const BG_SURFACE: Color32 = Color32::from_rgb(34, 34, 52);
pub const ACCENT: Color32 = Color32::from_rgb(233, 69, 96);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(255, 160, 120);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(236, 232, 228);
pub const TEXT_DIM: Color32 = Color32::from_rgb(140, 140, 160);
pub const TEXT_DISABLED: Color32 = Color32::from_rgb(70, 70, 86);
pub const CARD_PLACEHOLDER: Color32 = Color32::from_rgb(44, 44, 66);
pub const CARD_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 110);
pub const HOLD_BORDER: Color32 = Color32::from_rgb(255, 214, 102);
pub const TODAY_RING: Color32 = Color32::from_rgb(120, 200, 255);
pub const SCROLLING_RING: Color32 = Color32::from_rgb(255, 214, 102);
pub const BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 220);

pub const ROUNDING: CornerRadius = CornerRadius::same(12);
pub const ROUNDING_SM: CornerRadius = CornerRadius::same(6);

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_DARK;
    visuals.extreme_bg_color = BG_DARK;
    visuals.faint_bg_color = BG_SURFACE;

    visuals.widgets.noninteractive.bg_fill = BG_SURFACE;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    visuals.widgets.inactive.bg_fill = BG_SURFACE;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(60, 50, 80);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.4);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(18.0, 8.0);

    ctx.set_style(style);
}
