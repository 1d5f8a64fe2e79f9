use egui::vec2;

pub const HEADER_HEIGHT: f32 = 64.0;
pub const STRIP_HEIGHT: f32 = 96.0;
pub const STRIP_MONTH_ROW: f32 = 28.0;

pub const CENTER_CARD: egui::Vec2 = vec2(300.0, 400.0);
pub const SIDE_CARD: egui::Vec2 = vec2(240.0, 320.0);
pub const CARD_GAP: f32 = 56.0;
pub const PERSPECTIVE_PX: f32 = 1_000.0;
pub const MESH_SUBDIVISIONS: usize = 8;
pub const HOLD_BORDER_WIDTH: f32 = 4.0;

pub const FALL_DISTANCE: f32 = 120.0;
pub const FALL_MS: f64 = 600.0;
pub const SLIDE_DISTANCE: f32 = 160.0;
pub const SLIDE_MS: f64 = 500.0;

pub const LARGE_CAPTION_MAX_WORDS: usize = 4;
pub const VOICE_BARS: usize = 32;
