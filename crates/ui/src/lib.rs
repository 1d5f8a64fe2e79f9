pub mod carousel;
pub mod constants;
pub mod date_strip;
pub mod overlay;
pub mod perspective;
pub mod theme;

use memoir_state::catalog::MediaId;

pub trait TextureLookup {
    fn image(&self, id: &MediaId) -> Option<&egui::TextureHandle>;
    fn is_pending(&self, id: &MediaId) -> bool;
}
