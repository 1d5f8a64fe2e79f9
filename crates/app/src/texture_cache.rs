use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use memoir_state::catalog::{Catalog, MediaId};

use crate::workers::image_worker::{DecodedImage, ImageRequest};

#[derive(Default)]
pub struct TextureCache {
    pub images: HashMap<MediaId, egui::TextureHandle>,
    pub pending: HashSet<MediaId>,
    pub failed: HashSet<MediaId>,
}

impl TextureCache {
    /// Queues every catalog image not already loaded or queued. `first`
    /// is decoded ahead of the rest.
    pub fn request_all(
        &mut self,
        catalog: &Catalog,
        first: usize,
        req_tx: &mpsc::Sender<ImageRequest>,
    ) {
        for (index, item) in catalog.items().iter().enumerate() {
            if self.images.contains_key(&item.id)
                || self.failed.contains(&item.id)
                || !self.pending.insert(item.id)
            {
                continue;
            }
            let request = ImageRequest::Decode {
                id: item.id,
                path: item.url.clone(),
                priority: index == first,
            };
            if req_tx.send(request).is_err() {
                log::warn!("image worker stopped; images will stay as placeholders");
                self.pending.remove(&item.id);
                return;
            }
        }
    }

    /// Uploads a decoded image. Returns true when the cache changed.
    pub fn receive(&mut self, ctx: &egui::Context, decoded: DecodedImage) -> bool {
        self.pending.remove(&decoded.id);
        let Some(img) = decoded.image else {
            self.failed.insert(decoded.id);
            return true;
        };
        let texture = ctx.load_texture(
            format!("memory_{:?}", decoded.id),
            egui::ColorImage::from_rgba_unmultiplied(
                [img.width() as usize, img.height() as usize],
                img.as_raw(),
            ),
            egui::TextureOptions::LINEAR,
        );
        self.images.insert(decoded.id, texture);
        true
    }
}

impl memoir_ui::TextureLookup for TextureCache {
    fn image(&self, id: &MediaId) -> Option<&egui::TextureHandle> {
        self.images.get(id)
    }

    fn is_pending(&self, id: &MediaId) -> bool {
        self.pending.contains(id)
    }
}
