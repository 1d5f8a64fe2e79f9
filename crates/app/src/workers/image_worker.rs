use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use memoir_state::catalog::MediaId;

/// Longest edge of an uploaded card texture.
pub const MAX_TEXTURE_EDGE: u32 = 1_600;

pub enum ImageRequest {
    Decode {
        id: MediaId,
        path: PathBuf,
        priority: bool,
    },
}

pub struct DecodedImage {
    pub id: MediaId,
    pub image: Option<image::RgbaImage>,
}

pub struct ImageWorkerChannels {
    pub req_tx: mpsc::Sender<ImageRequest>,
    pub result_rx: mpsc::Receiver<DecodedImage>,
}

fn apply_image_req(
    req: ImageRequest,
    queue: &mut VecDeque<(MediaId, PathBuf)>,
    queued: &mut HashSet<MediaId>,
) {
    match req {
        ImageRequest::Decode { id, path, priority } => {
            if !queued.insert(id) {
                return;
            }
            if priority {
                queue.push_front((id, path));
            } else {
                queue.push_back((id, path));
            }
        }
    }
}

pub fn decode(path: &Path) -> Option<image::RgbaImage> {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(err) => {
            log::warn!("could not decode {}: {err}", path.display());
            return None;
        }
    };
    let fitted = if decoded.width() > MAX_TEXTURE_EDGE || decoded.height() > MAX_TEXTURE_EDGE {
        decoded.thumbnail(MAX_TEXTURE_EDGE, MAX_TEXTURE_EDGE)
    } else {
        decoded
    };
    Some(fitted.to_rgba8())
}

pub fn spawn_image_worker() -> ImageWorkerChannels {
    let (req_tx, req_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();

    std::thread::spawn(move || {
        let mut queue: VecDeque<(MediaId, PathBuf)> = VecDeque::new();
        let mut queued: HashSet<MediaId> = HashSet::new();

        loop {
            let (id, path) = if let Some(item) = queue.pop_front() {
                queued.remove(&item.0);
                item
            } else {
                let Ok(req) = req_rx.recv() else {
                    return;
                };
                apply_image_req(req, &mut queue, &mut queued);
                continue;
            };

            while let Ok(req) = req_rx.try_recv() {
                apply_image_req(req, &mut queue, &mut queued);
            }

            let image = decode(&path);
            log::debug!("decoded {} ({})", path.display(), image.is_some());
            if result_tx.send(DecodedImage { id, image }).is_err() {
                return;
            }
        }
    });

    ImageWorkerChannels { req_tx, result_rx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_requests_jump_the_queue_once() {
        let mut queue = VecDeque::new();
        let mut queued = HashSet::new();
        let (a, b) = (MediaId::new(), MediaId::new());
        let req = |id, priority| ImageRequest::Decode {
            id,
            path: PathBuf::from("x.png"),
            priority,
        };
        apply_image_req(req(a, false), &mut queue, &mut queued);
        apply_image_req(req(b, true), &mut queue, &mut queued);
        apply_image_req(req(a, true), &mut queue, &mut queued);
        let order: Vec<_> = queue.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![b, a]);
    }

    #[test]
    fn decode_downscales_large_images() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wide.png");
        image::RgbaImage::new(3_200, 800)
            .save(&path)
            .expect("write png");
        let decoded = decode(&path).expect("decodes");
        assert_eq!((decoded.width(), decoded.height()), (1_600, 400));
    }

    #[test]
    fn decode_failure_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").expect("write");
        assert!(decode(&path).is_none());
    }

    #[test]
    fn worker_reports_each_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("small.png");
        image::RgbaImage::new(4, 2).save(&path).expect("write png");

        let channels = spawn_image_worker();
        let id = MediaId::new();
        channels
            .req_tx
            .send(ImageRequest::Decode {
                id,
                path,
                priority: false,
            })
            .expect("worker alive");
        let result = channels
            .result_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("result");
        assert_eq!(result.id, id);
        assert_eq!(result.image.map(|i| i.dimensions()), Some((4, 2)));
    }
}
