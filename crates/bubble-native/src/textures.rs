use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Clone, Debug)]
struct Request {
    slot: usize,
    hover: bool,
    generation: u64,
    url: String,
}

/// A fetched and decoded thumbnail, ready for GPU upload.
pub struct LoadedThumbnail {
    pub slot: usize,
    pub hover: bool,
    pub generation: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Loads content-bubble thumbnails off the frame loop. One worker thread
/// fetches and decodes; results come back over a channel and are drained by
/// the frame driver. A bubble keeps its placeholder until its image lands,
/// and keeps it forever if the load fails.
///
/// Results are stamped with the generation current at request time; after
/// `invalidate` (scene teardown), stale arrivals are dropped without
/// touching any state.
pub struct TextureLoader {
    tx: Sender<Request>,
    rx: Receiver<LoadedThumbnail>,
    generation: u64,
}

impl TextureLoader {
    pub fn spawn() -> Self {
        let (req_tx, req_rx) = unbounded::<Request>();
        let (done_tx, done_rx) = unbounded::<LoadedThumbnail>();
        std::thread::Builder::new()
            .name("thumbnail-loader".into())
            .spawn(move || {
                for req in req_rx.iter() {
                    match fetch_and_decode(&req.url) {
                        Ok((width, height, rgba)) => {
                            let _ = done_tx.send(LoadedThumbnail {
                                slot: req.slot,
                                hover: req.hover,
                                generation: req.generation,
                                width,
                                height,
                                rgba,
                            });
                        }
                        Err(e) => {
                            // Fail-open: the bubble keeps its placeholder.
                            log::warn!("[texture] {}: {}", req.url, e);
                        }
                    }
                }
            })
            .expect("spawn thumbnail loader");
        Self {
            tx: req_tx,
            rx: done_rx,
            generation: 0,
        }
    }

    pub fn request(&self, slot: usize, url: &str, hover: bool) {
        let _ = self.tx.send(Request {
            slot,
            hover,
            generation: self.generation,
            url: url.to_string(),
        });
    }

    /// Drop every in-flight result on arrival.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Drain finished loads, skipping results from a previous generation.
    pub fn drain(&self) -> Vec<LoadedThumbnail> {
        self.rx
            .try_iter()
            .filter(|t| t.generation == self.generation)
            .collect()
    }
}

fn fetch_and_decode(url: &str) -> Result<(u32, u32, Vec<u8>), TextureError> {
    let bytes: Vec<u8> = if url.starts_with("http://") || url.starts_with("https://") {
        reqwest::blocking::get(url)?.bytes()?.to_vec()
    } else {
        std::fs::read(url)?
    };
    let img = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok((width, height, img.into_raw()))
}
