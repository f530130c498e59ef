use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::core::ResourceResolutionError;
use crate::paint::ImageData;

use super::asset::{AssetLoader, AssetRequest, AssetSink, ResolvedAsset};

type Job = (AssetRequest, AssetSink);

/// Resolves local image files on a background worker.
///
/// References are plain paths (relative ones against `root`) or `file://`
/// URLs. Anything else is reported as unsupported.
#[derive(Debug)]
pub struct FileAssetLoader {
    tx: Option<mpsc::Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl FileAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        let (tx, rx) = mpsc::channel::<Job>();

        let worker = thread::Builder::new()
            .name("diorama-assets".into())
            .spawn(move || {
                for (request, sink) in rx {
                    let result = load(&root, &request.reference);
                    if let Err(e) = &result {
                        log::debug!("asset `{}` failed: {e}", request.reference);
                    }
                    if !sink.complete(&request, result) {
                        log::trace!("scene gone; dropping `{}`", request.reference);
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }
}

impl AssetLoader for FileAssetLoader {
    fn request(&mut self, request: AssetRequest, sink: AssetSink) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(mpsc::SendError((request, sink))) = tx.send((request, sink)) {
            let reference = request.reference.clone();
            sink.complete(&request, Err(ResourceResolutionError::LoaderClosed(reference)));
        }
    }
}

impl Drop for FileAssetLoader {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop after the current job.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("asset worker panicked");
            }
        }
    }
}

/// Maps a reference to a filesystem path.
pub(crate) fn resolve_path(root: &Path, reference: &str) -> Result<PathBuf, ResourceResolutionError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ResourceResolutionError::EmptyReference);
    }

    let path = match reference.strip_prefix("file://") {
        Some(rest) => PathBuf::from(rest),
        None if reference.contains("://") => {
            return Err(ResourceResolutionError::Unsupported(reference.to_owned()));
        }
        None => PathBuf::from(reference),
    };

    Ok(if path.is_absolute() { path } else { root.join(path) })
}

fn load(root: &Path, reference: &str) -> Result<ResolvedAsset, ResourceResolutionError> {
    let path = resolve_path(root, reference)?;

    let bytes = std::fs::read(&path).map_err(|e| ResourceResolutionError::Io {
        reference: reference.to_owned(),
        message: e.to_string(),
    })?;

    decode_image(reference, &bytes).map(ResolvedAsset::Texture)
}

pub(crate) fn decode_image(reference: &str, bytes: &[u8]) -> Result<ImageData, ResourceResolutionError> {
    let decode_err = |message: String| ResourceResolutionError::Decode {
        reference: reference.to_owned(),
        message,
    };

    let rgba = image::load_from_memory(bytes)
        .map_err(|e| decode_err(e.to_string()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();

    ImageData::new(w, h, rgba.into_raw()).ok_or_else(|| decode_err(format!("unexpected {w}x{h} buffer")))
}
