use std::sync::mpsc;

use crate::core::ResourceResolutionError;
use crate::paint::ImageData;
use crate::scene::{MeshData, ObjectKind};

/// Identifies which leaf, of which content generation, a request was made for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AssetTicket {
    pub generation: u64,
    pub index: usize,
}

/// A decoded asset ready for upload.
#[derive(Debug, Clone)]
pub enum ResolvedAsset {
    /// Image applied to the leaf's frame.
    Texture(ImageData),
    /// Geometry replacing the leaf's placeholder mesh.
    Model(MeshData),
}

#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub ticket: AssetTicket,
    pub reference: String,
    pub kind: ObjectKind,
}

#[derive(Debug)]
pub struct AssetCompletion {
    pub ticket: AssetTicket,
    pub reference: String,
    pub result: Result<ResolvedAsset, ResourceResolutionError>,
}

/// Return path for a resolved asset. Cheap to clone; usable from any thread.
#[derive(Debug, Clone)]
pub struct AssetSink {
    tx: mpsc::Sender<AssetCompletion>,
}

impl AssetSink {
    pub(crate) fn new(tx: mpsc::Sender<AssetCompletion>) -> Self {
        Self { tx }
    }

    /// Hands a result back to the graphics thread.
    ///
    /// Returns `false` once the owning scene is gone; the result is dropped.
    pub fn complete(&self, request: &AssetRequest, result: Result<ResolvedAsset, ResourceResolutionError>) -> bool {
        self.tx
            .send(AssetCompletion {
                ticket: request.ticket,
                reference: request.reference.clone(),
                result,
            })
            .is_ok()
    }
}

/// Resolves external resource references asynchronously.
///
/// `request` must not block. The loader answers through `sink`, from any
/// thread, at any later time; answers for superseded tickets are discarded
/// by the caller.
pub trait AssetLoader: Send {
    fn request(&mut self, request: AssetRequest, sink: AssetSink);
}
