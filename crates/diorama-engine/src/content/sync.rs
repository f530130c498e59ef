use std::sync::mpsc;

use crate::core::ResourceResolutionError;
use crate::device::RenderBackend;
use crate::schedule::DirtyFlag;
use crate::scene::{
    PlacedObject, Placement, RenderLayer, SceneGraph, SceneNode, placeholder_color, placeholder_mesh,
};

use super::asset::{AssetCompletion, AssetLoader, AssetRequest, AssetSink, AssetTicket, ResolvedAsset};

/// Outcome of one [`ContentSync::sync`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SyncReport {
    /// Resources released from the previous content group.
    pub released: usize,
    /// Leaves in the new content group.
    pub nodes: usize,
    pub generation: u64,
}

/// Rebuilds the dynamic part of the scene from descriptor lists and applies
/// asset completions as they arrive.
pub struct ContentSync {
    loader: Box<dyn AssetLoader>,
    dirty: DirtyFlag,
    generation: u64,
    tx: mpsc::Sender<AssetCompletion>,
    rx: mpsc::Receiver<AssetCompletion>,
}

impl std::fmt::Debug for ContentSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentSync")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ContentSync {
    pub fn new(loader: Box<dyn AssetLoader>, dirty: DirtyFlag) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader,
            dirty,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the content group with one placeholder leaf per descriptor.
    ///
    /// Previous leaves are disposed before any new resource is uploaded.
    /// Asset requests go out tagged with the new generation.
    pub fn sync<B: RenderBackend + ?Sized>(
        &mut self,
        graph: &mut SceneGraph,
        backend: &mut B,
        descriptors: &[PlacedObject],
    ) -> SyncReport {
        self.generation = self.generation.wrapping_add(1);
        let released = graph.clear_content(backend);

        for obj in descriptors {
            let mesh = placeholder_mesh(obj);
            let handle = match backend.upload_mesh(&mesh) {
                Ok(h) => Some(h),
                Err(e) => {
                    log::warn!("placeholder upload for {} failed: {e:#}", obj.id);
                    None
                }
            };

            let node = SceneNode::new(Placement::of(obj), handle, mesh.half_extents, RenderLayer::Placeholder)
                .with_tint(placeholder_color())
                .with_id(obj.id.clone(), obj.interactive);
            let index = graph.push_content(node);

            if obj.resource.trim().is_empty() {
                log::warn!("{}: {}", obj.id, ResourceResolutionError::EmptyReference);
                continue;
            }

            let request = AssetRequest {
                ticket: AssetTicket {
                    generation: self.generation,
                    index,
                },
                reference: obj.resource.clone(),
                kind: obj.kind,
            };
            self.loader.request(request, AssetSink::new(self.tx.clone()));
        }

        self.dirty.set();

        let report = SyncReport {
            released,
            nodes: graph.content_len(),
            generation: self.generation,
        };
        log::debug!(
            "content generation {}: {} leaves, {} resources released",
            report.generation,
            report.nodes,
            report.released
        );
        report
    }

    /// Applies every completion that has arrived so far. Returns how many
    /// leaves changed.
    ///
    /// Must run on the graphics thread. Stale completions are dropped.
    pub fn drain_completions<B: RenderBackend + ?Sized>(&mut self, graph: &mut SceneGraph, backend: &mut B) -> usize {
        let mut applied = 0;

        while let Ok(done) = self.rx.try_recv() {
            if done.ticket.generation != self.generation {
                log::trace!("discarding stale asset `{}`", done.reference);
                continue;
            }
            let Some(node) = graph.content_mut(done.ticket.index) else {
                continue;
            };

            let asset = match done.result {
                Ok(asset) => asset,
                Err(e) => {
                    log::warn!("asset for {:?} stays a placeholder: {e}", node.id());
                    continue;
                }
            };

            let uploaded = match asset {
                ResolvedAsset::Texture(image) => backend
                    .upload_texture(&image)
                    .map(|tex| node.replace_texture(backend, tex)),
                ResolvedAsset::Model(mesh) => backend
                    .upload_mesh(&mesh)
                    .map(|h| node.replace_mesh(backend, h, mesh.half_extents)),
            };

            match uploaded {
                Ok(()) => {
                    node.promote();
                    applied += 1;
                }
                Err(e) => {
                    let err = ResourceResolutionError::Upload {
                        reference: done.reference,
                        message: format!("{e:#}"),
                    };
                    log::warn!("{err}");
                }
            }
        }

        if applied > 0 {
            self.dirty.set();
        }
        applied
    }
}
