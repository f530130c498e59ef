//! Instrumented doubles shared by unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Mat4;

use crate::content::{AssetLoader, AssetRequest, AssetSink, ResolvedAsset};
use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, ContextLost, ResourceResolutionError, SceneEvents};
use crate::device::{FramePacket, GraphicsSurface, MeshHandle, RenderBackend, TextureHandle};
use crate::paint::ImageData;
use crate::scene::{MeshData, ObjectId};

#[derive(Debug, Default)]
struct Stats {
    next_id: u32,
    live_meshes: HashSet<u32>,
    live_textures: HashSet<u32>,
    mesh_uploads: usize,
    texture_uploads: usize,
    mesh_releases: usize,
    texture_releases: usize,
    double_releases: usize,
    draws: usize,
    presents: usize,
    last_view_proj: Option<Mat4>,
    last_item_count: Option<usize>,
}

/// Shared view of a [`RecordingBackend`]'s counters that outlives the backend.
#[derive(Debug, Clone, Default)]
pub struct BackendStats(Arc<Mutex<Stats>>);

impl BackendStats {
    fn lock(&self) -> MutexGuard<'_, Stats> {
        self.0.lock().unwrap()
    }

    pub fn live_resources(&self) -> usize {
        let s = self.lock();
        s.live_meshes.len() + s.live_textures.len()
    }

    pub fn mesh_uploads(&self) -> usize {
        self.lock().mesh_uploads
    }

    pub fn texture_uploads(&self) -> usize {
        self.lock().texture_uploads
    }

    pub fn mesh_releases(&self) -> usize {
        self.lock().mesh_releases
    }

    pub fn texture_releases(&self) -> usize {
        self.lock().texture_releases
    }

    pub fn double_releases(&self) -> usize {
        self.lock().double_releases
    }

    pub fn draws(&self) -> usize {
        self.lock().draws
    }

    /// Present calls that reached the backend, failed ones included.
    pub fn presents(&self) -> usize {
        self.lock().presents
    }

    pub fn last_view_proj(&self) -> Option<Mat4> {
        self.lock().last_view_proj
    }

    pub fn last_item_count(&self) -> Option<usize> {
        self.lock().last_item_count
    }
}

/// Backend that records every call and can be told to fail.
#[derive(Debug)]
pub struct RecordingBackend {
    stats: BackendStats,
    size: SurfaceSize,
    mesh_budget: Option<usize>,
    fail_textures: bool,
    present_budget: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            stats: BackendStats::default(),
            size: SurfaceSize::new(800, 600),
            mesh_budget: None,
            fail_textures: false,
            present_budget: None,
        }
    }

    pub fn stats(&self) -> BackendStats {
        self.stats.clone()
    }

    /// Mesh uploads after the first `n` fail.
    pub fn fail_mesh_upload_after(&mut self, n: usize) {
        self.mesh_budget = Some(n);
    }

    pub fn fail_texture_uploads(&mut self, fail: bool) {
        self.fail_textures = fail;
    }

    /// Presents after the first `n` report a lost context.
    pub fn fail_present_after(&mut self, n: usize) {
        self.present_budget = Some(n);
    }
}

impl std::ops::Deref for RecordingBackend {
    type Target = BackendStats;

    fn deref(&self) -> &BackendStats {
        &self.stats
    }
}

impl RenderBackend for RecordingBackend {
    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn upload_mesh(&mut self, _mesh: &MeshData) -> anyhow::Result<MeshHandle> {
        if let Some(budget) = self.mesh_budget.as_mut() {
            anyhow::ensure!(*budget > 0, "mesh upload budget exhausted");
            *budget -= 1;
        }
        let mut s = self.stats.lock();
        s.next_id += 1;
        let id = s.next_id;
        s.mesh_uploads += 1;
        s.live_meshes.insert(id);
        Ok(MeshHandle::from_raw(id))
    }

    fn upload_texture(&mut self, _image: &ImageData) -> anyhow::Result<TextureHandle> {
        anyhow::ensure!(!self.fail_textures, "texture uploads disabled");
        let mut s = self.stats.lock();
        s.next_id += 1;
        let id = s.next_id;
        s.texture_uploads += 1;
        s.live_textures.insert(id);
        Ok(TextureHandle::from_raw(id))
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        let mut s = self.stats.lock();
        s.mesh_releases += 1;
        if !s.live_meshes.remove(&mesh.raw()) {
            s.double_releases += 1;
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        let mut s = self.stats.lock();
        s.texture_releases += 1;
        if !s.live_textures.remove(&texture.raw()) {
            s.double_releases += 1;
        }
    }

    fn draw(&mut self, frame: &FramePacket<'_>) {
        let mut s = self.stats.lock();
        s.draws += 1;
        s.last_view_proj = Some(frame.view_proj);
        s.last_item_count = Some(frame.items.len());
    }

    fn present(&mut self) -> Result<(), ContextLost> {
        self.stats.lock().presents += 1;
        match self.present_budget.as_mut() {
            Some(0) => Err(ContextLost),
            Some(budget) => {
                *budget -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}

/// Surface that binds to a prepared [`RecordingBackend`].
#[derive(Debug)]
pub struct RecordingSurface(Option<RecordingBackend>);

impl RecordingSurface {
    pub fn new(backend: RecordingBackend) -> Self {
        Self(Some(backend))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl GraphicsSurface for RecordingSurface {
    type Backend = RecordingBackend;

    fn bind(self) -> Result<RecordingBackend, ContextCreationError> {
        self.0
            .ok_or_else(|| ContextCreationError::SurfaceUnavailable("test surface reclaimed".into()))
    }
}

/// Loader that parks requests until the test completes them.
#[derive(Debug, Clone, Default)]
pub struct ManualLoader(Arc<Mutex<VecDeque<(AssetRequest, AssetSink)>>>);

impl ManualLoader {
    pub fn pending(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Answers the oldest request. Returns `false` if none is pending or the
    /// scene is gone.
    pub fn complete_next(&self, result: Result<ResolvedAsset, ResourceResolutionError>) -> bool {
        let next = self.0.lock().unwrap().pop_front();
        match next {
            Some((request, sink)) => sink.complete(&request, result),
            None => false,
        }
    }

    pub fn take_all(&self) -> Vec<(AssetRequest, AssetSink)> {
        self.0.lock().unwrap().drain(..).collect()
    }
}

impl AssetLoader for ManualLoader {
    fn request(&mut self, request: AssetRequest, sink: AssetSink) {
        self.0.lock().unwrap().push_back((request, sink));
    }
}

#[derive(Debug, Default)]
struct EventLog {
    tapped: Vec<String>,
    context_lost: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingEvents(Arc<Mutex<EventLog>>);

impl RecordingEvents {
    pub fn tapped(&self) -> Vec<String> {
        self.0.lock().unwrap().tapped.clone()
    }

    pub fn context_lost(&self) -> usize {
        self.0.lock().unwrap().context_lost
    }
}

impl SceneEvents for RecordingEvents {
    fn on_object_tapped(&mut self, id: &ObjectId) {
        self.0.lock().unwrap().tapped.push(id.as_str().to_owned());
    }

    fn on_context_lost(&mut self) {
        self.0.lock().unwrap().context_lost += 1;
    }
}
