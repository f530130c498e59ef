use glam::{Mat4, Vec3};

use crate::device::{DrawItem, MeshHandle, RenderBackend, TextureHandle};
use crate::paint::Color;

use super::descriptor::ObjectId;
use super::key::{RenderLayer, SortKey};
use super::placement::Placement;

/// One leaf of the scene graph and the owner of its GPU resources.
///
/// Resources leave a node only through [`dispose`](Self::dispose) or the
/// replace methods, which hand the old handle back to the backend.
#[derive(Debug)]
pub struct SceneNode {
    id: Option<ObjectId>,
    placement: Placement,
    layer: RenderLayer,
    order: u32,
    tint: Color,
    mesh: Option<MeshHandle>,
    half_extents: Vec3,
    texture: Option<TextureHandle>,
    interactive: bool,
}

impl SceneNode {
    pub fn new(placement: Placement, mesh: Option<MeshHandle>, half_extents: Vec3, layer: RenderLayer) -> Self {
        Self {
            id: None,
            placement,
            layer,
            order: 0,
            tint: Color::WHITE,
            mesh,
            half_extents,
            texture: None,
            interactive: false,
        }
    }

    /// Makes the node a tap target reported as `id`.
    pub fn with_id(mut self, id: ObjectId, interactive: bool) -> Self {
        self.id = Some(id);
        self.interactive = interactive;
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive && self.id.is_some()
    }

    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    pub fn model(&self) -> Mat4 {
        self.placement.model(self.half_extents)
    }

    /// Swaps in new geometry and releases the previous mesh.
    pub fn replace_mesh<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, mesh: MeshHandle, half_extents: Vec3) {
        if let Some(old) = self.mesh.replace(mesh) {
            backend.release_mesh(old);
        }
        self.half_extents = half_extents;
    }

    /// Swaps in a new texture and releases the previous one.
    pub fn replace_texture<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, texture: TextureHandle) {
        if let Some(old) = self.texture.replace(texture) {
            backend.release_texture(old);
        }
    }

    /// Leaves placeholder styling once the real asset is attached.
    pub fn promote(&mut self) {
        self.layer = RenderLayer::Content;
        self.tint = Color::WHITE;
    }

    pub(crate) fn draw_item(&self) -> Option<DrawItem<'_>> {
        Some(DrawItem {
            key: SortKey::new(self.layer, self.order),
            mesh: self.mesh.as_ref()?,
            texture: self.texture.as_ref(),
            tint: self.tint,
            model: self.model(),
        })
    }

    /// Releases every resource this node owns. Returns how many were released.
    pub fn dispose<B: RenderBackend + ?Sized>(mut self, backend: &mut B) -> usize {
        let mut released = 0;
        if let Some(mesh) = self.mesh.take() {
            backend.release_mesh(mesh);
            released += 1;
        }
        if let Some(texture) = self.texture.take() {
            backend.release_texture(texture);
            released += 1;
        }
        released
    }
}

impl Drop for SceneNode {
    fn drop(&mut self) {
        if self.mesh.is_some() || self.texture.is_some() {
            log::warn!("scene node {:?} dropped without dispose; GPU resources leaked", self.id);
        }
    }
}
