use anyhow::Context;

use crate::camera::Ray;
use crate::device::{DrawItem, RenderBackend};

use super::descriptor::ObjectId;
use super::hit::ray_box_distance;
use super::key::RenderLayer;
use super::node::SceneNode;
use super::shell::room_shell;

/// Retained scene: a static shell plus a dynamic content group.
///
/// Draw order is shell first, then content in insertion order, with
/// placeholders ahead of resolved assets.
#[derive(Debug, Default)]
pub struct SceneGraph {
    shell: Vec<SceneNode>,
    content: Vec<SceneNode>,
    next_order: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads the room shell.
    ///
    /// On failure every part uploaded so far is released and the graph is
    /// left without a shell.
    pub fn build_shell<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> anyhow::Result<()> {
        debug_assert!(self.shell.is_empty(), "shell built twice");

        for part in room_shell() {
            let uploaded = backend
                .upload_mesh(&part.mesh)
                .with_context(|| format!("failed to upload {}", part.name));

            let mesh = match uploaded {
                Ok(mesh) => mesh,
                Err(e) => {
                    for node in self.shell.drain(..) {
                        node.dispose(backend);
                    }
                    return Err(e);
                }
            };

            let mut node = SceneNode::new(part.placement, Some(mesh), part.mesh.half_extents, RenderLayer::Shell)
                .with_tint(part.color);
            node.set_order(self.shell.len() as u32);
            self.shell.push(node);
        }

        log::debug!("room shell built ({} parts)", self.shell.len());
        Ok(())
    }

    pub fn shell_len(&self) -> usize {
        self.shell.len()
    }

    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    pub fn content(&self) -> &[SceneNode] {
        &self.content
    }

    pub fn content_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.content.get_mut(index)
    }

    /// Appends a leaf to the content group and returns its index.
    pub fn push_content(&mut self, mut node: SceneNode) -> usize {
        node.set_order(self.next_order);
        self.next_order = self.next_order.wrapping_add(1);
        self.content.push(node);
        self.content.len() - 1
    }

    /// Disposes and detaches every content leaf. Returns the number of
    /// resources released.
    pub fn clear_content<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let released = self.content.drain(..).map(|n| n.dispose(backend)).sum();
        self.next_order = 0;
        released
    }

    /// Draw items in paint order.
    pub fn draw_items(&self) -> Vec<DrawItem<'_>> {
        let mut items: Vec<DrawItem<'_>> = self
            .shell
            .iter()
            .chain(self.content.iter())
            .filter_map(SceneNode::draw_item)
            .collect();
        items.sort_by_key(|i| i.key);
        items
    }

    /// Nearest interactive content leaf along `ray`.
    ///
    /// Shell parts occlude: a tap on a wall in front of an object misses it.
    /// Leaves without a mesh are never drawn and cannot be hit.
    pub fn hit_test(&self, ray: &Ray) -> Option<&ObjectId> {
        let mut best: Option<(f32, Option<&ObjectId>)> = None;

        let content = self.content.iter().filter(|n| n.is_interactive() && n.has_mesh());
        let candidates = self.shell.iter().chain(content);
        for node in candidates {
            let Some(t) = ray_box_distance(ray, node.model(), node.half_extents()) else {
                continue;
            };
            if best.is_none_or(|(bt, _)| t < bt) {
                best = Some((t, node.id()));
            }
        }

        best.and_then(|(_, id)| id)
    }

    /// Releases everything, shell included.
    pub fn dispose<B: RenderBackend + ?Sized>(mut self, backend: &mut B) -> usize {
        let mut released = self.clear_content(backend);
        released += self.shell.drain(..).map(|n| n.dispose(backend)).sum::<usize>();
        released
    }
}
