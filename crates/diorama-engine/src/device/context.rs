use glam::Mat4;

use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, ContextLost};
use crate::paint::Color;
use crate::scene::SceneGraph;

use super::backend::{FramePacket, GraphicsSurface, RenderBackend};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContextState {
    Live,
    /// Terminal. Every later `present` fails without reaching the host.
    Lost,
}

/// Owns one bound surface, its renderer and the scene graph drawn into it.
///
/// Created atomically by [`create`](Self::create); torn down by
/// [`destroy`](Self::destroy) or on drop, releasing every scene resource
/// before the backend goes away.
pub struct RenderContext<B: RenderBackend> {
    backend: B,
    graph: SceneGraph,
    state: ContextState,
    frames_presented: u64,
}

impl<B: RenderBackend> RenderContext<B> {
    /// Binds `surface` and uploads the room shell.
    ///
    /// If the shell cannot be built the already uploaded parts are released
    /// and the backend is dropped before the error is returned.
    pub fn create<S>(surface: S) -> Result<Self, ContextCreationError>
    where
        S: GraphicsSurface<Backend = B>,
    {
        let mut backend = surface.bind()?;

        let mut graph = SceneGraph::new();
        graph
            .build_shell(&mut backend)
            .map_err(ContextCreationError::Shell)?;

        log::info!("render context created ({:?})", backend.surface_size());
        Ok(Self {
            backend,
            graph,
            state: ContextState::Live,
            frames_presented: 0,
        })
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_lost(&self) -> bool {
        self.state == ContextState::Lost
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.backend.surface_size()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Split borrow for content mutation.
    pub fn scene_mut(&mut self) -> (&mut SceneGraph, &mut B) {
        (&mut self.graph, &mut self.backend)
    }

    /// Draws the current scene. No-op once lost.
    pub fn render(&mut self, view_proj: Mat4, clear: Color) {
        if self.is_lost() {
            return;
        }
        let items = self.graph.draw_items();
        log::trace!("drawing {} items", items.len());
        self.backend.draw(&FramePacket {
            view_proj,
            clear,
            items: &items,
        });
    }

    /// Presents the most recent frame. Safe with nothing drawn.
    pub fn present(&mut self) -> Result<(), ContextLost> {
        if self.is_lost() {
            return Err(ContextLost);
        }

        match self.backend.present() {
            Ok(()) => {
                self.frames_presented += 1;
                Ok(())
            }
            Err(lost) => {
                log::warn!("present failed after {} frames; context lost", self.frames_presented);
                self.state = ContextState::Lost;
                Err(lost)
            }
        }
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if self.is_lost() {
            return;
        }
        self.backend.resize(size);
    }

    /// Releases every scene resource, then the backend. Returns the number
    /// of resources released.
    pub fn destroy(mut self) -> usize {
        self.release_scene()
    }

    fn release_scene(&mut self) -> usize {
        std::mem::take(&mut self.graph).dispose(&mut self.backend)
    }
}

impl<B: RenderBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        let released = self.release_scene();
        if released > 0 {
            log::debug!("render context dropped; released {released} resources");
        }
    }
}

impl<B: RenderBackend> std::fmt::Debug for RenderContext<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("state", &self.state)
            .field("frames_presented", &self.frames_presented)
            .field("content", &self.graph.content_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingBackend, RecordingSurface};

    #[test]
    fn create_builds_shell() {
        let ctx = RenderContext::create(RecordingSurface::new(RecordingBackend::new())).unwrap();
        assert_eq!(ctx.graph().shell_len(), 3);
        assert_eq!(ctx.backend().live_resources(), 3);
    }

    #[test]
    fn bind_failure_is_reported() {
        let err = RenderContext::create(RecordingSurface::unavailable()).unwrap_err();
        assert!(matches!(err, ContextCreationError::SurfaceUnavailable(_)));
    }

    #[test]
    fn shell_failure_leaves_nothing_alive() {
        let mut backend = RecordingBackend::new();
        backend.fail_mesh_upload_after(1);
        let stats = backend.stats();

        let err = RenderContext::create(RecordingSurface::new(backend)).unwrap_err();
        assert!(matches!(err, ContextCreationError::Shell(_)));
        assert_eq!(stats.live_resources(), 0);
    }

    #[test]
    fn present_without_draw_is_fine() {
        let mut ctx = RenderContext::create(RecordingSurface::new(RecordingBackend::new())).unwrap();
        assert!(ctx.present().is_ok());
        assert_eq!(ctx.backend().draws(), 0);
        assert_eq!(ctx.backend().presents(), 1);
    }

    #[test]
    fn lost_is_terminal() {
        let mut backend = RecordingBackend::new();
        backend.fail_present_after(1);
        let mut ctx = RenderContext::create(RecordingSurface::new(backend)).unwrap();

        assert!(ctx.present().is_ok());
        assert_eq!(ctx.present(), Err(ContextLost));
        assert!(ctx.is_lost());

        // Later presents never reach the backend.
        assert_eq!(ctx.present(), Err(ContextLost));
        assert_eq!(ctx.backend().presents(), 2);

        ctx.render(Mat4::IDENTITY, Color::WHITE);
        assert_eq!(ctx.backend().draws(), 0);
    }

    #[test]
    fn destroy_releases_everything() {
        let backend = RecordingBackend::new();
        let stats = backend.stats();
        let ctx = RenderContext::create(RecordingSurface::new(backend)).unwrap();
        assert_eq!(ctx.destroy(), 3);
        assert_eq!(stats.live_resources(), 0);
        assert_eq!(stats.double_releases(), 0);
    }
}
