use std::time::Instant;

use crate::camera::OrbitCamera;
use crate::content::{AssetLoader, ContentSync, SyncReport};
use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, SceneConfig, SceneEvents};
use crate::device::{GraphicsSurface, RenderBackend, RenderContext};
use crate::gesture::{GestureEvent, GestureMapper, LoopSignal};
use crate::scene::{ObjectId, PlacedObject};
use crate::schedule::{DirtyFlag, FrameDecision, FrameScheduler, SchedulerMode};

/// One mounted scene, driven from a single graphics thread.
///
/// Every method must be called from the thread that mounted the session.
/// Time is passed in explicitly; the caller sleeps until
/// [`next_deadline`](Self::next_deadline) and then calls [`poll`](Self::poll).
pub struct SceneSession<B: RenderBackend, E: SceneEvents> {
    context: Option<RenderContext<B>>,
    camera: OrbitCamera,
    gestures: GestureMapper,
    content: ContentSync,
    scheduler: FrameScheduler,
    dirty: DirtyFlag,
    events: E,
    config: SceneConfig,
}

impl<B: RenderBackend, E: SceneEvents> SceneSession<B, E> {
    /// Creates the context, builds the initial content and starts the idle
    /// heartbeat. Nothing is left alive on error.
    pub fn mount<S>(
        surface: S,
        initial: &[PlacedObject],
        loader: Box<dyn AssetLoader>,
        events: E,
        config: SceneConfig,
        now: Instant,
    ) -> Result<Self, ContextCreationError>
    where
        S: GraphicsSurface<Backend = B>,
    {
        let mut context = RenderContext::create(surface)?;

        let dirty = DirtyFlag::new();
        let mut content = ContentSync::new(loader, dirty.clone());
        {
            let (graph, backend) = context.scene_mut();
            content.sync(graph, backend, initial);
        }

        let camera = OrbitCamera::looking_from(config.orbit, config.projection.default_eye());
        log::info!(
            "scene mounted: {} objects, camera radius {:.2}",
            initial.len(),
            camera.state().radius
        );

        Ok(Self {
            context: Some(context),
            camera,
            gestures: GestureMapper::new(dirty.clone()),
            content,
            scheduler: FrameScheduler::new(config.schedule, dirty.clone(), now),
            dirty,
            events,
            config,
        })
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn mode(&self) -> SchedulerMode {
        self.scheduler.mode()
    }

    /// Producers outside the graphics thread may mark the scene dirty.
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    /// `None` after the context was lost.
    pub fn context(&self) -> Option<&RenderContext<B>> {
        self.context.as_ref()
    }

    pub fn is_lost(&self) -> bool {
        self.context.is_none()
    }

    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.scheduler.next_deadline()
    }

    /// Replaces the placed objects. Ignored once the context is lost.
    pub fn update_content(&mut self, descriptors: &[PlacedObject]) -> Option<SyncReport> {
        let context = self.context.as_mut()?;
        let (graph, backend) = context.scene_mut();
        Some(self.content.sync(graph, backend, descriptors))
    }

    pub fn gesture(&mut self, event: GestureEvent, now: Instant) {
        match self.gestures.apply(event, &mut self.camera) {
            LoopSignal::Stay => {}
            LoopSignal::EnterActive => self.scheduler.enter_active(now),
            LoopSignal::ExitActive => {
                if let Some(decision) = self.scheduler.exit_active(now) {
                    self.run_frame(decision);
                }
            }
        }
    }

    /// Hit-tests a tap in surface pixels against the current camera.
    pub fn tap(&mut self, x: f32, y: f32) -> Option<ObjectId> {
        let context = self.context.as_ref()?;
        let size = context.surface_size();
        let ndc = size.to_ndc(x, y)?;

        let ray = self
            .config
            .projection
            .pick_ray(&self.camera.camera_transform(), size.aspect(), ndc);
        let id = context.graph().hit_test(&ray)?.clone();

        log::debug!("tap at ({x:.0}, {y:.0}) hit {id}");
        self.events.on_object_tapped(&id);
        Some(id)
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if let Some(context) = self.context.as_mut() {
            context.resize(size);
            self.dirty.set();
        }
    }

    /// Applies pending asset completions and runs the tick if it is due.
    pub fn poll(&mut self, now: Instant) {
        if let Some(context) = self.context.as_mut() {
            let (graph, backend) = context.scene_mut();
            self.content.drain_completions(graph, backend);
        }

        if let Some(decision) = self.scheduler.poll(now) {
            self.run_frame(decision);
        }
    }

    fn run_frame(&mut self, decision: FrameDecision) {
        let Some(context) = self.context.as_mut() else {
            return;
        };

        if decision == FrameDecision::Draw {
            let transform = self.camera.camera_transform();
            let aspect = context.surface_size().aspect();
            let view_proj = self.config.projection.view_proj(&transform, aspect);
            context.render(view_proj, self.config.clear_color);
        }

        if context.present().is_err() {
            self.handle_context_lost();
        }
    }

    fn handle_context_lost(&mut self) {
        if !self.scheduler.stop() {
            return;
        }
        self.gestures.reset();
        if let Some(context) = self.context.take() {
            context.destroy();
        }
        log::warn!("graphics context lost; scene stopped");
        self.events.on_context_lost();
    }

    /// Stops ticking, then tears the context down.
    pub fn unmount(mut self) {
        self.scheduler.stop();
        if let Some(context) = self.context.take() {
            let released = context.destroy();
            log::info!("scene unmounted; released {released} resources");
        }
    }
}

impl<B: RenderBackend, E: SceneEvents> std::fmt::Debug for SceneSession<B, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSession")
            .field("mode", &self.scheduler.mode())
            .field("camera", &self.camera.state())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ResolvedAsset;
    use crate::paint::ImageData;
    use crate::scene::{ObjectKind, Wall};
    use crate::test_support::{ManualLoader, RecordingBackend, RecordingEvents, RecordingSurface};
    use approx::assert_relative_eq;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    type Session = SceneSession<RecordingBackend, RecordingEvents>;

    fn objects(n: usize) -> Vec<PlacedObject> {
        (0..n)
            .map(|i| {
                PlacedObject::on_wall(format!("o{i}"), ObjectKind::Medal, Wall::Left, format!("o{i}.png"))
                    .at(0.0, 1.5, -2.0 + i as f32 * 0.8)
            })
            .collect()
    }

    fn mount_with(backend: RecordingBackend, initial: &[PlacedObject]) -> (Session, RecordingEvents, ManualLoader, Instant) {
        let events = RecordingEvents::default();
        let loader = ManualLoader::default();
        let t0 = Instant::now();
        let session = SceneSession::mount(
            RecordingSurface::new(backend),
            initial,
            Box::new(loader.clone()),
            events.clone(),
            SceneConfig::default(),
            t0,
        )
        .unwrap();
        (session, events, loader, t0)
    }

    fn backend(s: &Session) -> &RecordingBackend {
        s.context().unwrap().backend()
    }

    #[test]
    fn pinch_zoom_renders_once_with_new_radius() {
        let objs = vec![PlacedObject::on_wall("a", ObjectKind::Medal, Wall::Left, "a.png").at(0.0, 1.5, 0.0)];
        let (mut s, _, _, t0) = mount_with(RecordingBackend::new(), &objs);

        let cfg = *s.camera().config();
        let r0 = s.camera().state().radius;
        assert!(r0 >= cfg.min_radius && r0 <= cfg.max_radius);

        s.gesture(GestureEvent::PinchBegin, t0);
        assert_eq!(s.mode(), SchedulerMode::Active);
        s.gesture(GestureEvent::PinchChange { scale: 2.0 }, t0 + MS);
        let expected = (r0 / 2.0).clamp(cfg.min_radius, cfg.max_radius);
        assert_relative_eq!(s.camera().state().radius, expected);
        assert_eq!(backend(&s).draws(), 0);

        s.gesture(GestureEvent::PinchEnd, t0 + 2 * MS);
        assert_eq!(s.mode(), SchedulerMode::Idle);
        assert_eq!(backend(&s).draws(), 1);
        assert_eq!(backend(&s).presents(), 1);

        let eye = s.camera().camera_transform();
        let drawn = backend(&s).last_view_proj().unwrap();
        let aspect = backend(&s).surface_size().aspect();
        assert_eq!(drawn, SceneConfig::default().projection.view_proj(&eye, aspect));
        assert_relative_eq!(eye.distance(), expected, epsilon = 1e-4);

        // The forced frame consumed the change; the next heartbeat only presents.
        s.poll(t0 + 300 * MS);
        assert_eq!(backend(&s).draws(), 1);
        assert_eq!(backend(&s).presents(), 2);
    }

    #[test]
    fn emptying_content_releases_every_leaf() {
        let (mut s, _, loader, t0) = mount_with(RecordingBackend::new(), &objects(5));
        let stats = backend(&s).stats();
        let shell = s.context().unwrap().graph().shell_len();

        // Two leaves get their real texture before the content is cleared.
        for _ in 0..2 {
            assert!(loader.complete_next(Ok(ResolvedAsset::Texture(ImageData::solid([9, 9, 9, 255])))));
        }
        s.poll(t0);
        assert_eq!(stats.texture_uploads(), 2);

        let report = s.update_content(&[]).unwrap();
        assert_eq!(report.nodes, 0);
        assert_eq!(report.released, 7);
        assert_eq!(s.context().unwrap().graph().content_len(), 0);
        assert_eq!(stats.mesh_releases(), 5);
        assert_eq!(stats.texture_releases(), 2);
        assert_eq!(stats.live_resources(), shell);

        s.unmount();
        assert_eq!(stats.live_resources(), 0);
        assert_eq!(stats.double_releases(), 0);
    }

    #[test]
    fn present_failure_while_active_stops_everything() {
        let mut rb = RecordingBackend::new();
        rb.fail_present_after(2);
        let stats = rb.stats();
        let (mut s, events, _, t0) = mount_with(rb, &objects(2));

        s.gesture(GestureEvent::PanBegin, t0);
        let mut now = t0;
        for _ in 0..10 {
            now += 33 * MS;
            s.gesture(GestureEvent::PanChange { dx: 4.0, dy: 1.0 }, now);
            s.poll(now);
        }

        assert_eq!(stats.presents(), 3);
        assert_eq!(events.context_lost(), 1);
        assert_eq!(s.mode(), SchedulerMode::Stopped);
        assert!(s.is_lost());
        assert_eq!(s.next_deadline(), None);

        // Resources were released when the context was torn down.
        assert_eq!(stats.live_resources(), 0);

        s.gesture(GestureEvent::PanEnd, now);
        s.poll(now + 10_000 * MS);
        assert_eq!(stats.presents(), 3);
        assert_eq!(events.context_lost(), 1);
        assert!(s.update_content(&objects(1)).is_none());
    }

    #[test]
    fn idle_ticks_draw_only_when_dirty() {
        let (mut s, _, _, t0) = mount_with(RecordingBackend::new(), &objects(1));

        // Initial content marked the scene dirty.
        s.poll(t0 + 250 * MS);
        assert_eq!(backend(&s).draws(), 1);

        s.poll(t0 + 500 * MS);
        s.poll(t0 + 750 * MS);
        assert_eq!(backend(&s).draws(), 1);
        assert_eq!(backend(&s).presents(), 3);

        s.update_content(&objects(3));
        s.poll(t0 + 1_000 * MS);
        assert_eq!(backend(&s).draws(), 2);
        assert_eq!(backend(&s).last_item_count(), Some(3 + 3));
    }

    #[test]
    fn asset_completion_redraws_on_next_heartbeat() {
        let (mut s, _, loader, t0) = mount_with(RecordingBackend::new(), &objects(1));
        s.poll(t0 + 250 * MS);
        assert_eq!(backend(&s).draws(), 1);

        loader.complete_next(Ok(ResolvedAsset::Texture(ImageData::solid([9, 9, 9, 255]))));
        s.poll(t0 + 500 * MS);
        assert_eq!(backend(&s).draws(), 2);
        assert_eq!(backend(&s).texture_uploads(), 1);
    }

    #[test]
    fn tap_reports_hit_object() {
        let objs = vec![
            PlacedObject::on_wall("target", ObjectKind::Bib, Wall::Back, "t.png").at(0.0, 1.0, 0.0),
        ];
        let (mut s, events, _, _) = mount_with(RecordingBackend::new(), &objs);

        // Project the object's center to find where to tap.
        let size = backend(&s).surface_size();
        let center = crate::scene::Placement::of(&objs[0]).position;
        let vp = SceneConfig::default()
            .projection
            .view_proj(&s.camera().camera_transform(), size.aspect());
        let ndc = vp.project_point3(center);
        let x = (ndc.x + 1.0) * 0.5 * size.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * size.height as f32;

        assert_eq!(s.tap(x, y).map(|id| id.0), Some("target".to_owned()));
        assert_eq!(events.tapped(), vec!["target".to_owned()]);

        // Top-left corner looks at the walls only.
        assert_eq!(s.tap(0.0, 0.0), None);
        assert_eq!(events.tapped().len(), 1);
    }

    #[test]
    fn resize_reaches_backend_and_forces_redraw() {
        let (mut s, _, _, t0) = mount_with(RecordingBackend::new(), &[]);
        s.poll(t0 + 250 * MS);
        let draws = backend(&s).draws();

        s.resize(SurfaceSize::new(400, 300));
        assert_eq!(backend(&s).surface_size(), SurfaceSize::new(400, 300));
        s.poll(t0 + 500 * MS);
        assert_eq!(backend(&s).draws(), draws + 1);
    }

    #[test]
    fn mount_failure_leaves_nothing() {
        let mut rb = RecordingBackend::new();
        rb.fail_mesh_upload_after(2);
        let stats = rb.stats();

        let err = SceneSession::<RecordingBackend, ()>::mount(
            RecordingSurface::new(rb),
            &objects(3),
            Box::new(ManualLoader::default()),
            (),
            SceneConfig::default(),
            Instant::now(),
        )
        .unwrap_err();
        assert!(matches!(err, ContextCreationError::Shell(_)));
        assert_eq!(stats.live_resources(), 0);
    }
}
