//! Drives the threaded scene driver against a counting backend.

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use diorama_engine::content::{AssetLoader, AssetRequest, AssetSink, ResolvedAsset};
use diorama_engine::coords::SurfaceSize;
use diorama_engine::core::{ContextCreationError, ContextLost, SceneConfig, SceneEvent};
use diorama_engine::device::{FramePacket, GraphicsSurface, MeshHandle, RenderBackend, TextureHandle};
use diorama_engine::gesture::GestureEvent;
use diorama_engine::paint::ImageData;
use diorama_engine::scene::{MeshData, ObjectKind, PlacedObject, Wall};
use diorama_engine::schedule::SchedulerConfig;
use diorama_engine::session::SceneThread;

const SHELL_PARTS: usize = 3;

#[derive(Debug, Default)]
struct Counters {
    next_id: u32,
    live: HashSet<u32>,
    releases: usize,
    double_releases: usize,
    draws: usize,
    presents: usize,
    size: Option<SurfaceSize>,
}

#[derive(Debug, Clone, Default)]
struct Shared(Arc<Mutex<Counters>>);

impl Shared {
    fn read<T>(&self, f: impl FnOnce(&Counters) -> T) -> T {
        f(&self.0.lock().unwrap())
    }

    fn mint(&self) -> u32 {
        let mut c = self.0.lock().unwrap();
        c.next_id += 1;
        let id = c.next_id;
        c.live.insert(id);
        id
    }

    fn release(&self, id: u32) {
        let mut c = self.0.lock().unwrap();
        c.releases += 1;
        if !c.live.remove(&id) {
            c.double_releases += 1;
        }
    }
}

struct CountingBackend {
    shared: Shared,
    fail_present_after: Option<usize>,
}

impl RenderBackend for CountingBackend {
    fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(800, 600)
    }

    fn upload_mesh(&mut self, _mesh: &MeshData) -> anyhow::Result<MeshHandle> {
        Ok(MeshHandle::from_raw(self.shared.mint()))
    }

    fn upload_texture(&mut self, _image: &ImageData) -> anyhow::Result<TextureHandle> {
        Ok(TextureHandle::from_raw(self.shared.mint()))
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        self.shared.release(mesh.raw());
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.shared.release(texture.raw());
    }

    fn draw(&mut self, _frame: &FramePacket<'_>) {
        self.shared.0.lock().unwrap().draws += 1;
    }

    fn present(&mut self) -> Result<(), ContextLost> {
        let mut c = self.shared.0.lock().unwrap();
        c.presents += 1;
        match self.fail_present_after {
            Some(n) if c.presents > n => Err(ContextLost),
            _ => Ok(()),
        }
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.shared.0.lock().unwrap().size = Some(size);
    }
}

struct CountingSurface {
    shared: Shared,
    fail_present_after: Option<usize>,
    available: bool,
}

impl CountingSurface {
    fn new(shared: &Shared) -> Self {
        Self {
            shared: shared.clone(),
            fail_present_after: None,
            available: true,
        }
    }
}

impl GraphicsSurface for CountingSurface {
    type Backend = CountingBackend;

    fn bind(self) -> Result<CountingBackend, ContextCreationError> {
        if !self.available {
            return Err(ContextCreationError::SurfaceUnavailable("test surface".into()));
        }
        Ok(CountingBackend {
            shared: self.shared,
            fail_present_after: self.fail_present_after,
        })
    }
}

/// Resolves every reference immediately to a solid texture.
struct InstantLoader;

impl AssetLoader for InstantLoader {
    fn request(&mut self, request: AssetRequest, sink: AssetSink) {
        sink.complete(&request, Ok(ResolvedAsset::Texture(ImageData::solid([200, 40, 40, 255]))));
    }
}

fn fast_config() -> SceneConfig {
    SceneConfig {
        schedule: SchedulerConfig {
            idle_interval: Duration::from_millis(10),
            active_interval: Duration::from_millis(5),
        },
        ..SceneConfig::default()
    }
}

fn medals(n: usize) -> Vec<PlacedObject> {
    (0..n)
        .map(|i| {
            PlacedObject::on_wall(format!("m{i}"), ObjectKind::Medal, Wall::Left, format!("m{i}.png"))
                .at(0.0, 1.5, -1.0 + i as f32 * 0.5)
        })
        .collect()
}

fn wait_for(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn heartbeat_presents_and_assets_are_swapped_in() {
    let shared = Shared::default();
    let scene = SceneThread::mount(
        CountingSurface::new(&shared),
        medals(5),
        Box::new(InstantLoader),
        (),
        fast_config(),
    )
    .unwrap();

    // Shell and placeholders, then one texture per medal.
    wait_for("textures", || shared.read(|c| c.live.len()) == SHELL_PARTS + 10);
    wait_for("heartbeat presents", || shared.read(|c| c.presents) >= 5);
    assert!(shared.read(|c| c.draws) >= 1);

    scene.unmount();
    shared.read(|c| {
        assert!(c.live.is_empty());
        assert_eq!(c.double_releases, 0);
    });
}

#[test]
fn clearing_content_releases_every_leaf_once() {
    let shared = Shared::default();
    let scene = SceneThread::mount(
        CountingSurface::new(&shared),
        medals(5),
        Box::new(InstantLoader),
        (),
        fast_config(),
    )
    .unwrap();
    wait_for("textures", || shared.read(|c| c.live.len()) == SHELL_PARTS + 10);

    assert!(scene.update_content(Vec::new()));
    wait_for("release", || shared.read(|c| c.live.len()) == SHELL_PARTS);
    assert_eq!(shared.read(|c| c.releases), 10);

    scene.unmount();
    shared.read(|c| {
        assert!(c.live.is_empty());
        assert_eq!(c.releases, 10 + SHELL_PARTS);
        assert_eq!(c.double_releases, 0);
    });
}

#[test]
fn gesture_stream_redraws_and_resize_reaches_backend() {
    let shared = Shared::default();
    let scene = SceneThread::mount(
        CountingSurface::new(&shared),
        medals(1),
        Box::new(InstantLoader),
        (),
        fast_config(),
    )
    .unwrap();
    wait_for("first draw", || shared.read(|c| c.draws) >= 1);
    let before = shared.read(|c| c.draws);

    assert!(scene.gesture(GestureEvent::PinchBegin));
    assert!(scene.gesture(GestureEvent::PinchChange { scale: 2.0 }));
    assert!(scene.gesture(GestureEvent::PinchEnd));
    wait_for("redraw", || shared.read(|c| c.draws) > before);

    assert!(scene.resize(SurfaceSize::new(640, 480)));
    wait_for("resize", || shared.read(|c| c.size) == Some(SurfaceSize::new(640, 480)));

    scene.unmount();
}

#[test]
fn present_failure_stops_ticking_and_reports_once() {
    let shared = Shared::default();
    let (tx, rx) = mpsc::channel();
    let mut surface = CountingSurface::new(&shared);
    surface.fail_present_after = Some(3);

    let scene = SceneThread::mount(surface, medals(2), Box::new(InstantLoader), tx, fast_config()).unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(SceneEvent::ContextLost));
    // The failed present is the last one.
    thread::sleep(Duration::from_millis(60));
    assert_eq!(shared.read(|c| c.presents), 4);
    assert!(shared.read(|c| c.live.is_empty()));

    // Commands are still accepted and ignored until unmount.
    assert!(scene.gesture(GestureEvent::PanBegin));
    scene.unmount();
    assert!(rx.try_recv().is_err());
    assert_eq!(shared.read(|c| c.presents), 4);
}

#[test]
fn unavailable_surface_fails_mount_without_leaks() {
    let shared = Shared::default();
    let mut surface = CountingSurface::new(&shared);
    surface.available = false;

    let err = SceneThread::mount(surface, medals(3), Box::new(InstantLoader), (), fast_config()).unwrap_err();
    assert!(matches!(err, ContextCreationError::SurfaceUnavailable(_)));
    assert_eq!(shared.read(|c| c.next_id), 0);
}
