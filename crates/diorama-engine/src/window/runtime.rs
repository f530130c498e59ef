use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::content::AssetLoader;
use crate::coords::SurfaceSize;
use crate::core::{SceneConfig, SceneEvents};
use crate::device::GpuInit;
use crate::gesture::GestureEvent;
use crate::render::{GpuBackend, WindowSurface};
use crate::scene::PlacedObject;
use crate::session::SceneSession;

use super::pointer::{PointerAction, PointerTracker};
use super::remount::RemountPolicy;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Delay before the first re-mount after a lost context; doubles per attempt.
    pub remount_backoff: Duration,
    /// Consecutive failed re-mounts before the runtime gives up. A re-mount
    /// that is lost again before it has survived counts as failed.
    pub max_remounts: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "diorama".to_string(),
            initial_size: LogicalSize::new(1024.0, 768.0),
            remount_backoff: Duration::from_millis(500),
            max_remounts: 5,
        }
    }
}

/// Application side of the runtime: supplies content, loaders and the event
/// sink for every mount.
pub trait SceneHost {
    type Events: SceneEvents;

    /// Content to mount with. Called again for every re-mount.
    fn content(&mut self) -> Vec<PlacedObject>;

    fn asset_loader(&mut self) -> Result<Box<dyn AssetLoader>>;

    fn events(&mut self) -> Self::Events;

    /// Reload request (R key). `Some` replaces the mounted content.
    fn reload(&mut self) -> Option<Vec<PlacedObject>> {
        None
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<H>(config: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig, host: H) -> Result<()>
    where
        H: SceneHost + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, gpu_init, scene, host);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.fatal.map_or(Ok(()), Err)
    }
}

struct RuntimeState<H: SceneHost> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneConfig,
    host: H,

    window: Option<Arc<Window>>,
    session: Option<SceneSession<GpuBackend, H::Events>>,
    pointer: PointerTracker,

    remount: RemountPolicy,
    remount_at: Option<Instant>,
    fatal: Option<anyhow::Error>,
}

impl<H: SceneHost> RuntimeState<H> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig, host: H) -> Self {
        let remount = RemountPolicy::new(config.remount_backoff, config.max_remounts);
        Self {
            config,
            gpu_init,
            scene,
            host,
            window: None,
            session: None,
            pointer: PointerTracker::default(),
            remount,
            remount_at: None,
            fatal: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        self.window = Some(Arc::new(window));
        Ok(())
    }

    fn mount(&mut self) -> Result<()> {
        let window = self.window.clone().context("no window to mount into")?;
        let loader = self.host.asset_loader()?;
        let content = self.host.content();
        let events = self.host.events();

        let session = SceneSession::mount(
            WindowSurface::new(window, self.gpu_init.clone()),
            &content,
            loader,
            events,
            self.scene.clone(),
            Instant::now(),
        )?;
        self.session = Some(session);
        Ok(())
    }

    fn unmount(&mut self) {
        self.pointer = PointerTracker::default();
        if let Some(session) = self.session.take() {
            session.unmount();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.unmount();
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn schedule_remount(&mut self, event_loop: &ActiveEventLoop, now: Instant, next: Option<Instant>) {
        match next {
            Some(at) => {
                log::warn!("re-mounting in {:?}", at.saturating_duration_since(now));
                self.remount_at = Some(at);
            }
            None => {
                let failures = self.remount.failures();
                self.fail(event_loop, anyhow::anyhow!("giving up after {failures} failed re-mounts"));
            }
        }
    }

    fn try_remount(&mut self, event_loop: &ActiveEventLoop, now: Instant) {
        self.remount_at = None;
        match self.mount() {
            Ok(()) => {
                log::info!("re-mounted after context loss");
                self.remount.mounted();
            }
            Err(e) => {
                log::warn!("re-mount attempt failed: {e:#}");
                let next = self.remount.mount_failed(now);
                self.schedule_remount(event_loop, now, next);
            }
        }
    }

    fn gesture(&mut self, event: GestureEvent) {
        if let Some(session) = self.session.as_mut() {
            session.gesture(event, Instant::now());
        }
    }

    fn pointer_action(&mut self, action: PointerAction) {
        match action {
            PointerAction::None => {}
            PointerAction::Gesture(event) => self.gesture(event),
            PointerAction::Gestures(events) => {
                for event in events {
                    self.gesture(event);
                }
            }
            PointerAction::Tap { x, y } => {
                if let Some(session) = self.session.as_mut() {
                    session.tap(x, y);
                }
            }
        }
    }
}

impl<H: SceneHost> ApplicationHandler for RuntimeState<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mounted = self.create_window(event_loop).and_then(|()| self.mount());
        if let Err(e) = mounted {
            self.fail(event_loop, e.context("failed to mount scene"));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());

        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.resize(SurfaceSize::new(size.width, size.height));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(session)) = (self.window.as_ref(), self.session.as_mut()) {
                    let size = window.inner_size();
                    session.resize(SurfaceSize::new(size.width, size.height));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (lx, ly) = to_logical_f32(scale, position);
                let action = self.pointer.moved(position.x as f32, position.y as f32, lx, ly);
                self.pointer_action(action);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let action = match state {
                    ElementState::Pressed => self.pointer.pressed(),
                    ElementState::Released => self.pointer.released(),
                };
                self.pointer_action(action);
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                let action = self.pointer.cancel();
                self.pointer_action(action);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => to_logical_f32(scale, p).1 / 40.0,
                };
                let action = self.pointer.wheel(notches, Instant::now());
                self.pointer_action(action);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyR)
                {
                    if let (Some(content), Some(session)) = (self.host.reload(), self.session.as_mut()) {
                        log::info!("reloading {} objects", content.len());
                        session.update_content(&content);
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        let action = self.pointer.wheel_idle(now);
        self.pointer_action(action);

        if let Some(session) = self.session.as_mut() {
            session.poll(now);
            if let Some(context) = session.context() {
                self.remount.presented(context.frames_presented());
            } else if session.is_lost() {
                self.unmount();
                let next = self.remount.lost(now);
                self.schedule_remount(event_loop, now, next);
            }
        }

        if let Some(at) = self.remount_at {
            if now >= at {
                self.try_remount(event_loop, now);
            }
        }

        let deadline = [
            self.session.as_ref().and_then(|s| s.next_deadline()),
            self.pointer.wheel_deadline(),
            self.remount_at,
        ]
        .into_iter()
        .flatten()
        .min();

        event_loop.set_control_flow(match deadline {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        });
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

fn to_logical_f32(scale: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}
