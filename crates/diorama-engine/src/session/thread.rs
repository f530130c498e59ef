use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use crate::content::AssetLoader;
use crate::coords::SurfaceSize;
use crate::core::{ContextCreationError, SceneConfig, SceneEvents};
use crate::device::GraphicsSurface;
use crate::gesture::GestureEvent;
use crate::scene::PlacedObject;

use super::scene::SceneSession;

enum Command {
    Content(Vec<PlacedObject>),
    Gesture(GestureEvent),
    Tap { x: f32, y: f32 },
    Resize(SurfaceSize),
    Unmount,
}

/// Runs a [`SceneSession`] on a dedicated graphics thread.
///
/// Inbound calls are marshalled onto that thread through a channel. The
/// channel wait doubles as the tick timer. [`unmount`](Self::unmount) blocks
/// until the thread has stopped ticking and torn the context down.
#[derive(Debug)]
pub struct SceneThread {
    tx: mpsc::Sender<Command>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SceneThread {
    /// Spawns the graphics thread and mounts the scene on it.
    ///
    /// Returns once the context exists, or with the creation error.
    pub fn mount<S, E>(
        surface: S,
        initial: Vec<PlacedObject>,
        loader: Box<dyn AssetLoader>,
        events: E,
        config: SceneConfig,
    ) -> Result<Self, ContextCreationError>
    where
        S: GraphicsSurface + Send + 'static,
        E: SceneEvents + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), ContextCreationError>>(1);

        let handle = thread::Builder::new()
            .name("diorama-render".into())
            .spawn(move || {
                let mounted = SceneSession::mount(surface, &initial, loader, events, config, Instant::now());
                let session = match mounted {
                    Ok(session) => {
                        let _ = ready_tx.send(Ok(()));
                        session
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                run(session, rx);
            })
            .map_err(|e| ContextCreationError::Thread(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(ContextCreationError::Thread("render thread exited during mount".into()))
            }
        }
    }

    /// Returns `false` if the graphics thread is gone.
    pub fn update_content(&self, descriptors: Vec<PlacedObject>) -> bool {
        self.send(Command::Content(descriptors))
    }

    pub fn gesture(&self, event: GestureEvent) -> bool {
        self.send(Command::Gesture(event))
    }

    /// Hit results arrive through `SceneEvents::on_object_tapped`.
    pub fn tap(&self, x: f32, y: f32) -> bool {
        self.send(Command::Tap { x, y })
    }

    pub fn resize(&self, size: SurfaceSize) -> bool {
        self.send(Command::Resize(size))
    }

    /// Stops the timer, tears the context down and joins the thread.
    pub fn unmount(mut self) {
        self.shutdown();
    }

    fn send(&self, cmd: Command) -> bool {
        self.tx.send(cmd).is_ok()
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.tx.send(Command::Unmount);
        if handle.join().is_err() {
            log::error!("render thread panicked");
        }
    }
}

impl Drop for SceneThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<B, E>(mut session: SceneSession<B, E>, rx: mpsc::Receiver<Command>)
where
    B: crate::device::RenderBackend,
    E: SceneEvents,
{
    loop {
        session.poll(Instant::now());

        let cmd = match session.next_deadline() {
            Some(deadline) => match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(cmd) => cmd,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            // Stopped: wait for commands (eventually unmount) only.
            None => match rx.recv() {
                Ok(cmd) => cmd,
                Err(_) => break,
            },
        };

        match cmd {
            Command::Content(descriptors) => {
                session.update_content(&descriptors);
            }
            Command::Gesture(event) => session.gesture(event, Instant::now()),
            Command::Tap { x, y } => {
                session.tap(x, y);
            }
            Command::Resize(size) => session.resize(size),
            Command::Unmount => break,
        }
    }

    session.unmount();
}
