//! Mounted scenes.
//!
//! `SceneSession` is the single-threaded core that ties the context, camera,
//! gestures, content and scheduler together. `SceneThread` hosts one on a
//! dedicated graphics thread; the winit runtime drives one inline.

mod scene;
mod thread;

pub use scene::SceneSession;
pub use thread::SceneThread;
