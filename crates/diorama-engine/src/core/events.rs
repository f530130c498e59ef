use std::sync::mpsc;

use crate::scene::ObjectId;

/// Outbound notifications from a mounted scene.
///
/// Called on the graphics thread. Both methods default to doing nothing.
pub trait SceneEvents {
    /// An interactive object was hit by a tap.
    fn on_object_tapped(&mut self, id: &ObjectId) {
        let _ = id;
    }

    /// The host reclaimed the surface. Delivered at most once per mount.
    fn on_context_lost(&mut self) {}
}

/// Owned form of [`SceneEvents`] callbacks, for forwarding across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    ObjectTapped(ObjectId),
    ContextLost,
}

impl SceneEvents for () {}

impl SceneEvents for mpsc::Sender<SceneEvent> {
    fn on_object_tapped(&mut self, id: &ObjectId) {
        let _ = self.send(SceneEvent::ObjectTapped(id.clone()));
    }

    fn on_context_lost(&mut self) {
        let _ = self.send(SceneEvent::ContextLost);
    }
}
