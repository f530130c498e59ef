use crate::camera::OrbitCamera;
use crate::schedule::DirtyFlag;

use super::types::{GestureEvent, GesturePhase, GestureStream};

/// What the scheduler should do after a gesture event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopSignal {
    /// No mode change.
    Stay,
    /// First stream began: switch to the high-rate loop.
    EnterActive,
    /// Last stream ended: leave the high-rate loop with a forced render.
    ExitActive,
}

/// Maps classified pan/pinch events onto the orbit camera.
///
/// Tracks which streams are active. Deltas for a stream that is not active
/// (late `change` after `end`, or a `change` without `begin`) are dropped.
#[derive(Debug)]
pub struct GestureMapper {
    active: [bool; GestureStream::COUNT],
    dirty: DirtyFlag,
    dropped_changes: u64,
}

impl GestureMapper {
    pub fn new(dirty: DirtyFlag) -> Self {
        Self {
            active: [false; GestureStream::COUNT],
            dirty,
            dropped_changes: 0,
        }
    }

    /// Number of streams currently between `begin` and `end`.
    pub fn active_streams(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    pub fn is_active(&self) -> bool {
        self.active_streams() > 0
    }

    pub fn stream_active(&self, stream: GestureStream) -> bool {
        self.active[stream.index()]
    }

    /// Deltas discarded because their stream was inactive.
    pub fn dropped_changes(&self) -> u64 {
        self.dropped_changes
    }

    /// Applies one event. Camera mutation and the dirty mark happen together.
    pub fn apply(&mut self, event: GestureEvent, camera: &mut OrbitCamera) -> LoopSignal {
        let stream = event.stream();
        let idx = stream.index();

        match event.phase() {
            GesturePhase::Begin => {
                if self.active[idx] {
                    return LoopSignal::Stay;
                }
                let was_idle = !self.is_active();
                self.active[idx] = true;
                log::trace!("gesture {stream:?} began");
                if was_idle { LoopSignal::EnterActive } else { LoopSignal::Stay }
            }

            GesturePhase::Change => {
                if !self.active[idx] {
                    self.dropped_changes += 1;
                    log::trace!("dropping {stream:?} change outside begin/end");
                    return LoopSignal::Stay;
                }

                let applied = match event {
                    GestureEvent::PanChange { dx, dy } => camera.apply_pan_delta(dx, dy),
                    GestureEvent::PinchChange { scale } => camera.apply_zoom_delta(scale),
                    _ => false,
                };

                if applied {
                    self.dirty.set();
                }
                LoopSignal::Stay
            }

            GesturePhase::End => {
                if !self.active[idx] {
                    // Hosts commonly deliver both `end` and `finalize`.
                    return LoopSignal::Stay;
                }
                self.active[idx] = false;
                log::trace!("gesture {stream:?} ended");
                if self.is_active() { LoopSignal::Stay } else { LoopSignal::ExitActive }
            }
        }
    }

    /// Forgets all active streams without signalling.
    pub fn reset(&mut self) {
        self.active = [false; GestureStream::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitConfig;
    use glam::Vec3;

    fn setup() -> (GestureMapper, OrbitCamera, DirtyFlag) {
        let dirty = DirtyFlag::new();
        let cam = OrbitCamera::looking_from(OrbitConfig::default(), Vec3::new(6.0, 5.0, 6.0));
        (GestureMapper::new(dirty.clone()), cam, dirty)
    }

    #[test]
    fn begin_change_end_single_stream() {
        let (mut m, mut cam, dirty) = setup();
        let before = cam.state();

        assert_eq!(m.apply(GestureEvent::PanBegin, &mut cam), LoopSignal::EnterActive);
        assert!(!dirty.is_set());

        assert_eq!(m.apply(GestureEvent::PanChange { dx: 10.0, dy: 0.0 }, &mut cam), LoopSignal::Stay);
        assert!(dirty.take());
        assert_ne!(cam.state().azimuth, before.azimuth);

        assert_eq!(m.apply(GestureEvent::PanEnd, &mut cam), LoopSignal::ExitActive);
        assert!(!m.is_active());
    }

    #[test]
    fn composed_streams_exit_on_last_end_only() {
        let (mut m, mut cam, _) = setup();

        assert_eq!(m.apply(GestureEvent::PanBegin, &mut cam), LoopSignal::EnterActive);
        assert_eq!(m.apply(GestureEvent::PinchBegin, &mut cam), LoopSignal::Stay);
        assert_eq!(m.active_streams(), 2);

        assert_eq!(m.apply(GestureEvent::PanEnd, &mut cam), LoopSignal::Stay);
        assert!(m.stream_active(GestureStream::Pinch));

        assert_eq!(m.apply(GestureEvent::PinchEnd, &mut cam), LoopSignal::ExitActive);
    }

    #[test]
    fn late_changes_are_ignored() {
        let (mut m, mut cam, dirty) = setup();
        m.apply(GestureEvent::PinchBegin, &mut cam);
        m.apply(GestureEvent::PinchEnd, &mut cam);
        let after_end = cam.state();

        m.apply(GestureEvent::PinchChange { scale: 2.0 }, &mut cam);
        m.apply(GestureEvent::PanChange { dx: 5.0, dy: 5.0 }, &mut cam);

        assert_eq!(cam.state(), after_end);
        assert!(!dirty.is_set());
        assert_eq!(m.dropped_changes(), 2);
    }

    #[test]
    fn change_on_other_stream_needs_its_own_begin() {
        let (mut m, mut cam, dirty) = setup();
        m.apply(GestureEvent::PanBegin, &mut cam);
        let before = cam.state();

        m.apply(GestureEvent::PinchChange { scale: 3.0 }, &mut cam);
        assert_eq!(cam.state().radius, before.radius);
        assert!(!dirty.is_set());
    }

    #[test]
    fn duplicate_end_and_begin_are_idempotent() {
        let (mut m, mut cam, _) = setup();
        assert_eq!(m.apply(GestureEvent::PanBegin, &mut cam), LoopSignal::EnterActive);
        assert_eq!(m.apply(GestureEvent::PanBegin, &mut cam), LoopSignal::Stay);
        assert_eq!(m.apply(GestureEvent::PanEnd, &mut cam), LoopSignal::ExitActive);
        assert_eq!(m.apply(GestureEvent::PanEnd, &mut cam), LoopSignal::Stay);
    }

    #[test]
    fn rejected_delta_does_not_mark_dirty() {
        let (mut m, mut cam, dirty) = setup();
        m.apply(GestureEvent::PinchBegin, &mut cam);
        m.apply(GestureEvent::PinchChange { scale: 0.0 }, &mut cam);
        assert!(!dirty.is_set());
    }
}
