use std::time::{Duration, Instant};

use crate::gesture::GestureEvent;

/// Logical pixels a pressed pointer travels before a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Zoom factor per wheel notch.
pub const WHEEL_STEP: f32 = 1.1;

/// Quiet time after the last wheel event that closes the pinch stream.
pub const WHEEL_IDLE: Duration = Duration::from_millis(120);

/// What a pointer event turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerAction {
    None,
    Gesture(GestureEvent),
    Gestures(Vec<GestureEvent>),
    /// Press and release without a drag, in physical surface pixels.
    Tap { x: f32, y: f32 },
}

#[derive(Debug, Copy, Clone)]
struct Press {
    origin: (f32, f32),
    dragging: bool,
}

/// Turns mouse input into pan gestures, wheel zoom and taps.
///
/// Pan deltas are reported in logical pixels so drag speed does not depend on
/// the display scale factor. Taps carry physical coordinates for hit-testing.
/// A burst of wheel events is one pinch stream, closed by
/// [`wheel_idle`](Self::wheel_idle) once the wheel has been quiet for
/// [`WHEEL_IDLE`].
#[derive(Debug, Default)]
pub struct PointerTracker {
    physical: Option<(f32, f32)>,
    logical: Option<(f32, f32)>,
    press: Option<Press>,
    wheel_until: Option<Instant>,
}

impl PointerTracker {
    pub fn moved(&mut self, px: f32, py: f32, lx: f32, ly: f32) -> PointerAction {
        let prev = self.logical.replace((lx, ly));
        self.physical = Some((px, py));

        let Some(press) = self.press.as_mut() else {
            return PointerAction::None;
        };

        if press.dragging {
            let (ox, oy) = prev.unwrap_or((lx, ly));
            return PointerAction::Gesture(GestureEvent::PanChange {
                dx: lx - ox,
                dy: ly - oy,
            });
        }

        let (ox, oy) = press.origin;
        let (dx, dy) = (lx - ox, ly - oy);
        if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD {
            return PointerAction::None;
        }

        press.dragging = true;
        PointerAction::Gestures(vec![GestureEvent::PanBegin, GestureEvent::PanChange { dx, dy }])
    }

    pub fn pressed(&mut self) -> PointerAction {
        if let Some(origin) = self.logical {
            self.press = Some(Press {
                origin,
                dragging: false,
            });
        }
        PointerAction::None
    }

    pub fn released(&mut self) -> PointerAction {
        match self.press.take() {
            Some(Press { dragging: true, .. }) => PointerAction::Gesture(GestureEvent::PanEnd),
            Some(_) => match self.physical {
                Some((x, y)) => PointerAction::Tap { x, y },
                None => PointerAction::None,
            },
            None => PointerAction::None,
        }
    }

    /// Pointer left the window or focus was lost; ends a drag or wheel
    /// stream in progress.
    pub fn cancel(&mut self) -> PointerAction {
        let mut ended = Vec::new();
        if let Some(Press { dragging: true, .. }) = self.press.take() {
            ended.push(GestureEvent::PanEnd);
        }
        if self.wheel_until.take().is_some() {
            ended.push(GestureEvent::PinchEnd);
        }
        match ended.len() {
            0 => PointerAction::None,
            1 => PointerAction::Gesture(ended[0]),
            _ => PointerAction::Gestures(ended),
        }
    }

    /// Wheel movement. Positive notches zoom in. Opens a pinch stream if none
    /// is open and extends its idle deadline.
    pub fn wheel(&mut self, notches: f32, now: Instant) -> PointerAction {
        if notches == 0.0 || !notches.is_finite() {
            return PointerAction::None;
        }
        let change = GestureEvent::PinchChange {
            scale: WHEEL_STEP.powf(notches),
        };
        match self.wheel_until.replace(now + WHEEL_IDLE) {
            Some(_) => PointerAction::Gesture(change),
            None => PointerAction::Gestures(vec![GestureEvent::PinchBegin, change]),
        }
    }

    /// Closes the wheel stream once it has been quiet long enough.
    pub fn wheel_idle(&mut self, now: Instant) -> PointerAction {
        match self.wheel_until {
            Some(until) if now >= until => {
                self.wheel_until = None;
                PointerAction::Gesture(GestureEvent::PinchEnd)
            }
            _ => PointerAction::None,
        }
    }

    /// When [`wheel_idle`](Self::wheel_idle) next needs to run.
    pub fn wheel_deadline(&self) -> Option<Instant> {
        self.wheel_until
    }
}
