/// Independent gesture streams; both may be active at once.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GestureStream {
    Pan,
    Pinch,
}

impl GestureStream {
    pub(crate) const COUNT: usize = 2;

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Pan => 0,
            Self::Pinch => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GesturePhase {
    Begin,
    Change,
    End,
}

/// Classified gesture event as delivered by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GestureEvent {
    PanBegin,
    /// Incremental translation since the previous change, in surface pixels.
    PanChange { dx: f32, dy: f32 },
    PanEnd,
    PinchBegin,
    /// Incremental scale since the previous change (> 1 spreads fingers).
    PinchChange { scale: f32 },
    PinchEnd,
}

impl GestureEvent {
    pub fn stream(&self) -> GestureStream {
        match self {
            Self::PanBegin | Self::PanChange { .. } | Self::PanEnd => GestureStream::Pan,
            Self::PinchBegin | Self::PinchChange { .. } | Self::PinchEnd => GestureStream::Pinch,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        match self {
            Self::PanBegin | Self::PinchBegin => GesturePhase::Begin,
            Self::PanChange { .. } | Self::PinchChange { .. } => GesturePhase::Change,
            Self::PanEnd | Self::PinchEnd => GesturePhase::End,
        }
    }
}
