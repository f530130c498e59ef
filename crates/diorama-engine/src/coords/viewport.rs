use glam::Vec2;

/// Drawable surface dimensions in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero-area surfaces occur while a host window is minimized.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width / height, with degenerate sizes mapped to 1.0.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Converts a surface-pixel position to normalized device coordinates.
    ///
    /// Returns `None` for empty surfaces.
    pub fn to_ndc(self, x: f32, y: f32) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let nx = (x / self.width as f32) * 2.0 - 1.0;
        let ny = 1.0 - (y / self.height as f32) * 2.0;
        Some(Vec2::new(nx, ny))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_empty_surface_is_one() {
        assert_eq!(SurfaceSize::new(0, 720).aspect(), 1.0);
        assert_eq!(SurfaceSize::new(1280, 0).aspect(), 1.0);
    }

    #[test]
    fn ndc_corners() {
        let s = SurfaceSize::new(200, 100);
        assert_eq!(s.to_ndc(0.0, 0.0), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(s.to_ndc(200.0, 100.0), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(s.to_ndc(100.0, 50.0), Some(Vec2::ZERO));
    }

    #[test]
    fn ndc_of_empty_surface_is_none() {
        assert!(SurfaceSize::new(0, 0).to_ndc(1.0, 1.0).is_none());
    }
}
