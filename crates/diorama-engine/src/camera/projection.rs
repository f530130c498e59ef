use glam::{Mat4, Vec2, Vec3};

use super::CameraTransform;

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Projection applied on top of the orbit view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ProjectionKind {
    Perspective { fov_y_degrees: f32 },
    /// `frustum_height` is the visible world height at any depth.
    Orthographic { frustum_height: f32 },
}

impl Default for ProjectionKind {
    fn default() -> Self {
        Self::Perspective { fov_y_degrees: 50.0 }
    }
}

impl ProjectionKind {
    /// Eye position the room is first shown from.
    pub fn default_eye(&self) -> Vec3 {
        match self {
            Self::Perspective { .. } => Vec3::new(6.0, 5.0, 6.0),
            Self::Orthographic { .. } => Vec3::new(5.0, 5.0, 5.0),
        }
    }

    /// Projection matrix with wgpu depth range `[0, 1]`.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        match *self {
            Self::Perspective { fov_y_degrees } => {
                let fov = fov_y_degrees.clamp(1.0, 179.0).to_radians();
                Mat4::perspective_rh(fov, aspect, NEAR, FAR)
            }
            Self::Orthographic { frustum_height } => {
                let half_h = frustum_height.max(1e-3) * 0.5;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, NEAR, FAR)
            }
        }
    }

    pub fn view_proj(&self, transform: &CameraTransform, aspect: f32) -> Mat4 {
        self.matrix(aspect) * transform.view()
    }

    /// World-space ray through an NDC point, starting on the near plane.
    pub fn pick_ray(&self, transform: &CameraTransform, aspect: f32, ndc: Vec2) -> Ray {
        let inv = self.view_proj(transform, aspect).inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
    }
}

/// Half-line used for tap hit-testing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for a degenerate projection.
    pub dir: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}
