use std::f32::consts::PI;

use glam::{Mat4, Vec3};

/// Orbit limits and input sensitivity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitConfig {
    /// Fixed look-at point.
    pub target: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Polar angle is measured from +Y, in radians.
    pub min_polar: f32,
    pub max_polar: f32,
    /// Radians per pixel of pan delta.
    pub pan_sensitivity: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            min_radius: 4.0,
            max_radius: 15.0,
            min_polar: 0.3,
            max_polar: PI / 2.2,
            pan_sensitivity: 0.005,
        }
    }
}

impl OrbitConfig {
    /// Returns a config whose ranges are ordered and usable with `f32::clamp`.
    ///
    /// Polar limits are kept strictly inside `(0, π)` so the view basis never
    /// degenerates at the poles.
    pub fn validated(self) -> Self {
        const POLE_EPS: f32 = 1e-3;

        let (min_radius, max_radius) = ordered(self.min_radius, self.max_radius, 1e-3, f32::MAX);
        let (min_polar, max_polar) = ordered(self.min_polar, self.max_polar, POLE_EPS, PI - POLE_EPS);

        let pan_sensitivity = if self.pan_sensitivity.is_finite() {
            self.pan_sensitivity
        } else {
            Self::default().pan_sensitivity
        };
        let target = if self.target.is_finite() {
            self.target
        } else {
            Self::default().target
        };

        Self {
            target,
            min_radius,
            max_radius,
            min_polar,
            max_polar,
            pan_sensitivity,
        }
    }
}

fn ordered(a: f32, b: f32, floor: f32, ceil: f32) -> (f32, f32) {
    let a = if a.is_finite() { a.clamp(floor, ceil) } else { floor };
    let b = if b.is_finite() { b.clamp(floor, ceil) } else { ceil };
    if a <= b { (a, b) } else { (b, a) }
}

/// Spherical camera coordinates around `OrbitConfig::target`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitState {
    pub radius: f32,
    pub polar: f32,
    /// Unbounded; trigonometry wraps it.
    pub azimuth: f32,
}

/// Concrete camera placement derived from an `OrbitState`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraTransform {
    /// Right-handed view matrix with +Y up.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    /// Distance from eye to target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.look_at)
    }
}

/// Orbit camera: spherical state plus clamping limits.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: OrbitConfig,
    state: OrbitState,
}

impl OrbitCamera {
    /// Creates a camera from explicit spherical state, clamped into the limits.
    pub fn new(config: OrbitConfig, state: OrbitState) -> Self {
        let config = config.validated();
        let mut cam = Self { config, state };
        cam.state.radius = sanitize(state.radius, config.min_radius).clamp(config.min_radius, config.max_radius);
        cam.state.polar = sanitize(state.polar, config.min_polar).clamp(config.min_polar, config.max_polar);
        cam.state.azimuth = sanitize(state.azimuth, 0.0);
        cam
    }

    /// Creates a camera whose initial state puts the eye at `eye` (before clamping).
    pub fn looking_from(config: OrbitConfig, eye: Vec3) -> Self {
        let config = config.validated();
        let d = eye - config.target;
        let radius = d.length();

        let state = if radius > f32::EPSILON {
            OrbitState {
                radius,
                polar: (d.y / radius).clamp(-1.0, 1.0).acos(),
                azimuth: d.x.atan2(d.z),
            }
        } else {
            OrbitState {
                radius: config.min_radius,
                polar: config.min_polar,
                azimuth: 0.0,
            }
        };

        Self::new(config, state)
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    /// Applies a pan delta in surface pixels.
    ///
    /// Returns `false` (and leaves the state untouched) for non-finite input.
    pub fn apply_pan_delta(&mut self, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let k = self.config.pan_sensitivity;
        let polar = self.state.polar + dy * k;
        let azimuth = self.state.azimuth - dx * k;
        if !polar.is_finite() || !azimuth.is_finite() {
            return false;
        }

        self.state.azimuth = azimuth;
        self.state.polar = polar.clamp(self.config.min_polar, self.config.max_polar);
        true
    }

    /// Applies an incremental pinch scale factor (> 1 zooms in).
    ///
    /// Returns `false` for non-finite or non-positive factors.
    pub fn apply_zoom_delta(&mut self, scale_factor: f32) -> bool {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return false;
        }
        let radius = self.state.radius / scale_factor;
        // Overflow to infinity still clamps to the max radius.
        let radius = if radius.is_nan() { self.state.radius } else { radius };
        self.state.radius = radius.clamp(self.config.min_radius, self.config.max_radius);
        true
    }

    /// Eye position and look-at target for the current state.
    ///
    /// Pure: repeated calls without an intervening update return identical values.
    pub fn camera_transform(&self) -> CameraTransform {
        let OrbitState { radius, polar, azimuth } = self.state;
        let (sin_p, cos_p) = polar.sin_cos();
        let (sin_a, cos_a) = azimuth.sin_cos();

        let offset = Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * radius;

        CameraTransform {
            position: self.config.target + offset,
            look_at: self.config.target,
        }
    }
}

fn sanitize(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}
