//! Orbit camera model.
//!
//! `OrbitCamera` is plain spherical-coordinate state; it never touches the GPU
//! and never marks anything dirty. Gesture handling and the scheduler decide
//! what a camera change means for rendering.

mod orbit;
mod projection;

pub use orbit::{CameraTransform, OrbitCamera, OrbitConfig, OrbitState};
pub use projection::{ProjectionKind, Ray};
