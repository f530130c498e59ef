//! Surface coordinate helpers.
//!
//! Conventions:
//! - surface coordinates are physical pixels, top-left origin, +Y down
//! - NDC is [-1, 1] on both axes, +Y up

mod viewport;

pub use viewport::SurfaceSize;
