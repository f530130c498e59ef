//! Diorama engine crate.
//!
//! A retained 3D room scene rendered into a host-provided surface, redrawn
//! only when something changed: a two-cadence scheduler (idle heartbeat and
//! active gesture rate) drives draws and keep-alive presents.

pub mod camera;
pub mod content;
pub mod coords;
pub mod core;
pub mod device;
pub mod gesture;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod session;
pub mod time;
pub mod window;

#[cfg(test)]
mod test_support;
