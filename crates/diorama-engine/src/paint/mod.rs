//! Paint primitives shared by the scene and the renderer.

mod color;
mod image_data;

pub use color::Color;
pub use image_data::ImageData;
