/// Strided 8-bit image and its shape types
pub mod image;

pub use image::{Image, PixelFormat, Shape, Size};
