//! Paint model shared between the raster canvas and GPU renderers.
//!
//! Ink is solid-colored; colors are premultiplied.

pub mod color;

pub use color::Color;
