//! Coordinate and geometry types shared across the ink pipeline and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware) for input samples and the stroke model
//! - Canvas pixels (logical * scale factor) for raster work
//! - Origin top-left, +X right, +Y down

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
