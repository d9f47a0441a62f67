//! Quill engine crate.
//!
//! Low-latency ink: pointer samples are reconciled into strokes, fitted with
//! Catmull-Rom curves as they arrive, and rasterized incrementally into a
//! persistent ping-pong canvas that only repaints what changed. The GPU and
//! window layers present that canvas; everything above them runs headless.

pub mod canvas;
pub mod coords;
pub mod device;
pub mod engine;
pub mod fit;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod stroke;
pub mod time;
pub mod window;
