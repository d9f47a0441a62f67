//! Input subsystem.
//!
//! Public API is platform-agnostic. Runtime code translates window-system
//! events into `PointerEvent`s (`platform::winit`), `PointerState` turns them
//! into stroke lifecycle `StrokeEvent`s for the engine.

pub mod platform;

mod rate;
mod state;
mod types;

pub use rate::{SampleRateMonitor, SampleRateReport};
pub use state::PointerState;
pub use types::{MoveBatch, PointerEvent, PointerKind, StrokeEvent};
