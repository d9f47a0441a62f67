//! Stroke model.
//!
//! - `SampleReconciler`: stroke lifecycle and actual/predicted bookkeeping
//! - `StrokeStore`: committed strokes plus the active one
//!
//! Positions are logical pixels, as delivered by the input subsystem.

mod error;
mod reconciler;
mod sample;
mod store;

pub use error::StrokeError;
pub use reconciler::SampleReconciler;
pub use sample::{Sample, StrokeId};
pub use store::{Stroke, StrokeStore};
