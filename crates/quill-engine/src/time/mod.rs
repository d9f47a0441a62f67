//! Time subsystem.
//!
//! - `FrameClock`: per-frame delta time, clamped
//! - `FrameScheduler`: pausable display-cadence tick source driving the canvas
//!
//! Neither reads a platform clock API beyond `std::time::Instant`; hosts pass
//! `now` in.

mod frame_clock;
mod scheduler;

pub use frame_clock::{FrameClock, FrameTime};
pub use scheduler::{FrameScheduler, SchedulerState, DEFAULT_REFRESH_HZ};
