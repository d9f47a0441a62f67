//! Ink engine: the configurable pipeline tying stroke model, fitter, queue,
//! canvas and scheduler together.

mod config;
mod ink;

pub use config::EngineConfig;
pub use ink::InkEngine;
