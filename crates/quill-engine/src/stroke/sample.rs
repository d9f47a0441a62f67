use std::fmt;
use std::time::Instant;

use crate::coords::Vec2;

/// One input position of a stroke.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    /// Logical-pixel position.
    pub position: Vec2,

    /// Historical position reported inside a later event.
    pub coalesced: bool,

    /// Arrival time, kept for diagnostics only.
    pub timestamp: Option<Instant>,
}

impl Sample {
    pub fn new(position: Vec2) -> Self {
        Self { position, coalesced: false, timestamp: None }
    }

    pub fn coalesced(position: Vec2) -> Self {
        Self { position, coalesced: true, timestamp: None }
    }

    pub fn at(mut self, timestamp: Option<Instant>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Monotonic stroke identifier, unique per reconciler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(pub u64);

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stroke#{}", self.0)
    }
}
