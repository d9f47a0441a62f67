use std::time::Instant;

use crate::coords::Vec2;

/// Which device produced a pointer event.
///
/// Only one pointer draws at a time; events from any other pointer are
/// ignored while a stroke is in progress.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerKind {
    Mouse,
    /// Touch contact, keyed by the platform's finger id.
    Touch(u64),
    Pen,
}

/// Platform-agnostic pointer event in logical pixels.
///
/// Runtime code translates window-system events into these; see
/// `input::platform::winit`.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Contact started (primary button pressed, finger or pen down).
    Down {
        kind: PointerKind,
        position: Vec2,
        timestamp: Instant,
    },

    /// Pointer moved. `coalesced` holds any historical positions the platform
    /// reported for this event, oldest first, excluding `position` itself.
    Moved {
        kind: PointerKind,
        position: Vec2,
        coalesced: Vec<Vec2>,
        predicted: Vec<Vec2>,
        timestamp: Instant,
    },

    /// Contact ended.
    Up {
        kind: PointerKind,
        position: Vec2,
        timestamp: Instant,
    },

    /// Platform aborted the contact (touch cancel).
    Cancel { kind: PointerKind },

    /// Window focus change. Losing focus mid-stroke cancels the stroke.
    Focused(bool),
}

/// Positions carried by one input event.
///
/// `coalesced` is ordered oldest first; its last element is the event's own
/// position. `predicted` replaces the stroke's predictions wholesale; an empty
/// vector clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveBatch {
    pub coalesced: Vec<Vec2>,
    pub predicted: Vec<Vec2>,
    pub timestamp: Option<Instant>,
}

impl MoveBatch {
    /// A single actual position with no predictions.
    pub fn point(position: Vec2) -> Self {
        Self {
            coalesced: vec![position],
            predicted: Vec::new(),
            timestamp: None,
        }
    }

    /// Actual positions in arrival order, no predictions.
    pub fn actual<I: IntoIterator<Item = Vec2>>(positions: I) -> Self {
        Self {
            coalesced: positions.into_iter().collect(),
            predicted: Vec::new(),
            timestamp: None,
        }
    }

    pub fn with_predicted<I: IntoIterator<Item = Vec2>>(mut self, positions: I) -> Self {
        self.predicted = positions.into_iter().collect();
        self
    }

    pub fn at(mut self, timestamp: Instant) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.coalesced.is_empty() && self.predicted.is_empty()
    }
}

/// Stroke lifecycle signal consumed by the ink engine.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeEvent {
    Began(MoveBatch),
    Moved(MoveBatch),
    /// Final samples and predictions are applied before the stroke commits.
    Ended(MoveBatch),
    Cancelled,
}
