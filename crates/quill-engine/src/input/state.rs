use crate::coords::Vec2;

use super::types::{MoveBatch, PointerEvent, PointerKind, StrokeEvent};

/// Current pointer state for a single canvas.
///
/// Tracks which pointer (if any) is drawing and turns raw [`PointerEvent`]s
/// into stroke lifecycle [`StrokeEvent`]s.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer currently drawing a stroke.
    pub drawing: Option<PointerKind>,

    /// Last known pointer position in logical pixels.
    pub last_position: Option<Vec2>,
}

impl PointerState {
    /// Applies a pointer event and returns the stroke event it produces, if any.
    pub fn apply_event(&mut self, ev: PointerEvent) -> Option<StrokeEvent> {
        match ev {
            PointerEvent::Focused(f) => {
                self.focused = f;
                if !f && self.drawing.take().is_some() {
                    // Avoids a stuck stroke when focus changes mid-press.
                    return Some(StrokeEvent::Cancelled);
                }
                None
            }

            PointerEvent::Down { kind, position, timestamp } => {
                self.last_position = Some(position);
                if self.drawing.is_some() {
                    return None;
                }
                self.drawing = Some(kind);
                Some(StrokeEvent::Began(MoveBatch::point(position).at(timestamp)))
            }

            PointerEvent::Moved { kind, position, coalesced, predicted, timestamp } => {
                self.last_position = Some(position);
                if self.drawing != Some(kind) {
                    return None;
                }
                let mut positions = coalesced;
                positions.push(position);
                Some(StrokeEvent::Moved(MoveBatch {
                    coalesced: positions,
                    predicted,
                    timestamp: Some(timestamp),
                }))
            }

            PointerEvent::Up { kind, position, timestamp } => {
                self.last_position = Some(position);
                if self.drawing != Some(kind) {
                    return None;
                }
                self.drawing = None;
                // Release position repeats the last move on most platforms;
                // duplicates are harmless to the fitter.
                Some(StrokeEvent::Ended(MoveBatch::point(position).at(timestamp)))
            }

            PointerEvent::Cancel { kind } => {
                if self.drawing != Some(kind) {
                    return None;
                }
                self.drawing = None;
                Some(StrokeEvent::Cancelled)
            }
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }
}
