use std::time::Instant;

use crate::coords::Vec2;

use super::sample::{Sample, StrokeId};

/// One stroke: append-only actual samples plus the current prediction set.
///
/// Predictions never feed into `samples`; dropping them has no effect on the
/// stroke's final geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: StrokeId,
    pub started_at: Option<Instant>,
    pub samples: Vec<Sample>,
    pub predicted: Vec<Sample>,
}

impl Stroke {
    pub fn new(id: StrokeId, started_at: Option<Instant>) -> Self {
        Self {
            id,
            started_at,
            samples: Vec::new(),
            predicted: Vec::new(),
        }
    }

    /// Actual positions in arrival order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.samples.iter().map(|s| s.position).collect()
    }

    pub fn predicted_positions(&self) -> Vec<Vec2> {
        self.predicted.iter().map(|s| s.position).collect()
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.samples.last().map(|s| s.position)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Committed strokes plus at most one active stroke.
#[derive(Debug, Default, Clone)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    active: Option<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Committed strokes in commit order, then the active stroke.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.committed.iter().chain(self.active.iter())
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Stroke> {
        self.active.as_mut()
    }

    /// Installs a new active stroke, returning the one it displaced.
    pub(crate) fn set_active(&mut self, stroke: Stroke) -> Option<Stroke> {
        self.active.replace(stroke)
    }

    pub(crate) fn take_active(&mut self) -> Option<Stroke> {
        self.active.take()
    }

    pub(crate) fn push_committed(&mut self, stroke: Stroke) {
        debug_assert!(stroke.predicted.is_empty());
        self.committed.push(stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(id: u64, xs: &[f32]) -> Stroke {
        let mut s = Stroke::new(StrokeId(id), None);
        s.samples = xs.iter().map(|&x| Sample::new(Vec2::new(x, 0.0))).collect();
        s
    }

    #[test]
    fn iter_yields_committed_then_active() {
        let mut store = StrokeStore::new();
        store.push_committed(stroke(1, &[0.0]));
        store.push_committed(stroke(2, &[1.0]));
        store.set_active(stroke(3, &[2.0]));

        let ids: Vec<u64> = store.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.committed_len(), 2);
    }

    #[test]
    fn set_active_returns_displaced_stroke() {
        let mut store = StrokeStore::new();
        assert!(store.set_active(stroke(1, &[])).is_none());
        let old = store.set_active(stroke(2, &[])).map(|s| s.id);
        assert_eq!(old, Some(StrokeId(1)));
        assert_eq!(store.active().map(|s| s.id), Some(StrokeId(2)));
    }

    #[test]
    fn stroke_accessors() {
        let s = stroke(7, &[1.0, 2.0]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.last_position(), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(s.positions(), vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]);
        assert!(s.predicted_positions().is_empty());
    }
}
