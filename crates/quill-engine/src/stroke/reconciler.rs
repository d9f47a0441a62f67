use std::time::Instant;

use crate::coords::Vec2;
use crate::input::MoveBatch;

use super::error::StrokeError;
use super::sample::{Sample, StrokeId};
use super::store::{Stroke, StrokeStore};

/// Sorts incoming positions into a stroke's actual and predicted samples and
/// owns the stroke lifecycle.
///
/// Rules:
/// - actual samples are appended in arrival order, duplicates included
/// - a prediction set replaces the previous one wholesale
/// - a new actual batch without predictions clears stale predictions
/// - commit and cancel drop predictions unconditionally
///
/// Non-finite positions are discarded at the door so nothing downstream has
/// to guard against them.
#[derive(Debug, Default)]
pub struct SampleReconciler {
    store: StrokeStore,
    next_id: u64,
}

impl SampleReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.store.active()
    }

    /// Starts a new active stroke.
    ///
    /// A stroke that is still active is cancelled first.
    pub fn begin_stroke(&mut self, timestamp: Option<Instant>) -> StrokeId {
        let id = StrokeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        if let Some(old) = self.store.set_active(Stroke::new(id, timestamp)) {
            log::warn!("{} replaced while active; cancelled with {} samples", old.id, old.len());
        }
        log::debug!("{id} began");
        id
    }

    /// Appends actual positions to the active stroke.
    ///
    /// Within a batch every position but the last is a coalesced sample.
    /// Returns the number of samples appended.
    pub fn ingest_actual(
        &mut self,
        positions: &[Vec2],
        timestamp: Option<Instant>,
    ) -> Result<usize, StrokeError> {
        let stroke = self
            .store
            .active_mut()
            .ok_or(StrokeError::NoActiveStroke { op: "ingest_actual" })?;

        if positions.is_empty() {
            return Ok(0);
        }

        // Newer actual input makes the old predictions stale.
        stroke.predicted.clear();

        let kept: Vec<Vec2> = positions
            .iter()
            .copied()
            .filter(|p| {
                let finite = p.is_finite();
                if !finite {
                    log::warn!("{}: dropped non-finite sample {p:?}", stroke.id);
                }
                finite
            })
            .collect();

        // Only the newest kept position is the event's own sample.
        let Some((&newest, history)) = kept.split_last() else {
            return Ok(0);
        };
        stroke
            .samples
            .extend(history.iter().map(|&p| Sample::coalesced(p).at(timestamp)));
        stroke.samples.push(Sample::new(newest).at(timestamp));
        Ok(kept.len())
    }

    /// Replaces the active stroke's predictions. An empty slice clears them.
    pub fn ingest_predicted(
        &mut self,
        positions: &[Vec2],
        timestamp: Option<Instant>,
    ) -> Result<(), StrokeError> {
        let stroke = self
            .store
            .active_mut()
            .ok_or(StrokeError::NoActiveStroke { op: "ingest_predicted" })?;

        stroke.predicted.clear();
        stroke.predicted.extend(
            positions
                .iter()
                .filter(|p| p.is_finite())
                .map(|&p| Sample::new(p).at(timestamp)),
        );
        Ok(())
    }

    /// Applies one input event: actual positions first, then its prediction
    /// set. Returns the number of actual samples appended.
    pub fn ingest(&mut self, batch: &MoveBatch) -> Result<usize, StrokeError> {
        let appended = self.ingest_actual(&batch.coalesced, batch.timestamp)?;
        self.ingest_predicted(&batch.predicted, batch.timestamp)?;
        Ok(appended)
    }

    /// Moves the active stroke into the committed collection, dropping its
    /// predictions first.
    pub fn commit(&mut self) -> Result<StrokeId, StrokeError> {
        let mut stroke = self
            .store
            .take_active()
            .ok_or(StrokeError::NoActiveStroke { op: "commit" })?;

        stroke.predicted.clear();
        let id = stroke.id;
        log::debug!("{id} committed with {} samples", stroke.len());
        self.store.push_committed(stroke);
        Ok(id)
    }

    /// Discards the active stroke without committing it.
    pub fn cancel(&mut self) -> Result<Stroke, StrokeError> {
        let stroke = self
            .store
            .take_active()
            .ok_or(StrokeError::NoActiveStroke { op: "cancel" })?;

        log::debug!("{} cancelled with {} samples", stroke.id, stroke.len());
        Ok(stroke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn commit_keeps_actual_and_drops_predictions() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest(&MoveBatch::actual([v(0.0, 0.0), v(1.0, 0.0)]).with_predicted([v(2.0, 0.0)]))
            .unwrap();
        r.ingest(&MoveBatch::actual([v(3.0, 0.0)]).with_predicted([v(4.0, 0.0), v(5.0, 0.0)]))
            .unwrap();
        assert_eq!(r.active().unwrap().predicted.len(), 2);

        r.commit().unwrap();
        let stored = &r.store().committed()[0];
        assert_eq!(stored.samples.len(), 3);
        assert!(stored.predicted.is_empty());
        assert!(r.active().is_none());
    }

    #[test]
    fn cancel_leaves_committed_untouched() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest_actual(&[v(0.0, 0.0)], None).unwrap();
        r.commit().unwrap();

        r.begin_stroke(None);
        r.ingest_actual(&[v(5.0, 5.0), v(6.0, 6.0)], None).unwrap();
        let dropped = r.cancel().unwrap();

        assert_eq!(dropped.len(), 2);
        assert_eq!(r.store().committed_len(), 1);
        assert!(r.active().is_none());
    }

    #[test]
    fn calls_without_active_stroke_are_errors() {
        let mut r = SampleReconciler::new();
        assert_eq!(
            r.ingest_actual(&[v(0.0, 0.0)], None),
            Err(StrokeError::NoActiveStroke { op: "ingest_actual" })
        );
        assert!(r.ingest_predicted(&[], None).is_err());
        assert!(r.commit().is_err());
        assert!(r.cancel().is_err());
        assert_eq!(r.store().committed_len(), 0);
    }

    #[test]
    fn begin_while_active_cancels_previous() {
        let mut r = SampleReconciler::new();
        let a = r.begin_stroke(None);
        r.ingest_actual(&[v(0.0, 0.0)], None).unwrap();
        let b = r.begin_stroke(None);

        assert_ne!(a, b);
        assert_eq!(r.store().committed_len(), 0);
        assert!(r.active().unwrap().is_empty());
    }

    // ── sample classification ─────────────────────────────────────────────

    #[test]
    fn actual_batch_without_predictions_clears_stale_predictions() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest_actual(&[v(30.0, 0.0)], None).unwrap();
        r.ingest_predicted(&[v(40.0, 0.0)], None).unwrap();
        r.ingest(&MoveBatch::actual([v(40.0, 1.0)])).unwrap();

        let s = r.active().unwrap();
        assert!(s.predicted.is_empty());
        assert_eq!(s.last_position(), Some(v(40.0, 1.0)));
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest_actual(&[v(1.0, 1.0), v(1.0, 1.0)], None).unwrap();
        r.ingest_actual(&[v(0.0, 0.0)], None).unwrap();

        assert_eq!(
            r.active().unwrap().positions(),
            vec![v(1.0, 1.0), v(1.0, 1.0), v(0.0, 0.0)]
        );
    }

    #[test]
    fn all_but_last_of_a_batch_are_coalesced() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest_actual(&[v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)], None).unwrap();

        let flags: Vec<bool> = r.active().unwrap().samples.iter().map(|s| s.coalesced).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn trailing_non_finite_position_does_not_hide_the_newest_sample() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        let n = r
            .ingest_actual(&[v(0.0, 0.0), v(1.0, 0.0), v(f32::NAN, 0.0)], None)
            .unwrap();
        assert_eq!(n, 2);

        let flags: Vec<bool> = r.active().unwrap().samples.iter().map(|s| s.coalesced).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn empty_prediction_set_clears() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        r.ingest_predicted(&[v(1.0, 0.0)], None).unwrap();
        r.ingest_predicted(&[], None).unwrap();
        assert!(r.active().unwrap().predicted.is_empty());
    }

    #[test]
    fn non_finite_positions_are_dropped() {
        let mut r = SampleReconciler::new();
        r.begin_stroke(None);
        let n = r
            .ingest_actual(&[v(f32::NAN, 0.0), v(1.0, 0.0), v(f32::INFINITY, 2.0)], None)
            .unwrap();
        assert_eq!(n, 1);
        r.ingest_predicted(&[v(f32::NAN, 1.0)], None).unwrap();
        assert!(r.active().unwrap().predicted.is_empty());
    }
}
