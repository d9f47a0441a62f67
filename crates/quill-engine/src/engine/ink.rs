use std::time::Instant;

use crate::canvas::{CanvasHistory, FrameReport, InkSpan, Overlay, PendingQueue, Presenter};
use crate::coords::{Vec2, Viewport};
use crate::fit::{Curve, CurveFitter};
use crate::input::{MoveBatch, SampleRateMonitor, StrokeEvent};
use crate::stroke::{SampleReconciler, Stroke, StrokeError, StrokeStore};
use crate::time::FrameScheduler;

use super::config::EngineConfig;

/// The ink pipeline: stroke model, incremental fitting, pending queue,
/// persistent canvas and frame cadence.
///
/// Input side: [`handle`](Self::handle) (or the individual lifecycle calls).
/// Each actual sample that completes a curve segment queues that segment as
/// an [`InkSpan`]; segments that may still change, and the predicted
/// polyline, live only in the [`overlay`](Self::overlay).
///
/// Frame side: [`tick`](Self::tick) at the scheduler's cadence, or
/// [`render`](Self::render) on demand. A frame drains the queue into the
/// canvas and presents it with the overlay on top.
///
/// The canvas is optional. When it cannot be allocated the engine keeps
/// accepting input and growing the stroke model; frames are skipped until a
/// later [`resize`](Self::resize) succeeds.
#[derive(Debug)]
pub struct InkEngine {
    config: EngineConfig,
    fitter: CurveFitter,
    reconciler: SampleReconciler,

    /// Segments of the active stroke already queued for raster.
    emitted: usize,

    queue: PendingQueue,
    canvas: Option<CanvasHistory>,
    viewport: Viewport,
    scheduler: FrameScheduler,
    monitor: SampleRateMonitor,
    redraw_requested: bool,
}

impl InkEngine {
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        let canvas = create_canvas(&config, viewport);

        Self {
            fitter: CurveFitter::new(config.fit_mode),
            reconciler: SampleReconciler::new(),
            emitted: 0,
            queue: PendingQueue::new(config.queue),
            canvas,
            viewport,
            scheduler: FrameScheduler::new(config.refresh_hz),
            monitor: SampleRateMonitor::new(),
            redraw_requested: true,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Committed strokes and the active stroke.
    pub fn strokes(&self) -> &StrokeStore {
        self.reconciler.store()
    }

    pub fn pending(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn canvas(&self) -> Option<&CanvasHistory> {
        self.canvas.as_ref()
    }

    /// `true` while no canvas is allocated.
    pub fn is_degraded(&self) -> bool {
        self.canvas.is_none()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Next frame deadline; `None` while idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Returns and clears the redraw request raised by model changes.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Routes one stroke lifecycle event. Caller errors (no active stroke)
    /// are logged and ignored.
    pub fn handle(&mut self, event: StrokeEvent, now: Instant) {
        let result = match event {
            StrokeEvent::Began(batch) => {
                self.begin_stroke(&batch, now);
                Ok(())
            }
            StrokeEvent::Moved(batch) => self.ingest(&batch, now),
            StrokeEvent::Ended(batch) => self.end_stroke(&batch, now),
            StrokeEvent::Cancelled => self.cancel_stroke(),
        };

        if let Err(e) = result {
            log::warn!("ignored stroke event: {e}");
        }
    }

    /// Starts a stroke with the batch's samples.
    pub fn begin_stroke(&mut self, batch: &MoveBatch, now: Instant) {
        if self.reconciler.active().is_some() {
            self.monitor.stop();
        }
        self.reconciler.begin_stroke(batch.timestamp.or(Some(now)));
        self.emitted = 0;

        if self.config.monitor_sample_rate {
            self.monitor.start();
        }
        self.scheduler.resume(now);

        if let Err(e) = self.ingest(batch, now) {
            log::warn!("stroke began without samples: {e}");
        }
    }

    /// Adds one input event's samples to the active stroke and queues every
    /// segment they complete.
    pub fn ingest(&mut self, batch: &MoveBatch, now: Instant) -> Result<(), StrokeError> {
        let appended = self.reconciler.ingest(batch)?;
        if appended > 0 {
            self.monitor.record(batch.timestamp.unwrap_or(now));
        }
        self.queue_finalized(false);
        self.redraw_requested = true;
        Ok(())
    }

    /// Ingests the final samples, queues the remaining segments and commits.
    pub fn end_stroke(&mut self, batch: &MoveBatch, now: Instant) -> Result<(), StrokeError> {
        self.ingest(batch, now)?;
        self.commit_stroke()
    }

    /// Queues the active stroke's remaining segments and commits it.
    pub fn commit_stroke(&mut self) -> Result<(), StrokeError> {
        if self.reconciler.active().is_some() {
            self.queue_finalized(true);
        }
        let id = self.reconciler.commit()?;
        self.emitted = 0;
        self.redraw_requested = true;

        if self.monitor.is_monitoring() {
            let report = self.monitor.stop();
            if report.count > 0 {
                log::debug!(
                    "{id}: {} input events, {:.1} Hz average, max interval {:?}",
                    report.count + 1,
                    report.average_hz,
                    report.max_interval().unwrap_or_default()
                );
            }
        }
        Ok(())
    }

    /// Drops the active stroke. Ink already rasterized or queued stays.
    pub fn cancel_stroke(&mut self) -> Result<(), StrokeError> {
        self.reconciler.cancel()?;
        self.emitted = 0;
        self.monitor.stop();
        self.redraw_requested = true;
        Ok(())
    }

    fn queue_finalized(&mut self, ended: bool) {
        let Some(stroke) = self.reconciler.active() else {
            return;
        };
        let n = stroke.len();

        // A tap leaves a dot.
        if ended && n == 1 {
            let points = self.to_canvas(&stroke.positions());
            self.queue.push(self.span(points, self.config.stroke_width));
            return;
        }

        let finalized = self.fitter.finalized_segments(n, ended);
        if finalized <= self.emitted {
            return;
        }
        let start = self.fitter.context_start(self.emitted, n);
        let window = self.canvas_window(stroke, start);
        for i in self.emitted..finalized {
            if let Some(curve) = self.fitter.segment(&window, i - start) {
                self.queue.push(self.curve_span(curve));
            }
        }
        self.emitted = finalized;
    }

    // ── output ────────────────────────────────────────────────────────────

    /// Transient geometry for the active stroke: segments still open to
    /// change plus the straight predicted polyline.
    pub fn overlay(&self) -> Overlay {
        let Some(stroke) = self.reconciler.active() else {
            return Overlay::default();
        };
        let n = stroke.len();
        let start = self.fitter.context_start(self.emitted, n);
        let window = self.canvas_window(stroke, start);

        let mut tail = Vec::new();
        if n == 1 {
            tail.push(self.span(window.clone(), self.config.stroke_width));
        }
        for i in self.emitted..self.fitter.segment_count(n) {
            if let Some(curve) = self.fitter.segment(&window, i - start) {
                tail.push(self.curve_span(curve));
            }
        }

        let predicted = (!stroke.predicted.is_empty()).then(|| {
            let line: Vec<Vec2> = window
                .last()
                .copied()
                .into_iter()
                .chain(self.to_canvas(&stroke.predicted_positions()))
                .collect();
            InkSpan::new(
                line,
                self.config.predicted_width * self.scale(),
                self.config.predicted_color,
            )
        });

        Overlay { tail, predicted }
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Runs a frame when the scheduler has one due at `now`.
    pub fn tick<P>(&mut self, now: Instant, presenter: &mut P) -> Option<FrameReport>
    where
        P: Presenter + ?Sized,
    {
        let ft = self.scheduler.poll(now)?;
        log::trace!("frame {} (dt {:.2} ms)", ft.frame_index, ft.dt * 1000.0);
        self.render(presenter)
    }

    /// Handles a host redraw: paced by the scheduler while ink is in flight,
    /// immediate while it is paused (exposure, resize, idle repaint).
    pub fn redraw<P>(&mut self, now: Instant, presenter: &mut P) -> Option<FrameReport>
    where
        P: Presenter + ?Sized,
    {
        if self.scheduler.is_paused() {
            self.render(presenter)
        } else {
            self.tick(now, presenter)
        }
    }

    /// Runs a frame now: drain the queue, rasterize, present, swap.
    ///
    /// Pauses the scheduler once no stroke is active and nothing is queued.
    /// Returns `None` when degraded.
    pub fn render<P>(&mut self, presenter: &mut P) -> Option<FrameReport>
    where
        P: Presenter + ?Sized,
    {
        let spans = self.queue.drain_frame();
        let overlay = self.overlay();

        let report = match self.canvas.as_mut() {
            Some(canvas) => Some(canvas.render_frame(&spans, &overlay, presenter)),
            None => {
                if !spans.is_empty() {
                    log::trace!("no canvas; skipped {} spans", spans.len());
                }
                None
            }
        };

        if self.reconciler.active().is_none() && self.queue.is_empty() {
            self.scheduler.pause();
        }
        report
    }

    /// Adopts a new viewport and reallocates the canvas.
    ///
    /// Queued spans are discarded: the new canvas starts blank. When the
    /// allocation fails nothing changes; the old canvas (if any), viewport
    /// and queue stay in use.
    pub fn resize(&mut self, viewport: Viewport) {
        self.redraw_requested = true;

        let (w, h) = viewport.pixel_size();
        match self.canvas.as_mut() {
            Some(canvas) => {
                if let Err(e) = canvas.resize(w, h) {
                    log::warn!("canvas resize to {w}x{h} failed, keeping {:?}: {e}", canvas.size());
                    return;
                }
            }
            None => {
                self.canvas = create_canvas(&self.config, viewport);
                if self.canvas.is_none() {
                    return;
                }
            }
        }

        self.viewport = viewport;
        let dropped = self.queue.clear();
        if dropped > 0 {
            log::debug!("resize discarded {dropped} pending spans");
        }
    }

    /// Clears the canvas and queues every stroke again.
    pub fn repaint_all(&mut self, now: Instant) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        canvas.clear();
        self.queue.clear();

        let strokes: Vec<Vec<Vec2>> = self
            .reconciler
            .store()
            .committed()
            .iter()
            .map(|s| self.to_canvas(&s.positions()))
            .collect();
        for points in strokes {
            if points.len() == 1 {
                self.queue.push(self.span(points, self.config.stroke_width));
                continue;
            }
            for i in 0..self.fitter.segment_count(points.len()) {
                if let Some(curve) = self.fitter.segment(&points, i) {
                    self.queue.push(self.curve_span(curve));
                }
            }
        }

        if let Some(stroke) = self.reconciler.active() {
            let points = self.to_canvas(&stroke.positions());
            for i in 0..self.emitted {
                if let Some(curve) = self.fitter.segment(&points, i) {
                    self.queue.push(self.curve_span(curve));
                }
            }
        }

        log::debug!("repaint queued {} spans", self.queue.len());
        self.scheduler.resume(now);
        self.redraw_requested = true;
    }

    // ── helpers ───────────────────────────────────────────────────────────

    fn scale(&self) -> f32 {
        if self.viewport.scale_factor.is_finite() && self.viewport.scale_factor > 0.0 {
            self.viewport.scale_factor
        } else {
            1.0
        }
    }

    fn to_canvas(&self, points: &[Vec2]) -> Vec<Vec2> {
        let s = self.scale();
        points.iter().map(|&p| p * s).collect()
    }

    /// Canvas positions of `stroke.samples[start..]`.
    fn canvas_window(&self, stroke: &Stroke, start: usize) -> Vec<Vec2> {
        let s = self.scale();
        stroke.samples[start.min(stroke.len())..]
            .iter()
            .map(|sample| sample.position * s)
            .collect()
    }

    fn span(&self, points: Vec<Vec2>, width: f32) -> InkSpan {
        InkSpan::new(points, width * self.scale(), self.config.stroke_color)
    }

    fn curve_span(&self, curve: Curve) -> InkSpan {
        let mut points = vec![curve.start()];
        curve.flatten_into(self.config.flatten_tolerance, &mut points);
        self.span(points, self.config.stroke_width)
    }
}

fn create_canvas(config: &EngineConfig, viewport: Viewport) -> Option<CanvasHistory> {
    let (w, h) = viewport.pixel_size();
    match CanvasHistory::new(w, h, config.canvas) {
        Ok(canvas) => Some(canvas),
        Err(e) => {
            log::warn!("canvas unavailable, drawing is degraded: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{PresentStatus, PresentedFrame};
    use crate::fit::PathSeg;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn present_ok(_: &PresentedFrame<'_>) -> PresentStatus {
        PresentStatus::Presented
    }

    fn engine() -> InkEngine {
        InkEngine::new(EngineConfig::default(), Viewport::new(120.0, 80.0, 1.0))
    }

    fn white_everywhere(e: &InkEngine) -> bool {
        e.canvas()
            .map(|c| c.current().as_bytes().chunks(4).all(|px| px == [255, 255, 255, 255]))
            .unwrap_or(false)
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn collinear_stroke_commits_as_straight_line() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(10.0, 0.0), v(20.0, 0.0), v(30.0, 0.0)])), t0);
        e.commit_stroke().unwrap();

        let stroke = &e.strokes().committed()[0];
        assert_eq!(stroke.len(), 4);
        let path = CurveFitter::default().fit(&stroke.positions());
        for seg in path.segments() {
            let pts = match *seg {
                PathSeg::MoveTo(p) | PathSeg::LineTo(p) => vec![p],
                PathSeg::CubicTo { c1, c2, to } => vec![c1, c2, to],
            };
            assert!(pts.iter().all(|p| p.y == 0.0 && (0.0..=30.0).contains(&p.x)));
        }
        assert_eq!(path.current_point(), Some(v(30.0, 0.0)));

        e.render(&mut present_ok);
        assert_eq!(e.pending().len(), 0);
    }

    #[test]
    fn actual_sample_replaces_stale_prediction() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(30.0, 0.0))), t0);
        e.handle(StrokeEvent::Moved(MoveBatch::default().with_predicted([v(40.0, 0.0)])), t0);
        assert_eq!(e.strokes().active().unwrap().predicted.len(), 1);

        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(40.0, 1.0)])), t0);
        let s = e.strokes().active().unwrap();
        assert!(s.predicted.is_empty());
        assert_eq!(s.last_position(), Some(v(40.0, 1.0)));
        assert!(e.overlay().predicted.is_none());
    }

    #[test]
    fn cancel_keeps_rasterized_ink() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(10.0, 10.0))), t0);
        e.handle(
            StrokeEvent::Moved(MoveBatch::actual([v(20.0, 12.0), v(30.0, 18.0), v(40.0, 20.0), v(50.0, 30.0)])),
            t0,
        );
        e.render(&mut present_ok);
        let before = e.canvas().unwrap().current().clone();
        assert!(!white_everywhere(&e));

        e.handle(StrokeEvent::Cancelled, t0);
        e.render(&mut present_ok);

        assert_eq!(e.strokes().committed_len(), 0);
        assert!(e.strokes().active().is_none());
        assert_eq!(e.canvas().unwrap().current(), &before);
    }

    #[test]
    fn commit_drops_predictions() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(5.0, 5.0)]).with_predicted([v(9.0, 9.0)])), t0);
        e.handle(
            StrokeEvent::Ended(MoveBatch::actual([v(6.0, 6.0)]).with_predicted([v(7.0, 7.0), v(8.0, 8.0)])),
            t0,
        );

        let s = &e.strokes().committed()[0];
        assert_eq!(s.len(), 3);
        assert!(s.predicted.is_empty());
        assert!(e.overlay().is_empty());
    }

    // ── incremental raster ────────────────────────────────────────────────

    #[test]
    fn incremental_frames_match_full_repaint() {
        let mut e = engine();
        let t0 = Instant::now();
        let pts = [v(8.0, 8.0), v(20.0, 30.0), v(35.0, 25.0), v(50.0, 60.0), v(80.0, 40.0), v(100.0, 70.0)];

        e.handle(StrokeEvent::Began(MoveBatch::point(pts[0])), t0);
        for &p in &pts[1..] {
            e.handle(StrokeEvent::Moved(MoveBatch::point(p)), t0);
            e.render(&mut present_ok);
        }
        e.handle(StrokeEvent::Ended(MoveBatch::default()), t0);
        e.render(&mut present_ok);
        let incremental = e.canvas().unwrap().current().clone();

        e.repaint_all(t0);
        e.render(&mut present_ok);
        assert_eq!(e.canvas().unwrap().current(), &incremental);
    }

    #[test]
    fn long_stroke_overlay_matches_a_full_fit() {
        let mut e = InkEngine::new(EngineConfig::default(), Viewport::new(60.0, 40.0, 2.0));
        let t0 = Instant::now();
        let pts = [v(2.0, 2.0), v(10.0, 15.0), v(17.0, 12.0), v(25.0, 30.0), v(40.0, 20.0), v(50.0, 35.0), v(55.0, 5.0)];

        e.handle(StrokeEvent::Began(MoveBatch::point(pts[0])), t0);
        e.handle(StrokeEvent::Moved(MoveBatch::actual(pts[1..].iter().copied())), t0);

        let fitter = CurveFitter::default();
        let scaled: Vec<Vec2> = pts.iter().map(|&p| p * 2.0).collect();
        let first = fitter.finalized_segments(pts.len(), false);
        let expected: Vec<InkSpan> = (first..fitter.segment_count(pts.len()))
            .filter_map(|i| fitter.segment(&scaled, i))
            .map(|curve| e.curve_span(curve))
            .collect();

        assert_eq!(first, pts.len() - 2);
        assert_eq!(e.overlay().tail, expected);
    }

    #[test]
    fn overlay_holds_open_segments_and_predictions() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(
            StrokeEvent::Moved(MoveBatch::actual([v(10.0, 0.0), v(20.0, 5.0)]).with_predicted([v(30.0, 9.0)])),
            t0,
        );

        // Three samples: segment 0 is final and queued, segment 1 is open.
        assert_eq!(e.pending().len(), 1);
        let overlay = e.overlay();
        assert_eq!(overlay.tail.len(), 1);
        let predicted = overlay.predicted.unwrap();
        assert_eq!(predicted.points, vec![v(20.0, 5.0), v(30.0, 9.0)]);
    }

    #[test]
    fn tap_leaves_a_dot() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(40.0, 40.0))), t0);
        assert_eq!(e.overlay().tail.len(), 1);
        e.handle(StrokeEvent::Ended(MoveBatch::default()), t0);
        e.render(&mut present_ok);
        assert_ne!(e.canvas().unwrap().current().pixel(40, 40), Some([255, 255, 255, 255]));
    }

    // ── scheduler ─────────────────────────────────────────────────────────

    #[test]
    fn scheduler_runs_only_while_ink_is_in_flight() {
        let mut e = engine();
        let t0 = Instant::now();
        assert!(e.scheduler().is_paused());
        assert!(e.tick(t0, &mut present_ok).is_none());

        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        assert!(!e.scheduler().is_paused());
        assert!(e.tick(t0, &mut present_ok).is_some());

        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(10.0, 0.0), v(20.0, 0.0)])), t0);
        e.handle(StrokeEvent::Ended(MoveBatch::point(v(30.0, 0.0))), t0);
        assert!(!e.scheduler().is_paused());

        let interval = e.scheduler().interval();
        assert!(e.tick(t0 + interval, &mut present_ok).is_some());
        assert!(e.pending().is_empty());
        assert!(e.scheduler().is_paused());
        assert!(e.next_deadline().is_none());
    }

    #[test]
    fn redraw_runs_at_most_one_frame_per_tick_while_drawing() {
        let mut e = engine();
        let t0 = Instant::now();
        let interval = e.scheduler().interval();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        assert!(e.redraw(t0, &mut present_ok).is_some());

        // Input between ticks raises redraws; none of them may run a frame.
        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(10.0, 0.0), v(20.0, 5.0), v(30.0, 0.0)])), t0);
        assert!(e.take_redraw_request());
        assert!(e.redraw(t0 + interval / 2, &mut present_ok).is_none());
        assert!(!e.pending().is_empty());

        assert!(e.redraw(t0 + interval, &mut present_ok).is_some());
        assert!(e.pending().is_empty());
    }

    #[test]
    fn redraw_while_idle_renders_immediately() {
        let mut e = engine();
        let t0 = Instant::now();
        assert!(e.scheduler().is_paused());
        assert!(e.redraw(t0, &mut present_ok).is_some());
        assert!(e.redraw(t0, &mut present_ok).is_some());
    }

    #[test]
    fn spilled_spans_keep_the_scheduler_running() {
        let mut config = EngineConfig::default();
        config.queue.capacity = 1;
        let mut e = InkEngine::new(config, Viewport::new(120.0, 80.0, 1.0));
        let t0 = Instant::now();

        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(StrokeEvent::Ended(MoveBatch::actual([v(10.0, 0.0), v(20.0, 3.0), v(30.0, 0.0)])), t0);
        assert_eq!(e.pending().len(), 3);

        let step = e.scheduler().interval();
        let mut now = t0;
        let mut frames = 0;
        while !e.scheduler().is_paused() {
            if e.tick(now, &mut present_ok).is_some() {
                frames += 1;
            }
            now += step;
            assert!(frames < 10);
        }
        assert_eq!(frames, 3);
        assert!(e.pending().is_empty());
    }

    // ── resize / degraded ─────────────────────────────────────────────────

    #[test]
    fn resize_discards_queue_and_resets_canvas() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(10.0, 0.0), v(20.0, 5.0), v(30.0, 0.0)])), t0);
        e.render(&mut present_ok);
        e.handle(StrokeEvent::Moved(MoveBatch::actual([v(40.0, 5.0)])), t0);
        assert!(!e.pending().is_empty());

        e.resize(Viewport::new(60.0, 40.0, 2.0));
        assert!(e.pending().is_empty());
        let canvas = e.canvas().unwrap();
        assert_eq!(canvas.current_index(), 0);
        assert_eq!(canvas.size(), (120, 80));
        assert!(white_everywhere(&e));
    }

    #[test]
    fn failed_resize_keeps_queue_viewport_and_canvas() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Began(MoveBatch::point(v(10.0, 10.0))), t0);
        e.handle(StrokeEvent::Ended(MoveBatch::actual([v(30.0, 10.0), v(50.0, 20.0), v(70.0, 10.0)])), t0);
        let queued = e.pending().len();
        assert!(queued > 0);

        // Wider than the canvas accepts.
        e.resize(Viewport::new(20000.0, 80.0, 1.0));
        assert_eq!(e.pending().len(), queued);
        assert_eq!(e.viewport(), Viewport::new(120.0, 80.0, 1.0));
        assert_eq!(e.canvas().unwrap().size(), (120, 80));

        e.render(&mut present_ok);
        assert!(!white_everywhere(&e));
    }

    #[test]
    fn degraded_engine_keeps_the_stroke_model() {
        let mut e = InkEngine::new(EngineConfig::default(), Viewport::default());
        let t0 = Instant::now();
        assert!(e.is_degraded());

        e.handle(StrokeEvent::Began(MoveBatch::point(v(0.0, 0.0))), t0);
        e.handle(StrokeEvent::Ended(MoveBatch::actual([v(10.0, 0.0), v(20.0, 0.0)])), t0);
        assert!(e.render(&mut present_ok).is_none());
        assert_eq!(e.strokes().committed()[0].len(), 3);

        e.resize(Viewport::new(50.0, 50.0, 1.0));
        assert!(!e.is_degraded());
    }

    #[test]
    fn events_without_active_stroke_are_ignored() {
        let mut e = engine();
        let t0 = Instant::now();
        e.handle(StrokeEvent::Moved(MoveBatch::point(v(1.0, 1.0))), t0);
        e.handle(StrokeEvent::Ended(MoveBatch::point(v(1.0, 1.0))), t0);
        e.handle(StrokeEvent::Cancelled, t0);
        assert_eq!(e.strokes().committed_len(), 0);
        assert!(e.pending().is_empty());
        assert!(e.scheduler().is_paused());
    }

    #[test]
    fn redraw_request_is_raised_by_input_and_cleared_on_take() {
        let mut e = engine();
        assert!(e.take_redraw_request());
        assert!(!e.take_redraw_request());

        e.handle(StrokeEvent::Began(MoveBatch::point(v(1.0, 1.0))), Instant::now());
        assert!(e.take_redraw_request());
    }
}
