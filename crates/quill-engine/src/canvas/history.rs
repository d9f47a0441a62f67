use crate::paint::Color;

use super::dirty::{union_opt, PixelRect};
use super::error::CanvasError;
use super::present::{Overlay, PresentStatus, PresentedFrame, Presenter};
use super::raster::{rasterize_span, InkSpan};
use super::surface::RasterSurface;

/// How much of the current buffer is copied into scratch before a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyStrategy {
    /// Only the regions where the two buffers differ plus this frame's
    /// dirty region.
    #[default]
    DirtyRect,

    /// The whole surface, every frame.
    FullSurface,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub background: Color,
    pub copy_strategy: CopyStrategy,
    /// Largest accepted width or height in pixels.
    pub max_dimension: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: Color::white(),
            copy_strategy: CopyStrategy::default(),
            max_dimension: 16384,
        }
    }
}

/// How the scratch buffer relates to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchSync {
    /// Pixel-identical.
    InSync,
    /// Identical outside the given region.
    Stale(PixelRect),
    /// Unknown contents (fresh allocation or cleared current buffer).
    Invalid,
}

/// Summary of one [`CanvasHistory::render_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub spans: usize,
    /// Union of the spans' pixel boxes; `None` when nothing was drawn.
    pub dirty: Option<PixelRect>,
    /// Region copied from current into scratch.
    pub copied: Option<PixelRect>,
    /// Buffer index handed to the presenter.
    pub presented: usize,
    pub swapped: bool,
    pub status: PresentStatus,
}

/// Ping-pong pair of raster surfaces holding all ink drawn so far.
///
/// `buffers[current]` is always a complete raster. A frame with new spans
/// brings scratch up to date by copying from current (pixels are loaded,
/// never cleared), draws the spans on top, presents scratch and then makes
/// it current. Frames without spans present the current buffer as is.
#[derive(Debug)]
pub struct CanvasHistory {
    config: CanvasConfig,
    buffers: [RasterSurface; 2],
    current: usize,
    scratch: ScratchSync,
    /// Changes the presenter has not shown yet.
    unpresented: Option<PixelRect>,
}

impl CanvasHistory {
    pub fn new(width: u32, height: u32, config: CanvasConfig) -> Result<Self, CanvasError> {
        validate_size(width, height, &config)?;
        let a = RasterSurface::try_new(width, height, config.background)?;
        let b = a.clone();

        Ok(Self {
            config,
            buffers: [a, b],
            current: 0,
            scratch: ScratchSync::InSync,
            unpresented: Some(PixelRect::full(width, height)),
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn size(&self) -> (u32, u32) {
        self.buffers[self.current].size()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The complete raster of everything drawn so far.
    pub fn current(&self) -> &RasterSurface {
        &self.buffers[self.current]
    }

    pub fn scratch_sync(&self) -> ScratchSync {
        self.scratch
    }

    /// Reallocates both buffers, clears buffer 0 to the background and makes
    /// it current. All previous ink is gone.
    ///
    /// On error the existing buffers and their contents are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        validate_size(width, height, &self.config)?;
        let first = RasterSurface::try_new(width, height, self.config.background)?;
        let second = RasterSurface::try_alloc(width, height)?;

        self.buffers = [first, second];
        self.current = 0;
        self.scratch = ScratchSync::Invalid;
        self.unpresented = Some(PixelRect::full(width, height));
        log::debug!("canvas resized to {width}x{height}");
        Ok(())
    }

    /// Clears the current buffer to the background in place.
    pub fn clear(&mut self) {
        let (w, h) = self.size();
        self.buffers[self.current].clear(self.config.background);
        self.scratch = ScratchSync::Invalid;
        self.unpresented = Some(PixelRect::full(w, h));
    }

    /// Pixel box covering every span, clipped to the canvas.
    pub fn dirty_region(&self, spans: &[InkSpan]) -> Option<PixelRect> {
        let (w, h) = self.size();
        spans
            .iter()
            .filter(|s| s.is_drawable())
            .fold(None, |acc, s| union_opt(acc, s.dirty_rect(w, h)))
    }

    /// Runs one frame: rasterize `spans`, present, swap.
    ///
    /// The swap happens once, after `presenter` returns, and regardless of
    /// whether the frame reached the screen; a dropped frame's damage is
    /// reported again next time.
    pub fn render_frame<P>(&mut self, spans: &[InkSpan], overlay: &Overlay, presenter: &mut P) -> FrameReport
    where
        P: Presenter + ?Sized,
    {
        let Some(dirty) = self.dirty_region(spans) else {
            let frame = PresentedFrame {
                surface: &self.buffers[self.current],
                buffer_index: self.current,
                damage: self.unpresented,
                overlay,
            };
            let status = presenter.present(&frame);
            if status == PresentStatus::Presented {
                self.unpresented = None;
            }
            return FrameReport {
                spans: spans.len(),
                dirty: None,
                copied: None,
                presented: self.current,
                swapped: false,
                status,
            };
        };

        let (w, h) = self.size();
        let copy = match (self.config.copy_strategy, self.scratch) {
            (CopyStrategy::FullSurface, _) | (_, ScratchSync::Invalid) => PixelRect::full(w, h),
            (CopyStrategy::DirtyRect, ScratchSync::Stale(stale)) => stale.union(&dirty),
            (CopyStrategy::DirtyRect, ScratchSync::InSync) => dirty,
        };

        let scratch_index = 1 - self.current;
        let [first, second] = &mut self.buffers;
        let (current, scratch) = if self.current == 0 {
            (&*first, second)
        } else {
            (&*second, first)
        };

        scratch.copy_region_from(current, copy);
        for span in spans {
            rasterize_span(scratch, span);
        }

        let damage = union_opt(self.unpresented, Some(dirty));
        let frame = PresentedFrame {
            surface: scratch,
            buffer_index: scratch_index,
            damage,
            overlay,
        };
        let status = presenter.present(&frame);

        self.current = scratch_index;
        self.scratch = ScratchSync::Stale(dirty);
        self.unpresented = match status {
            PresentStatus::Presented => None,
            PresentStatus::Dropped => damage,
        };

        log::trace!("canvas frame: {} spans, dirty {dirty:?}, copied {copy:?}", spans.len());

        FrameReport {
            spans: spans.len(),
            dirty: Some(dirty),
            copied: Some(copy),
            presented: scratch_index,
            swapped: true,
            status,
        }
    }
}

fn validate_size(width: u32, height: u32, config: &CanvasConfig) -> Result<(), CanvasError> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidSize { width, height });
    }
    if width > config.max_dimension || height > config.max_dimension {
        return Err(CanvasError::TooLarge {
            width,
            height,
            max: config.max_dimension,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullPresenter;
    use crate::coords::Vec2;

    /// Records buffer index, damage and the pixel at (10, 4) per frame.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(usize, Option<PixelRect>, Option<[u8; 4]>)>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, f: &PresentedFrame<'_>) -> PresentStatus {
            self.frames.push((f.buffer_index, f.damage, f.surface.pixel(10, 4)));
            PresentStatus::Presented
        }
    }

    fn ink() -> Color {
        Color::opaque(0.1, 0.1, 0.6)
    }

    fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> InkSpan {
        InkSpan::new(vec![Vec2::new(x0, y0), Vec2::new(x1, y1)], 3.0, ink())
    }

    fn history(config: CanvasConfig) -> CanvasHistory {
        CanvasHistory::new(64, 48, config).unwrap()
    }

    fn present_ok(_: &PresentedFrame<'_>) -> PresentStatus {
        PresentStatus::Presented
    }

    fn frame(h: &mut CanvasHistory, spans: &[InkSpan]) -> FrameReport {
        h.render_frame(spans, &Overlay::default(), &mut present_ok)
    }

    // ── frame cycle ───────────────────────────────────────────────────────

    #[test]
    fn idle_frame_presents_current_without_swap() {
        let mut h = history(CanvasConfig::default());
        let first = frame(&mut h, &[]);
        assert_eq!(first.presented, 0);
        assert!(!first.swapped);

        let mut rec = Recorder::default();
        h.render_frame(&[], &Overlay::default(), &mut rec);
        assert_eq!((rec.frames[0].0, rec.frames[0].1), (0, None));
        assert_eq!(h.current_index(), 0);
    }

    #[test]
    fn each_drawing_frame_swaps_once() {
        let mut h = history(CanvasConfig::default());
        let r = frame(&mut h, &[line(2.0, 2.0, 10.0, 2.0)]);
        assert!(r.swapped);
        assert_eq!((r.presented, h.current_index()), (1, 1));

        let r = frame(&mut h, &[line(2.0, 20.0, 10.0, 20.0)]);
        assert_eq!((r.presented, h.current_index()), (0, 0));
    }

    #[test]
    fn presenter_sees_scratch_before_swap() {
        let mut h = history(CanvasConfig::default());
        let mut rec = Recorder::default();
        h.render_frame(&[line(4.0, 4.0, 20.0, 4.0)], &Overlay::default(), &mut rec);

        let (index, damage, probe) = rec.frames[0];
        assert_eq!(index, 1);
        assert!(damage.is_some());
        assert_ne!(probe, Some([255, 255, 255, 255]));
        assert_eq!(h.current_index(), 1);
    }

    #[test]
    fn copy_preserves_ink_from_earlier_frames() {
        let mut h = history(CanvasConfig::default());
        frame(&mut h, &[line(2.0, 2.0, 10.0, 2.0)]);
        let r = frame(&mut h, &[line(40.0, 40.0, 60.0, 40.0)]);

        // Scratch lagged one frame behind: the copy covers both regions.
        let copied = r.copied.unwrap();
        assert!(copied.contains(5, 2));
        assert!(copied.contains(50, 40));

        assert_ne!(h.current().pixel(5, 2), Some([255, 255, 255, 255]));
        assert_ne!(h.current().pixel(50, 40), Some([255, 255, 255, 255]));
    }

    #[test]
    fn partial_updates_match_full_redraw() {
        let batches = [
            vec![line(2.0, 2.0, 20.0, 6.0)],
            vec![line(30.0, 30.0, 60.0, 44.0), line(35.0, 10.0, 50.0, 12.0)],
            vec![line(4.0, 40.0, 12.0, 30.0)],
            vec![line(55.0, 2.0, 62.0, 20.0)],
        ];
        let all: Vec<InkSpan> = batches.iter().flatten().cloned().collect();

        let mut full = history(CanvasConfig::default());
        frame(&mut full, &all);

        for strategy in [CopyStrategy::DirtyRect, CopyStrategy::FullSurface] {
            let mut partial = history(CanvasConfig { copy_strategy: strategy, ..CanvasConfig::default() });
            for batch in &batches {
                frame(&mut partial, batch);
                frame(&mut partial, &[]);
            }
            assert_eq!(partial.current(), full.current(), "{strategy:?}");
        }
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_clears_history_and_resets_index() {
        let mut h = history(CanvasConfig::default());
        frame(&mut h, &[line(2.0, 2.0, 10.0, 2.0)]);
        assert_eq!(h.current_index(), 1);

        h.resize(32, 16).unwrap();
        assert_eq!(h.current_index(), 0);
        assert_eq!(h.size(), (32, 16));
        assert_eq!(h.scratch_sync(), ScratchSync::Invalid);
        assert!(h.current().as_bytes().chunks(4).all(|px| px == [255, 255, 255, 255]));

        // The next frame copies everything into the undefined scratch.
        let r = frame(&mut h, &[line(2.0, 2.0, 6.0, 2.0)]);
        assert_eq!(r.copied, Some(PixelRect::full(32, 16)));
        assert_eq!(h.current().pixel(30, 14), Some([255, 255, 255, 255]));
    }

    #[test]
    fn failed_resize_keeps_existing_buffers() {
        let mut h = history(CanvasConfig { max_dimension: 100, ..CanvasConfig::default() });
        frame(&mut h, &[line(2.0, 2.0, 10.0, 2.0)]);
        let before = h.current().clone();

        assert!(matches!(h.resize(0, 10), Err(CanvasError::InvalidSize { .. })));
        assert!(matches!(h.resize(101, 10), Err(CanvasError::TooLarge { max: 100, .. })));
        assert_eq!(h.current(), &before);
        assert_eq!(h.current_index(), 1);
    }

    // ── presentation ──────────────────────────────────────────────────────

    #[test]
    fn dropped_frames_carry_damage_forward() {
        let mut h = history(CanvasConfig::default());
        frame(&mut h, &[]);

        let span = line(2.0, 2.0, 10.0, 2.0);
        let r = h.render_frame(std::slice::from_ref(&span), &Overlay::default(), &mut NullPresenter);
        assert_eq!(r.status, PresentStatus::Dropped);

        let mut rec = Recorder::default();
        h.render_frame(&[], &Overlay::default(), &mut rec);
        let damage = rec.frames[0].1;
        assert_eq!(damage, r.dirty);
    }

    #[test]
    fn clear_resets_to_background() {
        let mut h = history(CanvasConfig::default());
        frame(&mut h, &[line(2.0, 2.0, 10.0, 2.0)]);
        h.clear();
        assert!(h.current().as_bytes().chunks(4).all(|px| px == [255, 255, 255, 255]));

        frame(&mut h, &[line(2.0, 30.0, 10.0, 30.0)]);
        assert_eq!(h.current().pixel(5, 2), Some([255, 255, 255, 255]));
    }
}
