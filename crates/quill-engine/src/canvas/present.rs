use super::dirty::PixelRect;
use super::raster::InkSpan;
use super::surface::RasterSurface;

/// Transient geometry drawn over the canvas and never rasterized into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Active stroke segments that later samples may still reshape.
    pub tail: Vec<InkSpan>,

    /// Straight polyline from the last actual sample through the predictions.
    pub predicted: Option<InkSpan>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.tail.is_empty() && self.predicted.is_none()
    }

    /// All spans, tail first.
    pub fn spans(&self) -> impl Iterator<Item = &InkSpan> {
        self.tail.iter().chain(self.predicted.iter())
    }
}

/// What a presenter receives each frame.
#[derive(Debug, Clone, Copy)]
pub struct PresentedFrame<'a> {
    /// Complete canvas raster to show.
    pub surface: &'a RasterSurface,

    /// Buffer index of `surface` inside the history.
    pub buffer_index: usize,

    /// Region of `surface` that differs from the last successfully presented
    /// frame. `None` when nothing changed.
    pub damage: Option<PixelRect>,

    pub overlay: &'a Overlay,
}

/// Outcome reported by a presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentStatus {
    Presented,
    /// The frame did not reach the screen (surface lost, device missing).
    /// Its damage is carried into the next frame.
    Dropped,
}

/// Display side of the canvas.
pub trait Presenter {
    fn present(&mut self, frame: &PresentedFrame<'_>) -> PresentStatus;
}

impl<F> Presenter for F
where
    F: FnMut(&PresentedFrame<'_>) -> PresentStatus,
{
    fn present(&mut self, frame: &PresentedFrame<'_>) -> PresentStatus {
        self(frame)
    }
}

/// Presenter that shows nothing. Used while no display is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &PresentedFrame<'_>) -> PresentStatus {
        PresentStatus::Dropped
    }
}
