use crate::canvas::{PresentStatus, PresentedFrame, Presenter};
use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{CanvasRenderer, OverlayRenderer, RenderCtx, RenderTarget};

/// Persistent GPU renderers for one window.
#[derive(Default)]
pub struct Renderers {
    pub canvas: CanvasRenderer,
    pub overlay: OverlayRenderer,
}

impl Renderers {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Presents canvas frames to a window surface.
///
/// Built per frame around borrowed state. When the surface cannot be acquired
/// the frame is reported as dropped and the error action is kept for the
/// caller in [`action`](Self::action).
pub struct GpuPresenter<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    renderers: &'a mut Renderers,
    viewport: Viewport,
    action: Option<SurfaceErrorAction>,
}

impl<'a, 'w> GpuPresenter<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, renderers: &'a mut Renderers, viewport: Viewport) -> Self {
        Self { gpu, renderers, viewport, action: None }
    }

    /// Surface error handling that happened during the last present, if any.
    pub fn action(&self) -> Option<SurfaceErrorAction> {
        self.action
    }
}

impl Presenter for GpuPresenter<'_, '_> {
    fn present(&mut self, frame: &PresentedFrame<'_>) -> PresentStatus {
        // Minimized: nothing to present into.
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            return PresentStatus::Dropped;
        }

        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface unavailable for frame: {err:?}");
                let action = self.gpu.handle_surface_error(err);
                self.action = Some(action);
                return PresentStatus::Dropped;
            }
        };

        let ctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.viewport,
        );

        let Renderers { canvas, overlay } = &mut *self.renderers;
        canvas.upload(&ctx, frame.surface, frame.damage);
        {
            let mut target = RenderTarget::new(&mut gpu_frame.encoder, &gpu_frame.view);
            canvas.render(&ctx, &mut target);
            overlay.render(&ctx, &mut target, frame.overlay);
        }

        self.gpu.submit(gpu_frame);
        PresentStatus::Presented
    }
}
