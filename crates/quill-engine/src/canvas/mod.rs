//! Persistent raster canvas.
//!
//! - `PendingQueue`: spans waiting for the next frame
//! - `rasterize_span`: CPU coverage rasterizer for ink spans
//! - `CanvasHistory`: ping-pong buffers with dirty-rect updates
//! - `Presenter`: display side, fed one `PresentedFrame` per frame
//!
//! All coordinates are canvas pixels.

mod dirty;
mod error;
mod history;
mod present;
mod queue;
mod raster;
mod surface;

pub use dirty::PixelRect;
pub use error::CanvasError;
pub use history::{CanvasConfig, CanvasHistory, CopyStrategy, FrameReport, ScratchSync};
pub use present::{NullPresenter, Overlay, PresentStatus, PresentedFrame, Presenter};
pub use queue::{OverflowPolicy, PendingQueue, QueueConfig};
pub use raster::{rasterize_span, InkSpan};
pub use surface::{RasterSurface, BYTES_PER_PIXEL};
