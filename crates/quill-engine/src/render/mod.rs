//! GPU rendering subsystem.
//!
//! The CPU canvas is the source of truth; renderers mirror it into a texture
//! and draw the live overlay on top. Each renderer owns its GPU resources
//! (pipelines, buffers, textures) and creates them lazily.
//!
//! Convention:
//! - Geometry is in canvas pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod canvas;
mod common;
mod ctx;
mod overlay;
mod presenter;

pub use canvas::CanvasRenderer;
pub use ctx::{RenderCtx, RenderTarget};
pub use overlay::OverlayRenderer;
pub use presenter::{GpuPresenter, Renderers};
