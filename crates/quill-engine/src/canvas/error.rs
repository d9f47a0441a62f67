use std::collections::TryReserveError;

use thiserror::Error;

/// Raster canvas failures. All of them leave the existing buffers in place.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("canvas size {width}x{height} exceeds the {max} px limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to allocate {bytes} bytes of canvas storage")]
    Allocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}
