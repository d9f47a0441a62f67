use crate::paint::Color;

use super::dirty::PixelRect;
use super::error::CanvasError;

/// Bytes per pixel: premultiplied RGBA8.
pub const BYTES_PER_PIXEL: usize = 4;

/// CPU raster target: tightly packed premultiplied RGBA8 rows, top row first.
///
/// The byte layout matches an `Rgba8Unorm` texture with
/// `bytes_per_row = width * 4`, so a sub-rectangle can be uploaded straight
/// from [`as_bytes`](Self::as_bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Allocates a surface filled with `background`.
    ///
    /// Storage is reserved fallibly; an allocation failure is returned, not
    /// raised as an abort.
    pub fn try_new(width: u32, height: u32, background: Color) -> Result<Self, CanvasError> {
        let mut surface = Self::try_alloc(width, height)?;
        surface.clear(background);
        Ok(surface)
    }

    /// Allocates a zeroed surface whose contents callers treat as undefined.
    pub(crate) fn try_alloc(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidSize { width, height });
        }
        let bytes = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(CanvasError::InvalidSize { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|source| CanvasError::Allocation { bytes, source })?;
        pixels.resize(bytes, 0);

        Ok(Self { width, height, pixels })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::full(self.width, self.height)
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        let px = &self.pixels[i..i + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Fills the whole surface with one color.
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copies `region` from `src` into the same place on `self`.
    ///
    /// Pixels outside `region` are left exactly as they were. The region is
    /// clipped to both surfaces.
    pub fn copy_region_from(&mut self, src: &RasterSurface, region: PixelRect) {
        let Some(r) = region
            .intersect(&self.bounds())
            .and_then(|r| r.intersect(&src.bounds()))
        else {
            return;
        };

        let row_bytes = r.width as usize * BYTES_PER_PIXEL;
        for y in r.y..r.bottom() {
            let s = src.offset(r.x, y);
            let d = self.offset(r.x, y);
            self.pixels[d..d + row_bytes].copy_from_slice(&src.pixels[s..s + row_bytes]);
        }
    }

    /// Premultiplied source-over of `color` scaled by `coverage` in `[0, 1]`.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        if x >= self.width || y >= self.height || coverage <= 0.0 {
            return;
        }
        let src = color.with_opacity(coverage).clamped();
        let inv = 1.0 - src.a;

        let i = self.offset(x, y);
        let dst = &mut self.pixels[i..i + BYTES_PER_PIXEL];
        for (d, s) in dst.iter_mut().zip(src.to_array()) {
            let v = s * 255.0 + f32::from(*d) * inv;
            *d = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
