/// Drawable area in logical pixels plus the logical-to-canvas scale.
///
/// The canvas is allocated in physical pixels (`width * scale_factor`), while
/// input samples and the stroke model stay in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self { width, height, scale_factor }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.scale_factor > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && self.scale_factor.is_finite()
    }

    /// Canvas size in physical pixels, rounded up. Zero when invalid.
    pub fn pixel_size(self) -> (u32, u32) {
        if !self.is_valid() {
            return (0, 0);
        }
        let w = (self.width * self.scale_factor).ceil();
        let h = (self.height * self.scale_factor).ceil();
        (w.min(u32::MAX as f32) as u32, h.min(u32::MAX as f32) as u32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
