use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::dirty::PixelRect;
use super::surface::RasterSurface;

/// Extra pixel around a span for the anti-aliased edge.
const AA_MARGIN: f32 = 1.0;

/// One piece of ink ready for raster: a polyline in canvas pixels drawn with
/// round caps and joins.
#[derive(Debug, Clone, PartialEq)]
pub struct InkSpan {
    pub points: Vec<Vec2>,
    pub width: f32,
    pub color: Color,
}

impl InkSpan {
    pub fn new(points: Vec<Vec2>, width: f32, color: Color) -> Self {
        Self { points, width, color }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        (self.width * 0.5).max(0.0)
    }

    /// Box covering every pixel the span can touch, anti-aliasing included.
    pub fn bounds(&self) -> Option<Rect> {
        Rect::bounding(self.points.iter().copied())
            .map(|r| r.inflate(self.half_width() + AA_MARGIN))
    }

    /// [`bounds`](Self::bounds) in whole pixels clipped to the surface.
    pub fn dirty_rect(&self, width: u32, height: u32) -> Option<PixelRect> {
        self.bounds().and_then(|r| PixelRect::covering(r, width, height))
    }

    pub fn is_drawable(&self) -> bool {
        !self.points.is_empty()
            && self.width.is_finite()
            && self.width > 0.0
            && self.points.iter().all(|p| p.is_finite())
    }
}

/// Rasterizes `span` onto `surface`.
///
/// Coverage is the union over the span's capsules (a pixel overlapped by two
/// consecutive segments is blended once), so joins do not darken and the
/// result depends only on the span and the pixels beneath it. Returns the
/// touched region.
pub fn rasterize_span(surface: &mut RasterSurface, span: &InkSpan) -> Option<PixelRect> {
    if !span.is_drawable() {
        return None;
    }
    let area = span.dirty_rect(surface.width(), surface.height())?;

    let hw = span.half_width();
    let (sw, sh) = surface.size();
    let mut mask = vec![0.0f32; area.width as usize * area.height as usize];

    let mut stamp = |a: Vec2, b: Vec2| {
        let seg = Rect::from_corners(a, b).inflate(hw + AA_MARGIN);
        let Some(r) = PixelRect::covering(seg, sw, sh)
            .and_then(|r| r.intersect(&area))
        else {
            return;
        };
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance_to_segment(center, a, b);
                let coverage = (hw + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let i = (y - area.y) as usize * area.width as usize + (x - area.x) as usize;
                    mask[i] = mask[i].max(coverage);
                }
            }
        }
    };

    match span.points.as_slice() {
        [p] => stamp(*p, *p),
        pts => {
            for w in pts.windows(2) {
                stamp(w[0], w[1]);
            }
        }
    }

    for y in 0..area.height {
        for x in 0..area.width {
            let coverage = mask[y as usize * area.width as usize + x as usize];
            if coverage > 0.0 {
                surface.blend_pixel(area.x + x, area.y + y, span.color, coverage);
            }
        }
    }

    Some(area)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
