use crate::coords::{Rect, Vec2};

/// Default flattening tolerance in pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.1;

/// Smallest subdivision step; caps a curve at 256 line segments.
const MIN_STEP: f32 = 1.0 / 256.0;

/// One path command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathSeg {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
}

/// A single drawable piece of a path with its start point resolved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Curve {
    Line { from: Vec2, to: Vec2 },
    Cubic { from: Vec2, c1: Vec2, c2: Vec2, to: Vec2 },
}

impl Curve {
    pub fn start(&self) -> Vec2 {
        match *self {
            Curve::Line { from, .. } | Curve::Cubic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            Curve::Line { to, .. } | Curve::Cubic { to, .. } => to,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Curve::Line { from, to } => from.is_finite() && to.is_finite(),
            Curve::Cubic { from, c1, c2, to } => {
                from.is_finite() && c1.is_finite() && c2.is_finite() && to.is_finite()
            }
        }
    }

    /// Box containing the curve (control polygon hull).
    pub fn bounds(&self) -> Rect {
        match *self {
            Curve::Line { from, to } => Rect::from_corners(from, to),
            Curve::Cubic { from, c1, c2, to } => {
                Rect::from_corners(from.min(c1).min(c2).min(to), from.max(c1).max(c2).max(to))
            }
        }
    }

    /// Point at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f32) -> Vec2 {
        match *self {
            Curve::Line { from, to } => Vec2::lerp(t, from, to),
            Curve::Cubic { from, c1, c2, to } => {
                let p12 = Vec2::lerp(t, from, c1);
                let p23 = Vec2::lerp(t, c1, c2);
                let p34 = Vec2::lerp(t, c2, to);
                let p123 = Vec2::lerp(t, p12, p23);
                let p234 = Vec2::lerp(t, p23, p34);
                Vec2::lerp(t, p123, p234)
            }
        }
    }

    /// Appends the curve as line vertices, excluding its start point.
    ///
    /// The step is derived from the curve's second difference so the chord
    /// error stays under `tolerance` pixels.
    pub fn flatten_into(&self, tolerance: f32, out: &mut Vec<Vec2>) {
        let Curve::Cubic { from, c1, c2, to } = *self else {
            out.push(self.end());
            return;
        };

        let a_x = -from.x + 3.0 * c1.x - 3.0 * c2.x + to.x;
        let b_x = 3.0 * (from.x - 2.0 * c1.x + c2.x);
        let a_y = -from.y + 3.0 * c1.y - 3.0 * c2.y + to.y;
        let b_y = 3.0 * (from.y - 2.0 * c1.y + c2.y);
        let conc = (b_x * b_x + b_y * b_y)
            .max((a_x + b_x) * (a_x + b_x) + (a_y + b_y) * (a_y + b_y));
        let tol = tolerance.max(f32::EPSILON);
        let mut dt = ((8.0 * tol * tol) / conc).sqrt().sqrt();
        if !dt.is_finite() {
            // Zero curvature: the control points are on the chord.
            dt = 1.0;
        }
        let dt = dt.max(MIN_STEP);

        let mut t = dt;
        while t < 1.0 {
            out.push(self.eval(t));
            t += dt;
        }
        out.push(to);
    }
}

/// Path made of move, line and cubic commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segs: Vec<PathSeg>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.segs.push(PathSeg::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.segs.push(PathSeg::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) -> &mut Self {
        self.segs.push(PathSeg::CubicTo { c1, c2, to });
        self
    }

    /// Appends a curve, starting a new subpath when it does not continue from
    /// the current point.
    pub fn push_curve(&mut self, curve: Curve) -> &mut Self {
        if self.current_point() != Some(curve.start()) {
            self.move_to(curve.start());
        }
        match curve {
            Curve::Line { to, .. } => self.line_to(to),
            Curve::Cubic { c1, c2, to, .. } => self.cubic_to(c1, c2, to),
        }
    }

    pub fn segments(&self) -> &[PathSeg] {
        &self.segs
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn current_point(&self) -> Option<Vec2> {
        self.segs.last().map(|s| match *s {
            PathSeg::MoveTo(p) | PathSeg::LineTo(p) => p,
            PathSeg::CubicTo { to, .. } => to,
        })
    }

    /// Drawable pieces with their start points resolved.
    pub fn curves(&self) -> Vec<Curve> {
        let mut out = Vec::new();
        let mut cur: Option<Vec2> = None;
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo(p) => cur = Some(p),
                PathSeg::LineTo(to) => {
                    if let Some(from) = cur {
                        out.push(Curve::Line { from, to });
                    }
                    cur = Some(to);
                }
                PathSeg::CubicTo { c1, c2, to } => {
                    if let Some(from) = cur {
                        out.push(Curve::Cubic { from, c1, c2, to });
                    }
                    cur = Some(to);
                }
            }
        }
        out
    }

    pub fn is_finite(&self) -> bool {
        self.segs.iter().all(|s| match *s {
            PathSeg::MoveTo(p) | PathSeg::LineTo(p) => p.is_finite(),
            PathSeg::CubicTo { c1, c2, to } => c1.is_finite() && c2.is_finite() && to.is_finite(),
        })
    }

    /// Flattens to one polyline per subpath.
    pub fn flatten(&self, tolerance: f32) -> Vec<Vec<Vec2>> {
        let mut lines: Vec<Vec<Vec2>> = Vec::new();
        let mut cur: Option<Vec2> = None;
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo(p) => {
                    lines.push(vec![p]);
                    cur = Some(p);
                }
                PathSeg::LineTo(to) => {
                    if let (Some(line), Some(_)) = (lines.last_mut(), cur) {
                        line.push(to);
                    }
                    cur = Some(to);
                }
                PathSeg::CubicTo { c1, c2, to } => {
                    if let (Some(line), Some(from)) = (lines.last_mut(), cur) {
                        Curve::Cubic { from, c1, c2, to }.flatten_into(tolerance, line);
                    }
                    cur = Some(to);
                }
            }
        }
        lines
    }
}
