use crate::coords::Vec2;

use super::path::{Curve, Path};

/// Stand-in for a zero parameter delta between coincident points.
pub const PARAM_EPSILON: f32 = 1e-4;

/// Spline parametrization.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FitMode {
    /// Chord-length exponent 0.5. Avoids the loops and cusps uniform
    /// parametrization produces on unevenly spaced samples.
    #[default]
    Centripetal,

    /// Uniform parametrization with duplicated end points. Fewer than four
    /// points fall back to a polyline.
    Uniform,
}

/// Catmull-Rom fitter: ordered points in, cubic path out.
///
/// Stateless. Segment `i` joins `points[i]` and `points[i + 1]`; its shape
/// also depends on one neighbour on each side, clamped at the ends. That
/// locality is what lets the engine fit a growing stroke piece by piece (see
/// [`finalized_segments`](Self::finalized_segments)) and still match a
/// one-shot fit exactly.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CurveFitter {
    mode: FitMode,
}

impl CurveFitter {
    pub const fn new(mode: FitMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> FitMode {
        self.mode
    }

    /// Fewest points for which segments are curves rather than lines.
    pub fn min_curve_points(&self) -> usize {
        match self.mode {
            FitMode::Centripetal => 3,
            FitMode::Uniform => 4,
        }
    }

    pub fn segment_count(&self, n: usize) -> usize {
        n.saturating_sub(1)
    }

    /// Fits the whole sequence. Fewer than two points yield an empty path.
    pub fn fit(&self, points: &[Vec2]) -> Path {
        let mut path = Path::new();
        for i in 0..self.segment_count(points.len()) {
            if let Some(curve) = self.segment(points, i) {
                path.push_curve(curve);
            }
        }
        path
    }

    /// Segment `i` of the fit of `points`, or `None` when out of range.
    pub fn segment(&self, points: &[Vec2], i: usize) -> Option<Curve> {
        let n = points.len();
        if i + 1 >= n {
            return None;
        }

        let p1 = points[i];
        let p2 = points[i + 1];
        if n < self.min_curve_points() {
            return Some(Curve::Line { from: p1, to: p2 });
        }

        let p0 = points[i.saturating_sub(1)];
        let p3 = points[(i + 2).min(n - 1)];

        let curve = match self.mode {
            FitMode::Centripetal => centripetal(p0, p1, p2, p3),
            FitMode::Uniform => Curve::Cubic {
                from: p1,
                c1: p1 + (p2 - p0) / 6.0,
                c2: p2 - (p3 - p1) / 6.0,
                to: p2,
            },
        };

        // Extreme coordinates can still overflow; a chord is always finite.
        if curve.is_finite() {
            Some(curve)
        } else {
            Some(Curve::Line { from: p1, to: p2 })
        }
    }

    /// First point read by segments `first..` of an `n`-point sequence.
    ///
    /// Fitting `points[start..]` yields those segments unchanged at index
    /// `i - start`: the window keeps each segment's leading neighbour and
    /// never drops below the curve threshold when `n` is above it.
    pub fn context_start(&self, first: usize, n: usize) -> usize {
        let min = self.min_curve_points();
        if n < min {
            return 0;
        }
        first.saturating_sub(1).min(n - min)
    }

    /// Number of leading segments of an `n`-point sequence that no future
    /// point can change.
    ///
    /// A segment's end tangent reads the point after its end, so it is final
    /// once that point exists. Short sequences are drawn as lines that turn
    /// into curves later, so nothing is final until the curve threshold is
    /// reached. When the stroke has `ended`, every segment is final.
    pub fn finalized_segments(&self, n: usize, ended: bool) -> usize {
        if ended {
            return self.segment_count(n);
        }
        if n < self.min_curve_points() {
            return 0;
        }
        n - 2
    }
}

/// Parameter delta for one chord: `|b - a|^0.5`, never zero.
fn param_delta(a: Vec2, b: Vec2) -> f32 {
    let d = a.distance(b).sqrt();
    if d.is_finite() && d > PARAM_EPSILON {
        d
    } else {
        PARAM_EPSILON
    }
}

fn centripetal(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Curve {
    let d01 = param_delta(p0, p1);
    let d12 = param_delta(p1, p2);
    let d23 = param_delta(p2, p3);

    // t2 - t1 over t2 - t0 and t3 - t1.
    let m1 = (p2 - p0) * (d12 / (d01 + d12));
    let m2 = (p3 - p1) * (d12 / (d12 + d23));

    Curve::Cubic {
        from: p1,
        c1: p1 + m1 / 3.0,
        c2: p2 - m2 / 3.0,
        to: p2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::path::{PathSeg, DEFAULT_TOLERANCE};

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn all_points(path: &Path) -> Vec<Vec2> {
        path.segments()
            .iter()
            .flat_map(|s| match *s {
                PathSeg::MoveTo(p) | PathSeg::LineTo(p) => vec![p],
                PathSeg::CubicTo { c1, c2, to } => vec![c1, c2, to],
            })
            .collect()
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn fewer_than_two_points_is_empty() {
        let f = CurveFitter::default();
        assert!(f.fit(&[]).is_empty());
        assert!(f.fit(&[v(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn two_points_make_one_straight_segment() {
        for mode in [FitMode::Centripetal, FitMode::Uniform] {
            let path = CurveFitter::new(mode).fit(&[v(0.0, 0.0), v(5.0, 5.0)]);
            assert_eq!(
                path.segments(),
                &[PathSeg::MoveTo(v(0.0, 0.0)), PathSeg::LineTo(v(5.0, 5.0))]
            );
        }
    }

    #[test]
    fn duplicate_points_stay_finite() {
        let pts = [v(0.0, 0.0), v(0.0, 0.0), v(3.0, 4.0), v(3.0, 4.0), v(3.0, 4.0), v(9.0, 1.0)];
        for mode in [FitMode::Centripetal, FitMode::Uniform] {
            let path = CurveFitter::new(mode).fit(&pts);
            assert!(path.is_finite());
            for line in path.flatten(DEFAULT_TOLERANCE) {
                assert!(line.iter().all(|p| p.is_finite()));
            }
        }
    }

    #[test]
    fn all_coincident_points_stay_finite() {
        let pts = [v(2.0, 2.0); 5];
        assert!(CurveFitter::default().fit(&pts).is_finite());
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn collinear_points_fit_a_straight_line() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0), v(20.0, 0.0), v(30.0, 0.0), v(40.0, 0.0)];
        let path = CurveFitter::default().fit(&pts);

        // One cubic per gap, each ending on the next sample.
        let ends: Vec<Vec2> = path.curves().iter().map(|c| c.end()).collect();
        assert_eq!(ends, pts[1..].to_vec());

        // Every control point on the line and inside the sample span.
        for p in all_points(&path) {
            assert_eq!(p.y, 0.0);
            assert!((0.0..=40.0).contains(&p.x));
        }
        for line in path.flatten(DEFAULT_TOLERANCE) {
            assert!(line.windows(2).all(|w| w[1].x >= w[0].x));
        }
    }

    #[test]
    fn uniform_reaches_last_sample() {
        let pts = [v(0.0, 0.0), v(10.0, 5.0), v(20.0, 0.0), v(30.0, 5.0), v(40.0, 0.0)];
        let path = CurveFitter::new(FitMode::Uniform).fit(&pts);

        assert_eq!(path.curves().len(), pts.len() - 1);
        assert!(path.segments().iter().all(|s| !matches!(s, PathSeg::LineTo(_))));
        assert_eq!(path.current_point(), Some(v(40.0, 0.0)));
    }

    #[test]
    fn uniform_short_input_is_a_polyline() {
        let pts = [v(0.0, 0.0), v(10.0, 5.0), v(20.0, 0.0)];
        let path = CurveFitter::new(FitMode::Uniform).fit(&pts);
        assert!(path.curves().iter().all(|c| matches!(c, Curve::Line { .. })));
        assert_eq!(path.curves().len(), 2);
    }

    #[test]
    fn fit_is_deterministic() {
        let pts = [v(0.0, 0.0), v(3.0, 7.0), v(8.0, 2.0), v(9.0, 9.0)];
        let f = CurveFitter::default();
        assert_eq!(f.fit(&pts), f.fit(&pts));
    }

    // ── incremental fitting ───────────────────────────────────────────────

    #[test]
    fn incremental_segments_match_one_pass_fit() {
        let pts = [
            v(0.0, 0.0),
            v(4.0, 9.0),
            v(4.0, 9.0),
            v(15.0, 3.0),
            v(22.0, 18.0),
            v(40.0, 20.0),
            v(41.0, 2.0),
        ];

        for mode in [FitMode::Centripetal, FitMode::Uniform] {
            let f = CurveFitter::new(mode);
            let mut emitted = Vec::new();
            for n in 1..=pts.len() {
                let seen = &pts[..n];
                let ended = n == pts.len();
                for i in emitted.len()..f.finalized_segments(n, ended) {
                    emitted.extend(f.segment(seen, i));
                }
            }
            assert_eq!(emitted, f.fit(&pts).curves(), "{mode:?}");
        }
    }

    #[test]
    fn suffix_window_reproduces_trailing_segments() {
        let pts = [
            v(0.0, 0.0),
            v(4.0, 9.0),
            v(15.0, 3.0),
            v(22.0, 18.0),
            v(40.0, 20.0),
            v(41.0, 2.0),
        ];

        for mode in [FitMode::Centripetal, FitMode::Uniform] {
            let f = CurveFitter::new(mode);
            for n in 1..=pts.len() {
                let seen = &pts[..n];
                for first in 0..f.segment_count(n) {
                    let start = f.context_start(first, n);
                    assert!(start <= first);
                    for i in first..f.segment_count(n) {
                        assert_eq!(
                            f.segment(&seen[start..], i - start),
                            f.segment(seen, i),
                            "{mode:?} n={n} first={first} i={i}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn nothing_is_final_below_the_curve_threshold() {
        let f = CurveFitter::new(FitMode::Uniform);
        assert_eq!(f.finalized_segments(3, false), 0);
        assert_eq!(f.finalized_segments(3, true), 2);
        assert_eq!(f.finalized_segments(4, false), 2);
        assert_eq!(CurveFitter::default().finalized_segments(3, false), 1);
    }
}
