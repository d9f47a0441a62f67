//! Curve fitting.
//!
//! Turns a stroke's actual positions into cubic Bézier geometry and flattens
//! it into polylines for the rasterizer.

mod catmull_rom;
mod path;

pub use catmull_rom::{CurveFitter, FitMode, PARAM_EPSILON};
pub use path::{Curve, Path, PathSeg, DEFAULT_TOLERANCE};
