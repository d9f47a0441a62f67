use crate::canvas::{CanvasConfig, QueueConfig};
use crate::fit::{FitMode, DEFAULT_TOLERANCE};
use crate::paint::Color;
use crate::time::DEFAULT_REFRESH_HZ;

/// Ink engine settings, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Stroke width in logical pixels.
    pub stroke_width: f32,
    pub stroke_color: Color,

    /// Width of the predicted-sample overlay in logical pixels.
    pub predicted_width: f32,
    pub predicted_color: Color,

    pub fit_mode: FitMode,

    /// Maximum chord error when flattening curves, in canvas pixels.
    pub flatten_tolerance: f32,

    /// Frame cadence while ink is in flight.
    pub refresh_hz: f32,

    /// Log input sample-rate statistics when a stroke commits.
    pub monitor_sample_rate: bool,

    pub canvas: CanvasConfig,
    pub queue: QueueConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stroke_width: 5.0,
            stroke_color: Color::opaque(0.85, 0.12, 0.12),
            predicted_width: 4.0,
            predicted_color: Color::from_straight(0.1, 0.3, 1.0, 0.6),
            fit_mode: FitMode::default(),
            flatten_tolerance: DEFAULT_TOLERANCE,
            refresh_hz: DEFAULT_REFRESH_HZ,
            monitor_sample_rate: true,
            canvas: CanvasConfig::default(),
            queue: QueueConfig::default(),
        }
    }
}
