use std::time::{Duration, Instant};

/// Summary of one monitoring window.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRateReport {
    /// Number of intervals measured (samples - 1).
    pub count: usize,
    /// Average samples per second over the window; 0 when undefined.
    pub average_hz: f64,
    pub intervals: Vec<Duration>,
}

impl SampleRateReport {
    fn empty() -> Self {
        Self { count: 0, average_hz: 0.0, intervals: Vec::new() }
    }

    pub fn max_interval(&self) -> Option<Duration> {
        self.intervals.iter().copied().max()
    }
}

/// Measures the input sampling cadence of a stroke.
///
/// Pen digitizers often report faster than the display refreshes; the report
/// makes the ratio visible in logs.
#[derive(Debug, Default)]
pub struct SampleRateMonitor {
    timestamps: Vec<Instant>,
    monitoring: bool,
}

impl SampleRateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.timestamps.clear();
        self.monitoring = true;
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Records one sample. Ignored unless monitoring.
    pub fn record(&mut self, at: Instant) {
        if self.monitoring {
            self.timestamps.push(at);
        }
    }

    pub fn stop(&mut self) -> SampleRateReport {
        self.monitoring = false;
        let (Some(&first), Some(&last)) = (self.timestamps.first(), self.timestamps.last()) else {
            return SampleRateReport::empty();
        };
        if self.timestamps.len() < 2 {
            return SampleRateReport::empty();
        }

        let intervals: Vec<Duration> = self
            .timestamps
            .windows(2)
            .map(|w| w[1].saturating_duration_since(w[0]))
            .collect();
        let count = intervals.len();
        let elapsed = last.saturating_duration_since(first).as_secs_f64();
        let average_hz = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };

        SampleRateReport { count, average_hz, intervals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_samples_report_nothing() {
        let mut m = SampleRateMonitor::new();
        m.start();
        m.record(Instant::now());
        assert_eq!(m.stop(), SampleRateReport::empty());
    }

    #[test]
    fn not_recording_before_start() {
        let mut m = SampleRateMonitor::new();
        let t0 = Instant::now();
        m.record(t0);
        m.record(t0 + Duration::from_millis(4));
        assert_eq!(m.stop().count, 0);
    }

    #[test]
    fn average_rate_over_window() {
        let mut m = SampleRateMonitor::new();
        let t0 = Instant::now();
        m.start();
        for i in 0..=4 {
            m.record(t0 + Duration::from_millis(4 * i));
        }
        let report = m.stop();
        assert_eq!(report.count, 4);
        assert!((report.average_hz - 250.0).abs() < 1e-6);
        assert_eq!(report.max_interval(), Some(Duration::from_millis(4)));
        assert!(!m.is_monitoring());
    }
}
