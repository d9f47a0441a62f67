use std::time::{Duration, Instant};

use super::{FrameClock, FrameTime};

/// Refresh rate used when none is configured. Matches a 120 Hz panel.
pub const DEFAULT_REFRESH_HZ: f32 = 120.0;

const MIN_REFRESH_HZ: f32 = 1.0;
const MAX_REFRESH_HZ: f32 = 1000.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SchedulerState {
    Paused,
    Running,
}

/// Pausable periodic tick source.
///
/// The scheduler owns no thread and reads no clock on its own: the host passes
/// `now` into [`poll`](Self::poll) from whatever loop it has (a winit event
/// loop, a display-link callback, a test) and sleeps until
/// [`next_deadline`](Self::next_deadline) in between.
///
/// Missed ticks are dropped rather than replayed, so a stalled host renders
/// one frame when it wakes up, not a burst.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    state: SchedulerState,
    next_deadline: Option<Instant>,
    clock: FrameClock,
}

impl FrameScheduler {
    /// Creates a paused scheduler ticking at `refresh_hz`.
    ///
    /// Non-finite rates fall back to [`DEFAULT_REFRESH_HZ`]; others are clamped
    /// to 1..=1000 Hz.
    pub fn new(refresh_hz: f32) -> Self {
        let hz = if refresh_hz.is_finite() {
            refresh_hz.clamp(MIN_REFRESH_HZ, MAX_REFRESH_HZ)
        } else {
            DEFAULT_REFRESH_HZ
        };

        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(hz)),
            state: SchedulerState::Paused,
            next_deadline: None,
            clock: FrameClock::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    /// Starts ticking. The first tick is due immediately. No-op when running.
    pub fn resume(&mut self, now: Instant) {
        if self.state == SchedulerState::Running {
            return;
        }
        log::trace!("frame scheduler resumed");
        self.state = SchedulerState::Running;
        self.next_deadline = Some(now);
        self.clock.reset(now);
    }

    /// Stops ticking until the next [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Paused {
            return;
        }
        log::trace!("frame scheduler paused");
        self.state = SchedulerState::Paused;
        self.next_deadline = None;
    }

    /// Instant of the next due tick; `None` while paused.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    /// Returns a tick when one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<FrameTime> {
        let deadline = self.next_deadline?;
        if now < deadline {
            return None;
        }

        let mut next = deadline + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_deadline = Some(next);

        Some(self.clock.tick_at(now))
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_paused_and_never_ticks() {
        let mut s = FrameScheduler::new(100.0);
        let t0 = Instant::now();
        assert!(s.is_paused());
        assert!(s.next_deadline().is_none());
        assert!(s.poll(t0 + ms(500)).is_none());
    }

    #[test]
    fn resume_ticks_immediately_then_at_interval() {
        let mut s = FrameScheduler::new(100.0);
        let t0 = Instant::now();
        s.resume(t0);

        assert!(s.poll(t0).is_some());
        assert!(s.poll(t0 + ms(5)).is_none());
        assert!(s.poll(t0 + ms(10)).is_some());
        assert!(s.poll(t0 + ms(15)).is_none());
        assert!(s.poll(t0 + ms(20)).is_some());
    }

    #[test]
    fn pause_stops_ticks_until_resumed() {
        let mut s = FrameScheduler::new(100.0);
        let t0 = Instant::now();
        s.resume(t0);
        assert!(s.poll(t0).is_some());

        s.pause();
        assert!(s.poll(t0 + ms(100)).is_none());

        s.resume(t0 + ms(200));
        assert!(s.poll(t0 + ms(200)).is_some());
    }

    #[test]
    fn resume_while_running_keeps_cadence() {
        let mut s = FrameScheduler::new(100.0);
        let t0 = Instant::now();
        s.resume(t0);
        s.poll(t0);
        s.resume(t0 + ms(3));
        assert_eq!(s.next_deadline(), Some(t0 + ms(10)));
    }

    // ── cadence ───────────────────────────────────────────────────────────

    #[test]
    fn missed_ticks_are_not_replayed() {
        let mut s = FrameScheduler::new(100.0);
        let t0 = Instant::now();
        s.resume(t0);
        s.poll(t0);

        // Host stalls for ten intervals: one tick, then back on cadence.
        assert!(s.poll(t0 + ms(100)).is_some());
        assert!(s.poll(t0 + ms(101)).is_none());
        assert_eq!(s.next_deadline(), Some(t0 + ms(110)));
    }

    #[test]
    fn rate_is_clamped() {
        assert_eq!(FrameScheduler::new(0.0).interval(), Duration::from_secs(1));
        assert_eq!(
            FrameScheduler::new(f32::NAN).interval(),
            Duration::from_secs_f64(1.0 / f64::from(DEFAULT_REFRESH_HZ))
        );
    }
}
