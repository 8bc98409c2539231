use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How far back drag samples count toward the release velocity
const WINDOW: Duration = Duration::from_millis(100);

/// Estimates horizontal drag velocity (px/s) from recent pointer samples.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Record the drag position `x` seen at `at`
    pub fn record(&mut self, at: Instant, x: f32) {
        self.samples.push_back((at, x));
        while let Some(&(oldest, _)) = self.samples.front() {
            if at.saturating_duration_since(oldest) > WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity at release time `at`.
    ///
    /// Zero when the pointer sat still for longer than the sampling window.
    pub fn velocity(&self, at: Instant) -> f32 {
        let (Some(&(first_at, first_x)), Some(&(last_at, last_x))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };

        if at.saturating_duration_since(last_at) > WINDOW {
            return 0.0;
        }

        let elapsed = last_at.saturating_duration_since(first_at).as_secs_f32();
        if elapsed <= f32::EPSILON {
            return 0.0;
        }
        (last_x - first_x) / elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_steady_fling() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        for step in 0..=5 {
            tracker.record(start + ms(step * 10), -(step as f32) * 10.0);
        }

        // 50 px in 50 ms
        let velocity = tracker.velocity(start + ms(50));
        assert!((velocity + 1000.0).abs() < 1.0, "got {velocity}");
    }

    #[test]
    fn test_old_samples_are_dropped() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.record(start, 0.0);
        tracker.record(start + ms(500), -100.0);
        tracker.record(start + ms(550), -105.0);

        let velocity = tracker.velocity(start + ms(550));
        assert!((velocity + 100.0).abs() < 1.0, "got {velocity}");
    }

    #[test]
    fn test_held_still_releases_at_zero() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.record(start, 0.0);
        tracker.record(start + ms(20), -200.0);

        assert_eq!(tracker.velocity(start + ms(400)), 0.0);
    }

    #[test]
    fn test_single_sample_is_zero() {
        let start = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.record(start, -50.0);
        assert_eq!(tracker.velocity(start), 0.0);
    }
}
