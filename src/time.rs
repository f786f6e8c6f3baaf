//! Fixed-rate tick scheduling for the animation loop.
//!
//! The game advances in whole frames at a fixed rate, independent of how often
//! the window redraws. [`FrameClock`] answers "is a tick due?", hands out
//! tap timestamps relative to its start, and measures the achieved rate.
//!
//! # Example
//!
//! ```ignore
//! use gwdance::time::FrameClock;
//!
//! let mut clock = FrameClock::new(10.0);
//!
//! // In your event loop:
//! let now = Instant::now();
//! if clock.tick_due(now) {
//!     clock.tick(now);
//!     println!("Frame {} at {:.2}s", clock.frame(), clock.seconds_at(now));
//! }
//! ```

use std::time::{Duration, Instant};

/// Fixed-rate frame scheduler.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// Time between ticks.
    interval: Duration,
    /// When the next tick is due.
    next_tick: Instant,
    /// Total ticks since start.
    frame_count: u64,
    /// Measured ticks per second (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock ticking `frame_rate` times per second, starting now.
    pub fn new(frame_rate: f64) -> Self {
        Self::starting_at(frame_rate, Instant::now())
    }

    /// Create a clock whose first tick is due at `start`.
    pub fn starting_at(frame_rate: f64, start: Instant) -> Self {
        Self {
            start,
            interval: Duration::from_secs_f64(1.0 / frame_rate),
            next_tick: start,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: start,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Whether a tick is due at `now`.
    #[inline]
    pub fn tick_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Consume one tick at `now` and schedule the next.
    ///
    /// Returns `true` when the FPS measurement was refreshed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        self.next_tick += self.interval;
        // Never try to catch up more than one frame after a stall
        if self.next_tick < now {
            self.next_tick = now + self.interval;
        }

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// When the next tick is due.
    #[inline]
    pub fn next_deadline(&self) -> Instant {
        self.next_tick
    }

    /// Seconds from the clock start to `now`.
    #[inline]
    pub fn seconds_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }

    /// Total ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured ticks per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_first_tick_due_immediately() {
        let start = Instant::now();
        let clock = FrameClock::starting_at(10.0, start);
        assert!(clock.tick_due(start));
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_tick_schedules_next() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(10.0, start);
        clock.tick(start);
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.next_deadline(), start + Duration::from_millis(100));
        assert!(!clock.tick_due(start + Duration::from_millis(50)));
        assert!(clock.tick_due(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_stall_does_not_queue_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(10.0, start);
        clock.tick(start);
        let late = start + Duration::from_secs(2);
        clock.tick(late);
        assert_eq!(clock.next_deadline(), late + Duration::from_millis(100));
    }

    #[test]
    fn test_fps_measurement() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(10.0, start);
        let mut refreshed = false;
        for i in 1..=5 {
            refreshed = clock.tick(start + Duration::from_millis(100 * i));
        }
        assert!(refreshed);
        assert!((clock.fps() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_seconds_since_start() {
        let clock = FrameClock::new(25.0);
        thread::sleep(Duration::from_millis(10));
        let seconds = clock.seconds_at(Instant::now());
        assert!(seconds >= 0.01);
    }
}
