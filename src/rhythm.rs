//! Tap cadence tracking and tempo matching.
//!
//! [`RhythmMatcher`] turns a stream of tap timestamps into a smoothed
//! inter-tap interval, converts it to an angular rate per frame and grades it
//! against a target rate. While the player is idle the interval stretches
//! until it is considered silence.
//!
//! Per frame the host calls [`on_tap`](RhythmMatcher::on_tap) when a tap
//! arrived, [`match_level`](RhythmMatcher::match_level) to grade, and
//! [`on_idle_tick`](RhythmMatcher::on_idle_tick) when no tap arrived.

use std::f64::consts::TAU;

/// Default number of consecutive excellent frames needed to win.
pub const WIN_THRESHOLD: u32 = 200;

/// Qualitative grade of the tap cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchLevel {
    /// Within the tight tolerance band.
    Excellent,
    /// Close, but outside the tight band.
    Warming,
    /// No rhythm detected or far off tempo.
    None,
}

impl MatchLevel {
    /// Text shown to the player for this grade.
    pub fn label(self) -> &'static str {
        match self {
            MatchLevel::Excellent => "Super tempo...",
            MatchLevel::Warming => "Warming up...",
            MatchLevel::None => "",
        }
    }
}

/// Tunables for [`RhythmMatcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RhythmSettings {
    /// Animation frames per second.
    pub frame_rate: f64,
    /// Relative error below which a frame is graded excellent.
    pub excellent_threshold: f64,
    /// Relative error below which a frame is graded warming.
    pub warming_threshold: f64,
    /// Tap gaps at or beyond this many seconds are ignored.
    pub tap_gap_limit: f64,
    /// Idle grace period, in multiples of the frame rate.
    pub grace_multiplier: f64,
    /// Interval growth factor per idle frame after the grace period.
    pub idle_growth: f64,
    /// Interval in seconds beyond which the rhythm counts as silent.
    pub silence_limit: f64,
}

impl Default for RhythmSettings {
    fn default() -> Self {
        Self {
            frame_rate: 10.0,
            excellent_threshold: 0.15,
            warming_threshold: 0.5,
            tap_gap_limit: 10.0,
            grace_multiplier: 5.0,
            idle_growth: 0.02_f64.exp(),
            silence_limit: 20.0,
        }
    }
}

impl RhythmSettings {
    /// Idle frames tolerated before the interval starts to stretch.
    #[inline]
    pub fn grace_frames(&self) -> f64 {
        self.grace_multiplier * self.frame_rate
    }
}

/// Smoothed tap timer and consecutive-match streak.
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmMatcher {
    settings: RhythmSettings,
    last_tap: Option<f64>,
    interval: f64,
    idle_frames: u32,
    streak: u32,
}

impl RhythmMatcher {
    pub fn new(settings: RhythmSettings) -> Self {
        Self {
            settings,
            last_tap: None,
            interval: 0.0,
            idle_frames: 0,
            streak: 0,
        }
    }

    #[inline]
    pub fn settings(&self) -> &RhythmSettings {
        &self.settings
    }

    /// Record a tap at `now` seconds.
    ///
    /// The first tap only starts the timer. Gaps at or beyond the gap limit
    /// keep the previous interval.
    pub fn on_tap(&mut self, now: f64) {
        if let Some(last) = self.last_tap {
            let gap = now - last;
            if gap < self.settings.tap_gap_limit {
                self.interval = gap;
            }
        }
        self.last_tap = Some(now);
        // The tap frame itself is the first idle frame
        self.idle_frames = 1;
    }

    /// Advance the idle counter by one frame and stretch the interval once
    /// the grace period is over.
    pub fn on_idle_tick(&mut self) {
        self.idle_frames = self.idle_frames.saturating_add(1);
        if f64::from(self.idle_frames) > self.settings.grace_frames() {
            self.interval = if self.interval > 0.0 && self.interval < self.settings.silence_limit {
                self.interval * self.settings.idle_growth
            } else {
                0.0
            };
        }
    }

    /// Tap frequency in Hz, 0 when no rhythm is detected.
    pub fn instantaneous_frequency(&self) -> f64 {
        if self.interval > 0.0 {
            1.0 / self.interval
        } else {
            0.0
        }
    }

    /// Tap frequency as phase advance per frame, comparable to
    /// [`OrbitalSystem::phase_step`](crate::OrbitalSystem::phase_step).
    pub fn angular_rate(&self) -> f64 {
        TAU * self.instantaneous_frequency() / self.settings.frame_rate
    }

    /// Relative error of the tap rate against `target` (radians per frame).
    pub fn relative_error(&self, target: f64) -> f64 {
        ((self.angular_rate() - target) / target).abs()
    }

    /// Grade the cadence against `target` and update the streak.
    pub fn match_level(&mut self, target: f64) -> MatchLevel {
        let level = if !(target > 0.0 && target.is_finite()) {
            MatchLevel::None
        } else {
            let err = self.relative_error(target);
            if err < self.settings.excellent_threshold {
                MatchLevel::Excellent
            } else if err < self.settings.warming_threshold {
                MatchLevel::Warming
            } else {
                MatchLevel::None
            }
        };

        if level == MatchLevel::Excellent {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        level
    }

    /// Consecutive excellent grades so far.
    #[inline]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn reset_streak(&mut self) {
        self.streak = 0;
    }

    /// Forget the smoothed interval. The last tap timestamp is kept.
    pub fn reset_interval(&mut self) {
        self.interval = 0.0;
    }

    /// Smoothed inter-tap interval in seconds.
    #[inline]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[inline]
    pub fn idle_frames(&self) -> u32 {
        self.idle_frames
    }
}

impl Default for RhythmMatcher {
    fn default() -> Self {
        Self::new(RhythmSettings::default())
    }
}

/// Whether `counter` has reached `threshold`.
#[inline]
pub fn win_check(counter: u32, threshold: u32) -> bool {
    counter >= threshold
}
