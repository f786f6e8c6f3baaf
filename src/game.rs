//! The per-frame game step.
//!
//! All mutable game state lives in one [`AnimationState`] value that the host
//! threads through [`update`] once per tick:
//!
//! ```
//! use gwdance::game::{update, AnimationState, FrameInput};
//! use gwdance::GameConfig;
//!
//! let config = GameConfig { seed: Some(1), ..GameConfig::default() };
//! let mut state = AnimationState::new(&config).unwrap();
//! for frame in 0..10 {
//!     let input = FrameInput { tapped: frame % 5 == 0, now: frame as f64 / 10.0 };
//!     let (next, output) = update(state, input);
//!     assert!(output.field.is_finite());
//!     state = next;
//! }
//! ```
//!
//! The state machine has two modes. While [`GameState::Playing`] the tap
//! cadence is graded every frame. After `win_threshold` consecutive excellent
//! frames the binary merges ([`GameState::Won`]). After the same number of
//! frames merged, new masses are drawn and play resumes.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::field::{linspace, StrainField};
use crate::orbit::OrbitalSystem;
use crate::rhythm::{win_check, MatchLevel, RhythmMatcher};

/// Samples per rhythm plot.
pub const PLOT_SAMPLES: usize = 250;

/// Time axis span of the rhythm plots (five periods).
pub const PLOT_SPAN: f64 = 2.0 * PI * 5.0;

/// Game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
}

/// Input gathered by the host during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// At least one tap arrived since the previous tick.
    pub tapped: bool,
    /// Seconds since the host clock started.
    pub now: f64,
}

/// What the renderer should draw as black holes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bodies {
    /// Two orbiting bodies.
    Binary([DVec3; 2]),
    /// A single remnant at the origin.
    Merged { diameter: f64 },
}

/// A mode change that happened during this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// The player held the tempo long enough; the binary merged.
    Merged,
    /// The dwell time ran out; play resumed with new masses.
    Restarted { mass1: f64, mass2: f64 },
}

/// Numbers shown next to the scene while playing.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub captions: [String; 2],
    pub separation: f64,
    /// Orbital frequency in Hz.
    pub rotation_hz: f64,
    /// Tap frequency divided by the tempo multiplier, in Hz.
    pub jump_hz: f64,
}

impl StatusReport {
    pub fn text(&self) -> String {
        format!(
            "{}\n{}\nSeparation = {}\n\tRotation frequency = {:5.3} Hz\n\tJump frequency     = {:5.3} Hz",
            self.captions[0], self.captions[1], self.separation, self.rotation_hz, self.jump_hz
        )
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub mode: GameState,
    pub field: StrainField,
    pub bodies: Bodies,
    /// `sin(t - plot_phase)` over the plot axis; zeros while won.
    pub orbit_curve: Vec<f64>,
    /// The player's hop curve over the plot axis; zeros while won.
    pub hop_curve: Vec<f64>,
    /// Grade of this frame, `None` while won.
    pub level: Option<MatchLevel>,
    pub streak: u32,
    pub transition: Option<Transition>,
    /// Present while playing.
    pub status: Option<StatusReport>,
}

impl Frame {
    /// Headline text for the current mode and grade.
    pub fn headline(&self) -> &'static str {
        match (self.mode, self.level) {
            (GameState::Won, _) => "!!! Win !!!",
            (GameState::Playing, Some(level)) => level.label(),
            (GameState::Playing, None) => "",
        }
    }
}

/// Time axis shared by both rhythm plots.
pub fn plot_times() -> Vec<f64> {
    linspace(0.0, PLOT_SPAN, PLOT_SAMPLES)
}

/// Mutable state of one game, threaded through [`update`].
#[derive(Debug, Clone)]
pub struct AnimationState {
    system: OrbitalSystem,
    rhythm: RhythmMatcher,
    mode: GameState,
    phase: f64,
    plot_phase: f64,
    hop_phase: f64,
    dwell: u32,
    win_threshold: u32,
    tempo_multiplier: f64,
    plot_times: Vec<f64>,
    rng: StdRng,
}

impl AnimationState {
    /// Build the initial state from a validated config.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = config.rng();
        let system = config.build_system(&mut rng)?;
        Ok(Self::from_parts(system, config, rng))
    }

    /// Build the initial state around an already configured system.
    pub fn from_parts(system: OrbitalSystem, config: &GameConfig, rng: StdRng) -> Self {
        Self {
            system,
            rhythm: RhythmMatcher::new(config.rhythm_settings()),
            mode: GameState::Playing,
            phase: 0.0,
            plot_phase: 0.0,
            hop_phase: 0.0,
            dwell: 0,
            win_threshold: config.win_threshold,
            tempo_multiplier: config.tempo_multiplier,
            plot_times: plot_times(),
            rng,
        }
    }

    #[inline]
    pub fn system(&self) -> &OrbitalSystem {
        &self.system
    }

    #[inline]
    pub fn rhythm(&self) -> &RhythmMatcher {
        &self.rhythm
    }

    #[inline]
    pub fn mode(&self) -> GameState {
        self.mode
    }

    /// Orbital phase in radians.
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Frames spent merged so far.
    #[inline]
    pub fn dwell(&self) -> u32 {
        self.dwell
    }

    #[inline]
    pub fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    /// Tap rate to aim for, in radians per frame.
    #[inline]
    pub fn target_rate(&self) -> f64 {
        self.tempo_multiplier * self.system.phase_step()
    }

    /// Seconds between taps that exactly hit the target rate.
    pub fn on_tempo_interval(&self) -> f64 {
        TAU / (self.target_rate() * self.system.frame_rate())
    }

    fn reset_counters(&mut self) {
        self.phase = 0.0;
        self.plot_phase = 0.0;
        self.hop_phase = 0.0;
        self.dwell = 0;
        self.rhythm.reset_streak();
        self.rhythm.reset_interval();
    }

    fn merge(&mut self) -> Transition {
        log::info!(
            "Merger! {} + {} suns after {} frames on tempo",
            self.system.mass1(),
            self.system.mass2(),
            self.rhythm.streak()
        );
        self.mode = GameState::Won;
        self.reset_counters();
        Transition::Merged
    }

    fn restart(&mut self) -> Transition {
        match self.system.regenerate(&mut self.rng) {
            Ok((mass1, mass2)) => log::info!(
                "New binary: {mass1} + {mass2} suns, orbiting at {:.3} Hz",
                self.system.frequency()
            ),
            Err(e) => log::error!("Keeping previous masses, regeneration failed: {e}"),
        }
        self.mode = GameState::Playing;
        self.reset_counters();
        Transition::Restarted {
            mass1: self.system.mass1(),
            mass2: self.system.mass2(),
        }
    }

    fn status(&self, positions: [DVec3; 2]) -> StatusReport {
        StatusReport {
            captions: [
                self.system.caption(0, positions[0]),
                self.system.caption(1, positions[1]),
            ],
            separation: self.system.separation(),
            rotation_hz: self.system.frequency(),
            jump_hz: self.rhythm.instantaneous_frequency() / self.tempo_multiplier,
        }
    }
}

/// Advance the game by one tick.
pub fn update(mut state: AnimationState, input: FrameInput) -> (AnimationState, Frame) {
    if input.tapped {
        state.rhythm.on_tap(input.now);
    }

    state.phase = state.system.advance(state.phase);

    let field = match state.mode {
        GameState::Won => {
            state.dwell += 1;
            state.system.merger_ringdown_field(state.phase)
        }
        GameState::Playing => state.system.wave_field(state.phase),
    };

    state.plot_phase += state.target_rate();

    let hop_rate = state.rhythm.angular_rate();
    state.hop_phase += hop_rate;
    if input.tapped {
        state.hop_phase = 0.0;
    }

    let level = match state.mode {
        GameState::Playing => {
            let target = state.target_rate();
            Some(state.rhythm.match_level(target))
        }
        GameState::Won => None,
    };

    if !input.tapped {
        state.rhythm.on_idle_tick();
    }

    let transition = match state.mode {
        GameState::Playing if win_check(state.rhythm.streak(), state.win_threshold) => {
            Some(state.merge())
        }
        GameState::Won if win_check(state.dwell, state.win_threshold) => Some(state.restart()),
        _ => None,
    };

    let streak = state.rhythm.streak();
    let (bodies, orbit_curve, hop_curve, status) = match state.mode {
        GameState::Won => (
            Bodies::Merged {
                diameter: state.system.diameter_sum(),
            },
            vec![0.0; PLOT_SAMPLES],
            vec![0.0; PLOT_SAMPLES],
            None,
        ),
        GameState::Playing => {
            let positions = state.system.body_positions(state.phase);
            let orbit_curve = state
                .plot_times
                .iter()
                .map(|t| (t - state.plot_phase).sin())
                .collect();
            let hop_curve = state
                .plot_times
                .iter()
                .map(|t| (t * (TAU * hop_rate) - state.hop_phase).sin())
                .collect();
            (
                Bodies::Binary(positions),
                orbit_curve,
                hop_curve,
                Some(state.status(positions)),
            )
        }
    };

    let frame = Frame {
        mode: state.mode,
        field,
        bodies,
        orbit_curve,
        hop_curve,
        level: if transition.is_some() { None } else { level },
        streak,
        transition,
        status,
    };
    (state, frame)
}
