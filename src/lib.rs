//! # gwdance - jump to the rhythm of gravitational waves
//!
//! Two black holes orbit each other and radiate a (very) approximate
//! gravitational-wave strain pattern. The player taps along with the orbit;
//! hold the tempo long enough and the binary merges and rings down.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gwdance::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = GameConfig::load(None)?;
//!     gwdance::run(config, WindowOptions { fullscreen: false })
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The orbit
//!
//! [`OrbitalSystem`] derives every constant of the binary from its two
//! masses: separation, orbital frequency, phase advance per frame and the
//! extent of the sampled plane. It evaluates the inspiral strain field, the
//! merger/ringdown field and the body positions for any phase.
//!
//! ### The rhythm
//!
//! [`RhythmMatcher`] turns tap timestamps into a tap rate and grades it
//! against the orbit ([`MatchLevel`]). Consecutive excellent frames build a
//! streak.
//!
//! ### The game step
//!
//! [`game::update`] is the whole game: it takes the current
//! [`AnimationState`] and this tick's [`FrameInput`] and returns the next state
//! plus a [`Frame`] describing what to draw. It is deterministic for a seeded
//! config, so tests drive it directly.
//!
//! ## Configuration
//!
//! | Key | Default | |
//! |-----|---------|--|
//! | `frame_rate` | 10 | ticks per second |
//! | `grid_resolution` | 100 | strain samples per axis |
//! | `excellent_threshold` | 0.15 | relative tempo error for "Super tempo" |
//! | `win_threshold` | 200 | frames of streak to win |
//!
//! See [`GameConfig`] for the full list.

mod app;
pub mod config;
mod error;
pub mod field;
pub mod game;
mod gpu;
pub mod input;
pub mod orbit;
pub mod rhythm;
pub mod scene;
pub mod time;

pub use crate::app::{run, WindowOptions};
pub use crate::config::GameConfig;
pub use crate::error::{AppError, ConfigError, GpuError, ModelError};
pub use crate::field::{SampleGrid, StrainField};
pub use crate::game::{AnimationState, Bodies, Frame, FrameInput, GameState, Transition};
pub use crate::gpu::{Camera, Instance};
pub use crate::orbit::OrbitalSystem;
pub use crate::rhythm::{MatchLevel, RhythmMatcher, RhythmSettings};
pub use glam::DVec3;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use gwdance::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::{run, WindowOptions};
    pub use crate::config::GameConfig;
    pub use crate::error::{AppError, ConfigError, ModelError};
    pub use crate::game::{update, AnimationState, Frame, FrameInput, GameState};
    pub use crate::orbit::OrbitalSystem;
    pub use crate::rhythm::{MatchLevel, RhythmMatcher};
    pub use crate::DVec3;
}
