//! Game configuration.
//!
//! Every tunable of the orbit model and the rhythm matcher lives in
//! [`GameConfig`]. Values come from an optional TOML file, then from
//! `GWDANCE_*` environment variables (`GWDANCE_FRAME_RATE=25`), and finally
//! from command line overrides applied by the binary.
//!
//! ```toml
//! frame_rate = 25.0
//! grid_resolution = 80
//! masses = [5000.0, 6500.0]
//! excellent_threshold = 0.25
//! ```

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::orbit::OrbitalSystem;
use crate::rhythm::{RhythmSettings, WIN_THRESHOLD};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "GWDANCE";

/// Largest accepted `grid_resolution`. Keeps the instance buffer (48 bytes a
/// sample) well below wgpu's default `max_buffer_size`.
pub const MAX_GRID_RESOLUTION: usize = 1000;

/// All tunables of the game. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Animation ticks per second.
    pub frame_rate: f64,
    /// Samples per axis of the strain grid.
    pub grid_resolution: usize,
    /// Fixed initial masses. Drawn at random when absent.
    pub masses: Option<[f64; 2]>,
    /// Seed for mass regeneration. OS entropy when absent.
    pub seed: Option<u64>,
    /// The target tap rate is this multiple of the orbital phase step.
    pub tempo_multiplier: f64,
    pub excellent_threshold: f64,
    pub warming_threshold: f64,
    /// Consecutive excellent frames needed to win, and frames spent merged.
    pub win_threshold: u32,
    /// Seconds; longer tap gaps are ignored.
    pub tap_gap_limit: f64,
    /// Idle grace period in multiples of the frame rate.
    pub grace_multiplier: f64,
    /// Interval growth per idle frame once the grace period is over.
    pub idle_growth: f64,
    /// Seconds; a longer interval means no rhythm.
    pub silence_limit: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        let rhythm = RhythmSettings::default();
        Self {
            frame_rate: rhythm.frame_rate,
            grid_resolution: 100,
            masses: None,
            seed: None,
            tempo_multiplier: 3.0,
            excellent_threshold: rhythm.excellent_threshold,
            warming_threshold: rhythm.warming_threshold,
            win_threshold: WIN_THRESHOLD,
            tap_gap_limit: rhythm.tap_gap_limit,
            grace_multiplier: rhythm.grace_multiplier,
            idle_growth: rhythm.idle_growth,
            silence_limit: rhythm.silence_limit,
        }
    }
}

impl GameConfig {
    /// Load from an optional TOML file plus `GWDANCE_*` environment variables.
    ///
    /// A missing file is only an error when a path was given explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, without environment overrides.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("frame_rate", self.frame_rate),
            ("tempo_multiplier", self.tempo_multiplier),
            ("excellent_threshold", self.excellent_threshold),
            ("tap_gap_limit", self.tap_gap_limit),
            ("grace_multiplier", self.grace_multiplier),
            ("silence_limit", self.silence_limit),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.warming_threshold < self.excellent_threshold {
            return Err(ConfigError::Invalid(format!(
                "warming_threshold ({}) must not be below excellent_threshold ({})",
                self.warming_threshold, self.excellent_threshold
            )));
        }
        if !(self.idle_growth > 1.0 && self.idle_growth.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "idle_growth must be greater than 1, got {}",
                self.idle_growth
            )));
        }
        if self.win_threshold == 0 {
            return Err(ConfigError::Invalid("win_threshold must be at least 1".into()));
        }
        if !(2..=MAX_GRID_RESOLUTION).contains(&self.grid_resolution) {
            return Err(ConfigError::Invalid(format!(
                "grid_resolution must be between 2 and {MAX_GRID_RESOLUTION}, got {}",
                self.grid_resolution
            )));
        }
        Ok(())
    }

    /// Rhythm matcher settings derived from this config.
    pub fn rhythm_settings(&self) -> RhythmSettings {
        RhythmSettings {
            frame_rate: self.frame_rate,
            excellent_threshold: self.excellent_threshold,
            warming_threshold: self.warming_threshold,
            tap_gap_limit: self.tap_gap_limit,
            grace_multiplier: self.grace_multiplier,
            idle_growth: self.idle_growth,
            silence_limit: self.silence_limit,
        }
    }

    /// Random source for mass regeneration.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Build the initial orbital system, drawing masses from `rng` unless
    /// they are fixed.
    pub fn build_system(&self, rng: &mut StdRng) -> Result<OrbitalSystem, ConfigError> {
        match self.masses {
            Some([mass1, mass2]) => Ok(OrbitalSystem::configure(
                mass1,
                mass2,
                self.frame_rate,
                self.grid_resolution,
            )?),
            None => {
                // Placeholder masses are replaced by the first draw
                let mut system = OrbitalSystem::configure(
                    f64::from(crate::orbit::MASS_RANGE.start),
                    f64::from(crate::orbit::MASS_RANGE.start),
                    self.frame_rate,
                    self.grid_resolution,
                )?;
                system.regenerate(rng)?;
                Ok(system)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn test_defaults_are_richest_variant() {
        let config = GameConfig::default();
        assert_eq!(config.frame_rate, 10.0);
        assert_eq!(config.grid_resolution, 100);
        assert_eq!(config.excellent_threshold, 0.15);
        assert_eq!(config.warming_threshold, 0.5);
        assert_eq!(config.win_threshold, 200);
        assert_eq!(config.tap_gap_limit, 10.0);
        assert!((config.idle_growth - 0.02_f64.exp()).abs() < 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_and_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            frame_rate = 25.0
            masses = [5000.0, 6500.0]
            excellent_threshold = 0.25
            seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.frame_rate, 25.0);
        assert_eq!(config.masses, Some([5000.0, 6500.0]));
        assert_eq!(config.excellent_threshold, 0.25);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.grid_resolution, 100);
        assert_eq!(config.tempo_multiplier, 3.0);
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            "frame_rate = 0.0",
            "grid_resolution = 1",
            "grid_resolution = 1001",
            "excellent_threshold = 0.6",
            "idle_growth = 1.0",
            "win_threshold = 0",
            "silence_limit = -1.0",
        ];
        for source in bad {
            let result = GameConfig::from_toml_str(source);
            assert!(
                matches!(result, Err(ConfigError::Invalid(_))),
                "{source} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_grid_resolution_upper_bound() {
        let config = GameConfig::from_toml_str("grid_resolution = 1000").unwrap();
        assert_eq!(config.grid_resolution, MAX_GRID_RESOLUTION);
        let capacity = crate::scene::capacity(config.grid_resolution) as u64;
        assert!(capacity * 48 < 256 << 20);
    }

    #[test]
    fn test_wrong_type_is_load_error() {
        let result = GameConfig::from_toml_str("frame_rate = \"fast\"");
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_build_system_fixed_and_random() {
        let mut config = GameConfig {
            masses: Some([6220.0, 6220.0]),
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let fixed = config.build_system(&mut rng).unwrap();
        assert_eq!(fixed.separation(), 37320.0);

        config.masses = None;
        config.seed = Some(3);
        let a = config.build_system(&mut config.rng()).unwrap();
        let b = config.build_system(&mut config.rng()).unwrap();
        assert_eq!(a, b);
        assert!((4000.0..7000.0).contains(&a.mass1()));
    }

    #[test]
    fn test_build_system_rejects_bad_masses() {
        let config = GameConfig {
            masses: Some([-1.0, 5000.0]),
            ..GameConfig::default()
        };
        let result = config.build_system(&mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(ConfigError::Model(ModelError::NonPositive { name: "mass1", .. }))
        ));
    }
}
