//! Closed-form model of an inspiralling black hole binary.
//!
//! [`OrbitalSystem`] derives every orbital constant from the two masses, the
//! animation frame rate and the grid resolution. All lengths are in units of
//! solar masses (geometric units), frequencies in Hz.
//!
//! # Example
//!
//! ```
//! use gwdance::OrbitalSystem;
//!
//! let system = OrbitalSystem::configure(6220.0, 6220.0, 10.0, 100).unwrap();
//! let mut phase = 0.0;
//! phase = system.advance(phase);
//!
//! let field = system.wave_field(phase);
//! let [p1, p2] = system.body_positions(phase);
//! assert!(field.is_finite());
//! assert!((p1.z - system.separation()).abs() < 1e-9);
//! # let _ = p2;
//! ```

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;
use rand::Rng;

use crate::error::ModelError;
use crate::field::{SampleGrid, StrainField};

/// Range new masses are drawn from on regeneration, in solar masses.
pub const MASS_RANGE: std::ops::Range<u32> = 4000..7000;

/// Denominator scale shared by the amplitude constant and the radial falloff.
const FALLOFF: f64 = 20.0;

/// Phase at which the merger gates switch over.
const MERGER_THRESHOLD: f64 = 3.0 * PI / 4.0;

/// Steepness of the merger gates.
const MERGER_STEEPNESS: f64 = 2.0;

/// Logistic sigmoid `1 / (1 + e^-x)`.
#[inline]
pub fn logistic_sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Two black holes on a circular orbit and the strain pattern they radiate.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalSystem {
    mass1: f64,
    mass2: f64,
    frame_rate: f64,
    total_mass: f64,
    diameter1: f64,
    diameter2: f64,
    separation: f64,
    cm1: f64,
    cm2: f64,
    frequency: f64,
    phase_step: f64,
    amplitude: f64,
    wave_speed: f64,
    alpha: f64,
    grid: SampleGrid,
}

impl OrbitalSystem {
    /// Validate the parameters and derive every orbital constant.
    pub fn configure(
        mass1: f64,
        mass2: f64,
        frame_rate: f64,
        grid_resolution: usize,
    ) -> Result<Self, ModelError> {
        require_positive("mass1", mass1)?;
        require_positive("mass2", mass2)?;
        require_positive("frame_rate", frame_rate)?;
        if grid_resolution < 2 {
            return Err(ModelError::GridTooSmall(grid_resolution));
        }

        let total_mass = mass1 + mass2;
        let separation = 6.0 * mass1;
        let frequency = 32.0 * 311.0 * total_mass.powi(-1) * (separation / total_mass).powf(-1.5);
        let wave_speed = TAU * frequency * separation / (3.0 * 0.544331);
        let bounds = 15.0 * separation;

        Ok(Self {
            mass1,
            mass2,
            frame_rate,
            total_mass,
            diameter1: 2.0 * mass1,
            diameter2: 2.0 * mass2,
            separation,
            cm1: mass2 * separation / total_mass,
            cm2: mass1 * separation / total_mass,
            frequency,
            phase_step: TAU * frequency / frame_rate,
            amplitude: FALLOFF * separation.powi(2) / 3.0,
            wave_speed,
            alpha: TAU * frequency / wave_speed,
            grid: SampleGrid::new(bounds, grid_resolution),
        })
    }

    /// Reconfigure with new masses, keeping frame rate and grid resolution.
    pub fn with_masses(&self, mass1: f64, mass2: f64) -> Result<Self, ModelError> {
        Self::configure(mass1, mass2, self.frame_rate, self.grid.resolution())
    }

    /// Draw new integer masses from [`MASS_RANGE`] and reconfigure in place.
    ///
    /// Returns the drawn masses.
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) -> Result<(f64, f64), ModelError> {
        let mass1 = f64::from(rng.gen_range(MASS_RANGE));
        let mass2 = f64::from(rng.gen_range(MASS_RANGE));
        *self = self.with_masses(mass1, mass2)?;
        Ok((mass1, mass2))
    }

    /// Advance the orbital phase by one frame.
    #[inline]
    pub fn advance(&self, phase: f64) -> f64 {
        phase + self.phase_step
    }

    /// Strain at a single point of the orbital plane.
    pub fn strain_at(&self, x: f64, y: f64, phase: f64) -> f64 {
        let epsilon = 0.00001 * self.separation / 3.0;
        let r = (x.powi(2) + y.powi(2)).sqrt();
        self.amplitude * (2.0 * y.atan2(x + epsilon) - 2.0 * phase + self.alpha * r).cos()
            / (FALLOFF * self.separation / 3.0 + r)
    }

    /// Inspiral strain over the whole sample grid.
    pub fn wave_field(&self, phase: f64) -> StrainField {
        self.grid.evaluate(|x, y| self.strain_at(x, y, phase))
    }

    /// Merger and ringdown value at a single point.
    ///
    /// A central dip fades in past the gate threshold while the outgoing
    /// inspiral pattern is gated off from the centre outwards.
    pub fn merger_ringdown_at(&self, x: f64, y: f64, phase: f64) -> f64 {
        let r2 = x.powi(2) + y.powi(2);
        // Summed left to right, not as `3·dsum² + r²`
        let term1 = -logistic_sigmoid(-MERGER_STEEPNESS * (-2.0 * (phase - MERGER_THRESHOLD)))
            * 10000.0
            * self.amplitude
            / (3.0 * self.diameter_sum().powi(2) + x.powi(2) + y.powi(2));
        let term2 = logistic_sigmoid(
            MERGER_STEEPNESS * (-2.0 * (phase - MERGER_THRESHOLD) + self.alpha * r2.sqrt()),
        );
        let term3 = logistic_sigmoid(r2 - 25.0);
        let term4 = self.strain_at(x, y, phase);
        term1 + term2 * term3 * term4
    }

    /// Merger and ringdown field over the whole sample grid.
    pub fn merger_ringdown_field(&self, phase: f64) -> StrainField {
        self.grid.evaluate(|x, y| self.merger_ringdown_at(x, y, phase))
    }

    /// Positions of both bodies, hovering at height `R` above the plane.
    pub fn body_positions(&self, phase: f64) -> [DVec3; 2] {
        [
            DVec3::new(
                self.cm1 * (phase + FRAC_PI_2).cos(),
                self.cm1 * (phase + FRAC_PI_2).sin(),
                self.separation,
            ),
            DVec3::new(
                self.cm2 * (phase - FRAC_PI_2).cos(),
                self.cm2 * (phase - FRAC_PI_2).sin(),
                self.separation,
            ),
        ]
    }

    /// Status caption for body `index` (0 or 1) at `position`.
    pub fn caption(&self, index: usize, position: DVec3) -> String {
        let (mass, diameter) = if index == 0 {
            (self.mass1, self.diameter1)
        } else {
            (self.mass2, self.diameter2)
        };
        format!(
            "Black hole {}\n  Mass = {} suns\n  Diameter = {}\n  Position = ({:6.0}, {:6.0})",
            index + 1,
            mass,
            diameter,
            position.x,
            position.y
        )
    }

    #[inline]
    pub fn mass1(&self) -> f64 {
        self.mass1
    }

    #[inline]
    pub fn mass2(&self) -> f64 {
        self.mass2
    }

    #[inline]
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// `mass1 + mass2`.
    #[inline]
    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Display diameters of the two bodies.
    #[inline]
    pub fn diameters(&self) -> (f64, f64) {
        (self.diameter1, self.diameter2)
    }

    /// Diameter of the merged remnant.
    #[inline]
    pub fn diameter_sum(&self) -> f64 {
        self.diameter1 + self.diameter2
    }

    /// Orbital separation `R`.
    #[inline]
    pub fn separation(&self) -> f64 {
        self.separation
    }

    /// Distances of each body from the centre of mass.
    #[inline]
    pub fn center_of_mass_radii(&self) -> (f64, f64) {
        (self.cm1, self.cm2)
    }

    /// Orbital frequency in Hz.
    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Phase advance per frame in radians.
    #[inline]
    pub fn phase_step(&self) -> f64 {
        self.phase_step
    }

    /// Half-width of the sampled plane, `15·R`.
    #[inline]
    pub fn bounds(&self) -> f64 {
        self.grid.bounds()
    }

    /// Amplitude constant `20·R²/3`.
    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Wave-speed-normalised radial phase constant.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Propagation speed used to derive [`alpha`](Self::alpha).
    #[inline]
    pub fn wave_speed(&self) -> f64 {
        self.wave_speed
    }

    #[inline]
    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::NonPositive { name, value })
    }
}
