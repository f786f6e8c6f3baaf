//! Turns a game [`Frame`] into drawable instances.
//!
//! World coordinates are normalised by the grid half-width, so the strain
//! surface spans `[-1, 1]` in the horizontal plane. The physical `z` axis
//! (height) maps to the renderer's `y` axis.

use glam::DVec3;

use crate::field::linspace;
use crate::game::{AnimationState, Bodies, Frame, GameState, PLOT_SAMPLES};
use crate::gpu::Instance;
use crate::rhythm::MatchLevel;

/// Dots in the streak progress bar.
pub const STREAK_DOTS: usize = 20;

const SURFACE_COLOR: [f32; 3] = [0.0, 0.5, 1.0];
const BODY_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const ORBIT_CURVE_COLOR: [f32; 4] = [0.6, 0.039, 0.2, 0.8];
const HOP_CURVE_COLOR: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
const BODY_SIZE_GAIN: f32 = 1.5;

/// Upper bound on instances for a grid of `resolution` samples per axis.
pub fn capacity(resolution: usize) -> u32 {
    let count = resolution
        .saturating_mul(resolution)
        .saturating_add(2 + 2 * PLOT_SAMPLES + 1 + STREAK_DOTS);
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Map a physical position to normalised render space.
pub fn to_render_space(position: DVec3, bounds: f64) -> [f32; 3] {
    [
        (position.x / bounds) as f32,
        (position.z / bounds) as f32,
        (-position.y / bounds) as f32,
    ]
}

/// Build every instance for `frame`.
pub fn build(state: &AnimationState, frame: &Frame) -> Vec<Instance> {
    let bounds = state.system().bounds();
    let mut instances = Vec::with_capacity(capacity(frame.field.resolution()) as usize);

    push_surface(&mut instances, frame, bounds);
    push_bodies(&mut instances, frame.bodies, state, bounds);
    push_curve(&mut instances, &frame.orbit_curve, -0.72, ORBIT_CURVE_COLOR);
    push_curve(&mut instances, &frame.hop_curve, -0.9, HOP_CURVE_COLOR);
    push_indicator(&mut instances, frame);
    push_streak(&mut instances, frame.streak, state.win_threshold());

    instances
}

fn push_surface(instances: &mut Vec<Instance>, frame: &Frame, bounds: f64) {
    let n = frame.field.resolution();
    let axis = linspace(-1.0, 1.0, n);
    let peak = frame.field.max_abs().max(f64::MIN_POSITIVE);
    let size = 0.9 / n as f32;

    for (i, value) in frame.field.values().iter().enumerate() {
        let (ix, iy) = (i % n, i / n);
        let shade = (0.65 + 0.35 * value / peak) as f32;
        instances.push(Instance::world(
            [axis[ix] as f32, (value / bounds) as f32, -axis[iy] as f32],
            size,
            [
                SURFACE_COLOR[0] * shade,
                SURFACE_COLOR[1] * shade,
                SURFACE_COLOR[2] * shade,
                1.0,
            ],
        ));
    }
}

fn push_bodies(instances: &mut Vec<Instance>, bodies: Bodies, state: &AnimationState, bounds: f64) {
    match bodies {
        Bodies::Binary(positions) => {
            let (d1, d2) = state.system().diameters();
            for (position, diameter) in positions.into_iter().zip([d1, d2]) {
                instances.push(Instance::world(
                    to_render_space(position, bounds),
                    BODY_SIZE_GAIN * (diameter / bounds) as f32,
                    BODY_COLOR,
                ));
            }
        }
        Bodies::Merged { diameter } => {
            instances.push(Instance::world(
                [0.0; 3],
                BODY_SIZE_GAIN * (diameter / bounds) as f32,
                BODY_COLOR,
            ));
        }
    }
}

fn push_curve(instances: &mut Vec<Instance>, samples: &[f64], baseline: f32, color: [f32; 4]) {
    let xs = linspace(-0.95, 0.95, samples.len());
    for (x, y) in xs.iter().zip(samples) {
        instances.push(Instance::screen(*x as f32, baseline + 0.07 * *y as f32, 0.006, color));
    }
}

fn push_indicator(instances: &mut Vec<Instance>, frame: &Frame) {
    let color = match (frame.mode, frame.level) {
        (GameState::Won, _) => [1.0, 0.8, 0.1, 1.0],
        (_, Some(MatchLevel::Excellent)) => [0.1, 0.8, 0.2, 1.0],
        (_, Some(MatchLevel::Warming)) => [0.95, 0.5, 0.1, 1.0],
        _ => return,
    };
    instances.push(Instance::screen(0.0, 0.85, 0.04, color));
}

fn push_streak(instances: &mut Vec<Instance>, streak: u32, threshold: u32) {
    let lit = (streak.min(threshold) as usize * STREAK_DOTS) / threshold.max(1) as usize;
    for i in 0..lit {
        let x = -0.3 + 0.6 * i as f32 / (STREAK_DOTS - 1) as f32;
        instances.push(Instance::screen(x, 0.75, 0.012, [0.1, 0.8, 0.2, 0.9]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{update, FrameInput};
    use crate::gpu::{SPACE_SCREEN, SPACE_WORLD};
    use crate::GameConfig;

    fn first_frame() -> (AnimationState, Frame) {
        let config = GameConfig {
            masses: Some([6220.0, 6220.0]),
            grid_resolution: 10,
            ..GameConfig::default()
        };
        let state = AnimationState::new(&config).unwrap();
        update(state, FrameInput { tapped: false, now: 0.0 })
    }

    #[test]
    fn test_render_space_swaps_height() {
        let p = to_render_space(DVec3::new(10.0, 20.0, 30.0), 10.0);
        assert_eq!(p, [1.0, 3.0, -2.0]);
    }

    #[test]
    fn test_instance_counts() {
        let (state, frame) = first_frame();
        let instances = build(&state, &frame);
        let world = instances.iter().filter(|i| i.space == SPACE_WORLD).count();
        let screen = instances.iter().filter(|i| i.space == SPACE_SCREEN).count();
        // Grid samples plus two bodies; two plots and no indicator while off tempo
        assert_eq!(world, 100 + 2);
        assert_eq!(screen, 2 * PLOT_SAMPLES);
        assert!(instances.len() <= capacity(10) as usize);
    }

    #[test]
    fn test_surface_spans_unit_square() {
        let (state, frame) = first_frame();
        let instances = build(&state, &frame);
        assert_eq!(instances[0].position[0], -1.0);
        assert_eq!(instances[0].position[2], 1.0);
        assert_eq!(instances[99].position[0], 1.0);
        assert_eq!(instances[99].position[2], -1.0);
        assert!(instances.iter().all(|i| i.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_bodies_hover_above_plane() {
        let (state, frame) = first_frame();
        let instances = build(&state, &frame);
        let height = (state.system().separation() / state.system().bounds()) as f32;
        assert!((instances[100].position[1] - height).abs() < 1e-6);
        assert!((instances[101].position[1] - height).abs() < 1e-6);
        assert_eq!(instances[100].color, BODY_COLOR);
    }

    #[test]
    fn test_capacity_saturates() {
        assert_eq!(capacity(10), 100 + 2 + 2 * PLOT_SAMPLES as u32 + 1 + STREAK_DOTS as u32);
        assert_eq!(capacity(100_000), u32::MAX);
    }

    #[test]
    fn test_streak_dots() {
        let mut instances = Vec::new();
        push_streak(&mut instances, 100, 200);
        assert_eq!(instances.len(), STREAK_DOTS / 2);
        instances.clear();
        push_streak(&mut instances, 500, 200);
        assert_eq!(instances.len(), STREAK_DOTS);
    }
}
