//! Benchmarks for the CPU-side strain evaluation and frame building.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gwdance::game::{update, AnimationState, FrameInput};
use gwdance::{scene, GameConfig, OrbitalSystem};

fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("strain_field");

    for resolution in [50, 100, 200] {
        let system = OrbitalSystem::configure(6220.0, 6220.0, 10.0, resolution).unwrap();

        group.bench_with_input(
            BenchmarkId::new("inspiral", resolution),
            &system,
            |b, system| b.iter(|| black_box(system.wave_field(black_box(1.3)))),
        );

        group.bench_with_input(
            BenchmarkId::new("ringdown", resolution),
            &system,
            |b, system| b.iter(|| black_box(system.merger_ringdown_field(black_box(1.3)))),
        );
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let config = GameConfig {
        masses: Some([6220.0, 6220.0]),
        seed: Some(7),
        ..GameConfig::default()
    };

    group.bench_function("update", |b| {
        let mut state = Some(AnimationState::new(&config).unwrap());
        let mut tick = 0u64;
        b.iter(|| {
            let input = FrameInput {
                tapped: tick % 22 == 0,
                now: tick as f64 / 10.0,
            };
            let (next, frame) = update(state.take().unwrap(), input);
            state = Some(next);
            tick += 1;
            black_box(frame)
        })
    });

    group.bench_function("scene_build", |b| {
        let state = AnimationState::new(&config).unwrap();
        let (state, frame) = update(state, FrameInput { tapped: false, now: 0.0 });
        b.iter(|| black_box(scene::build(&state, &frame)))
    });

    group.finish();
}

criterion_group!(benches, bench_fields, bench_frame);
criterion_main!(benches);
