//! End-to-end scenarios driving the game step like the host loop does.
//!
//! Each test ticks [`update`] at the configured frame rate with synthetic tap
//! timestamps and checks what the player would see.

use gwdance::game::{update, AnimationState, Bodies, FrameInput, GameState, Transition};
use gwdance::{GameConfig, MatchLevel, OrbitalSystem};

const FRAME_RATE: f64 = 10.0;

fn config() -> GameConfig {
    GameConfig {
        masses: Some([6220.0, 6220.0]),
        grid_resolution: 12,
        seed: Some(2024),
        ..GameConfig::default()
    }
}

/// Ticks the game, tapping whenever a multiple of `interval` has passed.
struct Player {
    state: Option<AnimationState>,
    frame: u64,
    interval: f64,
    next_tap: f64,
}

impl Player {
    fn new(config: &GameConfig, interval: f64) -> Self {
        Self {
            state: Some(AnimationState::new(config).unwrap()),
            frame: 0,
            interval,
            next_tap: 0.0,
        }
    }

    fn tick(&mut self, tapping: bool) -> gwdance::Frame {
        let now = self.frame as f64 / FRAME_RATE;
        let tapped = tapping && now >= self.next_tap;
        if tapped {
            self.next_tap += self.interval;
        }
        let (state, frame) = update(self.state.take().unwrap(), FrameInput { tapped, now });
        self.state = Some(state);
        self.frame += 1;
        frame
    }

    fn state(&self) -> &AnimationState {
        self.state.as_ref().unwrap()
    }
}

#[test]
fn test_reference_binary_constants() {
    let system = OrbitalSystem::configure(6220.0, 6220.0, FRAME_RATE, 100).unwrap();
    let expected = [
        (system.total_mass(), 12440.0),
        (system.separation(), 37320.0),
        (system.frequency(), 0.15396007178390023),
        (system.phase_step(), 0.09673596609249163),
        (system.bounds(), 559800.0),
        (system.amplitude(), 9285216000.0),
        (system.alpha(), 4.375651125401929e-05),
    ];
    for (actual, reference) in expected {
        assert!(
            ((actual - reference) / reference).abs() < 1e-9,
            "{actual} != {reference}"
        );
    }
}

#[test]
fn test_random_binaries_give_finite_fields() {
    let mut config = config();
    for seed in 0..25 {
        config.masses = None;
        config.seed = Some(seed);
        config.grid_resolution = 21;
        let state = AnimationState::new(&config).unwrap();
        let system = state.system();
        for phase in [0.0, 1.0, 123.456, -7.0] {
            assert!(system.wave_field(phase).is_finite());
            assert!(system.merger_ringdown_field(phase).is_finite());
        }
    }
}

#[test]
fn test_on_tempo_player_wins_and_game_restarts() {
    let config = config();
    let interval = AnimationState::new(&config).unwrap().on_tempo_interval();
    let mut player = Player::new(&config, interval);

    // Tap on tempo until the merger
    let mut merged_frame = None;
    let mut excellent_frames = 0;
    for _ in 0..400 {
        let frame = player.tick(true);
        if frame.level == Some(MatchLevel::Excellent) {
            excellent_frames += 1;
        }
        if frame.transition == Some(Transition::Merged) {
            merged_frame = Some(player.frame);
            break;
        }
    }
    let merged_frame = merged_frame.expect("player never won");
    assert_eq!(player.state().mode(), GameState::Won);
    // Grading starts once the second tap lands; 199 excellent frames precede the winning one
    assert_eq!(excellent_frames, config.win_threshold - 1);
    let second_tap_frame = (interval * FRAME_RATE).ceil() as u64 + 1;
    assert_eq!(merged_frame, second_tap_frame + u64::from(config.win_threshold) - 1);

    // Keep dancing through the ringdown; grading is paused
    for i in 1..config.win_threshold {
        let frame = player.tick(true);
        assert_eq!(frame.mode, GameState::Won, "frame {i} after merger");
        assert!(matches!(frame.bodies, Bodies::Merged { .. }));
        assert_eq!(frame.level, None);
    }
    let frame = player.tick(true);
    assert!(matches!(frame.transition, Some(Transition::Restarted { .. })));
    assert_eq!(player.state().mode(), GameState::Playing);
    assert_eq!(player.state().rhythm().streak(), 0);
}

#[test]
fn test_off_tempo_player_never_wins() {
    let config = config();
    let interval = AnimationState::new(&config).unwrap().on_tempo_interval();
    let mut player = Player::new(&config, interval * 0.7);

    for _ in 0..1000 {
        let frame = player.tick(true);
        assert_eq!(frame.mode, GameState::Playing);
        assert_ne!(frame.level, Some(MatchLevel::Excellent));
    }
}

#[test]
fn test_silence_decays_to_no_rhythm() {
    let config = config();
    let interval = AnimationState::new(&config).unwrap().on_tempo_interval();
    let mut player = Player::new(&config, interval);

    // Establish the rhythm, then stop
    while player.state().rhythm().interval() == 0.0 {
        player.tick(true);
    }
    let mut last = player.state().rhythm().instantaneous_frequency();
    let mut frames = 0;
    while player.state().rhythm().interval() > 0.0 {
        let frame = player.tick(false);
        let f = player.state().rhythm().instantaneous_frequency();
        assert!(f <= last);
        last = f;
        frames += 1;
        assert!(frames < 1000);
        if frames > 200 {
            assert_ne!(frame.level, Some(MatchLevel::Excellent));
        }
    }
    assert_eq!(player.state().rhythm().instantaneous_frequency(), 0.0);
    let frame = player.tick(false);
    assert_eq!(frame.level, Some(MatchLevel::None));
    assert_eq!(frame.headline(), "");
}
