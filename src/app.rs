//! Window and event loop hosting the game.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::config::GameConfig;
use crate::error::{AppError, GpuError};
use crate::game::{self, AnimationState, Frame, FrameInput, GameState, Transition};
use crate::gpu::GpuState;
use crate::input::Input;
use crate::scene;
use crate::time::FrameClock;

const TITLE: &str = "Jumping to the rhythm of gravitational waves";

/// How the game window is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub fullscreen: bool,
}

/// Run the game until the window closes or the player quits.
pub fn run(config: GameConfig, options: WindowOptions) -> Result<(), AppError> {
    let state = AnimationState::new(&config)?;
    log::info!(
        "Binary of {} + {} suns at {:.3} Hz, {} fps, {}x{} grid",
        state.system().mass1(),
        state.system().mass2(),
        state.system().frequency(),
        config.frame_rate,
        config.grid_resolution,
        config.grid_resolution
    );
    log::info!(
        "Tap J or Space every {:.2}s to match the orbit",
        state.on_tempo_interval()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(state, &config, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Window title: the rotation and jump frequencies while playing, then the
/// match headline.
fn window_title(frame: &Frame) -> String {
    let mut title = TITLE.to_string();
    if let Some(status) = &frame.status {
        title.push_str(&format!(
            " | rotation {:.3} Hz, jump {:.3} Hz",
            status.rotation_hz, status.jump_hz
        ));
    }
    let headline = frame.headline();
    if !headline.is_empty() {
        title.push_str(" - ");
        title.push_str(headline);
    }
    title
}

/// Rate limiter for the full status readout in the log.
///
/// Emits on the first playing frame, on every restart, and then once per
/// `period` playing frames.
#[derive(Debug)]
struct StatusLog {
    period: u32,
    countdown: u32,
}

impl StatusLog {
    fn new(frame_rate: f64) -> Self {
        Self {
            period: frame_rate.round().max(1.0) as u32,
            countdown: 0,
        }
    }

    fn poll(&mut self, frame: &Frame) -> Option<String> {
        let status = frame.status.as_ref()?;
        let restarted = matches!(frame.transition, Some(Transition::Restarted { .. }));
        if self.countdown == 0 || restarted {
            self.countdown = self.period - 1;
            Some(status.text())
        } else {
            self.countdown -= 1;
            None
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    state: Option<AnimationState>,
    clock: FrameClock,
    input: Input,
    options: WindowOptions,
    title: String,
    status_log: StatusLog,
    error: Option<AppError>,
}

impl App {
    fn new(state: AnimationState, config: &GameConfig, options: WindowOptions) -> Self {
        Self {
            window: None,
            gpu_state: None,
            state: Some(state),
            clock: FrameClock::new(config.frame_rate),
            input: Input::new(),
            options,
            title: TITLE.to_string(),
            status_log: StatusLog::new(config.frame_rate),
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let mut window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1920, 1080));
        if self.options.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let resolution = self
            .state
            .as_ref()
            .map_or(2, |s| s.system().grid().resolution());
        let gpu_state: Result<GpuState, GpuError> =
            pollster::block_on(GpuState::new(window, scene::capacity(resolution)));
        self.gpu_state = Some(gpu_state?);
        Ok(())
    }

    /// Run one game tick and hand the result to the renderer.
    fn tick(&mut self, now: Instant) {
        if self.clock.tick(now) {
            log::debug!("{:.1} fps", self.clock.fps());
        }

        let Some(state) = self.state.take() else {
            return;
        };
        let input = FrameInput {
            tapped: self.input.take_tap(),
            now: self.clock.seconds_at(now),
        };
        let (state, frame) = game::update(state, input);

        if frame.transition == Some(Transition::Merged) {
            log::info!("!!! Win !!!");
        }
        if let Some(text) = self.status_log.poll(&frame) {
            log::info!("\n{text}");
        }

        let title = window_title(&frame);
        if title != self.title {
            log::debug!("Match: {:?}", frame.level);
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }

        if let Some(gpu_state) = &mut self.gpu_state {
            let instances = scene::build(&state, &frame);
            gpu_state.upload(&instances, frame.mode == GameState::Won);
        }
        self.state = Some(state);

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);
        if self.input.quit_requested() {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    let (drag, scroll) = self.input.take_camera_motion();
                    gpu_state.camera.apply(drag, scroll);

                    match gpu_state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::warn!("Render error: {:?}", e),
                    }
                }
            }
            WindowEvent::CursorMoved { .. } | WindowEvent::MouseWheel { .. } => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if self.clock.tick_due(now) {
            self.tick(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AnimationState {
        let config = GameConfig {
            masses: Some([6220.0, 6220.0]),
            grid_resolution: 4,
            win_threshold: 3,
            seed: Some(4),
            ..GameConfig::default()
        };
        AnimationState::new(&config).unwrap()
    }

    #[test]
    fn test_title_carries_status_and_headline() {
        let s = state();
        let interval = s.on_tempo_interval();
        let (s, frame) = game::update(s, FrameInput { tapped: true, now: 0.0 });
        assert_eq!(
            window_title(&frame),
            format!("{TITLE} | rotation 0.154 Hz, jump 0.000 Hz")
        );

        let (_, frame) = game::update(s, FrameInput { tapped: true, now: interval });
        let title = window_title(&frame);
        assert!(title.contains("jump 0.154 Hz"), "{title}");
        assert!(title.ends_with(" - Super tempo..."), "{title}");
    }

    #[test]
    fn test_status_logged_once_per_second_while_playing() {
        let mut log = StatusLog::new(10.0);
        let mut s = state();
        let mut logged = Vec::new();
        for i in 0..25 {
            let (next, frame) = game::update(s, FrameInput { tapped: false, now: i as f64 / 10.0 });
            s = next;
            if let Some(text) = log.poll(&frame) {
                assert!(text.contains("Rotation frequency = 0.154 Hz"));
                assert!(text.contains("Black hole 1"));
                logged.push(i);
            }
        }
        assert_eq!(logged, vec![0, 10, 20]);
    }

    #[test]
    fn test_status_log_skips_won_frames_and_fires_on_restart() {
        let mut log = StatusLog::new(10.0);
        let mut s = state();
        let interval = s.on_tempo_interval();
        let (next, frame) = game::update(s, FrameInput { tapped: true, now: 0.0 });
        s = next;
        assert!(log.poll(&frame).is_some());

        let mut now = interval;
        let mut saw_won = false;
        let mut saw_restart = false;
        for _ in 0..20 {
            let (next, frame) = game::update(s, FrameInput { tapped: true, now });
            s = next;
            now += interval;
            let text = log.poll(&frame);
            match (frame.mode, frame.transition) {
                (GameState::Won, _) => {
                    saw_won = true;
                    assert!(text.is_none());
                }
                (GameState::Playing, Some(Transition::Restarted { .. })) => {
                    saw_restart = true;
                    assert!(text.is_some());
                    break;
                }
                _ => {}
            }
        }
        assert!(saw_won && saw_restart);
    }
}
