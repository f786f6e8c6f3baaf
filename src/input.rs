//! Keyboard and mouse handling for the game window.
//!
//! Raw winit events are folded into a small set of per-tick facts: whether
//! the player tapped, whether they asked to quit, and how far the camera was
//! dragged or zoomed. The host drains these once per tick.
//!
//! | Input | Action |
//! |-------|--------|
//! | `J`, `Space` | tap (jump) |
//! | `Q`, `Escape` | quit |
//! | left drag | orbit camera |
//! | wheel | zoom camera |

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Something the player asked for with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Tap,
    Quit,
}

impl Action {
    /// Map a physical key to an action, if it has one.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyJ | KeyCode::Space => Some(Action::Tap),
            KeyCode::KeyQ | KeyCode::Escape => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Input accumulated between two ticks.
#[derive(Debug, Default)]
pub struct Input {
    taps: u32,
    quit: bool,
    // Held keys, so auto-repeat does not count as extra taps
    held: HashSet<KeyCode>,

    dragging: bool,
    last_cursor: Option<Vec2>,
    drag_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key press or release.
    pub fn key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.held.insert(key) {
                    return;
                }
                match Action::from_key(key) {
                    Some(Action::Tap) => self.taps += 1,
                    Some(Action::Quit) => self.quit = true,
                    None => {}
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(code, event.state);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let cursor = Vec2::new(position.x as f32, position.y as f32);
                if self.dragging {
                    if let Some(last) = self.last_cursor {
                        self.drag_delta += cursor - last;
                    }
                    self.last_cursor = Some(cursor);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
            }
            _ => {}
        }
    }

    /// Whether the player tapped since the last call. Several presses within
    /// one tick count as a single tap.
    pub fn take_tap(&mut self) -> bool {
        let tapped = self.taps > 0;
        self.taps = 0;
        tapped
    }

    /// Camera drag in pixels and scroll in lines since the last call.
    pub fn take_camera_motion(&mut self) -> (Vec2, f32) {
        let motion = (self.drag_delta, self.scroll_delta);
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        motion
    }

    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
