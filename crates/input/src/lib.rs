//! Keyboard and pointer input for the portfolio scene.
//!
//! Keys and clicks are edge-triggered: a key or button counts once on the
//! frame it goes down, and held repeats are ignored. Drags and the wheel are
//! accumulated per frame.

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Cursor position in physical window pixels, `None` until the cursor
    /// has entered the window or after it left.
    cursor: Option<Vec2>,
    /// Cursor travel this frame, in physical pixels.
    mouse_delta: Vec2,
    /// Wheel travel this frame in lines; positive scrolls away from the user.
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once a frame has consumed its input.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) {
                    self.mouse_pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        if let Some(previous) = self.cursor {
            self.mouse_delta += position - previous;
        }
        self.cursor = Some(position);
    }

    /// The cursor left the window; re-entering does not count as travel.
    pub fn process_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Process wheel travel in lines.
    pub fn process_scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Drop held state, e.g. when the window loses focus and releases would
    /// never arrive.
    pub fn clear_held(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Cursor travel this frame with the left button held.
    pub fn drag_delta(&self) -> Vec2 {
        if self.is_mouse_held(MouseButton::Left) {
            self.mouse_delta
        } else {
            Vec2::ZERO
        }
    }

    /// Escape: close detail, leave the surface, or clear the selection.
    pub fn is_escape_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// Enter / Space: travel to the selected planet.
    pub fn is_confirm_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Enter)
            || self.is_key_pressed(KeyCode::NumpadEnter)
            || self.is_key_pressed(KeyCode::Space)
    }

    /// Backspace: back to the ship.
    pub fn is_back_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Backspace)
    }

    /// L: switch between Korean and English.
    pub fn is_language_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyL)
    }

    pub fn is_fullscreen_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::F11)
    }

    /// Left click this frame.
    pub fn is_click_pressed(&self) -> bool {
        self.is_mouse_pressed(MouseButton::Left)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_edge_triggered() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_escape_pressed());
        input.end_frame();

        // OS key repeat while held.
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(!input.is_escape_pressed());

        input.process_keyboard(KeyCode::Escape, ElementState::Released);
        input.end_frame();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_escape_pressed());
    }

    #[test]
    fn confirm_accepts_enter_and_space() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_confirm_pressed());
        input.end_frame();
        assert!(!input.is_confirm_pressed());
    }

    #[test]
    fn cursor_tracks_enter_and_leave() {
        let mut input = InputState::new();
        assert_eq!(input.cursor(), None);
        input.process_cursor_position((12.0, 34.0));
        assert_eq!(input.cursor(), Some(Vec2::new(12.0, 34.0)));
        // Entering the window is not travel.
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        input.process_cursor_left();
        assert_eq!(input.cursor(), None);
        input.process_cursor_position((100.0, 100.0));
        assert_eq!(input.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn drag_accumulates_only_while_held() {
        let mut input = InputState::new();
        input.process_cursor_position((10.0, 10.0));
        input.process_cursor_position((15.0, 8.0));
        assert_eq!(input.mouse_delta, Vec2::new(5.0, -2.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);
        input.end_frame();

        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_cursor_position((25.0, 8.0));
        input.process_cursor_position((30.0, 18.0));
        assert_eq!(input.drag_delta(), Vec2::new(15.0, 10.0));
        input.end_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
        assert!(input.is_mouse_held(MouseButton::Left));

        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        input.process_cursor_position((40.0, 18.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);
    }

    #[test]
    fn scroll_sums_within_a_frame() {
        let mut input = InputState::new();
        input.process_scroll(1.0);
        input.process_scroll(0.5);
        assert_eq!(input.scroll(), 1.5);
        input.end_frame();
        assert_eq!(input.scroll(), 0.0);
    }

    #[test]
    fn click_counts_once() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_click_pressed());
        input.end_frame();
        assert!(!input.is_click_pressed());
    }
}
