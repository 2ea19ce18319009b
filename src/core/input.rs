//! Input state tracking

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Discrete movement flags derived from the arrow keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Tracks keyboard input state
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: HashSet::new(),
        }
    }

    /// Process a window event
    pub fn process_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event: KeyEvent {
                physical_key: PhysicalKey::Code(key_code),
                state,
                ..
            },
            ..
        } = event
        {
            self.key_input(*key_code, *state);
        }
    }

    /// Record a single key transition
    pub fn key_input(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_pressed.contains(&key_code) {
                    self.keys_just_pressed.insert(key_code);
                }
                self.keys_pressed.insert(key_code);
            }
            ElementState::Released => {
                self.keys_pressed.remove(&key_code);
            }
        }
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
    }

    /// Check if a key is currently held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Current state of the four directional flags
    pub fn move_flags(&self) -> MoveFlags {
        MoveFlags {
            forward: self.is_key_pressed(KeyCode::ArrowUp),
            backward: self.is_key_pressed(KeyCode::ArrowDown),
            left: self.is_key_pressed(KeyCode::ArrowLeft),
            right: self.is_key_pressed(KeyCode::ArrowRight),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release_cycle() {
        let mut input = InputState::new();
        assert!(!input.is_key_pressed(KeyCode::ArrowUp));

        input.key_input(KeyCode::ArrowUp, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::ArrowUp));
        assert!(input.is_key_just_pressed(KeyCode::ArrowUp));

        input.end_frame();
        assert!(input.is_key_pressed(KeyCode::ArrowUp));
        assert!(!input.is_key_just_pressed(KeyCode::ArrowUp));

        input.key_input(KeyCode::ArrowUp, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::ArrowUp));
    }

    #[test]
    fn test_repeat_press_is_not_just_pressed_again() {
        let mut input = InputState::new();
        input.key_input(KeyCode::ArrowLeft, ElementState::Pressed);
        input.end_frame();

        // OS key repeat delivers Pressed again while held
        input.key_input(KeyCode::ArrowLeft, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::ArrowLeft));
        assert!(!input.is_key_just_pressed(KeyCode::ArrowLeft));
    }

    #[test]
    fn test_move_flags() {
        let mut input = InputState::new();
        assert_eq!(input.move_flags(), MoveFlags::default());

        input.key_input(KeyCode::ArrowUp, ElementState::Pressed);
        input.key_input(KeyCode::ArrowLeft, ElementState::Pressed);
        let flags = input.move_flags();
        assert!(flags.forward);
        assert!(flags.left);
        assert!(!flags.backward);
        assert!(!flags.right);
    }
}
