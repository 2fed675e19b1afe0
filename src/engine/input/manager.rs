// Input manager - folds window key events into per-frame action state

use super::action::{Action, InputSource};
use super::config::InputConfig;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks which actions are held and which changed this frame
#[derive(Debug, Default)]
pub struct InputManager {
    config: InputConfig,

    /// Actions currently held
    pressed: HashSet<Action>,

    /// Actions pressed since the last `end_frame`
    just_pressed: HashSet<Action>,
}

impl InputManager {
    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        let Some(action) = self.config.get_action(InputSource::key(key_code)) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                // Key repeat is not a new press
                if !repeat {
                    self.press(action);
                }
            }
            ElementState::Released => self.release(action),
        }
    }

    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub(crate) fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Clear the per-frame edges; call once after the frame is simulated
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Drop all held keys (e.g. when the window loses focus)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Per-tick control vector from the movement keys
    ///
    /// Each axis is -1, 0 or 1. When both keys of an axis are held, right
    /// wins over left and down wins over up.
    pub fn control_vector(&self) -> Vec2 {
        let mut control = Vec2::ZERO;

        if self.is_pressed(Action::MoveLeft) {
            control.x = -1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            control.x = 1.0;
        }
        if self.is_pressed(Action::MoveUp) {
            control.y = 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            control.y = -1.0;
        }

        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputManager::default();
        input.press(Action::MoveLeft);
        assert!(input.is_pressed(Action::MoveLeft));
        assert!(input.just_pressed(Action::MoveLeft));

        input.end_frame();
        input.release(Action::MoveLeft);
        assert!(!input.is_pressed(Action::MoveLeft));
        assert!(!input.just_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_end_frame_clears_edges_only() {
        let mut input = InputManager::default();
        input.press(Action::Restart);
        input.end_frame();

        assert!(input.is_pressed(Action::Restart));
        assert!(!input.just_pressed(Action::Restart));
    }

    #[test]
    fn test_process_key_uses_bindings() {
        let mut input = InputManager::default();
        input.process_key(KeyCode::ArrowUp, ElementState::Pressed, false);
        assert!(input.is_pressed(Action::MoveUp));

        input.process_key(KeyCode::KeyQ, ElementState::Pressed, false);
        assert_eq!(input.pressed.len(), 1);

        input.process_key(KeyCode::ArrowUp, ElementState::Released, false);
        assert!(!input.is_pressed(Action::MoveUp));
    }

    #[test]
    fn test_key_repeat_is_not_a_press() {
        let mut input = InputManager::default();
        input.process_key(KeyCode::Enter, ElementState::Pressed, true);
        assert!(!input.just_pressed(Action::Restart));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = InputManager::default();
        input.release(Action::MoveDown);
        assert!(!input.is_pressed(Action::MoveDown));
        assert!(!input.just_pressed(Action::MoveDown));
    }

    #[test]
    fn test_control_vector_neutral() {
        let input = InputManager::default();
        assert_eq!(input.control_vector(), Vec2::ZERO);
    }

    #[test]
    fn test_control_vector_diagonal() {
        let mut input = InputManager::default();
        input.press(Action::MoveLeft);
        input.press(Action::MoveUp);
        assert_eq!(input.control_vector(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_control_vector_opposing_keys() {
        let mut input = InputManager::default();
        input.press(Action::MoveLeft);
        input.press(Action::MoveRight);
        input.press(Action::MoveUp);
        input.press(Action::MoveDown);
        assert_eq!(input.control_vector(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_reset() {
        let mut input = InputManager::default();
        input.press(Action::SlowMotion);
        input.reset();
        assert!(!input.is_pressed(Action::SlowMotion));
    }
}
