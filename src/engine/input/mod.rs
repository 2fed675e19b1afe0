// Input handling system
//
// Keyboard events from winit are mapped to game actions through remappable
// bindings and folded into per-frame state.
//
// - `action`: game actions and default key bindings
// - `config`: binding table and remapping
// - `manager`: held/just-pressed tracking and the movement control vector
//
// ```rust
// let mut input = InputManager::default();
//
// // In the event loop
// input.process_keyboard_event(&key_event);
//
// // Once per frame
// let control = input.control_vector();
// if input.just_pressed(Action::Restart) { /* ... */ }
// input.end_frame();
// ```

pub mod action;
pub mod config;
pub mod manager;

pub use action::Action;
pub use manager::InputManager;

#[allow(unused_imports)]
pub use action::InputSource;
#[allow(unused_imports)]
pub use config::InputConfig;
