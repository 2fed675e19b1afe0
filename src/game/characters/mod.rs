// Character system
//
// - `state`: facing direction and its state machine
// - `physics`: per-tick movement and facing
// - `animation`: frame selection from a directional sprite sheet
// - `character`: the player entity tying the above together

pub mod animation;
pub mod character;
pub mod physics;
pub mod state;

pub use animation::FrameMode;
pub use character::Character;

#[allow(unused_imports)]
pub use animation::CharacterAnimator;
#[allow(unused_imports)]
pub use physics::CharacterPhysics;
#[allow(unused_imports)]
pub use state::{Direction, FacingStateMachine};
