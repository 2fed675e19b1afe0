// Game-specific logic built on the engine
//
// - `characters`: the player character and its animation
// - `goal`: decorative color-cycling marker
// - `scene`: per-frame update and draw of the castle level

pub mod characters;
pub mod goal;
pub mod scene;

pub use scene::{Scene, SceneSettings, SceneTextures};
