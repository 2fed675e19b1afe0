// The player character: movement plus directional animation

use super::animation::{CharacterAnimator, FrameMode};
use super::physics::CharacterPhysics;
use super::state::Direction;
use crate::core::math::Rect;
use crate::engine::assets::{AssetError, SpriteSheet};
use crate::engine::renderer::{Sprite, TextureHandle};
use glam::{UVec2, Vec2};

/// Represents the player-controlled character
#[derive(Debug)]
pub struct Character {
    pub physics: CharacterPhysics,
    pub animator: CharacterAnimator,
    texture: TextureHandle,
    sheet_size: UVec2,
}

impl Character {
    /// Spawn a character one frame in size, centered on `spawn`
    pub fn new(
        spawn: Vec2,
        sheet: &SpriteSheet,
        texture: TextureHandle,
        mode: FrameMode,
    ) -> Result<Self, AssetError> {
        let size = Vec2::splat(sheet.frame_size() as f32);
        Ok(Self {
            physics: CharacterPhysics::new(Rect::centered(spawn, size)),
            animator: CharacterAnimator::new(sheet, mode)?,
            texture,
            sheet_size: UVec2::new(sheet.width(), sheet.height()),
        })
    }

    /// Apply one tick of control, then let the animation follow the facing
    pub fn update(&mut self, dt: f32, control: Vec2) {
        self.physics.update(dt, control);
        self.animator.update(dt, self.physics.facing());
    }

    pub fn restart(&mut self) {
        self.physics.restart();
    }

    /// Pick up a reloaded sheet
    pub fn rebind(&mut self, sheet: &SpriteSheet) -> Result<(), AssetError> {
        self.animator.rebind(sheet)?;
        self.sheet_size = UVec2::new(sheet.width(), sheet.height());
        Ok(())
    }

    pub fn position(&self) -> Vec2 {
        self.physics.position()
    }

    pub fn facing(&self) -> Direction {
        self.animator.state()
    }

    /// Current frame, centered on the character
    pub fn sprite(&self) -> Sprite {
        Sprite::from_frame(
            self.texture,
            self.animator.current_frame(),
            self.sheet_size,
            self.position(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::{DescriptorRecord, Frame};
    use image::RgbaImage;

    fn character() -> Character {
        let mut sheet = SpriteSheet::from_image(RgbaImage::new(128, 256), 64).unwrap();
        for (row, name) in ["South", "East", "West", "North"].iter().enumerate() {
            sheet.bind(&DescriptorRecord::new(name, row, 0, 1)).unwrap();
        }
        Character::new(
            Vec2::ZERO,
            &sheet,
            TextureHandle::from_index(1),
            FrameMode::StaticPose,
        )
        .unwrap()
    }

    #[test]
    fn test_sprite_tracks_position_and_facing() {
        let mut hero = character();
        hero.update(0.016, Vec2::new(-1.0, 1.0));

        let sprite = hero.sprite();
        assert_eq!(hero.facing(), Direction::West);
        assert_eq!(sprite.position, Vec2::new(-1.0, 1.0));
        assert_eq!(sprite.size, Vec2::splat(64.0));
        assert_eq!(sprite.uv_min, Vec2::new(0.0, 0.5));
        assert_eq!(sprite.uv_max, Vec2::new(0.5, 0.75));
    }

    #[test]
    fn test_standing_still_keeps_state_and_counter() {
        let mut hero = character();
        hero.update(0.016, Vec2::new(1.0, 0.0));
        assert_eq!(hero.animator.state(), Direction::East);
        let after_turn = hero.animator.counter();

        hero.update(0.016, Vec2::ZERO);
        let first_idle = hero.animator.counter();
        hero.update(0.016, Vec2::ZERO);
        let second_idle = hero.animator.counter();

        assert_eq!(hero.facing(), Direction::East);
        assert_eq!(hero.animator.state(), Direction::East);
        assert!(first_idle > after_turn);
        assert!(second_idle > first_idle);
        assert_eq!(hero.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_restart_keeps_facing() {
        let mut hero = character();
        for _ in 0..3 {
            hero.update(0.016, Vec2::new(0.0, 1.0));
        }
        hero.restart();

        assert_eq!(hero.position(), Vec2::ZERO);
        assert_eq!(hero.facing(), Direction::North);
        assert_eq!(hero.animator.current_frame(), Frame::new(0, 192, 64, 64));
    }
}
