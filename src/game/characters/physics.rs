// Character movement

use super::state::Direction;
use crate::core::math::Rect;
use glam::Vec2;

/// Position, velocity and derived facing of the player character
#[derive(Debug, Clone)]
pub struct CharacterPhysics {
    rect: Rect,
    velocity: Vec2,
    facing: Direction,
}

impl CharacterPhysics {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            velocity: Vec2::ZERO,
            facing: Direction::default(),
        }
    }

    /// Apply one tick of control input
    ///
    /// The control vector replaces the velocity and is added to the position
    /// as-is: it is a per-tick displacement, so `_dt` does not scale it.
    pub fn update(&mut self, _dt: f32, control: Vec2) {
        self.velocity = control;
        self.rect = self.rect.translate(control);
        if let Some(facing) = Direction::from_velocity(self.velocity) {
            self.facing = facing;
        }
    }

    /// Move back to the origin and stop; facing is kept
    pub fn restart(&mut self) {
        self.rect = self.rect.translate(-self.rect.center());
        self.velocity = Vec2::ZERO;
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn position(&self) -> Vec2 {
        self.rect.center()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }
}
