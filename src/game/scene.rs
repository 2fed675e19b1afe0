// The castle scene: map, player character and goal marker

use super::characters::{Character, FrameMode};
use super::goal::Goal;
use crate::engine::assets::{AssetError, SpriteSheet};
use crate::engine::input::{Action, InputManager};
use crate::engine::renderer::{follow_step, DrawTarget, Sprite, TextureHandle};
use glam::{Vec2, Vec4};
use log::info;

/// Background, sRGB (0, 128, 0) as linear RGBA
pub const CLEAR_COLOR: Vec4 = Vec4::new(0.0, 0.2158, 0.0, 1.0);

const GOAL_POSITION: Vec2 = Vec2::new(-75.0, 40.0);
const GOAL_RADIUS: f32 = 18.0;
const GOAL_STEP: f32 = 1.0 / 7.0;

/// Tunables the scene reads from configuration
#[derive(Debug, Clone, Copy)]
pub struct SceneSettings {
    pub frame_mode: FrameMode,
    pub camera_follow: bool,
    /// Divides the timestep while slow motion is held
    pub slow_motion_divisor: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            frame_mode: FrameMode::StaticPose,
            camera_follow: true,
            slow_motion_divisor: 8.0,
        }
    }
}

/// GPU textures the scene draws with
#[derive(Debug, Clone, Copy)]
pub struct SceneTextures {
    pub character: TextureHandle,
    pub map: TextureHandle,
}

pub struct Scene {
    character: Character,
    goal: Goal,
    textures: SceneTextures,
    /// Map surface size in pixels, drawn centered on the origin
    map_size: Vec2,
    camera: Vec2,
    settings: SceneSettings,
}

impl Scene {
    pub fn new(
        character_sheet: &SpriteSheet,
        textures: SceneTextures,
        map_size: Vec2,
        settings: SceneSettings,
    ) -> Result<Self, AssetError> {
        let character = Character::new(
            Vec2::ZERO,
            character_sheet,
            textures.character,
            settings.frame_mode,
        )?;

        Ok(Self {
            character,
            goal: Goal::new(GOAL_POSITION, GOAL_RADIUS, GOAL_STEP),
            textures,
            map_size,
            camera: Vec2::ZERO,
            settings,
        })
    }

    /// Advance one frame of `dt` wall-clock seconds
    ///
    /// The camera eases with the unscaled `dt`; everything else runs on the
    /// slowed timestep while slow motion is held. Returns the timestep used.
    pub fn update(&mut self, dt: f32, input: &InputManager) -> f32 {
        if self.settings.camera_follow {
            self.camera = follow_step(self.camera, self.character.position(), dt);
        }

        let dt = if input.is_pressed(Action::SlowMotion) {
            dt / self.settings.slow_motion_divisor
        } else {
            dt
        };

        if input.just_pressed(Action::Restart) {
            info!("Restarting level");
            self.character.restart();
        }

        self.character.update(dt, input.control_vector());
        self.goal.update(dt);
        dt
    }

    /// Submit one frame
    pub fn draw<T: DrawTarget + ?Sized>(&self, target: &mut T) {
        target.clear(CLEAR_COLOR);
        target.set_view(self.camera);
        target.draw_sprite(Sprite::with_texture(Vec2::ZERO, self.map_size, self.textures.map));
        for sprite in self.goal.sprites() {
            target.draw_sprite(sprite);
        }
        target.draw_sprite(self.character.sprite());
    }

    /// Use a rebuilt character sheet
    pub fn rebind_character(&mut self, sheet: &SpriteSheet) -> Result<(), AssetError> {
        self.character.rebind(sheet)
    }

    /// Use a rebuilt map surface of a possibly different size
    pub fn set_map_size(&mut self, map_size: Vec2) {
        self.map_size = map_size;
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn camera_position(&self) -> Vec2 {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::DescriptorRecord;
    use crate::game::characters::Direction;
    use anyhow::Result;
    use approx::assert_relative_eq;
    use image::RgbaImage;

    #[derive(Default)]
    struct RecordingTarget {
        clears: Vec<Vec4>,
        views: Vec<Vec2>,
        sprites: Vec<Sprite>,
        presented: usize,
    }

    impl DrawTarget for RecordingTarget {
        fn clear(&mut self, color: Vec4) {
            self.clears.push(color);
            self.sprites.clear();
        }

        fn set_view(&mut self, center: Vec2) {
            self.views.push(center);
        }

        fn draw_sprite(&mut self, sprite: Sprite) {
            self.sprites.push(sprite);
        }

        fn present(&mut self) -> Result<()> {
            self.presented += 1;
            Ok(())
        }
    }

    fn textures() -> SceneTextures {
        SceneTextures {
            character: TextureHandle::from_index(1),
            map: TextureHandle::from_index(2),
        }
    }

    fn scene(settings: SceneSettings) -> Scene {
        let mut sheet = SpriteSheet::from_image(RgbaImage::new(256, 256), 64).unwrap();
        for (row, name) in ["South", "East", "West", "North"].iter().enumerate() {
            sheet.bind(&DescriptorRecord::new(name, row, 0, 3)).unwrap();
        }
        Scene::new(&sheet, textures(), Vec2::new(320.0, 192.0), settings).unwrap()
    }

    #[test]
    fn test_arrow_keys_move_character() {
        let mut scene = scene(SceneSettings::default());
        let mut input = InputManager::default();
        input.press(Action::MoveRight);
        input.press(Action::MoveDown);

        scene.update(0.016, &input);
        scene.update(0.016, &input);

        assert_eq!(scene.character().position(), Vec2::new(2.0, -2.0));
        assert_eq!(scene.character().facing(), Direction::East);
    }

    #[test]
    fn test_slow_motion_scales_timestep() {
        let mut scene = scene(SceneSettings::default());
        let mut input = InputManager::default();

        assert_eq!(scene.update(0.08, &input), 0.08);

        input.press(Action::SlowMotion);
        assert_relative_eq!(scene.update(0.08, &input), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_restart_on_enter() {
        let mut scene = scene(SceneSettings::default());
        let mut input = InputManager::default();
        input.press(Action::MoveLeft);
        for _ in 0..5 {
            scene.update(0.016, &input);
        }
        input.release(Action::MoveLeft);
        input.end_frame();

        input.press(Action::Restart);
        scene.update(0.016, &input);

        assert_eq!(scene.character().position(), Vec2::ZERO);
        assert_eq!(scene.character().facing(), Direction::West);
    }

    #[test]
    fn test_camera_follows_character() {
        let mut scene = scene(SceneSettings::default());
        let mut input = InputManager::default();
        input.press(Action::MoveUp);
        scene.update(0.016, &input);
        scene.update(0.5, &input);

        let camera = scene.camera_position();
        assert!(camera.y > 0.0 && camera.y < scene.character().position().y);
    }

    #[test]
    fn test_camera_can_stay_put() {
        let settings = SceneSettings {
            camera_follow: false,
            ..SceneSettings::default()
        };
        let mut scene = scene(settings);
        let mut input = InputManager::default();
        input.press(Action::MoveUp);
        scene.update(0.016, &input);
        scene.update(0.5, &input);

        assert_eq!(scene.camera_position(), Vec2::ZERO);
    }

    #[test]
    fn test_draw_order() {
        let scene = scene(SceneSettings::default());
        let mut target = RecordingTarget::default();
        scene.draw(&mut target);
        target.present().unwrap();

        assert_eq!(target.clears, vec![CLEAR_COLOR]);
        assert_eq!(target.views, vec![Vec2::ZERO]);
        assert_eq!(target.presented, 1);

        // Map, five goal squares, then the character on top
        assert_eq!(target.sprites.len(), 7);
        assert_eq!(target.sprites[0].texture, Some(textures().map));
        assert_eq!(target.sprites[0].size, Vec2::new(320.0, 192.0));
        assert!(target.sprites[1..6].iter().all(|s| s.texture.is_none()));
        assert_eq!(target.sprites[6].texture, Some(textures().character));
        assert_eq!(target.sprites[6].size, Vec2::splat(64.0));
    }

    #[test]
    fn test_map_resize() {
        let mut scene = scene(SceneSettings::default());
        scene.set_map_size(Vec2::new(64.0, 64.0));

        let mut target = RecordingTarget::default();
        scene.draw(&mut target);
        assert_eq!(target.sprites[0].size, Vec2::new(64.0, 64.0));
    }
}
