// Directional character animation

use super::state::{Direction, FacingStateMachine};
use crate::engine::assets::{AssetError, Frame, SpriteSheet};
use log::debug;

/// How frames past the first one in a slice are used
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrameMode {
    /// Always show the first frame of the facing's slice
    #[default]
    StaticPose,
    /// Loop through the slice, `frame_duration` seconds per frame
    Cycle { frame_duration: f32 },
}

impl FrameMode {
    /// Cycle at `fps` frames per second; zero or less keeps a static pose
    pub fn from_frame_rate(fps: f32) -> Self {
        if fps > 0.0 {
            Self::Cycle {
                frame_duration: 1.0 / fps,
            }
        } else {
            Self::StaticPose
        }
    }
}

/// Picks the frame to draw from the character's facing
///
/// The four directional slices are looked up once, so a sheet missing one of
/// them fails at construction rather than mid-game.
#[derive(Debug)]
pub struct CharacterAnimator {
    slices: [Vec<Frame>; 4],
    mode: FrameMode,
    state: FacingStateMachine,
}

impl CharacterAnimator {
    pub fn new(sheet: &SpriteSheet, mode: FrameMode) -> Result<Self, AssetError> {
        Ok(Self {
            slices: resolve_slices(sheet)?,
            mode,
            state: FacingStateMachine::new(),
        })
    }

    /// Re-resolve the slices after the sheet changed; the state is kept
    pub fn rebind(&mut self, sheet: &SpriteSheet) -> Result<(), AssetError> {
        self.slices = resolve_slices(sheet)?;
        Ok(())
    }

    /// Advance the counter and follow `facing`
    pub fn update(&mut self, dt: f32, facing: Direction) {
        let from = self.state.state();
        if self.state.update(dt, facing) {
            debug!("Facing {:?} -> {:?}", from, facing);
        }
    }

    pub fn state(&self) -> Direction {
        self.state.state()
    }

    /// Seconds spent in the current state
    pub fn counter(&self) -> f32 {
        self.state.state_time()
    }

    /// Index into the current slice
    pub fn frame_index(&self) -> usize {
        let len = self.current_slice().len();
        match self.mode {
            FrameMode::StaticPose => 0,
            FrameMode::Cycle { frame_duration } if frame_duration > 0.0 && len > 0 => {
                (self.counter() / frame_duration) as usize % len
            }
            FrameMode::Cycle { .. } => 0,
        }
    }

    pub fn current_frame(&self) -> Frame {
        self.current_slice()[self.frame_index()]
    }

    fn current_slice(&self) -> &[Frame] {
        &self.slices[self.state.state().index()]
    }
}

fn resolve_slices(sheet: &SpriteSheet) -> Result<[Vec<Frame>; 4], AssetError> {
    let mut slices: [Vec<Frame>; 4] = Default::default();
    for direction in Direction::ALL {
        let frames = sheet.frames(direction.animation_name())?;
        if frames.is_empty() {
            return Err(AssetError::UnknownAnimation(
                direction.animation_name().to_string(),
            ));
        }
        slices[direction.index()] = frames.to_vec();
    }
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::DescriptorRecord;
    use image::RgbaImage;

    // 4 rows of 4 frames, one row per direction
    fn walking_sheet() -> SpriteSheet {
        let mut sheet = SpriteSheet::from_image(RgbaImage::new(256, 256), 64).unwrap();
        for (row, name) in ["North", "West", "South", "East"].iter().enumerate() {
            sheet
                .bind(&DescriptorRecord::new(name, row, 0, 3))
                .unwrap();
        }
        sheet
    }

    #[test]
    fn test_starts_facing_south() {
        let animator = CharacterAnimator::new(&walking_sheet(), FrameMode::StaticPose).unwrap();
        assert_eq!(animator.state(), Direction::South);
        assert_eq!(animator.counter(), 0.0);
        assert_eq!(animator.current_frame(), Frame::new(0, 128, 64, 64));
    }

    #[test]
    fn test_missing_direction_fails_early() {
        let mut sheet = SpriteSheet::from_image(RgbaImage::new(128, 128), 64).unwrap();
        sheet.bind(&DescriptorRecord::new("South", 0, 0, 1)).unwrap();

        let err = CharacterAnimator::new(&sheet, FrameMode::StaticPose).unwrap_err();
        assert!(matches!(err, AssetError::UnknownAnimation(_)));
    }

    #[test]
    fn test_switch_resets_counter() {
        let mut animator = CharacterAnimator::new(&walking_sheet(), FrameMode::StaticPose).unwrap();
        animator.update(0.5, Direction::South);
        assert_eq!(animator.counter(), 0.5);

        animator.update(0.5, Direction::East);
        assert_eq!(animator.state(), Direction::East);
        assert_eq!(animator.counter(), 0.0);
        assert_eq!(animator.current_frame(), Frame::new(0, 192, 64, 64));
    }

    #[test]
    fn test_static_pose_ignores_time() {
        let mut animator = CharacterAnimator::new(&walking_sheet(), FrameMode::StaticPose).unwrap();
        for _ in 0..100 {
            animator.update(0.1, Direction::North);
        }
        assert_eq!(animator.frame_index(), 0);
        assert_eq!(animator.current_frame(), Frame::new(0, 0, 64, 64));
    }

    #[test]
    fn test_cycle_loops_through_slice() {
        let mode = FrameMode::from_frame_rate(10.0);
        let mut animator = CharacterAnimator::new(&walking_sheet(), mode).unwrap();

        animator.update(0.25, Direction::South);
        assert_eq!(animator.frame_index(), 2);
        assert_eq!(animator.current_frame(), Frame::new(128, 128, 64, 64));

        animator.update(0.2, Direction::South);
        assert_eq!(animator.frame_index(), 0);
    }

    #[test]
    fn test_frame_rate_zero_is_static() {
        assert_eq!(FrameMode::from_frame_rate(0.0), FrameMode::StaticPose);
        assert_eq!(FrameMode::from_frame_rate(-3.0), FrameMode::StaticPose);
    }

    #[test]
    fn test_rebind_keeps_state() {
        let mut animator = CharacterAnimator::new(&walking_sheet(), FrameMode::StaticPose).unwrap();
        animator.update(0.1, Direction::West);

        let mut moved = SpriteSheet::from_image(RgbaImage::new(256, 256), 64).unwrap();
        for (row, name) in ["South", "East", "West", "North"].iter().enumerate() {
            moved.bind(&DescriptorRecord::new(name, row, 1, 1)).unwrap();
        }
        animator.rebind(&moved).unwrap();

        assert_eq!(animator.state(), Direction::West);
        assert_eq!(animator.current_frame(), Frame::new(64, 128, 64, 64));
    }
}
