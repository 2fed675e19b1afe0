// Decorative goal marker with a cycling ring of colors

use crate::engine::renderer::Sprite;
use glam::{Vec2, Vec3, Vec4};
use log::warn;

/// Number of colors in the ring
pub const RING_SIZE: usize = 5;

/// Resampling cap for a degenerate random color
const MAX_COLOR_ATTEMPTS: usize = 64;

/// Random RGB direction scaled to unit length, opaque
///
/// Components are uniform in `[0, 1)`, so a zero vector is possible in
/// principle; it is resampled, and after `MAX_COLOR_ATTEMPTS` misses white
/// is used instead.
pub fn random_nice_color(rng: &mut fastrand::Rng) -> Vec4 {
    for _ in 0..MAX_COLOR_ATTEMPTS {
        let rgb = Vec3::new(rng.f32(), rng.f32(), rng.f32());
        let length = rgb.length();
        if length > 0.0 {
            return (rgb / length).extend(1.0);
        }
    }
    warn!("No usable random color after {} attempts", MAX_COLOR_ATTEMPTS);
    Vec4::ONE
}

/// Nested squares whose colors shift outward every `step` seconds
#[derive(Debug)]
pub struct Goal {
    pub position: Vec2,
    pub radius: f32,
    step: f32,
    counter: f32,
    /// Newest color first
    colors: [Vec4; RING_SIZE],
    rng: fastrand::Rng,
}

impl Goal {
    pub fn new(position: Vec2, radius: f32, step: f32) -> Self {
        Self::with_rng(position, radius, step, fastrand::Rng::new())
    }

    pub fn with_rng(position: Vec2, radius: f32, step: f32, rng: fastrand::Rng) -> Self {
        Self {
            position,
            radius,
            step,
            counter: 0.0,
            // Transparent until the ring has been fed
            colors: [Vec4::ZERO; RING_SIZE],
            rng,
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.step <= 0.0 {
            return;
        }
        self.counter += dt;
        while self.counter > self.step {
            self.counter -= self.step;
            self.colors.rotate_right(1);
            self.colors[0] = random_nice_color(&mut self.rng);
        }
    }

    pub fn colors(&self) -> &[Vec4; RING_SIZE] {
        &self.colors
    }

    /// Outermost (oldest) square first, so newer colors paint on top
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        (0..RING_SIZE).rev().map(move |i| {
            let half = (i + 1) as f32 * self.radius / RING_SIZE as f32;
            Sprite::new(self.position, Vec2::splat(2.0 * half)).with_color(self.colors[i])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn goal() -> Goal {
        Goal::with_rng(Vec2::new(-75.0, 40.0), 18.0, 1.0 / 7.0, fastrand::Rng::with_seed(7))
    }

    #[test]
    fn test_random_color_is_unit_length() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..1000 {
            let color = random_nice_color(&mut rng);
            assert_relative_eq!(color.truncate().length(), 1.0, epsilon = 1e-5);
            assert_eq!(color.w, 1.0);
            assert!(color.truncate() != Vec3::ZERO);
        }
    }

    #[test]
    fn test_ring_starts_transparent() {
        assert!(goal().colors().iter().all(|c| *c == Vec4::ZERO));
    }

    #[test]
    fn test_no_shift_before_step() {
        let mut goal = goal();
        goal.update(0.1);
        assert_eq!(goal.colors()[0], Vec4::ZERO);
    }

    #[test]
    fn test_ring_shifts_outward() {
        let mut goal = goal();
        goal.update(0.15);
        let newest = goal.colors()[0];
        assert_ne!(newest, Vec4::ZERO);

        goal.update(0.15);
        assert_eq!(goal.colors()[1], newest);
        assert_ne!(goal.colors()[0], Vec4::ZERO);
        assert_eq!(goal.colors()[2], Vec4::ZERO);
    }

    #[test]
    fn test_long_frame_shifts_several_times() {
        let mut goal = goal();
        goal.update(1.0);
        assert!(goal.colors().iter().all(|c| *c != Vec4::ZERO));
    }

    #[test]
    fn test_sprites_nest_outermost_first() {
        let goal = goal();
        let sizes: Vec<f32> = goal.sprites().map(|s| s.size.x).collect();

        assert_eq!(sizes.len(), RING_SIZE);
        assert_relative_eq!(sizes[0], 36.0);
        assert_relative_eq!(sizes[4], 7.2, epsilon = 1e-5);
        assert!(sizes.windows(2).all(|w| w[0] > w[1]));
        assert!(goal.sprites().all(|s| s.position == Vec2::new(-75.0, 40.0)));
    }
}
