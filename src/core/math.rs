// Math utilities and helper functions

use glam::Vec2;

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two points
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Check if two f32 values are approximately equal
#[allow(dead_code)]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Axis-aligned rectangle in world space (Y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[cfg(test)]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Same rectangle shifted by `delta`
    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_lerp_vec2() {
        let p = lerp_vec2(Vec2::ZERO, Vec2::new(4.0, -8.0), 0.25);
        assert_eq!(p, Vec2::new(1.0, -2.0));
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }

    #[test]
    fn test_rect_center_and_size() {
        let rect = Rect::centered(Vec2::new(8.0, -4.0), Vec2::new(64.0, 32.0));
        assert_eq!(rect.min, Vec2::new(-24.0, -20.0));
        assert_eq!(rect.max, Vec2::new(40.0, 12.0));
        assert_eq!(rect.center(), Vec2::new(8.0, -4.0));
        assert_eq!(rect.size(), Vec2::new(64.0, 32.0));
    }

    #[test]
    fn test_rect_translate_keeps_size() {
        let rect = Rect::centered(Vec2::ZERO, Vec2::splat(64.0));
        let moved = rect.translate(Vec2::new(1.0, -1.0));
        assert_eq!(moved.center(), Vec2::new(1.0, -1.0));
        assert_eq!(moved.size(), rect.size());
    }
}
