// Facing direction state machine

use glam::Vec2;

/// Which way the character is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    South,
    East,
    West,
    North,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::North,
    ];

    /// Facing implied by a velocity, if any
    ///
    /// The horizontal axis takes precedence: any `x` movement decides East or
    /// West before `y` is looked at. Zero velocity implies nothing.
    pub fn from_velocity(velocity: Vec2) -> Option<Self> {
        if velocity.x > 0.0 {
            Some(Self::East)
        } else if velocity.x < 0.0 {
            Some(Self::West)
        } else if velocity.y < 0.0 {
            Some(Self::South)
        } else if velocity.y > 0.0 {
            Some(Self::North)
        } else {
            None
        }
    }

    /// Name of the descriptor entry holding this direction's frames
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::North => "North",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::South => 0,
            Self::East => 1,
            Self::West => 2,
            Self::North => 3,
        }
    }
}

/// Current facing plus the time spent in it
#[derive(Debug, Default)]
pub struct FacingStateMachine {
    current: Direction,
    previous: Direction,
    state_time: f32,
}

impl FacingStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Direction {
        self.current
    }

    pub fn previous_state(&self) -> Direction {
        self.previous
    }

    /// Seconds since the last switch
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Advance the clock, then switch to `desired` if it differs
    ///
    /// Returns true when the state changed; the clock is then exactly zero.
    pub fn update(&mut self, dt: f32, desired: Direction) -> bool {
        self.state_time += dt;
        self.transition(desired)
    }

    pub fn transition(&mut self, new_state: Direction) -> bool {
        if self.current == new_state {
            return false;
        }
        self.previous = self.current;
        self.current = new_state;
        self.state_time = 0.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = FacingStateMachine::new();
        assert_eq!(sm.state(), Direction::South);
        assert_eq!(sm.state_time(), 0.0);
    }

    #[test]
    fn test_direction_precedence() {
        assert_eq!(Direction::from_velocity(Vec2::new(1.0, 1.0)), Some(Direction::East));
        assert_eq!(Direction::from_velocity(Vec2::new(-1.0, 1.0)), Some(Direction::West));
        assert_eq!(Direction::from_velocity(Vec2::new(1.0, -1.0)), Some(Direction::East));
        assert_eq!(Direction::from_velocity(Vec2::new(0.0, -1.0)), Some(Direction::South));
        assert_eq!(Direction::from_velocity(Vec2::new(0.0, 1.0)), Some(Direction::North));
        assert_eq!(Direction::from_velocity(Vec2::ZERO), None);
    }

    #[test]
    fn test_switch_resets_clock() {
        let mut sm = FacingStateMachine::new();
        assert!(!sm.update(0.5, Direction::South));
        assert_eq!(sm.state_time(), 0.5);

        assert!(sm.update(0.25, Direction::East));
        assert_eq!(sm.state(), Direction::East);
        assert_eq!(sm.previous_state(), Direction::South);
        assert_eq!(sm.state_time(), 0.0);
    }

    #[test]
    fn test_clock_grows_while_unchanged() {
        let mut sm = FacingStateMachine::new();
        sm.update(0.1, Direction::West);
        let mut last = sm.state_time();
        for _ in 0..5 {
            sm.update(0.1, Direction::West);
            assert!(sm.state_time() > last);
            last = sm.state_time();
        }
    }

    #[test]
    fn test_animation_names() {
        let names: Vec<&str> = Direction::ALL.iter().map(|d| d.animation_name()).collect();
        assert_eq!(names, vec!["South", "East", "West", "North"]);
    }

    #[test]
    fn test_indices_are_distinct() {
        for (i, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), i);
        }
    }
}
