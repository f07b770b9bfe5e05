use glam::Vec2;
use serde::Deserialize;
use strum_macros::{AsRefStr, EnumIter};

/// The four cardinal facing directions.
///
/// Screen coordinates are used throughout: `+Y` points down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four cardinal directions.
    /// This is just a convenience constant for iterating over the directions.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the lowercase name used in asset keys.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the direction as a unit vector.
    pub fn as_vec2(self) -> Vec2 {
        self.into()
    }

    /// Picks the facing for a movement vector.
    ///
    /// Vertical movement wins only when it strictly dominates, so pure diagonals
    /// face left or right. Returns `None` for the zero vector.
    pub fn from_vector(vector: Vec2) -> Option<Direction> {
        if vector.y.abs() > vector.x.abs() {
            if vector.y < 0.0 {
                Some(Direction::Up)
            } else {
                Some(Direction::Down)
            }
        } else if vector.x < 0.0 {
            Some(Direction::Left)
        } else if vector.x > 0.0 {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

impl From<Direction> for Vec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}
