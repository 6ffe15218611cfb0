use serde::{Deserialize, Serialize};

use crate::config::GridSize;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the point lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the point `distance` cells away along `direction`.
    ///
    /// Screen coordinates: `Up` decreases `y`, `Down` increases it.
    /// Coordinates saturate at the `i32` range, so a head pinned there
    /// lands on its own body and is eliminated as a self-bite.
    #[must_use]
    pub fn stepped(self, direction: Direction, distance: i32) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y.saturating_sub(distance)),
            Direction::Down => Self::new(self.x, self.y.saturating_add(distance)),
            Direction::Left => Self::new(self.x.saturating_sub(distance), self.y),
            Direction::Right => Self::new(self.x.saturating_add(distance), self.y),
        }
    }
}

/// Four-way heading of a snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All headings in clockwise order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Rotates one step counter-clockwise: up, left, down, right, up.
    #[must_use]
    pub fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Rotates one step clockwise: up, right, down, left, up.
    #[must_use]
    pub fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}
