use std::collections::VecDeque;
use std::fmt;

use crate::geometry::{Direction, Point};

/// Stable identity of a snake within one world.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SnakeId(pub u32);

impl fmt::Display for SnakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snake#{}", self.0)
    }
}

/// Fixed-length snake body with a heading.
///
/// The segment count never changes after construction: every move shifts the
/// body one slot toward the tail and discards the old tail.
#[derive(Debug, Clone)]
pub struct Snake {
    id: SnakeId,
    body: VecDeque<Point>,
    heading: Direction,
}

impl Snake {
    /// Creates a snake whose head is at `head`, with the remaining segments
    /// laid out behind it (opposite to `heading`).
    ///
    /// A `length` of zero is treated as one.
    #[must_use]
    pub fn new(id: SnakeId, head: Point, length: usize, heading: Direction) -> Self {
        let trailing = heading.opposite();
        let body = (0..length.max(1))
            .map(|offset| head.stepped(trailing, i32::try_from(offset).unwrap_or(i32::MAX)))
            .collect();

        Self { id, body, heading }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(id: SnakeId, segments: Vec<Point>, heading: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            id,
            body: VecDeque::from(segments),
            heading,
        }
    }

    /// Shifts every segment into its predecessor's slot and steps the head
    /// `distance` cells along the current heading.
    pub fn move_by(&mut self, distance: i32) {
        let next_head = self.head().stepped(self.heading, distance);
        let _ = self.body.pop_back();
        self.body.push_front(next_head);
    }

    /// Rotates the heading counter-clockwise. Applies from the next move.
    pub fn turn_left(&mut self) {
        self.heading = self.heading.turn_left();
    }

    /// Rotates the heading clockwise. Applies from the next move.
    pub fn turn_right(&mut self) {
        self.heading = self.heading.turn_right();
    }

    #[must_use]
    pub fn id(&self) -> SnakeId {
        self.id
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Point {
        // `body` is non-empty from construction on and moves keep its length.
        self.body[0]
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Point) -> bool {
        self.body.contains(&position)
    }

    /// Returns true when this snake's head sits on any segment of `other`.
    ///
    /// Always false when `other` is this same snake; use
    /// [`Snake::collided_with_self`] for self-bites.
    #[must_use]
    pub fn collides_with_other(&self, other: &Snake) -> bool {
        self.id != other.id && other.occupies(self.head())
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn collided_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }
}
