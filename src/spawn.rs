use rand::Rng;

use crate::config::GridSize;
use crate::geometry::{Direction, Point};
use crate::snake::Snake;

/// Picks a head cell and heading for a new snake of `length` segments.
///
/// Every segment of the placed snake lies inside `bounds` and off all
/// `occupied` snakes, and the cell in front of the head is free too.
/// Returns `None` when no such placement exists.
#[must_use]
pub fn random_placement<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    occupied: &[Snake],
    length: usize,
) -> Option<(Point, Direction)> {
    let mut candidates = Vec::with_capacity(bounds.total_cells());

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let head = Point::new(x, y);
            for heading in Direction::ALL {
                if placement_is_free(head, heading, length, bounds, occupied) {
                    candidates.push((head, heading));
                }
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

fn placement_is_free(
    head: Point,
    heading: Direction,
    length: usize,
    bounds: GridSize,
    occupied: &[Snake],
) -> bool {
    let trailing = heading.opposite();
    let ahead = head.stepped(heading, 1);

    std::iter::once(ahead)
        .chain((0..length.max(1)).map(|offset| {
            head.stepped(trailing, i32::try_from(offset).unwrap_or(i32::MAX))
        }))
        .all(|cell| {
            cell.is_within_bounds(bounds) && !occupied.iter().any(|snake| snake.occupies(cell))
        })
}
