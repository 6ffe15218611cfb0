use crate::config::GridSize;
use crate::geometry::{Direction, Point};
use crate::snake::{Snake, SnakeId};

/// Steering handle a player gets for its own snake during one decision.
///
/// Only the two turn commands mutate anything; position, heading, and world
/// bounds are read-only. Obtained from [`crate::world::WorldModel::controller`].
#[derive(Debug)]
pub struct SnakeController<'a> {
    snake: &'a mut Snake,
    bounds: GridSize,
}

impl<'a> SnakeController<'a> {
    pub(crate) fn new(snake: &'a mut Snake, bounds: GridSize) -> Self {
        Self { snake, bounds }
    }

    pub fn turn_left(&mut self) {
        self.snake.turn_left();
    }

    pub fn turn_right(&mut self) {
        self.snake.turn_right();
    }

    #[must_use]
    pub fn snake_id(&self) -> SnakeId {
        self.snake.id()
    }

    /// Head position of the bound snake.
    #[must_use]
    pub fn position(&self) -> Point {
        self.snake.head()
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.snake.heading()
    }

    #[must_use]
    pub fn world_width(&self) -> u16 {
        self.bounds.width
    }

    #[must_use]
    pub fn world_height(&self) -> u16 {
        self.bounds.height
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::geometry::{Direction, Point};
    use crate::snake::{Snake, SnakeId};

    use super::SnakeController;

    #[test]
    fn controller_reports_snake_and_world_state() {
        let mut snake = Snake::new(SnakeId(3), Point::new(4, 2), 2, Direction::Down);
        let controller = SnakeController::new(
            &mut snake,
            GridSize {
                width: 12,
                height: 7,
            },
        );

        assert_eq!(controller.snake_id(), SnakeId(3));
        assert_eq!(controller.position(), Point::new(4, 2));
        assert_eq!(controller.heading(), Direction::Down);
        assert_eq!(controller.world_width(), 12);
        assert_eq!(controller.world_height(), 7);
    }

    #[test]
    fn controller_turns_delegate_to_snake() {
        let mut snake = Snake::new(SnakeId(0), Point::new(4, 2), 2, Direction::Up);
        let bounds = GridSize {
            width: 12,
            height: 7,
        };

        SnakeController::new(&mut snake, bounds).turn_left();
        assert_eq!(snake.heading(), Direction::Left);

        let mut controller = SnakeController::new(&mut snake, bounds);
        controller.turn_right();
        controller.turn_right();
        assert_eq!(controller.heading(), Direction::Right);
    }
}
