use tracing::debug;

use crate::controller::SnakeController;
use crate::geometry::Direction;
use crate::input::{TurnFlags, TurnInput};

/// Decides, once per tick, whether to steer its snake.
pub trait Player {
    fn decide(&mut self, controller: &mut SnakeController<'_>);
}

/// Autonomous player reacting to the left wall.
///
/// When heading left at `x == 0` it turns left again, which points the snake
/// down along the wall. Nothing happens anywhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvoidWallsPlayer;

impl AvoidWallsPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Player for AvoidWallsPlayer {
    fn decide(&mut self, controller: &mut SnakeController<'_>) {
        let position = controller.position();
        let at_left_wall = controller.heading() == Direction::Left
            && position.x == 0
            && position.y < i32::from(controller.world_height());

        if at_left_wall {
            debug!(snake = %controller.snake_id(), ?position, "left wall reached, turning left");
            controller.turn_left();
        }
    }
}

/// Player steered by pending left/right requests.
///
/// At most one turn per tick; a pending left request wins over a right one
/// and only the consumed request is cleared.
#[derive(Debug, Clone)]
pub struct HumanPlayer<I = TurnFlags> {
    input: I,
}

impl<I: TurnInput> HumanPlayer<I> {
    pub fn new(input: I) -> Self {
        Self { input }
    }
}

impl<I: TurnInput> Player for HumanPlayer<I> {
    fn decide(&mut self, controller: &mut SnakeController<'_>) {
        if self.input.has_pending_left_turn() {
            controller.turn_left();
            self.input.clear_left_turn();
        } else if self.input.has_pending_right_turn() {
            controller.turn_right();
            self.input.clear_right_turn();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GridSize;
    use crate::geometry::{Direction, Point};
    use crate::input::{TurnFlags, TurnInput};
    use crate::world::WorldModel;

    use super::{AvoidWallsPlayer, HumanPlayer, Player};

    const BOUNDS: GridSize = GridSize {
        width: 10,
        height: 10,
    };

    fn decide_once(world: &mut WorldModel, player: &mut dyn Player) {
        let id = world.snakes()[0].id();
        let mut controller = world.controller(id).expect("snake should be alive");
        player.decide(&mut controller);
    }

    #[test]
    fn avoid_walls_turns_left_at_left_wall() {
        let mut world = WorldModel::new(BOUNDS);
        world.spawn_snake(Point::new(0, 4), 2, Direction::Left);

        decide_once(&mut world, &mut AvoidWallsPlayer::new());

        assert_eq!(world.snakes()[0].heading(), Direction::Down);
    }

    #[test]
    fn avoid_walls_ignores_other_positions_and_headings() {
        let cases = [
            (Point::new(1, 4), Direction::Left),
            (Point::new(0, 4), Direction::Up),
            (Point::new(9, 4), Direction::Right),
            (Point::new(0, 10), Direction::Left),
        ];

        for (head, heading) in cases {
            let mut world = WorldModel::new(BOUNDS);
            world.spawn_snake(head, 1, heading);

            decide_once(&mut world, &mut AvoidWallsPlayer::new());

            assert_eq!(world.snakes()[0].heading(), heading, "head at {head:?}");
        }
    }

    #[test]
    fn human_left_request_takes_precedence() {
        let flags = TurnFlags::new();
        flags.request_left();
        flags.request_right();
        let mut world = WorldModel::new(BOUNDS);
        world.spawn_snake(Point::new(5, 5), 1, Direction::Up);
        let mut player = HumanPlayer::new(flags.clone());

        decide_once(&mut world, &mut player);

        assert_eq!(world.snakes()[0].heading(), Direction::Left);
        assert!(!flags.has_pending_left_turn());
        assert!(flags.has_pending_right_turn());

        decide_once(&mut world, &mut player);

        assert_eq!(world.snakes()[0].heading(), Direction::Up);
        assert!(!flags.has_pending_right_turn());
    }

    #[test]
    fn human_without_requests_does_nothing() {
        let mut world = WorldModel::new(BOUNDS);
        world.spawn_snake(Point::new(5, 5), 1, Direction::Right);
        let mut player = HumanPlayer::new(TurnFlags::new());

        decide_once(&mut world, &mut player);

        assert_eq!(world.snakes()[0].heading(), Direction::Right);
    }
}
