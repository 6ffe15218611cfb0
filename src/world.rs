use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::GridSize;
use crate::controller::SnakeController;
use crate::geometry::{Direction, Point};
use crate::snake::{Snake, SnakeId};
use crate::view::{View, WorldSnapshot};

/// Outcome of one [`WorldModel::update`] call.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TickReport {
    /// Tick number after the update.
    pub tick: u64,
    /// Snakes removed this tick, in population order.
    pub eliminated: Vec<SnakeId>,
}

/// Owns the live snakes, steps them, and removes the ones that collide.
///
/// Population order is insertion order and stays fixed, so collision checks
/// always run in the same order. Bounds are informational: nothing here
/// clamps or wraps positions.
pub struct WorldModel {
    snakes: Vec<Snake>,
    bounds: GridSize,
    tick: u64,
    next_id: u32,
    views: Vec<Box<dyn View>>,
}

impl WorldModel {
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self {
            snakes: Vec::new(),
            bounds,
            tick: 0,
            next_id: 0,
            views: Vec::new(),
        }
    }

    /// Adds a snake of `length` segments with its head at `head` and returns
    /// its identity.
    pub fn spawn_snake(&mut self, head: Point, length: usize, heading: Direction) -> SnakeId {
        let id = self.allocate_id();
        self.snakes.push(Snake::new(id, head, length, heading));
        debug!(%id, ?head, length, ?heading, "spawned snake");
        id
    }

    /// Adds a snake built from explicit segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    pub fn insert_snake(&mut self, segments: Vec<Point>, heading: Direction) -> SnakeId {
        let id = self.allocate_id();
        self.snakes.push(Snake::from_segments(id, segments, heading));
        id
    }

    fn allocate_id(&mut self) -> SnakeId {
        let id = SnakeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers a view to be rendered after every update.
    pub fn register_view(&mut self, view: Box<dyn View>) {
        self.views.push(view);
    }

    /// Advances the world by one tick.
    ///
    /// Collisions are judged on positions as of the start of the tick. Every
    /// snake whose head lies on another snake's body, or on its own trailing
    /// body, is removed before anything moves. The survivors then move
    /// `steps` cells and the views are rendered once.
    pub fn update(&mut self, steps: i32) -> TickReport {
        let marked = self.detect_collisions();

        let mut eliminated = Vec::with_capacity(marked.len());
        self.snakes.retain(|snake| {
            if marked.contains(&snake.id()) {
                eliminated.push(snake.id());
                false
            } else {
                true
            }
        });

        for snake in &mut self.snakes {
            snake.move_by(steps);
        }

        self.tick += 1;
        for id in &eliminated {
            info!(tick = self.tick, snake = %id, "snake eliminated");
        }

        self.render_views();

        TickReport {
            tick: self.tick,
            eliminated,
        }
    }

    fn detect_collisions(&self) -> HashSet<SnakeId> {
        let mut marked = HashSet::new();

        for snake in &self.snakes {
            if snake.collided_with_self() {
                marked.insert(snake.id());
            }

            for other in &self.snakes {
                if snake.collides_with_other(other) {
                    marked.insert(snake.id());
                }
            }
        }

        marked
    }

    /// Renders every registered view with the current state.
    pub fn render_views(&mut self) {
        let snapshot = WorldSnapshot {
            tick: self.tick,
            bounds: self.bounds,
            snakes: &self.snakes,
        };

        for view in &mut self.views {
            view.render(&snapshot);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            tick: self.tick,
            bounds: self.bounds,
            snakes: &self.snakes,
        }
    }

    /// Returns a steering handle for a live snake.
    pub fn controller(&mut self, id: SnakeId) -> Option<SnakeController<'_>> {
        let bounds = self.bounds;
        self.snakes
            .iter_mut()
            .find(|snake| snake.id() == id)
            .map(|snake| SnakeController::new(snake, bounds))
    }

    #[must_use]
    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.iter().find(|snake| snake.id() == id)
    }

    #[must_use]
    pub fn is_alive(&self, id: SnakeId) -> bool {
        self.snake(id).is_some()
    }

    /// Live snakes in population order.
    #[must_use]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.bounds.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.bounds.height
    }

    /// Number of updates performed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config::GridSize;
    use crate::geometry::{Direction, Point};
    use crate::snake::SnakeId;
    use crate::view::{View, WorldSnapshot};

    use super::WorldModel;

    const BOUNDS: GridSize = GridSize {
        width: 20,
        height: 20,
    };

    #[derive(Default)]
    struct RecordingView {
        frames: Rc<RefCell<Vec<(u64, Vec<Vec<Point>>)>>>,
    }

    impl View for RecordingView {
        fn render(&mut self, snapshot: &WorldSnapshot<'_>) {
            let bodies = snapshot
                .snakes
                .iter()
                .map(|snake| snake.segments().copied().collect())
                .collect();
            self.frames.borrow_mut().push((snapshot.tick, bodies));
        }
    }

    #[test]
    fn lone_single_segment_snake_survives_any_path() {
        let mut world = WorldModel::new(BOUNDS);
        let id = world.spawn_snake(Point::new(2, 2), 1, Direction::Right);

        for step in 0..30 {
            if step % 4 == 0 {
                if let Some(mut controller) = world.controller(id) {
                    controller.turn_left();
                }
            }
            let report = world.update(1);
            assert!(report.eliminated.is_empty());
        }

        assert!(world.is_alive(id));
        assert_eq!(world.tick(), 30);
    }

    #[test]
    fn update_moves_every_live_snake_once() {
        let mut world = WorldModel::new(BOUNDS);
        let a = world.spawn_snake(Point::new(5, 5), 3, Direction::Up);
        let b = world.spawn_snake(Point::new(10, 10), 2, Direction::Left);

        world.update(1);

        assert_eq!(world.snake(a).map(|s| s.head()), Some(Point::new(5, 4)));
        assert_eq!(world.snake(b).map(|s| s.head()), Some(Point::new(9, 10)));
    }

    #[test]
    fn head_on_body_is_eliminated_before_movement() {
        let mut world = WorldModel::new(BOUNDS);
        let biter = world.spawn_snake(Point::new(3, 2), 2, Direction::Right);
        let wall = world.spawn_snake(Point::new(3, 1), 3, Direction::Up);

        let report = world.update(1);

        assert_eq!(report.eliminated, vec![biter]);
        assert!(!world.is_alive(biter));
        let survivor = world.snake(wall).expect("bitten snake should survive");
        assert_eq!(survivor.len(), 3);
        assert_eq!(survivor.head(), Point::new(3, 0));
    }

    #[test]
    fn shared_head_cell_eliminates_both_snakes() {
        let mut world = WorldModel::new(BOUNDS);
        let a = world.spawn_snake(Point::new(4, 4), 2, Direction::Right);
        let b = world.spawn_snake(Point::new(4, 4), 2, Direction::Left);

        let report = world.update(1);

        assert_eq!(report.eliminated, vec![a, b]);
        assert!(world.snakes().is_empty());
    }

    #[test]
    fn multiple_matches_eliminate_a_snake_once() {
        let mut world = WorldModel::new(BOUNDS);
        let biter = world.insert_snake(
            vec![
                Point::new(2, 2),
                Point::new(3, 2),
                Point::new(3, 3),
                Point::new(2, 3),
                Point::new(2, 2),
            ],
            Direction::Up,
        );
        let _first = world.spawn_snake(Point::new(2, 1), 3, Direction::Up);
        let _second = world.spawn_snake(Point::new(1, 2), 2, Direction::Left);

        let report = world.update(1);

        assert_eq!(report.eliminated, vec![biter]);
        assert_eq!(world.snakes().len(), 2);
    }

    #[test]
    fn collision_is_not_predicted_from_next_position() {
        let mut world = WorldModel::new(BOUNDS);
        let a = world.spawn_snake(Point::new(2, 2), 1, Direction::Right);
        let b = world.insert_snake(vec![Point::new(3, 1), Point::new(3, 2)], Direction::Up);

        let first = world.update(1);

        assert!(first.eliminated.is_empty());
        assert_eq!(world.snake(a).map(|s| s.head()), Some(Point::new(3, 2)));
        assert!(world.is_alive(b));
    }

    #[test]
    fn overlap_after_move_is_judged_next_tick() {
        let mut world = WorldModel::new(BOUNDS);
        let a = world.spawn_snake(Point::new(2, 2), 1, Direction::Right);
        let b = world.insert_snake(
            vec![Point::new(3, 3), Point::new(3, 2), Point::new(3, 1)],
            Direction::Down,
        );

        assert!(world.update(1).eliminated.is_empty());
        // a now sits on (3, 2), which is b's segment after b moved down.
        let second = world.update(1);

        assert_eq!(second.eliminated, vec![a]);
        assert!(world.is_alive(b));
    }

    #[test]
    fn walls_are_not_enforced_by_the_world() {
        let mut world = WorldModel::new(GridSize {
            width: 3,
            height: 3,
        });
        let id = world.spawn_snake(Point::new(0, 1), 1, Direction::Left);

        world.update(1);
        world.update(1);

        assert_eq!(world.snake(id).map(|s| s.head()), Some(Point::new(-2, 1)));
    }

    #[test]
    fn views_see_post_move_state_once_per_tick() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let mut world = WorldModel::new(BOUNDS);
        world.register_view(Box::new(RecordingView {
            frames: Rc::clone(&frames),
        }));
        world.spawn_snake(Point::new(5, 5), 2, Direction::Down);

        world.update(1);
        world.update(1);

        let frames = frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], (1, vec![vec![Point::new(5, 6), Point::new(5, 5)]]));
        assert_eq!(frames[1], (2, vec![vec![Point::new(5, 7), Point::new(5, 6)]]));
    }

    #[test]
    fn controller_is_none_after_elimination() {
        let mut world = WorldModel::new(BOUNDS);
        let a = world.spawn_snake(Point::new(6, 6), 1, Direction::Up);
        let _b = world.spawn_snake(Point::new(6, 7), 3, Direction::Down);

        world.update(1);

        assert!(world.controller(a).is_none());
        assert!(world.controller(SnakeId(99)).is_none());
    }
}
