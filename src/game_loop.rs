//! Fixed-cadence driver for the world.
//!
//! The host calls [`GameLoop::frame`] whenever it can offer a frame, passing
//! the time elapsed since the loop started. A tick fires only once the
//! tick clock is more than one interval behind, and the clock then advances
//! by exactly one interval, so slow frames never run more than one tick and
//! rounding never accumulates.

use std::time::Duration;

use tracing::{debug, info};

use crate::player::Player;
use crate::snake::SnakeId;
use crate::view::View;
use crate::world::{TickReport, WorldModel};

/// Decides when a tick is due, relative to its own clock.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickClock {
    interval: Duration,
    last_tick: Duration,
}

impl TickClock {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Duration::ZERO,
        }
    }

    /// Returns true when a tick should run at `now`, advancing the clock by
    /// one interval if so.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_tick) > self.interval {
            self.last_tick += self.interval;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Clock time of the most recent tick.
    #[must_use]
    pub fn last_tick(&self) -> Duration {
        self.last_tick
    }
}

/// Host capability that hands out frames.
///
/// Each call blocks until the next frame and returns the time elapsed since
/// the loop started, or `None` when the host wants to stop.
pub trait FrameScheduler {
    fn next_frame(&mut self) -> Option<Duration>;
}

/// Scheduler producing frames at a fixed step until a time limit.
///
/// Used for headless runs and tests; nothing sleeps.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepFrames {
    step: Duration,
    now: Duration,
    until: Duration,
}

impl FixedStepFrames {
    #[must_use]
    pub fn new(step: Duration, until: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            until,
        }
    }
}

impl FrameScheduler for FixedStepFrames {
    fn next_frame(&mut self) -> Option<Duration> {
        if self.step.is_zero() {
            return None;
        }

        let next = self.now + self.step;
        if next > self.until {
            return None;
        }

        self.now = next;
        Some(next)
    }
}

struct Seat {
    snake: SnakeId,
    player: Box<dyn Player>,
}

/// Owns the world and its players and runs ticks on a [`TickClock`].
pub struct GameLoop {
    world: WorldModel,
    seats: Vec<Seat>,
    clock: TickClock,
}

impl GameLoop {
    #[must_use]
    pub fn new(world: WorldModel, tick_interval: Duration) -> Self {
        Self {
            world,
            seats: Vec::new(),
            clock: TickClock::new(tick_interval),
        }
    }

    /// Binds `player` to the snake `snake`.
    ///
    /// Players bound to a snake that is not alive are dropped at the next
    /// tick without ever deciding.
    pub fn add_player(&mut self, snake: SnakeId, player: Box<dyn Player>) {
        self.seats.push(Seat { snake, player });
    }

    /// Registers a view on the owned world.
    pub fn register_view(&mut self, view: Box<dyn View>) {
        self.world.register_view(view);
    }

    /// Handles one host frame. Runs a tick when one is due.
    pub fn frame(&mut self, now: Duration) -> Option<TickReport> {
        if self.clock.poll(now) {
            Some(self.tick())
        } else {
            None
        }
    }

    /// Runs one tick unconditionally: every player decides, then the world
    /// updates by one cell.
    pub fn tick(&mut self) -> TickReport {
        for seat in &mut self.seats {
            if let Some(mut controller) = self.world.controller(seat.snake) {
                seat.player.decide(&mut controller);
            }
        }

        let report = self.world.update(1);

        let world = &self.world;
        self.seats.retain(|seat| {
            let alive = world.is_alive(seat.snake);
            if !alive {
                debug!(snake = %seat.snake, "releasing player of eliminated snake");
            }
            alive
        });

        report
    }

    /// Feeds frames from `scheduler` until it stops. Returns the number of
    /// ticks run.
    pub fn run<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> u64 {
        let start_tick = self.world.tick();
        info!(
            snakes = self.world.snakes().len(),
            players = self.seats.len(),
            interval_ms = self.clock.interval().as_millis(),
            "game loop started"
        );

        while let Some(now) = scheduler.next_frame() {
            let _ = self.frame(now);
        }

        let ticks = self.world.tick() - start_tick;
        info!(
            ticks,
            survivors = self.world.snakes().len(),
            "game loop stopped"
        );
        ticks
    }

    #[must_use]
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Number of players still bound to a live snake.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }
}
