use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::{DEFAULT_SNAKE_LENGTH, GameConfig, PlayerKind};
use crate::error::ConfigError;
use crate::game_loop::GameLoop;
use crate::input::{KeyboardRouter, TurnFlags};
use crate::player::{AvoidWallsPlayer, HumanPlayer, Player};
use crate::snake::SnakeId;
use crate::spawn::random_placement;
use crate::world::WorldModel;

/// A ready-to-run game plus the keyboard routing for its human players.
pub struct Session {
    pub game: GameLoop,
    pub router: KeyboardRouter,
}

/// Builds the world described by `config`, then adds `bots` wall-avoiding
/// snakes at placements drawn from a `seed`ed RNG.
///
/// Bots that no longer fit on the board are skipped with a warning.
pub fn build_session(config: &GameConfig, bots: usize, seed: u64) -> Result<Session, ConfigError> {
    config.validate()?;

    let mut world = WorldModel::new(config.bounds());
    let mut router = KeyboardRouter::new();
    let mut players: Vec<(SnakeId, Box<dyn Player>)> = Vec::new();

    for spec in &config.snakes {
        let id = world.spawn_snake(spec.head, spec.length, spec.heading);
        let player: Box<dyn Player> = match spec.player {
            PlayerKind::Human { keys } => {
                let flags = TurnFlags::new();
                router.bind(keys, flags.clone());
                Box::new(HumanPlayer::new(flags))
            }
            PlayerKind::AvoidWalls => Box::new(AvoidWallsPlayer::new()),
        };
        players.push((id, player));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for bot in 0..bots {
        let Some((head, heading)) =
            random_placement(&mut rng, world.bounds(), world.snakes(), DEFAULT_SNAKE_LENGTH)
        else {
            warn!(requested = bots, placed = bot, "no room left for more bots");
            break;
        };

        let id = world.spawn_snake(head, DEFAULT_SNAKE_LENGTH, heading);
        let player: Box<dyn Player> = Box::new(AvoidWallsPlayer::new());
        players.push((id, player));
    }

    info!(
        width = config.width,
        height = config.height,
        snakes = world.snakes().len(),
        seed,
        "world ready"
    );

    let mut game = GameLoop::new(world, config.tick_interval());
    for (id, player) in players {
        game.add_player(id, player);
    }

    Ok(Session { game, router })
}
