use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::{Direction, Point};
use crate::input::KeyScheme;

const APP_DIR_NAME: &str = "snake-world";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the middle cell, rounded toward the origin.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }
}

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default grid height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 20;

/// Time that must elapse between two simulation ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

/// Segment count of snakes created without an explicit length.
pub const DEFAULT_SNAKE_LENGTH: usize = 4;

/// How often the terminal host offers a frame to the loop.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Largest accepted absolute value of a configured head coordinate.
pub const MAX_HEAD_COORDINATE: i32 = i32::MAX / 2;

/// Largest accepted segment count of a configured snake.
pub const MAX_SNAKE_LENGTH: usize = u16::MAX as usize;

/// Colors used by the terminal view.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    /// Body colors, cycled per snake in population order.
    pub snake_bodies: &'static [Color],
    pub play_bg: Color,
    pub border_fg: Color,
    pub status_fg: Color,
}

pub const THEME: Theme = Theme {
    snake_head: Color::White,
    snake_bodies: &[
        Color::Blue,
        Color::Green,
        Color::Magenta,
        Color::Yellow,
        Color::Cyan,
    ],
    play_bg: Color::Black,
    border_fg: Color::White,
    status_fg: Color::DarkGray,
};

pub const GLYPH_SNAKE_BODY: &str = "o";
pub const GLYPH_SNAKE_HEAD_UP: &str = "^";
pub const GLYPH_SNAKE_HEAD_DOWN: &str = "v";
pub const GLYPH_SNAKE_HEAD_LEFT: &str = "<";
pub const GLYPH_SNAKE_HEAD_RIGHT: &str = ">";

/// Which strategy drives a configured snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerKind {
    Human {
        #[serde(default)]
        keys: KeyScheme,
    },
    AvoidWalls,
}

/// Starting placement and controller of one snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct SnakeSpec {
    pub head: Point,
    pub heading: Direction,
    #[serde(default = "default_snake_length")]
    pub length: usize,
    pub player: PlayerKind,
}

fn default_snake_length() -> usize {
    DEFAULT_SNAKE_LENGTH
}

/// Complete game setup, loadable from JSON.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub tick_interval_ms: u64,
    pub snakes: Vec<SnakeSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let bounds = GridSize {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        };

        Self {
            width: bounds.width,
            height: bounds.height,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            snakes: vec![SnakeSpec {
                head: bounds.center(),
                heading: Direction::Up,
                length: DEFAULT_SNAKE_LENGTH,
                player: PlayerKind::Human {
                    keys: KeyScheme::Arrows,
                },
            }],
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn bounds(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Rejects configurations the loop cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be positive".to_owned(),
            ));
        }

        let mut schemes = HashSet::new();
        for (index, snake) in self.snakes.iter().enumerate() {
            if snake.length == 0 || snake.length > MAX_SNAKE_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "snake {index} length must be in 1..={MAX_SNAKE_LENGTH}, got {}",
                    snake.length
                )));
            }

            let head = snake.head;
            if head.x.unsigned_abs() > MAX_HEAD_COORDINATE.unsigned_abs()
                || head.y.unsigned_abs() > MAX_HEAD_COORDINATE.unsigned_abs()
            {
                return Err(ConfigError::Invalid(format!(
                    "snake {index} head ({}, {}) is outside ±{MAX_HEAD_COORDINATE}",
                    head.x, head.y
                )));
            }

            if let PlayerKind::Human { keys } = snake.player {
                if !schemes.insert(keys) {
                    return Err(ConfigError::Invalid(format!(
                        "key scheme {keys:?} is bound to more than one human player"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads the game configuration.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and built-in defaults are used when nothing is there.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig, ConfigError> {
    match path {
        Some(path) => load_config_from_path(path),
        None => load_config_or_default(&default_config_path()),
    }
}

/// Loads `path`, falling back to built-in defaults when the file is absent.
fn load_config_or_default(path: &Path) -> Result<GameConfig, ConfigError> {
    match load_config_from_path(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(GameConfig::default())
        }
        other => other,
    }
}

fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: GameConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    Ok(config)
}
