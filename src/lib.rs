pub mod config;
pub mod controller;
pub mod error;
pub mod game_loop;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod player;
pub mod renderer;
pub mod setup;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod view;
pub mod world;
