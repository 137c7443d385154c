//! Toroidal snake game engine: movement rules, a session state machine with
//! themed world progression, and an optional autopilot that plays by
//! pathfinding.
//!
//! The crate has no rendering or input surface of its own.  A host drives
//! [`Game::step()`] on whatever cadence it likes, feeds it [`Game::turn()`]
//! commands, and reads the exposed state back out each frame:
//!
//! ```
//! use wyrm::{Direction, Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default())?;
//! game.turn(Direction::Down);
//! game.step();
//! assert!(game.is_running());
//! # Ok::<(), wyrm::GameError>(())
//! ```
//!
//! The grid is a torus — moving off one edge reappears on the opposite edge
//! — and both the collision rules and the autopilot in [`agent`] rely on
//! that.
pub mod agent;
pub mod config;
mod consts;
pub mod game;
pub mod rules;

pub use crate::agent::PathfindingAgent;
pub use crate::config::{ConfigError, GameConfig};
pub use crate::game::{
    world_at, Direction, Food, Game, GameError, Position, Snake, Theme, World, WORLDS,
};
