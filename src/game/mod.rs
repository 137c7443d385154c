//! The game session state machine and its supporting types.
mod direction;
mod position;
mod snake;
mod worlds;
pub use self::direction::Direction;
pub use self::position::Position;
pub use self::snake::Snake;
pub use self::worlds::{world_at, Theme, World, WORLDS};
use self::worlds::WorldPath;
use crate::config::GameConfig;
use crate::consts;
use crate::rules;
use log::debug;
use rand::{seq::IteratorRandom, Rng};
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;

/// The food: a single cell plus the glyph to draw there.  Placed only on
/// cells the snake does not occupy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
    pub glyph: char,
}

/// A snake game session on a toroidal grid.
///
/// The session is a synchronous state machine: the host calls [`step()`]
/// once per tick on its own cadence, [`turn()`] whenever input arrives
/// between ticks, and reads state back out through the accessors.  A fatal
/// collision flips the session into game over, which is terminal until
/// [`reset()`] is called.
///
/// The RNG driving food placement and glyph draws is a type parameter so
/// tests can substitute a seeded one.
///
/// [`step()`]: Game::step
/// [`turn()`]: Game::turn
/// [`reset()`]: Game::reset
#[derive(Clone, Debug, PartialEq)]
pub struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    config: GameConfig,
    width: u16,
    height: u16,
    snake: Snake,
    food: Food,
    worlds: WorldPath,
    current_world: usize,
    symbols_consumed: u32,
    symbols_in_world: u32,
    interval: Duration,
    game_over: bool,
    paused: bool,
}

impl Game {
    /// Start a game on the configured default grid with a thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either configured grid dimension is zero.
    pub fn new(config: GameConfig) -> Result<Game, GameError> {
        let (width, height) = (config.grid_width, config.grid_height);
        Game::with_size(config, width, height)
    }

    /// Start a game on an explicitly-sized grid with a thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either dimension is zero.
    pub fn with_size(config: GameConfig, width: u16, height: u16) -> Result<Game, GameError> {
        Game::with_size_and_rng(config, width, height, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    /// Start a game on an explicitly-sized grid, drawing randomness from
    /// `rng`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if either dimension is zero.
    pub fn with_size_and_rng(
        config: GameConfig,
        width: u16,
        height: u16,
        rng: R,
    ) -> Result<Game<R>, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        let mut game = Game {
            rng,
            width,
            height,
            snake: Snake::new(Position::new(width / 2, height / 2), Direction::Right),
            food: Food {
                position: Position::default(),
                glyph: ' ',
            },
            worlds: WorldPath::new(),
            current_world: 0,
            symbols_consumed: 0,
            symbols_in_world: 0,
            interval: config.initial_interval,
            game_over: false,
            paused: false,
            config,
        };
        game.reset();
        Ok(game)
    }

    /// Reset to the initial state: a single-segment snake at the grid
    /// center facing right, counters zeroed, speed restored, flags cleared,
    /// fresh food.  Always succeeds.
    pub fn reset(&mut self) {
        let center = Position::new(self.width / 2, self.height / 2);
        self.snake = Snake::new(center, Direction::Right);
        self.current_world = 0;
        self.symbols_consumed = 0;
        self.symbols_in_world = 0;
        self.interval = self.config.initial_interval;
        self.game_over = false;
        self.paused = false;
        self.place_food();
    }

    /// Move the food to a uniformly random free cell and draw its glyph
    /// from the current world's bag.
    ///
    /// Placement samples random cells a bounded number of times and then
    /// falls back to choosing directly from the free-cell set, so it
    /// terminates even on a nearly-full grid.  If the snake covers every
    /// cell the food is left where it is; the session is already
    /// unwinnable at that point.
    pub fn place_food(&mut self) {
        let Some(position) = self.sample_free_cell() else {
            return;
        };
        self.food = Food {
            position,
            glyph: self.worlds.draw_glyph(self.current_world, &mut self.rng),
        };
    }

    fn sample_free_cell(&mut self) -> Option<Position> {
        for _ in 0..consts::FOOD_SAMPLE_ATTEMPTS {
            let pos = Position::new(
                self.rng.random_range(0..self.width),
                self.rng.random_range(0..self.height),
            );
            if !rules::collides_with_body(pos, self.snake.segments().iter().copied()) {
                return Some(pos);
            }
        }
        debug!(
            "food placement used up {} samples; scanning for free cells instead",
            consts::FOOD_SAMPLE_ATTEMPTS
        );
        let (width, height) = (self.width, self.height);
        let snake = &self.snake;
        let rng = &mut self.rng;
        (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|&pos| !rules::collides_with_body(pos, snake.segments().iter().copied()))
            .choose(rng)
    }

    /// Advance the game one tick: move the head, settle collisions, handle
    /// food and world progression.  Does nothing while paused or after game
    /// over.
    pub fn step(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        let new_head = rules::next_position(
            self.snake.head(),
            self.snake.direction(),
            self.width,
            self.height,
        );
        let grows = rules::collides_with_food(new_head, self.food.position);
        // A non-growing move vacates the tail cell this tick, so the tail
        // is not an obstacle; a growing move keeps the tail in place.
        let hit = {
            let segments = self.snake.segments();
            let obstacles = if grows {
                segments.len()
            } else {
                segments.len() - 1
            };
            rules::collides_with_body(new_head, segments.iter().take(obstacles).copied())
        };
        if hit {
            debug!("snake ran into itself at {new_head}");
            self.game_over = true;
            return;
        }
        self.snake.advance(new_head);
        if grows {
            self.symbols_consumed += 1;
            self.symbols_in_world += 1;
            self.check_world_transition();
            self.place_food();
        } else {
            self.snake.drop_tail();
        }
    }

    fn check_world_transition(&mut self) {
        if self.symbols_in_world >= self.config.symbols_per_world {
            self.current_world = (self.current_world + 1) % WORLDS.len();
            self.symbols_in_world = 0;
            debug!(
                "entering world {}: {}",
                self.current_world,
                self.world().name
            );
        }
    }

    /// Move the food to `position`, drawing a fresh glyph from the current
    /// world unless one is supplied.  Intended for tests and scripted
    /// scenarios.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `position` is outside the grid; the food is left
    /// untouched.
    pub fn set_food(&mut self, position: Position, glyph: Option<char>) -> Result<(), GameError> {
        self.ensure_in_bounds(position)?;
        let glyph = match glyph {
            Some(glyph) => glyph,
            None => self.worlds.draw_glyph(self.current_world, &mut self.rng),
        };
        self.food = Food { position, glyph };
        Ok(())
    }
}

impl<R> Game<R> {
    /// Point the snake in `direction` starting with the next step.
    /// Reversing straight into the body is silently ignored, as is any
    /// turn after game over.
    pub fn turn(&mut self, direction: Direction) {
        if rules::is_valid_turn(self.snake.direction(), direction) {
            self.snake.set_direction(direction);
        }
    }

    /// Rescale the level to `new_width` × `new_height`, keeping the snake
    /// and food proportionally placed.  Degenerate (zero) dimensions are
    /// ignored.
    ///
    /// Segments may transiently share a cell after a drastic shrink; the
    /// next step's collision check settles it.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == 0 || new_height == 0 {
            return;
        }
        let (old_width, old_height) = (self.width, self.height);
        let segments = self
            .snake
            .segments()
            .iter()
            .map(|&pos| rules::scale(pos, old_width, old_height, new_width, new_height))
            .collect::<VecDeque<_>>();
        self.snake.set_segments(segments);
        self.food.position = rules::scale(
            self.food.position,
            old_width,
            old_height,
            new_width,
            new_height,
        );
        self.width = new_width;
        self.height = new_height;
    }

    /// Overwrite the snake's cells, head first.  Intended for tests and
    /// scripted scenarios; the travel direction is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `segments` is empty or any cell is outside the
    /// grid; the snake is left untouched.
    pub fn set_snake(&mut self, segments: Vec<Position>) -> Result<(), GameError> {
        if segments.is_empty() {
            return Err(GameError::EmptySnake);
        }
        for &pos in &segments {
            self.ensure_in_bounds(pos)?;
        }
        self.snake.set_segments(segments.into());
        Ok(())
    }

    /// Stop stepping until [`resume()`](Game::resume).  Ignored after game
    /// over.
    pub fn pause(&mut self) {
        if !self.game_over {
            self.paused = true;
        }
    }

    /// Undo a [`pause()`](Game::pause).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Store the host's current step interval.  The engine never schedules
    /// itself; this only feeds [`moves_per_second()`](Game::moves_per_second)
    /// reporting.  A zero interval is ignored.
    pub fn set_interval(&mut self, interval: Duration) {
        if !interval.is_zero() {
            self.interval = interval;
        }
    }

    /// The current speed, as moves per second.
    pub fn moves_per_second(&self) -> f64 {
        1.0 / self.interval.as_secs_f64()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Food {
        self.food
    }

    /// The world the session is currently in.
    pub fn world(&self) -> &'static World {
        world_at(self.current_world)
    }

    /// Index of the current world within [`WORLDS`].
    pub fn world_index(&self) -> usize {
        self.current_world
    }

    pub fn world_name(&self) -> &'static str {
        self.world().name
    }

    pub fn world_description(&self) -> &'static str {
        self.world().description
    }

    /// Symbols eaten over the whole session.
    pub fn symbols_consumed(&self) -> u32 {
        self.symbols_consumed
    }

    /// Symbols eaten since entering the current world.
    pub fn symbols_in_world(&self) -> u32 {
        self.symbols_in_world
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Neither game over nor paused.
    pub fn is_running(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn ensure_in_bounds(&self, pos: Position) -> Result<(), GameError> {
        if pos.x < self.width && pos.y < self.height {
            Ok(())
        } else {
            Err(GameError::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Error returned when constructing or scripting a session with invalid
/// input.  Invalid *runtime* commands (reversing turns, stepping after game
/// over) are silently ignored instead.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("invalid grid dimensions {width}x{height}: both sides must be nonzero")]
    InvalidDimensions { width: u16, height: u16 },
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u16,
        height: u16,
    },
    #[error("snake must have at least one segment")]
    EmptySnake,
}
