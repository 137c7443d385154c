//! Assorted constants & hard-coded configuration
use std::time::Duration;

/// Grid width used when neither the caller nor a configuration file supplies
/// one
pub(crate) const DEFAULT_GRID_WIDTH: u16 = 20;

/// Grid height used when neither the caller nor a configuration file
/// supplies one
pub(crate) const DEFAULT_GRID_HEIGHT: u16 = 10;

/// Step interval a freshly-reset game starts at
pub(crate) const INITIAL_INTERVAL: Duration = Duration::from_millis(100);

/// Interval decay the host is expected to apply after each symbol is eaten.
/// The engine only stores the interval; scheduling is the host's job.
pub(crate) const SPEED_FACTOR: f64 = 0.98;

/// Symbols to eat in a world before moving on to the next one
pub(crate) const SYMBOLS_PER_WORLD: u32 = 10;

/// Random samples to try when placing food before falling back to scanning
/// the free-cell set directly
pub(crate) const FOOD_SAMPLE_ATTEMPTS: u32 = 100;

/// Cap on the autopilot's greedy-walk length, as a multiple of the longer
/// grid side
pub(crate) const GREEDY_WALK_FACTOR: usize = 2;
