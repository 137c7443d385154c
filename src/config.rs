use crate::consts;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Engine tuning knobs.
///
/// The defaults match what the game has always shipped with; a host can
/// also read overrides from a TOML file via [`GameConfig::load()`].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    /// Grid width used when no explicit size is given
    pub grid_width: u16,

    /// Grid height used when no explicit size is given
    pub grid_height: u16,

    /// Step interval a freshly-reset game starts at
    pub initial_interval: Duration,

    /// Factor the host is expected to multiply the interval by after each
    /// symbol is eaten.  The engine stores the interval but never schedules
    /// itself.
    pub speed_factor: f64,

    /// Symbols to eat in a world before moving on to the next one
    pub symbols_per_world: u32,
}

impl GameConfig {
    /// Read configuration from a TOML file.  If the file does not exist and
    /// `allow_missing` is true, the defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if its contents could
    /// not be deserialized into a valid configuration.
    pub fn load(path: &Path, allow_missing: bool) -> Result<GameConfig, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(GameConfig::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            grid_width: consts::DEFAULT_GRID_WIDTH,
            grid_height: consts::DEFAULT_GRID_HEIGHT,
            initial_interval: consts::INITIAL_INTERVAL,
            speed_factor: consts::SPEED_FACTOR,
            symbols_per_world: consts::SYMBOLS_PER_WORLD,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawGameConfig {
    grid_width: u16,
    grid_height: u16,
    initial_interval_ms: u64,
    speed_factor: f64,
    symbols_per_world: u32,
}

impl Default for RawGameConfig {
    fn default() -> RawGameConfig {
        RawGameConfig {
            grid_width: consts::DEFAULT_GRID_WIDTH,
            grid_height: consts::DEFAULT_GRID_HEIGHT,
            initial_interval_ms: u64::try_from(consts::INITIAL_INTERVAL.as_millis())
                .expect("default interval should fit in u64"),
            speed_factor: consts::SPEED_FACTOR,
            symbols_per_world: consts::SYMBOLS_PER_WORLD,
        }
    }
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(raw: RawGameConfig) -> Result<GameConfig, ConfigError> {
        if raw.grid_width == 0 || raw.grid_height == 0 {
            return Err(ConfigError::Dimensions {
                width: raw.grid_width,
                height: raw.grid_height,
            });
        }
        if raw.initial_interval_ms == 0 {
            return Err(ConfigError::Interval);
        }
        if !(raw.speed_factor > 0.0 && raw.speed_factor <= 1.0) {
            return Err(ConfigError::SpeedFactor(raw.speed_factor));
        }
        if raw.symbols_per_world == 0 {
            return Err(ConfigError::SymbolsPerWorld);
        }
        Ok(GameConfig {
            grid_width: raw.grid_width,
            grid_height: raw.grid_height,
            initial_interval: Duration::from_millis(raw.initial_interval_ms),
            speed_factor: raw.speed_factor,
            symbols_per_world: raw.symbols_per_world,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file")]
    Read(#[source] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid grid dimensions {width}x{height}: both sides must be nonzero")]
    Dimensions { width: u16, height: u16 },
    #[error("initial interval must be nonzero")]
    Interval,
    #[error("speed factor {0} is outside (0, 1]")]
    SpeedFactor(f64),
    #[error("symbols-per-world must be nonzero")]
    SymbolsPerWorld,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 10);
        assert_eq!(config.initial_interval, Duration::from_millis(100));
        assert_eq!(config.symbols_per_world, 10);
        assert!(config.speed_factor > 0.97 && config.speed_factor < 0.99);
    }

    #[test]
    fn parse_full() {
        let config: GameConfig = toml::from_str(concat!(
            "grid-width = 32\n",
            "grid-height = 16\n",
            "initial-interval-ms = 250\n",
            "speed-factor = 0.9\n",
            "symbols-per-world = 5\n",
        ))
        .unwrap();
        assert_eq!(
            config,
            GameConfig {
                grid_width: 32,
                grid_height: 16,
                initial_interval: Duration::from_millis(250),
                speed_factor: 0.9,
                symbols_per_world: 5,
            }
        );
    }

    #[test]
    fn parse_partial_fills_defaults() {
        let config: GameConfig = toml::from_str("grid-width = 48\n").unwrap();
        assert_eq!(config.grid_width, 48);
        assert_eq!(config.grid_height, consts::DEFAULT_GRID_HEIGHT);
        assert_eq!(config.initial_interval, consts::INITIAL_INTERVAL);
    }

    #[test]
    fn reject_zero_dimension() {
        let r = toml::from_str::<GameConfig>("grid-width = 0\n");
        assert!(r.is_err());
    }

    #[test]
    fn reject_zero_interval() {
        let r = toml::from_str::<GameConfig>("initial-interval-ms = 0\n");
        assert!(r.is_err());
    }

    #[test]
    fn reject_wild_speed_factor() {
        let r = toml::from_str::<GameConfig>("speed-factor = 1.5\n");
        assert!(r.is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wyrm.toml");
        fs_err::write(&path, "grid-width = 24\ngrid-height = 12\n").unwrap();
        let config = GameConfig::load(&path, false).unwrap();
        assert_eq!(config.grid_width, 24);
        assert_eq!(config.grid_height, 12);
    }

    #[test]
    fn load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = GameConfig::load(&path, true).unwrap();
        assert_eq!(config, GameConfig::default());
        assert!(matches!(
            GameConfig::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }
}
