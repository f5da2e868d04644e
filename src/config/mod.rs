//! Configuration module - environment variable parsing

use std::env;
use std::time::Duration;

/// Pairing policy for the matchmaking queue.
///
/// `NewestTwo` matches the behavior of the original service: the two most
/// recently queued players are paired first. `OldestTwo` is conventional
/// FIFO pairing and avoids starving long-waiting players.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingPolicy {
    NewestTwo,
    OldestTwo,
}

/// Numeric constants consumed by the match simulation
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    /// Play area width
    pub play_area_width: f64,
    /// Play area height
    pub play_area_height: f64,
    /// Ball radius
    pub ball_radius: f64,
    /// Ball speed at serve (units per second)
    pub ball_initial_speed: f64,
    /// Width of the serve angle window in degrees
    pub max_serve_angle: f64,
    /// Paddle distance from its side's border
    pub paddle_border_offset: f64,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Tick interval for per-lobby simulation timers
    pub tick_interval: Duration,
    /// Queue pairing policy
    pub pairing_policy: PairingPolicy,
    /// Simulation constants
    pub game: GameConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults below for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_interval_ms = parse_var("TICK_INTERVAL_MS", 50u64)?;

        let pairing_policy = match env::var("PAIRING_POLICY") {
            Ok(v) => match v.as_str() {
                "newest_two" => PairingPolicy::NewestTwo,
                "oldest_two" => PairingPolicy::OldestTwo,
                _ => return Err(ConfigError::InvalidValue("PAIRING_POLICY")),
            },
            Err(_) => PairingPolicy::NewestTwo,
        };

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tick_interval: Duration::from_millis(tick_interval_ms),
            pairing_policy,
            game: GameConfig {
                play_area_width: parse_var("PLAY_AREA_WIDTH", 800.0)?,
                play_area_height: parse_var("PLAY_AREA_HEIGHT", 600.0)?,
                ball_radius: parse_var("BALL_RADIUS", 10.0)?,
                ball_initial_speed: parse_var("BALL_SPEED", 300.0)?,
                max_serve_angle: parse_var("MAX_SERVE_ANGLE", 60.0)?,
                paddle_border_offset: parse_var("PADDLE_OFFSET", 30.0)?,
            },
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_area_width: 800.0,
            play_area_height: 600.0,
            ball_radius: 10.0,
            ball_initial_speed: 300.0,
            max_serve_angle: 60.0,
            paddle_border_offset: 30.0,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
