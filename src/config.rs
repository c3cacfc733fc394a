use crate::entity::Direction;
use crate::error::{GameError, Result};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Side length of the square board.
pub const GRID_SIZE: usize = 26;

/// Configuration for a game session and its driver
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Rows and columns of the board
    pub grid_size: usize,
    /// Wall-clock delay between two ticks
    pub tick_interval: Duration,
    /// Ticks an uneaten apple stays put before it is moved
    pub apple_lifetime: u32,
    /// Heading of the snake right after `start`
    pub initial_direction: Direction,
    /// Where the binary writes its log (the terminal belongs to the board)
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            tick_interval: Duration::from_millis(200),
            apple_lifetime: 50,
            initial_direction: Direction::Right,
            log_file: PathBuf::from("snake.log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    /// Default configuration on a board of a different size
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(GameError::InvalidConfig("grid_size must be at least 2"));
        }
        if self.apple_lifetime == 0 {
            return Err(GameError::InvalidConfig("apple_lifetime must be positive"));
        }
        if self.tick_interval.is_zero() {
            return Err(GameError::InvalidConfig("tick_interval must be positive"));
        }
        Ok(())
    }
}
