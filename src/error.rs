use std::io;
use thiserror::Error;

/// Errors that can stop the game.
#[derive(Debug, Error)]
pub enum GameError {
    /// No empty cell is left to hold an apple.
    #[error("no empty cell left for the apple on a {size}x{size} grid")]
    GridFull { size: usize },
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("input listener panicked")]
    ListenerPanicked,
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, GameError>;
