pub mod apple;
pub mod audio;
pub mod cli_renderer;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod renderer;

pub use audio::{AudioCue, Cue, SilentAudio};
pub use cli_renderer::{CliRenderer, KeyboardInput};
pub use config::{GameConfig, GRID_SIZE};
pub use entity::{Direction, Position};
pub use error::{GameError, Result};
pub use game::{Game, GameState, TickOutcome, TickReport};
pub use grid::{Cell, CellValue, Grid};
pub use renderer::{Input, InputSource, Renderer};
