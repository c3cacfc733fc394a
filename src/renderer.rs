use crate::entity::Direction;
use crate::game::Game;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Quit,
    Restart,
}

/// Trait that abstracts rendering implementation.
/// The terminal is the only backend today; tests plug in recorders.
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;
}

/// Source of player intents. Polled from the input thread, so it has to
/// be `Send`.
pub trait InputSource: Send {
    /// Wait briefly for the next intent; `None` when nothing relevant arrived.
    fn poll(&mut self) -> io::Result<Option<Input>>;
}
