use crate::entity::{Direction, Position};
use crate::game::{Game, GameState};
use crate::grid::CellValue;
use crate::renderer::{Input, InputSource, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

/// Rows above the board: score line and top border.
const BOARD_TOP: u16 = 2;

pub struct CliRenderer {
    active: bool,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self { active: false }
    }

    /// Leftmost column of the frame so the board sits centred.
    fn left_margin(board_width: u16) -> u16 {
        let (term_width, _) = terminal::size().unwrap_or((board_width, 0));
        term_width.saturating_sub(board_width) / 2
    }

    fn draw_cell(&self, game: &Game, pos: Position, stdout: &mut io::Stdout) -> io::Result<()> {
        if pos == game.head() && game.state() != GameState::NotStarted {
            let color = if game.state() == GameState::GameOver {
                Color::Red
            } else {
                Color::Green
            };
            queue!(
                stdout,
                SetBackgroundColor(color),
                SetForegroundColor(Color::Black),
                Print(head_glyph(game.direction()))
            )?;
            return Ok(());
        }

        match game.grid().value(pos) {
            CellValue::Empty => {
                queue!(stdout, SetBackgroundColor(Color::Black), Print("  "))?;
            }
            CellValue::Snake => {
                queue!(stdout, SetBackgroundColor(Color::DarkGreen), Print("  "))?;
            }
            CellValue::EatenApple => {
                queue!(
                    stdout,
                    SetBackgroundColor(Color::DarkGreen),
                    SetForegroundColor(Color::Yellow),
                    Print("()")
                )?;
            }
            CellValue::Apple => {
                queue!(
                    stdout,
                    SetBackgroundColor(Color::Black),
                    SetForegroundColor(Color::Red),
                    Print("()")
                )?;
            }
        }
        Ok(())
    }

    fn draw_border_row(&self, left: &str, right: &str, cells: usize, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            ResetColor,
            Print(left),
            Print("─".repeat(cells * 2)),
            Print(right)
        )?;
        Ok(())
    }

    fn draw_info(&self, game: &Game, margin: u16, stdout: &mut io::Stdout) -> io::Result<()> {
        let below = BOARD_TOP + game.grid().size() as u16 + 1;

        queue!(
            stdout,
            cursor::MoveTo(margin, below),
            ResetColor,
            Print("Arrows/WASD to steer | Space or R to restart | Esc or Q to quit"),
            terminal::Clear(ClearType::UntilNewLine)
        )?;

        queue!(stdout, cursor::MoveTo(margin, below + 1))?;
        match game.state() {
            GameState::GameOver => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print(format!("GAME OVER! Final score {}. Press SPACE to play again", game.score())),
                    ResetColor
                )?;
            }
            GameState::NotStarted => {
                queue!(stdout, Print("Press SPACE to start"))?;
            }
            GameState::Running => {}
        }
        queue!(stdout, terminal::Clear(ClearType::UntilNewLine))?;

        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "^^",
        Direction::Down => "vv",
        Direction::Left => "<<",
        Direction::Right => ">>",
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        // Raw mode is on from here, so teardown must run even if the rest fails
        self.active = true;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        let mut stdout = io::stdout();
        let size = game.grid().size();
        let board_width = (size * 2 + 2) as u16;
        let margin = Self::left_margin(board_width);

        // Score
        let score = format!(" Score: {} ", game.score());
        let score_col = margin + (board_width.saturating_sub(score.len() as u16)) / 2;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            cursor::MoveTo(score_col, 0),
            Print(score)
        )?;

        // Draw board
        queue!(stdout, cursor::MoveTo(margin, BOARD_TOP - 1))?;
        self.draw_border_row("┌", "┐", size, &mut stdout)?;

        for x in 0..size {
            queue!(stdout, cursor::MoveTo(margin, BOARD_TOP + x as u16), ResetColor, Print("│"))?;
            for y in 0..size {
                self.draw_cell(game, Position::new(x, y), &mut stdout)?;
            }
            queue!(stdout, ResetColor, Print("│"))?;
        }

        queue!(stdout, cursor::MoveTo(margin, BOARD_TOP + size as u16))?;
        self.draw_border_row("└", "┘", size, &mut stdout)?;

        // Draw info
        self.draw_info(game, margin, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut stdout = io::stdout();
        let screen = execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        );
        let raw = terminal::disable_raw_mode();
        screen.and(raw)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Keyboard intents read through crossterm.
pub struct KeyboardInput {
    timeout: Duration,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            // Bounds how long the listener takes to notice shutdown
            timeout: Duration::from_millis(50),
        }
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> io::Result<Option<Input>> {
        if event::poll(self.timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(map_key(key));
            }
        }
        Ok(None)
    }
}

/// Translate a key press into an intent. Releases and repeats are dropped.
pub fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Restart),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Input::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Input::Direction(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Input::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Input::Direction(Direction::Right)),
        _ => None,
    }
}
