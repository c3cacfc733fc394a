use crate::apple::place_apple;
use crate::config::GameConfig;
use crate::entity::{Direction, Position};
use crate::error::Result;
use crate::grid::{CellValue, Grid};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Cell the snake starts on.
const ORIGIN: Position = Position { x: 0, y: 0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    GameOver,
}

/// What a single tick did to the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running, nothing changed
    Idle,
    Moved,
    /// The head swallowed the apple; the eat cue should play
    Ate,
    /// The head ran into the body and the game is over
    Collided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// The apple timer ran out and the apple was moved this tick
    pub apple_relocated: bool,
}

impl TickReport {
    fn new(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            apple_relocated: false,
        }
    }
}

/// One game session: the board plus everything needed to advance it.
///
/// The body is not stored as a list. Every body cell remembers the heading
/// the snake left it with, so the tail walks the same path the head took.
pub struct Game {
    grid: Grid,
    head: Position,
    tail: Position,
    direction: Direction,
    initial_direction: Direction,
    apple: Option<Position>,
    score: u32,
    state: GameState,
    apple_lifetime: u32,
    apple_age: u32,
    rng: StdRng,
}

impl Game {
    /// Fails with `InvalidConfig` when the configuration does not validate.
    pub fn new(config: &GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Game with a reproducible apple sequence.
    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.grid_size),
            head: ORIGIN,
            tail: ORIGIN,
            direction: config.initial_direction,
            initial_direction: config.initial_direction,
            apple: None,
            score: 0,
            state: GameState::NotStarted,
            apple_lifetime: config.apple_lifetime,
            apple_age: 0,
            rng,
        })
    }

    /// Wipe the board and begin a fresh round. Works from any state.
    pub fn start(&mut self) -> Result<()> {
        self.grid.clear_all();
        self.direction = self.initial_direction;
        self.head = ORIGIN;
        self.tail = ORIGIN;
        self.grid.set(ORIGIN, CellValue::Snake, None);
        self.score = 0;
        self.apple_age = 0;
        self.relocate_apple()?;
        self.state = GameState::Running;

        info!(
            "game started on a {0}x{0} board heading {1:?}",
            self.grid.size(),
            self.direction
        );
        Ok(())
    }

    /// Request a new heading. Returns whether it was taken.
    ///
    /// Turning back onto the body is ignored, both against the pending
    /// heading and against the heading the head last moved with.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        if direction == self.direction.opposite() {
            return false;
        }
        if let Some(moved) = self.grid.cell(self.head).direction {
            if direction == moved.opposite() {
                return false;
            }
        }
        self.direction = direction;
        true
    }

    /// Advance the snake by one cell.
    pub fn tick(&mut self) -> Result<TickReport> {
        if self.state != GameState::Running {
            return Ok(TickReport::new(TickOutcome::Idle));
        }

        let heading = self.direction;
        self.grid.set_direction(self.head, heading);
        let next = self.grid.next_cell(self.head, heading);

        let outcome = match self.grid.value(next) {
            CellValue::Empty => {
                self.grid.set(next, CellValue::Snake, Some(heading));
                self.head = next;
                TickOutcome::Moved
            }
            CellValue::Apple => {
                self.grid.set(next, CellValue::EatenApple, Some(heading));
                self.head = next;
                self.score += 1;
                self.apple_age = 0;
                self.relocate_apple()?;
                debug!("apple eaten, score {}", self.score);
                TickOutcome::Ate
            }
            CellValue::Snake | CellValue::EatenApple => {
                self.state = GameState::GameOver;
                info!(
                    "snake hit itself at ({}, {}), final score {}",
                    next.x, next.y, self.score
                );
                return Ok(TickReport::new(TickOutcome::Collided));
            }
        };

        self.advance_tail();

        let mut report = TickReport::new(outcome);
        self.apple_age += 1;
        if self.apple_age == self.apple_lifetime {
            self.apple_age = 0;
            self.relocate_apple()?;
            report.apple_relocated = true;
            debug!("apple expired after {} ticks", self.apple_lifetime);
        }

        Ok(report)
    }

    /// A board with no room for the apple ends the round.
    fn relocate_apple(&mut self) -> Result<()> {
        self.apple = None;
        match place_apple(&mut self.grid, &mut self.rng) {
            Ok(pos) => {
                self.apple = Some(pos);
                Ok(())
            }
            Err(e) => {
                self.state = GameState::GameOver;
                error!("{}", e);
                Err(e)
            }
        }
    }

    fn advance_tail(&mut self) {
        let cell = self.grid.cell(self.tail);
        match (cell.value, cell.direction) {
            (CellValue::Snake, Some(direction)) => {
                let next = self.grid.next_cell(self.tail, direction);
                self.grid.clear(self.tail);
                self.tail = next;
            }
            // A swallowed apple: the tail stays put this tick, which is
            // what lengthens the body by one.
            _ => self.grid.set_value(self.tail, CellValue::Snake),
        }
    }

    /// Body cells from tail to head, following the stored headings.
    pub fn body(&self) -> Vec<Position> {
        let limit = self.grid.size() * self.grid.size();
        let mut body = vec![self.tail];
        let mut pos = self.tail;
        while pos != self.head && body.len() < limit {
            let Some(direction) = self.grid.cell(pos).direction else {
                break;
            };
            pos = self.grid.next_cell(pos, direction);
            body.push(pos);
        }
        body
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn tail(&self) -> Position {
        self.tail
    }

    pub fn apple(&self) -> Option<Position> {
        self.apple
    }

    pub fn apple_age(&self) -> u32 {
        self.apple_age
    }

    pub fn apple_lifetime(&self) -> u32 {
        self.apple_lifetime
    }

    /// 2x2 board, snake of three about to eat the apple on the last free
    /// cell.
    #[cfg(test)]
    pub(crate) fn one_bite_from_full() -> Game {
        let mut game = Game::with_seed(&GameConfig::with_grid_size(2), 0).unwrap();
        game.start().unwrap();
        game.grid.clear_all();
        game.grid.set(Position::new(0, 0), CellValue::Snake, Some(Direction::Right));
        game.grid.set(Position::new(0, 1), CellValue::Snake, Some(Direction::Down));
        game.grid.set(Position::new(1, 1), CellValue::Snake, Some(Direction::Down));
        game.grid.set(Position::new(1, 0), CellValue::Apple, None);
        game.tail = Position::new(0, 0);
        game.head = Position::new(1, 1);
        game.apple = Some(Position::new(1, 0));
        game.direction = Direction::Left;
        game
    }

    /// Put the apple on a chosen cell.
    #[cfg(test)]
    pub(crate) fn put_apple_at(&mut self, pos: Position) {
        if let Some(old) = self.apple {
            self.grid.clear(old);
        }
        self.grid.set(pos, CellValue::Apple, None);
        self.apple = Some(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use proptest::prelude::*;
    use std::collections::HashSet;

    /// Out of the way of anything the tests steer through rows 0 and 1.
    const PARKING: Position = Position { x: 13, y: 13 };

    fn config() -> GameConfig {
        GameConfig {
            apple_lifetime: 1_000,
            ..Default::default()
        }
    }

    fn started(config: &GameConfig) -> Game {
        let mut game = Game::with_seed(config, 42).unwrap();
        game.start().unwrap();
        game
    }

    /// Feed the snake `apples` apples straight ahead, then let every
    /// swallowed apple reach the tail.
    fn grow(game: &mut Game, apples: u32) {
        for _ in 0..apples {
            let ahead = game.grid.next_cell(game.head, game.direction);
            game.put_apple_at(ahead);
            assert_eq!(game.tick().unwrap().outcome, TickOutcome::Ate);
            game.put_apple_at(PARKING);
        }
        while game.grid.count(CellValue::EatenApple) > 0 {
            assert_eq!(game.tick().unwrap().outcome, TickOutcome::Moved);
        }
    }

    fn values(game: &Game) -> Vec<CellValue> {
        game.grid.positions().map(|p| game.grid.value(p)).collect()
    }

    fn body_cells(game: &Game) -> usize {
        game.grid.count(CellValue::Snake) + game.grid.count(CellValue::EatenApple)
    }

    // Strategy for generating valid directions
    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    // Strategy for generating turns, each held for a few ticks
    fn move_sequence_strategy() -> impl Strategy<Value = Vec<(Direction, usize)>> {
        prop::collection::vec((direction_strategy(), 1usize..5), 1..80)
    }

    proptest! {
        /// While the game runs there is one apple and the body traced from
        /// tail to head covers every body cell exactly once.
        #[test]
        fn prop_running_game_keeps_its_invariants(
            seed in any::<u64>(),
            moves in move_sequence_strategy(),
        ) {
            let config = GameConfig {
                apple_lifetime: 7,
                ..GameConfig::with_grid_size(6)
            };
            let mut game = Game::with_seed(&config, seed).unwrap();
            game.start().unwrap();

            'outer: for (direction, ticks) in moves {
                game.set_direction(direction);
                for _ in 0..ticks {
                    let Ok(_) = game.tick() else { break 'outer };
                    if game.state() != GameState::Running {
                        break 'outer;
                    }

                    prop_assert_eq!(game.grid().count(CellValue::Apple), 1);
                    let apple = game.apple().unwrap();
                    prop_assert_eq!(game.grid().value(apple), CellValue::Apple);

                    let body = game.body();
                    let unique: HashSet<_> = body.iter().copied().collect();
                    prop_assert_eq!(unique.len(), body.len());
                    prop_assert_eq!(body.len(), body_cells(&game));
                    prop_assert_eq!(*body.first().unwrap(), game.tail());
                    prop_assert_eq!(*body.last().unwrap(), game.head());
                    prop_assert!(body.iter().all(|&p| game.grid().value(p).is_body()));
                    prop_assert!(game.apple_age() < game.apple_lifetime());
                }
            }
        }

        /// Score never goes down and only moves on a tick that ate.
        #[test]
        fn prop_score_only_grows_when_eating(
            seed in any::<u64>(),
            moves in move_sequence_strategy(),
        ) {
            let mut game = Game::with_seed(&GameConfig::with_grid_size(5), seed).unwrap();
            game.start().unwrap();

            for (direction, ticks) in moves {
                game.set_direction(direction);
                for _ in 0..ticks {
                    let before = game.score();
                    let Ok(report) = game.tick() else { return Ok(()) };
                    if report.outcome == TickOutcome::Ate {
                        prop_assert_eq!(game.score(), before + 1);
                    } else {
                        prop_assert_eq!(game.score(), before);
                    }
                }
            }
        }

        /// A reversal request never changes the heading, whatever came before.
        #[test]
        fn prop_reversal_is_always_ignored(
            moves in prop::collection::vec(direction_strategy(), 1..30),
        ) {
            let mut game = started(&config());
            for direction in moves {
                game.set_direction(direction);
                let current = game.direction();
                prop_assert!(!game.set_direction(current.opposite()));
                prop_assert_eq!(game.direction(), current);
                game.tick().unwrap();
                if game.state() != GameState::Running {
                    break;
                }
            }
        }
    }

    #[test]
    fn test_new_game_is_not_started() {
        let mut game = Game::with_seed(&config(), 1).unwrap();
        assert_eq!(game.state(), GameState::NotStarted);
        assert_eq!(game.tick().unwrap().outcome, TickOutcome::Idle);
        assert!(!game.set_direction(Direction::Down));
        assert_eq!(game.grid().count(CellValue::Apple), 0);
    }

    #[test]
    fn test_start_places_snake_and_apple() {
        let game = started(&config());

        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.apple_age(), 0);
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.head(), ORIGIN);
        assert_eq!(game.tail(), ORIGIN);
        assert_eq!(game.grid().count(CellValue::Apple), 1);
        assert_eq!(game.grid().count(CellValue::Snake), 1);
        assert_eq!(game.grid().value(ORIGIN), CellValue::Snake);
        assert_ne!(game.apple(), Some(ORIGIN));
        assert_eq!(game.body(), vec![ORIGIN]);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut game = started(&config());
        game.put_apple_at(PARKING);

        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Moved);
        assert!(!report.apple_relocated);
        assert_eq!(game.head(), Position::new(0, 1));
        assert_eq!(game.tail(), Position::new(0, 1));
        assert_eq!(game.grid().value(ORIGIN), CellValue::Empty);
        assert_eq!(game.grid().cell(ORIGIN).direction, None);
        assert_eq!(body_cells(&game), 1);
        assert_eq!(game.apple_age(), 1);
    }

    #[test]
    fn test_snake_wraps_around_the_edge() {
        let mut game = started(&config());
        game.put_apple_at(PARKING);
        game.set_direction(Direction::Up);

        game.tick().unwrap();

        assert_eq!(game.head(), Position::new(25, 0));
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn test_eating_scores_and_moves_the_apple() {
        let mut game = started(&config());
        let target = Position::new(0, 1);
        game.put_apple_at(target);

        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Ate);
        assert_eq!(game.score(), 1);
        assert_eq!(game.head(), target);
        assert_eq!(game.grid().value(target), CellValue::EatenApple);
        assert_eq!(game.grid().cell(target).direction, Some(Direction::Right));
        assert_eq!(game.grid().count(CellValue::Apple), 1);
        assert_ne!(game.apple(), Some(target));
        // Reset on eating, then counted for this tick
        assert_eq!(game.apple_age(), 1);
    }

    #[test]
    fn test_swallowed_apple_grows_body_when_it_becomes_tail() {
        let mut game = started(&config());
        game.put_apple_at(Position::new(0, 1));
        game.tick().unwrap();
        game.put_apple_at(PARKING);

        // Length one: the tail is already on the swallowed apple
        assert_eq!(game.tail(), Position::new(0, 1));
        assert_eq!(body_cells(&game), 1);

        game.tick().unwrap();
        assert_eq!(game.tail(), Position::new(0, 1));
        assert_eq!(game.grid().value(Position::new(0, 1)), CellValue::Snake);
        assert_eq!(game.grid().count(CellValue::EatenApple), 0);
        assert_eq!(body_cells(&game), 2);

        game.tick().unwrap();
        assert_eq!(game.tail(), Position::new(0, 2));
        assert_eq!(body_cells(&game), 2);
    }

    #[test]
    fn test_growth_happens_exactly_when_tail_is_swallowed_apple() {
        let mut game = started(&config());
        for _ in 0..3 {
            let ahead = game.grid.next_cell(game.head, game.direction);
            game.put_apple_at(ahead);
            game.tick().unwrap();
            game.put_apple_at(PARKING);
        }

        for _ in 0..6 {
            let tail = game.tail();
            let tail_value = game.grid().value(tail);
            let length = game.body().len();

            assert_eq!(game.tick().unwrap().outcome, TickOutcome::Moved);

            if tail_value == CellValue::EatenApple {
                assert_eq!(game.tail(), tail);
                assert_eq!(game.grid().value(tail), CellValue::Snake);
                assert_eq!(game.body().len(), length + 1);
            } else {
                assert_ne!(game.tail(), tail);
                assert_eq!(game.body().len(), length);
            }
        }
        assert_eq!(game.body().len(), 4);
    }

    #[test]
    fn test_running_into_body_ends_game() {
        let mut game = started(&config());
        grow(&mut game, 4);
        assert_eq!(game.body().len(), 5);

        assert!(game.set_direction(Direction::Down));
        game.tick().unwrap();
        assert!(game.set_direction(Direction::Left));
        game.tick().unwrap();
        assert!(game.set_direction(Direction::Up));

        let head = game.head();
        let tail = game.tail();
        let score = game.score();
        let before = values(&game);

        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Collided);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(values(&game), before);
        assert_eq!(game.head(), head);
        assert_eq!(game.tail(), tail);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_wrapping_into_own_tail_ends_game() {
        let config = GameConfig {
            apple_lifetime: 1_000,
            ..GameConfig::with_grid_size(4)
        };
        let parking = Position::new(2, 2);
        let mut game = started(&config);
        game.put_apple_at(parking);
        game.tick().unwrap();

        // Three apples in a row, the last one across the seam
        for _ in 0..3 {
            let ahead = game.grid.next_cell(game.head, game.direction);
            game.put_apple_at(ahead);
            assert_eq!(game.tick().unwrap().outcome, TickOutcome::Ate);
            game.put_apple_at(parking);
        }
        while game.grid.count(CellValue::EatenApple) > 0 {
            assert_eq!(game.tick().unwrap().outcome, TickOutcome::Moved);
        }

        // Row 0 is all snake, heading right off the edge onto the tail
        assert_eq!(game.body().len(), 4);
        assert_eq!(game.head(), Position::new(0, 3));
        assert_eq!(game.tail(), Position::new(0, 0));
        assert_eq!(game.direction(), Direction::Right);
        let before = values(&game);

        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Collided);
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(values(&game), before);
        assert_eq!(game.head(), Position::new(0, 3));
        assert_eq!(game.tail(), Position::new(0, 0));
    }

    #[test]
    fn test_eating_the_last_free_cell_is_grid_full() {
        let mut game = Game::one_bite_from_full();

        let err = game.tick().unwrap_err();

        assert!(matches!(err, GameError::GridFull { size: 2 }));
        assert_eq!(game.state(), GameState::GameOver);
        assert_eq!(game.score(), 1);
        assert_eq!(game.apple(), None);
        assert_eq!(game.grid().count(CellValue::Apple), 0);
        assert_eq!(game.grid().value(Position::new(1, 0)), CellValue::EatenApple);
        assert_eq!(game.tick().unwrap().outcome, TickOutcome::Idle);
    }

    #[test]
    fn test_invalid_config_is_rejected_up_front() {
        assert!(matches!(
            Game::with_seed(&GameConfig::with_grid_size(0), 1),
            Err(GameError::InvalidConfig(_))
        ));
        let config = GameConfig {
            apple_lifetime: 0,
            ..Default::default()
        };
        assert!(matches!(Game::new(&config), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_game_over_ignores_ticks_and_turns() {
        let mut game = started(&config());
        grow(&mut game, 4);
        game.set_direction(Direction::Down);
        game.tick().unwrap();
        game.set_direction(Direction::Left);
        game.tick().unwrap();
        game.set_direction(Direction::Up);
        game.tick().unwrap();
        assert_eq!(game.state(), GameState::GameOver);

        let before = values(&game);
        assert_eq!(game.tick().unwrap().outcome, TickOutcome::Idle);
        assert!(!game.set_direction(Direction::Right));
        assert_eq!(values(&game), before);

        game.start().unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(body_cells(&game), 1);
        assert_eq!(game.grid().count(CellValue::Apple), 1);
    }

    #[test]
    fn test_reverse_direction_is_rejected() {
        for direction in Direction::ALL {
            let mut game = started(&config());
            game.direction = direction;

            assert!(!game.set_direction(direction.opposite()));
            assert_eq!(game.direction(), direction);
        }
    }

    #[test]
    fn test_perpendicular_turn_is_accepted() {
        let mut game = started(&config());
        assert!(game.set_direction(Direction::Up));
        assert_eq!(game.direction(), Direction::Up);
        assert!(game.set_direction(Direction::Right));
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn test_two_quick_turns_cannot_fold_back() {
        let mut game = started(&config());
        game.put_apple_at(PARKING);
        game.tick().unwrap();

        // Moved right last; up is fine, but left would hit the neck
        assert!(game.set_direction(Direction::Up));
        assert!(!game.set_direction(Direction::Left));
        assert_eq!(game.direction(), Direction::Up);
    }

    #[test]
    fn test_apple_moves_after_its_lifetime() {
        let config = GameConfig {
            apple_lifetime: 5,
            ..Default::default()
        };
        let mut game = started(&config);
        game.put_apple_at(PARKING);

        for age in 1..5 {
            let report = game.tick().unwrap();
            assert!(!report.apple_relocated);
            assert_eq!(game.apple_age(), age);
            assert_eq!(game.apple(), Some(PARKING));
        }

        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Moved);
        assert!(report.apple_relocated);
        assert_eq!(game.apple_age(), 0);
        assert_eq!(game.score(), 0);
        assert_ne!(game.apple(), Some(PARKING));
        assert_eq!(game.grid().value(PARKING), CellValue::Empty);
        assert_eq!(game.grid().count(CellValue::Apple), 1);
    }

    #[test]
    fn test_eating_restarts_the_apple_timer() {
        let config = GameConfig {
            apple_lifetime: 3,
            ..Default::default()
        };
        let mut game = started(&config);
        game.put_apple_at(PARKING);
        game.tick().unwrap();
        game.tick().unwrap();
        assert_eq!(game.apple_age(), 2);

        let ahead = game.grid.next_cell(game.head, game.direction);
        game.put_apple_at(ahead);
        let report = game.tick().unwrap();

        assert_eq!(report.outcome, TickOutcome::Ate);
        assert!(!report.apple_relocated);
        assert_eq!(game.apple_age(), 1);
    }
}
