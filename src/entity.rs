/// A cell coordinate on the board. `x` is the row, `y` is the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction` on a `size`×`size` torus.
    /// Leaving one edge re-enters from the opposite edge.
    pub fn moved(&self, direction: Direction, size: usize) -> Self {
        match direction {
            Direction::Up => Position::new(wrap_dec(self.x, size), self.y),
            Direction::Down => Position::new(wrap_inc(self.x, size), self.y),
            Direction::Left => Position::new(self.x, wrap_dec(self.y, size)),
            Direction::Right => Position::new(self.x, wrap_inc(self.y, size)),
        }
    }
}

fn wrap_dec(value: usize, size: usize) -> usize {
    if value == 0 {
        size - 1
    } else {
        value - 1
    }
}

fn wrap_inc(value: usize, size: usize) -> usize {
    if value + 1 >= size {
        0
    } else {
        value + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for Up/Down, which move along the row axis.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}
