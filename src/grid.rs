use crate::entity::{Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Snake,
    Apple,
    /// Body cell swallowed an apple; it turns into a plain `Snake` cell when
    /// the tail reaches it, which is where the body grows by one.
    EatenApple,
}

impl CellValue {
    pub fn is_body(&self) -> bool {
        matches!(self, CellValue::Snake | CellValue::EatenApple)
    }
}

/// One board square. `direction` is the heading the snake had when it left
/// this square, so the tail can retrace the head's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub direction: Option<Direction>,
    pub value: CellValue,
}

impl Cell {
    pub fn new(value: CellValue, direction: Option<Direction>) -> Self {
        Self { direction, value }
    }
}

/// Square toroidal board of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::default(); size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.x][pos.y]
    }

    pub fn value(&self, pos: Position) -> CellValue {
        self.cells[pos.x][pos.y].value
    }

    pub fn set(&mut self, pos: Position, value: CellValue, direction: Option<Direction>) {
        self.cells[pos.x][pos.y] = Cell::new(value, direction);
    }

    pub fn set_value(&mut self, pos: Position, value: CellValue) {
        self.cells[pos.x][pos.y].value = value;
    }

    pub fn set_direction(&mut self, pos: Position, direction: Direction) {
        self.cells[pos.x][pos.y].direction = Some(direction);
    }

    /// Reset a cell to Empty with no direction.
    pub fn clear(&mut self, pos: Position) {
        self.cells[pos.x][pos.y] = Cell::default();
    }

    pub fn clear_all(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::default());
        }
    }

    /// Adjacent cell with wraparound.
    pub fn next_cell(&self, pos: Position, direction: Direction) -> Position {
        pos.moved(direction, self.size)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| Position::new(x, y)))
    }

    pub fn count(&self, value: CellValue) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.value == value)
            .count()
    }
}
