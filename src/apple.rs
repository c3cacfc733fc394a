use crate::entity::Position;
use crate::error::{GameError, Result};
use crate::grid::{CellValue, Grid};
use log::debug;
use rand::Rng;

/// Random picks per board cell before falling back to a scan.
const ATTEMPTS_PER_CELL: usize = 4;

/// Move the apple to a uniformly random empty cell.
///
/// Any existing apple is removed first. The cell the apple just left is only
/// reused when it is the last empty cell on the board. Random sampling is
/// bounded; past the bound a row-major scan picks the first empty cell, so a
/// nearly full board still terminates.
pub fn place_apple<R: Rng>(grid: &mut Grid, rng: &mut R) -> Result<Position> {
    let previous: Vec<Position> = grid
        .positions()
        .filter(|&pos| grid.value(pos) == CellValue::Apple)
        .collect();
    for &pos in &previous {
        grid.clear(pos);
    }

    let size = grid.size();
    let is_free = |grid: &Grid, pos: Position| {
        grid.value(pos) == CellValue::Empty && !previous.contains(&pos)
    };

    let mut chosen = None;
    for _ in 0..ATTEMPTS_PER_CELL * size * size {
        let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if is_free(grid, pos) {
            chosen = Some(pos);
            break;
        }
    }

    let chosen = chosen
        .or_else(|| grid.positions().find(|&pos| is_free(grid, pos)))
        .or_else(|| previous.first().copied())
        .ok_or(GameError::GridFull { size })?;

    grid.set(chosen, CellValue::Apple, None);
    debug!("apple placed at ({}, {})", chosen.x, chosen.y);
    Ok(chosen)
}
