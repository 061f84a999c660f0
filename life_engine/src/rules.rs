// rules.rs - Neighbor counting and the B3/S23 transition rule

use crate::grid::{Grid, wrap};

/// Offsets of the 8 surrounding cells, (0, 0) excluded.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Live cells among the 8 toroidally wrapped neighbors of `(x, y)`.
///
/// Only `snapshot` is read. On grids thinner than 3 cells the same cell can
/// sit at several offsets; it is counted once per offset.
pub fn count_neighbors(snapshot: &Grid, x: usize, y: usize) -> u8 {
    let (width, height) = snapshot.dimensions();
    let (x, y) = (x as isize, y as isize);
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dx, dy)| snapshot.cell_at(wrap(x + dx, width), wrap(y + dy, height)))
        .count() as u8
}

/// Next state of one cell given its current state and live neighbor count.
#[inline]
#[rustfmt::skip]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    match (alive, neighbors) {
        (true, 2) | (true, 3) => true,   // Survival
        (false, 3)            => true,   // Birth
        _                     => false,  // Death or stays dead
    }
}

/// Computes row `y` of the generation after `snapshot`.
pub fn compute_row(snapshot: &Grid, y: usize) -> Vec<bool> {
    (0..snapshot.width())
        .map(|x| next_state(snapshot.cell_at(x, y), count_neighbors(snapshot, x, y)))
        .collect()
}

/// Whole next generation, one row after another on the calling thread.
pub fn step_sequential(snapshot: &Grid) -> Grid {
    let cells = (0..snapshot.height())
        .flat_map(|y| compute_row(snapshot, y))
        .collect();
    Grid::assemble(snapshot.width(), snapshot.height(), cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table() {
        for n in 0..=8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "alive with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn test_count_interior() {
        let grid: Grid = "ooo\no.o\nooo".parse().unwrap();
        let grid = Grid::empty(5, 5).unwrap().stamp(&grid, (1, 1));
        assert_eq!(count_neighbors(&grid, 2, 2), 8);
        assert_eq!(count_neighbors(&grid, 0, 0), 1);
    }

    #[test]
    fn test_count_wraps_corners() {
        let grid = Grid::from_cells(6, 4, [(5, 3), (5, 0), (0, 3)]).unwrap();
        assert_eq!(count_neighbors(&grid, 0, 0), 3);
    }

    #[test]
    fn test_count_ignores_self() {
        let grid = Grid::from_cells(5, 5, [(2, 2)]).unwrap();
        assert_eq!(count_neighbors(&grid, 2, 2), 0);
    }

    #[test]
    fn test_count_on_single_cell_grid() {
        // Every offset lands back on the only cell.
        let grid = Grid::from_cells(1, 1, [(0, 0)]).unwrap();
        assert_eq!(count_neighbors(&grid, 0, 0), 8);
    }

    #[test]
    fn test_compute_row_blinker() {
        let grid = Grid::from_cells(5, 5, [(1, 2), (2, 2), (3, 2)]).unwrap();
        assert_eq!(compute_row(&grid, 1), vec![false, false, true, false, false]);
        assert_eq!(compute_row(&grid, 2), vec![false, false, true, false, false]);
        assert_eq!(compute_row(&grid, 0), vec![false; 5]);
    }

    #[test]
    fn test_step_sequential_block() {
        let grid = Grid::from_cells(4, 4, [(1, 1), (2, 1), (1, 2), (2, 2)]).unwrap();
        assert_eq!(step_sequential(&grid), grid);
    }
}
