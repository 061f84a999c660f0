// grid.rs - Immutable toroidal grid of cells

use std::fmt::{self, Display, Write};
use std::str::FromStr;

use rand::Rng;

use crate::config::{validate_dimensions, validate_probability};
use crate::error::{LifeError, Result};

/// One generation: `width * height` cells stored row-major.
///
/// A grid is never changed once built. Every operation that "modifies" a
/// grid returns a new one, so a published generation can be shared freely
/// between readers and row tasks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

/// Maps a possibly out-of-range coordinate onto `0..dimension`.
#[inline]
pub fn wrap(coord: isize, dimension: usize) -> usize {
    coord.rem_euclid(dimension as isize) as usize
}

impl Grid {
    /// An all-dead grid.
    pub fn empty(width: usize, height: usize) -> Result<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![false; width * height],
        })
    }

    /// A grid with the given cells alive. Coordinates wrap around the torus.
    pub fn from_cells<I>(width: usize, height: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = (isize, isize)>,
    {
        let mut grid = Self::empty(width, height)?;
        for (x, y) in alive {
            let index = grid.index(wrap(x, width), wrap(y, height));
            grid.cells[index] = true;
        }
        Ok(grid)
    }

    /// Samples every cell independently: alive with `alive_probability_percent` chance.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        alive_probability_percent: u32,
        rng: &mut R,
    ) -> Result<Self> {
        validate_dimensions(width, height)?;
        validate_probability(alive_probability_percent)?;
        let cells = (0..width * height)
            .map(|_| rng.random_range(0..100) < alive_probability_percent)
            .collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Assembles a grid from complete rows. Every row must be `width` long.
    pub fn from_rows(width: usize, rows: Vec<Vec<bool>>) -> Result<Self> {
        validate_dimensions(width, rows.len())?;
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(LifeError::DimensionMismatch {
                    expected: (width, height),
                    got: (row.len(), height),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Wraps already-checked cells. `cells` holds exactly `width * height` entries.
    pub(crate) fn assemble(width: usize, height: usize, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// State of the cell at `(x, y)`.
    ///
    /// # Panics
    /// If the coordinate lies outside the grid.
    #[inline]
    pub fn cell_at(&self, x: usize, y: usize) -> bool {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) outside grid");
        self.cells[self.index(x, y)]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    /// State of the cell at a wrapped coordinate.
    #[inline]
    pub fn cell_wrapped(&self, x: isize, y: isize) -> bool {
        self.cells[self.index(wrap(x, self.width), wrap(y, self.height))]
    }

    pub fn row(&self, y: usize) -> &[bool] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.contains(&true)
    }

    /// Coordinates of every live cell, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// A copy of this grid with `pattern`'s live cells switched on, its
    /// top-left corner placed at `(x, y)`. Cells wrap around the edges.
    pub fn stamp(&self, pattern: &Grid, (x, y): (isize, isize)) -> Grid {
        let mut next = self.clone();
        for (px, py) in pattern.live_cells() {
            let index = next.index(
                wrap(x + px as isize, self.width),
                wrap(y + py as isize, self.height),
            );
            next.cells[index] = true;
        }
        next
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &alive in row {
                f.write_char(if alive { 'o' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = LifeError;

    /// Parses a picture: `o`, `O`, `#` or `*` for alive, `.` or space for dead.
    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<(usize, &str)> = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
            .skip_while(|(_, line)| line.trim().is_empty())
            .collect();
        let end = lines
            .iter()
            .rposition(|(_, line)| !line.trim().is_empty())
            .map_or(0, |i| i + 1);
        let lines = &lines[..end];

        let width = lines
            .iter()
            .map(|(_, line)| line.chars().count())
            .max()
            .unwrap_or(0);
        let mut rows = Vec::with_capacity(lines.len());
        for &(line_no, line) in lines {
            let mut row = vec![false; width];
            for (column, c) in line.chars().enumerate() {
                row[column] = match c {
                    'o' | 'O' | '#' | '*' => true,
                    '.' | ' ' => false,
                    found => {
                        return Err(LifeError::InvalidPattern {
                            line: line_no,
                            column: column + 1,
                            found,
                        });
                    }
                };
            }
            rows.push(row);
        }
        Self::from_rows(width, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-1, 5), 4);
        assert_eq!(wrap(5, 5), 0);
        assert_eq!(wrap(-6, 5), 4);
        assert_eq!(wrap(2, 5), 2);
    }

    #[test]
    fn test_empty_rejects_zero_dimensions() {
        assert!(Grid::empty(0, 3).is_err());
        assert!(Grid::empty(3, 0).is_err());
        let grid = Grid::empty(3, 2).unwrap();
        assert_eq!(grid.cells().len(), 6);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_from_cells_wraps() {
        let grid = Grid::from_cells(4, 3, [(-1, -1), (4, 0)]).unwrap();
        assert!(grid.cell_at(3, 2));
        assert!(grid.cell_at(0, 0));
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Grid::random(8, 8, 0, &mut rng).unwrap().is_empty());
        assert_eq!(Grid::random(8, 8, 100, &mut rng).unwrap().population(), 64);
        assert!(Grid::random(8, 8, 101, &mut rng).is_err());
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = Grid::random(16, 16, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Grid::random(16, 16, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_and_display() {
        let grid: Grid = "
            .o.
            ..o
            ooo
        "
        .replace(' ', "")
        .parse()
        .unwrap();
        assert_eq!(grid.dimensions(), (3, 3));
        assert_eq!(grid.to_string(), ".o.\n..o\nooo\n");
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let grid: Grid = "oo\no".parse().unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert!(!grid.cell_at(1, 1));
    }

    #[test]
    fn test_parse_rejects_unknown_characters() {
        let err = "o.\n.x".parse::<Grid>().unwrap_err();
        assert!(matches!(
            err,
            LifeError::InvalidPattern {
                line: 2,
                column: 2,
                found: 'x'
            }
        ));
    }

    #[test]
    fn test_stamp() {
        let block = Grid::from_cells(2, 2, [(0, 0), (1, 0), (0, 1), (1, 1)]).unwrap();
        let grid = Grid::empty(5, 5).unwrap().stamp(&block, (4, 4));
        let live: Vec<_> = grid.live_cells().collect();
        assert_eq!(live, vec![(0, 0), (4, 0), (0, 4), (4, 4)]);
    }

    #[test]
    fn test_rows() {
        let grid = Grid::from_cells(3, 2, [(1, 1)]).unwrap();
        assert_eq!(grid.row(1), &[false, true, false]);
        assert_eq!(grid.rows().count(), 2);
        assert_eq!(grid.get(3, 0), None);
    }
}
