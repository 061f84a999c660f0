// patterns.rs - Catalogue of well-known starting patterns

use crate::error::Result;
use crate::grid::Grid;

/// A named set of live cells, as `(x, y)` offsets from the pattern's top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(isize, isize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "Toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
            (0, 2), (5, 2), (7, 2), (12, 2),
            (0, 3), (5, 3), (7, 3), (12, 3),
            (0, 4), (5, 4), (7, 4), (12, 4),
            (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
            // Bottom half (mirrored)
            (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
            (0, 8), (5, 8), (7, 8), (12, 8),
            (0, 9), (5, 9), (7, 9), (12, 9),
            (0, 10), (5, 10), (7, 10), (12, 10),
            (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (24, 0), (22, 1), (24, 1),
            (12, 2), (13, 2), (20, 2), (21, 2), (34, 2), (35, 2),
            (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3),
            (0, 4), (1, 4), (10, 4), (16, 4), (20, 4), (21, 4),
            (0, 5), (1, 5), (10, 5), (14, 5), (16, 5), (17, 5), (22, 5), (24, 5),
            (10, 6), (16, 6), (24, 6),
            (11, 7), (15, 7),
            (12, 8), (13, 8),
        ],
    },
];

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Pattern {
    /// Width and height of the pattern's bounding box.
    pub fn size(&self) -> (usize, usize) {
        let width = self.cells.iter().map(|&(x, _)| x).max();
        let height = self.cells.iter().map(|&(_, y)| y).max();
        (
            width.map_or(0, |x| x as usize + 1),
            height.map_or(0, |y| y as usize + 1),
        )
    }

    /// The pattern on its own, in a grid exactly its size.
    pub fn to_grid(&self) -> Result<Grid> {
        let (width, height) = self.size();
        Grid::from_cells(width, height, self.cells.iter().copied())
    }

    /// A fresh `width` x `height` grid holding only this pattern, centered.
    pub fn centered(&self, width: usize, height: usize) -> Result<Grid> {
        let (pw, ph) = self.size();
        let origin = (
            (width as isize - pw as isize) / 2,
            (height as isize - ph as isize) / 2,
        );
        Ok(Grid::empty(width, height)?.stamp(&self.to_grid()?, origin))
    }
}
