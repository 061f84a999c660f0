// state.rs - Ownership of the current generation

use std::sync::Arc;

use log::debug;
use rand::Rng;

use crate::error::{LifeError, Result};
use crate::grid::Grid;

/// Holds the authoritative current generation.
///
/// The grid is published behind an `Arc`, so a snapshot handed out before a
/// replacement keeps showing the generation it was taken from.
#[derive(Debug, Clone)]
pub struct GridState {
    current: Arc<Grid>,
}

impl GridState {
    /// Builds the first generation by sampling every cell independently.
    pub fn initialize<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        alive_probability_percent: u32,
        rng: &mut R,
    ) -> Result<Self> {
        let grid = Grid::random(width, height, alive_probability_percent, rng)?;
        debug!(
            "initialized {width}x{height} grid at {alive_probability_percent}% density, {} alive",
            grid.population()
        );
        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            current: Arc::new(grid),
        }
    }

    /// The grid as of the last completed advance.
    pub fn current_snapshot(&self) -> Arc<Grid> {
        Arc::clone(&self.current)
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.current.dimensions()
    }

    /// Swaps in a fully computed generation. Dimensions never change.
    pub fn replace(&mut self, next: Grid) -> Result<()> {
        if next.dimensions() != self.dimensions() {
            return Err(LifeError::DimensionMismatch {
                expected: self.dimensions(),
                got: next.dimensions(),
            });
        }
        self.current = Arc::new(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_initialize_validates() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(GridState::initialize(0, 4, 50, &mut rng).is_err());
        assert!(GridState::initialize(4, 0, 50, &mut rng).is_err());
        assert!(matches!(
            GridState::initialize(4, 4, 150, &mut rng),
            Err(LifeError::InvalidConfiguration { .. })
        ));
        let state = GridState::initialize(7, 3, 50, &mut rng).unwrap();
        assert_eq!(state.dimensions(), (7, 3));
    }

    #[test]
    fn test_old_snapshot_survives_replace() {
        let mut state = GridState::from_grid(Grid::empty(3, 3).unwrap());
        let before = state.current_snapshot();
        state.replace(Grid::from_cells(3, 3, [(1, 1)]).unwrap()).unwrap();
        assert!(before.is_empty());
        assert_eq!(state.current_snapshot().population(), 1);
    }

    #[test]
    fn test_replace_rejects_other_dimensions() {
        let mut state = GridState::from_grid(Grid::empty(3, 3).unwrap());
        let err = state.replace(Grid::empty(4, 3).unwrap()).unwrap_err();
        assert!(matches!(err, LifeError::DimensionMismatch { .. }));
        assert_eq!(state.dimensions(), (3, 3));
    }
}
