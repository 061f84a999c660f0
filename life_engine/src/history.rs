// history.rs - Cycle detection over recent generations

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

pub const DEFAULT_HISTORY_LEN: usize = 10;

/// Remembers hashes of the last few generations to spot repeats.
///
/// Only hashes are kept, so a period longer than the ring goes unnoticed.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    hashes: Vec<u64>,
    next: usize,
    seen: usize,
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl CycleDetector {
    pub fn new(len: usize) -> Self {
        Self {
            hashes: vec![0; len.max(1)],
            next: 0,
            seen: 0,
        }
    }

    pub fn hash_grid(grid: &Grid) -> u64 {
        let mut hasher = DefaultHasher::new();
        grid.hash(&mut hasher);
        hasher.finish()
    }

    /// Records `grid`. Returns the period if it matches a remembered generation.
    pub fn observe(&mut self, grid: &Grid) -> Option<usize> {
        let hash = Self::hash_grid(grid);
        let len = self.hashes.len();
        let remembered = self.seen.min(len);
        let period = (1..=remembered).find(|&back| self.hashes[(self.next + len - back) % len] == hash);

        self.hashes[self.next] = hash;
        self.next = (self.next + 1) % len;
        self.seen += 1;
        period
    }

    pub fn clear(&mut self) {
        self.hashes.fill(0);
        self.next = 0;
        self.seen = 0;
    }
}
