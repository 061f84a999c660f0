// config.rs - Simulation configuration

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::{LifeError, Result};

// Defaults for a fresh simulation
pub const DEFAULT_WIDTH: usize = 360;                          // Grid columns
pub const DEFAULT_HEIGHT: usize = 360;                         // Grid rows
pub const DEFAULT_ALIVE_PROBABILITY_PERCENT: u32 = 70;         // Initial population density
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60); // 60 gen/sec
pub const MAX_ALIVE_PROBABILITY_PERCENT: u32 = 100;

/// Everything needed to start a simulation. Validated once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeConfig {
    /// Logical grid columns.
    pub width: usize,
    /// Logical grid rows.
    pub height: usize,
    /// Chance, in percent, that each cell starts alive.
    pub alive_probability_percent: u32,
    /// Minimum time between two generation advances.
    pub update_interval: Duration,
    /// Seed for the initial population. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Worker threads for row tasks. `None` uses one per CPU.
    pub worker_threads: Option<usize>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            alive_probability_percent: DEFAULT_ALIVE_PROBABILITY_PERCENT,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            seed: None,
            worker_threads: None,
        }
    }
}

impl LifeConfig {
    pub fn new(width: usize, height: usize, alive_probability_percent: u32) -> Self {
        Self {
            width,
            height,
            alive_probability_percent,
            ..Self::default()
        }
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Sets the interval from a target rate in generations per second.
    pub fn with_rate(self, generations_per_second: u32) -> Self {
        let interval = match generations_per_second {
            0 => Duration::ZERO,
            n => Duration::from_secs(1) / n,
        };
        self.with_update_interval(interval)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Checks every field, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height)?;
        validate_probability(self.alive_probability_percent)?;
        if self.update_interval.is_zero() {
            return Err(LifeError::invalid_config("update interval must be non-zero"));
        }
        if self.worker_threads == Some(0) {
            return Err(LifeError::invalid_config("worker thread count must be positive"));
        }
        Ok(())
    }

    /// Worker thread count, falling back to the available parallelism.
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}

pub(crate) fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 {
        return Err(LifeError::invalid_config("width must be positive"));
    }
    if height == 0 {
        return Err(LifeError::invalid_config("height must be positive"));
    }
    if width.checked_mul(height).is_none() {
        return Err(LifeError::invalid_config(format!(
            "{width}x{height} grid does not fit in memory"
        )));
    }
    Ok(())
}

pub(crate) fn validate_probability(percent: u32) -> Result<()> {
    if percent > MAX_ALIVE_PROBABILITY_PERCENT {
        return Err(LifeError::invalid_config(format!(
            "alive probability {percent}% is outside 0..=100"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LifeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dimensions(), (360, 360));
        assert_eq!(config.update_interval.as_micros(), 16_666);
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(LifeConfig::new(0, 10, 50).validate().is_err());
        assert!(LifeConfig::new(10, 0, 50).validate().is_err());
        assert!(LifeConfig::new(10, 10, 101).validate().is_err());
        assert!(LifeConfig::new(10, 10, 50).with_rate(0).validate().is_err());
        assert!(LifeConfig::new(10, 10, 50).with_worker_threads(0).validate().is_err());
    }

    #[test]
    fn test_probability_bounds_are_inclusive() {
        assert!(LifeConfig::new(4, 4, 0).validate().is_ok());
        assert!(LifeConfig::new(4, 4, 100).validate().is_ok());
    }

    #[test]
    fn test_rate() {
        let config = LifeConfig::default().with_rate(10);
        assert_eq!(config.update_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_resolved_worker_threads() {
        assert_eq!(LifeConfig::default().with_worker_threads(3).resolved_worker_threads(), 3);
        assert!(LifeConfig::default().resolved_worker_threads() >= 1);
    }
}
