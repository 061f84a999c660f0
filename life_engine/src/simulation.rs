// simulation.rs - Gated, parallel Game of Life on a torus

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LifeConfig;
use crate::error::{LifeError, Result};
use crate::gate::{Clock, SystemClock, UpdateGate};
use crate::grid::Grid;
use crate::history::CycleDetector;
use crate::scheduler::GenerationScheduler;
use crate::state::GridState;

/// What a host needs from the core: drive it, read it, size a surface for it.
pub trait LifeInterface {
    /// Called once per host frame. Advances one generation if the gate allows.
    /// Returns whether a generation was computed.
    fn tick(&mut self, now: Instant) -> Result<bool>;

    /// The current generation, read-only.
    fn snapshot(&self) -> Arc<Grid>;

    /// Grid width and height in cells.
    fn dimensions(&self) -> (usize, usize);
}

/// The generation-advance engine with its rate gate.
pub struct Simulation {
    state: GridState,
    scheduler: GenerationScheduler,
    gate: UpdateGate,
    clock: Box<dyn Clock>,
    // Last host timestamp and the clock reading taken with it
    anchor: (Instant, Instant),
    history: CycleDetector,
    generation: u64,
    last_cycle: Option<usize>,
    halted: bool,
}

impl Simulation {
    /// Starts a simulation on the system clock. Seeds from `config.seed` when set.
    pub fn new(config: &LifeConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_parts(config, &mut rng, Box::new(SystemClock))
    }

    /// Starts a simulation with an explicit random source and clock.
    pub fn with_parts<R: Rng + ?Sized>(
        config: &LifeConfig,
        rng: &mut R,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let state = GridState::initialize(
            config.width,
            config.height,
            config.alive_probability_percent,
            rng,
        )?;
        Self::from_state(state, config, clock)
    }

    /// Starts a simulation from a prepared first generation. The grid's own
    /// dimensions win over the ones in `config`.
    pub fn from_grid(grid: Grid, config: &LifeConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let (width, height) = grid.dimensions();
        config.validate()?;
        debug!("starting from a prepared {width}x{height} grid");
        Self::from_state(GridState::from_grid(grid), config, clock)
    }

    fn from_state(state: GridState, config: &LifeConfig, clock: Box<dyn Clock>) -> Result<Self> {
        let scheduler = GenerationScheduler::from_config(config)?;
        let started = clock.now();
        let gate = UpdateGate::new(config.update_interval, started);
        let mut history = CycleDetector::default();
        history.observe(state.current());
        Ok(Self {
            state,
            scheduler,
            gate,
            clock,
            anchor: (started, started),
            history,
            generation: 0,
            last_cycle: None,
            halted: false,
        })
    }

    /// Ticks at the injected clock's current reading.
    pub fn update(&mut self) -> Result<bool> {
        let now = self.clock.now();
        self.tick(now)
    }

    /// Advances exactly one generation, ignoring the gate.
    pub fn step(&mut self) -> Result<()> {
        self.ensure_running()?;
        let result = self.advance_once();
        let now = self.host_now();
        self.gate.reset(now);
        result
    }

    /// Replaces the whole population and starts counting again from zero.
    pub fn reset_with(&mut self, grid: Grid) -> Result<()> {
        self.state.replace(grid)?;
        self.generation = 0;
        self.last_cycle = None;
        self.history.clear();
        self.history.observe(self.state.current());
        let now = self.host_now();
        self.gate.reset(now);
        Ok(())
    }

    /// Resamples every cell with `alive_probability_percent` density.
    pub fn reseed<R: Rng + ?Sized>(&mut self, alive_probability_percent: u32, rng: &mut R) -> Result<()> {
        let (width, height) = self.dimensions();
        self.reset_with(Grid::random(width, height, alive_probability_percent, rng)?)
    }

    pub fn clear(&mut self) -> Result<()> {
        let (width, height) = self.dimensions();
        self.reset_with(Grid::empty(width, height)?)
    }

    /// Restarts the rate gate, e.g. when resuming from a pause.
    pub fn restart_gate(&mut self) {
        let now = self.host_now();
        self.gate.reset(now);
    }

    pub fn set_update_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(LifeError::invalid_config("update interval must be non-zero"));
        }
        self.gate.set_interval(interval);
        Ok(())
    }

    pub fn update_interval(&self) -> Duration {
        self.gate.interval()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.state.current().population()
    }

    /// Period of the repeat found at the last advance, if any.
    pub fn last_cycle(&self) -> Option<usize> {
        self.last_cycle
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn worker_threads(&self) -> usize {
        self.scheduler.worker_threads()
    }

    /// The present on the host's timeline: the last `tick` timestamp moved
    /// forward by however long the clock says has passed since.
    fn host_now(&self) -> Instant {
        let (host, clock) = self.anchor;
        host + self.clock.now().saturating_duration_since(clock)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.halted {
            Err(LifeError::Halted)
        } else {
            Ok(())
        }
    }

    fn advance_once(&mut self) -> Result<()> {
        let snapshot = self.state.current_snapshot();
        let next = match self.scheduler.advance(snapshot) {
            Ok(next) => next,
            Err(err) => {
                if err.is_fatal() {
                    self.halted = true;
                    error!("simulation halted at generation {}: {err}", self.generation);
                }
                return Err(err);
            }
        };
        self.state.replace(next)?;
        self.generation += 1;

        let cycle = self.history.observe(self.state.current());
        if let (Some(period), None) = (cycle, self.last_cycle) {
            info!("generation {} repeats with period {period}", self.generation);
        }
        self.last_cycle = cycle;
        Ok(())
    }
}

impl LifeInterface for Simulation {
    fn tick(&mut self, now: Instant) -> Result<bool> {
        self.ensure_running()?;
        self.anchor = (now, self.clock.now());
        if !self.gate.try_begin(now) {
            return Ok(false);
        }
        let result = self.advance_once();
        let finished = self.host_now();
        self.gate.complete(finished);
        result.map(|()| true)
    }

    fn snapshot(&self) -> Arc<Grid> {
        self.state.current_snapshot()
    }

    fn dimensions(&self) -> (usize, usize) {
        self.state.dimensions()
    }
}
