//! Conway's Game of Life on a torus, advanced one generation per tick with
//! every row computed concurrently.
//!
//! - [`Grid`] - immutable generation, shared as `Arc<Grid>`
//! - [`rules`] - toroidal neighbor counting and the B3/S23 transition rule
//! - [`GenerationScheduler`] - one task per row, blocking until all rows report
//! - [`GridState`] - owner of the current generation
//! - [`UpdateGate`] - rate limit on advances, driven by an injectable [`Clock`]
//! - [`Simulation`] - all of the above behind [`LifeInterface`]
//!
//! # Example
//!
//! ```
//! use life_engine::{LifeConfig, LifeInterface, Simulation};
//!
//! let config = LifeConfig::new(64, 48, 30).with_seed(7);
//! let mut life = Simulation::new(&config).unwrap();
//! life.step().unwrap();
//! assert_eq!(life.dimensions(), (64, 48));
//! assert_eq!(life.generation(), 1);
//! ```

pub mod config;
mod error;
pub mod gate;
mod grid;
pub mod history;
pub mod patterns;
pub mod rules;
pub mod scheduler;
mod simulation;
mod state;

pub use config::LifeConfig;
pub use error::{LifeError, Result};
pub use gate::{Clock, GateState, ManualClock, SystemClock, UpdateGate};
pub use grid::{Grid, wrap};
pub use history::CycleDetector;
pub use patterns::{PATTERNS, Pattern};
pub use scheduler::{GenerationScheduler, compute_generation};
pub use simulation::{LifeInterface, Simulation};
pub use state::GridState;
