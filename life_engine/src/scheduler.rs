// scheduler.rs - Fan-out/fan-in generation advance over a tokio worker pool

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, trace};
use tokio::runtime::{Builder, Runtime};
use tokio::task::{JoinError, JoinHandle};

use crate::config::LifeConfig;
use crate::error::{LifeError, Result};
use crate::grid::Grid;
use crate::rules;

pub(crate) type RowFn = fn(&Grid, usize) -> Vec<bool>;

/// Computes whole generations by running one task per row.
///
/// The scheduler owns its worker pool and reuses it for every generation.
/// [`advance`](Self::advance) blocks, so it must not be called from inside
/// another tokio runtime; use [`compute_generation`] there instead.
pub struct GenerationScheduler {
    runtime: Runtime,
    worker_threads: usize,
    row_fn: RowFn,
}

impl GenerationScheduler {
    pub fn new(worker_threads: usize) -> Result<Self> {
        if worker_threads == 0 {
            return Err(LifeError::invalid_config("worker thread count must be positive"));
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads)
            .thread_name("life-row")
            .build()?;
        debug!("generation scheduler started with {worker_threads} worker threads");
        Ok(Self {
            runtime,
            worker_threads,
            row_fn: rules::compute_row,
        })
    }

    /// Swaps the per-row computation, so tests can make a row task fail.
    #[cfg(test)]
    pub(crate) fn with_row_fn(mut self, row_fn: RowFn) -> Self {
        self.row_fn = row_fn;
        self
    }

    pub fn from_config(config: &LifeConfig) -> Result<Self> {
        Self::new(config.resolved_worker_threads())
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Next generation after `snapshot`. Returns once every row has reported.
    pub fn advance(&self, snapshot: Arc<Grid>) -> Result<Grid> {
        let started = Instant::now();
        let next = self.runtime.block_on(fan_out(snapshot, self.row_fn))?;
        trace!(
            "generation of {} rows computed in {:?}",
            next.height(),
            started.elapsed()
        );
        Ok(next)
    }
}

/// Next generation after `snapshot`, for callers already inside a runtime.
pub async fn compute_generation(snapshot: Arc<Grid>) -> Result<Grid> {
    fan_out(snapshot, rules::compute_row).await
}

/// Row coroutine: computes one row and reports it with its index.
async fn process_row(row_index: usize, snapshot: Arc<Grid>, row_fn: RowFn) -> (usize, Vec<bool>) {
    (row_index, row_fn(&snapshot, row_index))
}

async fn fan_out(snapshot: Arc<Grid>, row_fn: RowFn) -> Result<Grid> {
    let (width, height) = snapshot.dimensions();

    // Spawn every row at once; they all share the same read-only snapshot
    let handles: Vec<JoinHandle<(usize, Vec<bool>)>> = (0..height)
        .map(|row| tokio::spawn(process_row(row, Arc::clone(&snapshot), row_fn)))
        .collect();

    // Barrier: nothing is assembled until all rows are back
    let mut slots: Vec<Option<Vec<bool>>> = vec![None; height];
    let mut pending = handles.into_iter().enumerate();
    while let Some((row, handle)) = pending.next() {
        match handle.await {
            Ok((row_index, completed_row)) => {
                debug_assert_eq!(completed_row.len(), width);
                slots[row_index] = Some(completed_row);
            }
            Err(err) => {
                for (_, rest) in pending.by_ref() {
                    rest.abort();
                }
                let failure = task_failure(row, err);
                error!("{failure}");
                return Err(failure);
            }
        }
    }

    let mut cells = Vec::with_capacity(width * height);
    for (row, slot) in slots.into_iter().enumerate() {
        let completed_row = slot.ok_or_else(|| LifeError::TaskFailure {
            row,
            reason: "row never reported".into(),
        })?;
        cells.extend(completed_row);
    }
    Ok(Grid::assemble(width, height, cells))
}

fn task_failure(row: usize, err: JoinError) -> LifeError {
    let reason = if err.is_cancelled() {
        "cancelled".to_string()
    } else {
        panic_message(err.into_panic())
    };
    LifeError::TaskFailure { row, reason }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "panicked".to_string(),
        },
    }
}
