use super::config::{ConcurrencyMode, ReplicationConfig};
use crate::core::errors::{SimResult, SimulationError};
use log::info;
use rayon::prelude::*;

/// Execute `config.runs` independent simulations and collect their results in
/// run order.
///
/// `run` receives the run index and that run's seed and must build its own
/// processor and entities; nothing mutable is shared between runs. If any run
/// fails, an error from a failing run is returned.
pub fn run_replications<T, F>(config: &ReplicationConfig, run: F) -> SimResult<Vec<T>>
where
    T: Send,
    F: Fn(usize, u64) -> SimResult<T> + Sync,
{
    info!(
        "Running {} replication(s) in {:?} mode",
        config.runs, config.concurrency_mode
    );

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => (0..config.runs)
            .map(|index| run(index, config.seed_for(index)))
            .collect(),
        ConcurrencyMode::Rayon => {
            let execute = || {
                (0..config.runs)
                    .into_par_iter()
                    .map(|index| run(index, config.seed_for(index)))
                    .collect::<SimResult<Vec<T>>>()
            };
            match config.thread_pool_size {
                Some(size) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(size)
                        .build()
                        .map_err(|e| SimulationError::InvalidConfig(e.to_string()))?;
                    pool.install(execute)
                }
                None => execute(),
            }
        }
    }
}
