mod builder;
mod config;
mod descriptor;
mod gate;
mod handle;
mod log;
mod report;
mod worker;

pub use self::{
    builder::Builder,
    config::Config,
    descriptor::WorkerDescriptor,
    log::{log_panics, LogBuffer, LogRecord},
    report::{HarnessReport, WorkerResult},
    worker::WorkerState,
};

use self::handle::WorkerSet;
use crate::error::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Spawns one thread per [`WorkerDescriptor`], waits for all of them and
/// reports their results in input order.
pub struct Harness {
    config: Config,
}

impl Default for Harness {
    fn default() -> Self {
        Builder::new().build()
    }
}

impl Harness {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, descriptors: &[WorkerDescriptor]) -> Result<HarnessReport> {
        if descriptors.is_empty() {
            debug!("no workers requested");
            return Ok(HarnessReport::default());
        }

        let mut seen = HashSet::with_capacity(descriptors.len());
        if let Some(duplicate) = descriptors.iter().find(|d| !seen.insert(d.id)) {
            return Err(Error::DuplicateId(duplicate.id));
        }

        // Returning early drops the set, which aborts and joins whatever
        // was already spawned.
        let mut workers = WorkerSet::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if let Err(err) = workers.spawn(&self.config, *descriptor) {
                let spawned = workers.len();
                warn!(worker = descriptor.id, spawned, "spawn failed: {}", err);
                return Err(err);
            }
        }

        debug!(
            workers = workers.len(),
            cpus = num_cpus::get(),
            "workers spawned"
        );

        let results = workers
            .join_all()
            .into_iter()
            .map(|(result, log)| {
                if let Some(log) = log {
                    log.flush(result.id);
                }

                let (worker, steps) = (result.id, result.steps);
                let elapsed_ms = result.elapsed.as_millis() as u64;
                match result.completed {
                    true => info!(worker, elapsed_ms, steps, "worker completed"),
                    false => warn!(worker, elapsed_ms, steps, "worker failed"),
                }

                result
            })
            .collect();

        Ok(HarnessReport::new(results))
    }
}

/// Runs `descriptors` with the default configuration.
pub fn run(descriptors: &[WorkerDescriptor]) -> Result<HarnessReport> {
    Harness::default().run(descriptors)
}
