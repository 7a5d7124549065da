use super::{
    config::Config,
    descriptor::WorkerDescriptor,
    gate::Gate,
    log::LogBuffer,
    report::WorkerResult,
    worker::{Worker, WorkerOutput, WorkerState},
};
use crate::error::{Error, Result};
use std::{
    mem,
    num::NonZeroUsize,
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

/// Owns one worker thread and joins it when dropped.
pub struct WorkerHandle {
    id: u64,
    thread: Option<JoinHandle<Option<WorkerOutput>>>,
}

impl WorkerHandle {
    pub fn spawn(config: &Config, gate: &Arc<Gate>, descriptor: WorkerDescriptor) -> Result<Self> {
        let id = descriptor.id;
        let config = config.clone();
        let gate = gate.clone();

        thread::Builder::new()
            .name((config.thread_name)(id))
            .stack_size(config.stack_size.get())
            .spawn(move || Worker::new(descriptor).run(&config, &gate))
            .map(|thread| Self {
                id,
                thread: Some(thread),
            })
            .map_err(|source| Error::Spawn { id, source })
    }

    /// Waits for the worker and turns whatever it left behind into a result.
    ///
    /// Panics from the loop and from the thread hooks are caught by the worker
    /// itself. A thread that still dies without reporting has no observed
    /// elapsed time, so it is reported as failed with a zero duration.
    pub fn join(mut self) -> (WorkerResult, Option<LogBuffer>) {
        let joined = self.thread.take().map(|thread| thread.join());

        match joined {
            Some(Ok(Some(output))) => (
                WorkerResult {
                    id: self.id,
                    elapsed: output.elapsed,
                    completed: output.state == WorkerState::Completed,
                    steps: output.steps,
                },
                Some(output.log),
            ),
            _ => (
                WorkerResult {
                    id: self.id,
                    elapsed: Duration::ZERO,
                    completed: false,
                    steps: 0,
                },
                None,
            ),
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// The workers of a single run.
///
/// Dropping the set before [`WorkerSet::join_all`] aborts the start gate, so
/// workers that are still waiting return without running, and then joins
/// every thread.
pub struct WorkerSet {
    gate: Arc<Gate>,
    handles: Vec<WorkerHandle>,
}

impl WorkerSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            gate: Arc::new(Gate::default()),
            handles: Vec::with_capacity(capacity),
        }
    }

    pub fn spawn(&mut self, config: &Config, descriptor: WorkerDescriptor) -> Result<()> {
        if let Some(max_threads) = config.max_threads.map(NonZeroUsize::get) {
            if self.handles.len() >= max_threads {
                return Err(Error::ThreadLimit {
                    id: descriptor.id,
                    max_threads,
                });
            }
        }

        let handle = WorkerHandle::spawn(config, &self.gate, descriptor)?;
        self.handles.push(handle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Releases every worker and joins them in spawn order.
    pub fn join_all(mut self) -> Vec<(WorkerResult, Option<LogBuffer>)> {
        self.gate.open();

        mem::take(&mut self.handles)
            .into_iter()
            .map(WorkerHandle::join)
            .collect()
    }
}

impl Drop for WorkerSet {
    fn drop(&mut self) {
        self.gate.abort();
        self.handles.clear();
    }
}
