use std::time::Duration;

/// What a single worker should do during a run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorkerDescriptor {
    pub id: u64,
    pub iterations: u32,
    pub should_yield: bool,
    pub step_delay: Duration,
}

impl WorkerDescriptor {
    pub const fn new(id: u64, iterations: u32, step_delay: Duration) -> Self {
        Self {
            id,
            iterations,
            should_yield: false,
            step_delay,
        }
    }

    /// Marks the worker to yield its time slice before every step.
    pub const fn yielding(mut self) -> Self {
        self.should_yield = true;
        self
    }

    /// Lower bound on how long the worker's loop takes.
    pub fn min_duration(&self) -> Duration {
        self.step_delay.saturating_mul(self.iterations)
    }
}
