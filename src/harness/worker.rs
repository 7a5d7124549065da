use super::{config::Config, descriptor::WorkerDescriptor, gate::Gate, log::LogBuffer};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    thread,
    time::{Duration, Instant},
};
use tracing::Level;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WorkerState {
    Created,
    Running,
    Completed,
    Failed,
}

impl WorkerState {
    fn transition(&mut self, new_state: WorkerState) {
        let valid = match (*self, new_state) {
            (Self::Created, Self::Running) | (Self::Created, Self::Failed) => true,
            (Self::Running, Self::Completed) | (Self::Running, Self::Failed) => true,
            _ => false,
        };

        assert!(valid, "invalid worker transition {:?} -> {:?}", self, new_state);
        *self = new_state;
    }
}

pub struct WorkerOutput {
    pub state: WorkerState,
    pub steps: u32,
    pub elapsed: Duration,
    pub log: LogBuffer,
}

pub struct Worker {
    descriptor: WorkerDescriptor,
    state: WorkerState,
    steps: u32,
}

impl Worker {
    pub fn new(descriptor: WorkerDescriptor) -> Self {
        Self {
            descriptor,
            state: WorkerState::Created,
            steps: 0,
        }
    }

    /// Thread entry point. Returns `None` if the run was aborted before the
    /// worker was released.
    ///
    /// A panic in `on_thread_start` fails the worker before its loop, timed
    /// from thread entry. A panic in `on_thread_stop` is logged and leaves the
    /// loop's outcome as it was.
    pub fn run(mut self, config: &Config, gate: &Gate) -> Option<WorkerOutput> {
        let id = self.descriptor.id;
        let entered = Instant::now();
        let setup = panic::catch_unwind(AssertUnwindSafe(|| (config.on_thread_start)(id)))
            .map_err(|payload| (entered.elapsed(), payload));

        let output = match (gate.wait(), setup) {
            (false, _) => None,
            (true, Ok(())) => Some(self.execute(config)),
            (true, Err((elapsed, payload))) => {
                Some(self.fail_setup(entered, elapsed, payload.as_ref()))
            }
        };

        self.stop(config, output)
    }

    fn fail_setup(
        &mut self,
        entered: Instant,
        elapsed: Duration,
        payload: &(dyn Any + Send),
    ) -> WorkerOutput {
        let mut log = LogBuffer::new(entered);
        self.state.transition(WorkerState::Failed);
        log.push(
            Level::ERROR,
            format!("on_thread_start panicked: {}", panic_message(payload)),
        );

        WorkerOutput {
            state: self.state,
            steps: 0,
            elapsed,
            log,
        }
    }

    fn stop(&self, config: &Config, mut output: Option<WorkerOutput>) -> Option<WorkerOutput> {
        let id = self.descriptor.id;
        let stopped = panic::catch_unwind(AssertUnwindSafe(|| (config.on_thread_stop)(id)));

        if let (Err(payload), Some(output)) = (stopped, output.as_mut()) {
            output.log.push(
                Level::ERROR,
                format!("on_thread_stop panicked: {}", panic_message(payload.as_ref())),
            );
        }

        output
    }

    fn execute(&mut self, config: &Config) -> WorkerOutput {
        let WorkerDescriptor {
            id,
            iterations,
            should_yield,
            step_delay,
        } = self.descriptor;

        let started = Instant::now();
        let mut log = LogBuffer::new(started);
        self.state.transition(WorkerState::Running);
        log.push(
            Level::DEBUG,
            match should_yield {
                true => format!("running {} iterations, yielding before each", iterations),
                false => format!("running {} iterations", iterations),
            },
        );

        let steps = &mut self.steps;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            for step in 0..iterations {
                (config.on_step)(id, step);

                if should_yield {
                    thread::yield_now();
                }

                thread::sleep(step_delay);
                *steps += 1;
            }
        }));

        let elapsed = started.elapsed();
        match result {
            Ok(()) => {
                self.state.transition(WorkerState::Completed);
                log.push(Level::DEBUG, "completed");
            }
            Err(payload) => {
                self.state.transition(WorkerState::Failed);
                log.push(
                    Level::ERROR,
                    format!(
                        "panicked after {} steps: {}",
                        self.steps,
                        panic_message(payload.as_ref())
                    ),
                );
            }
        }

        WorkerOutput {
            state: self.state,
            steps: self.steps,
            elapsed,
            log,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
