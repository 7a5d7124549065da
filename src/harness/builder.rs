use super::{config::ConfigBuilder, Harness};
use std::{num::NonZeroUsize, sync::Arc};

#[derive(Default)]
pub struct Builder {
    config: ConfigBuilder,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of worker threads a single run may spawn.
    /// Zero removes the cap, which is the default.
    pub fn max_threads(&mut self, max_threads: usize) -> &mut Self {
        self.config.max_threads = NonZeroUsize::new(max_threads);
        self
    }

    /// Zero restores the default.
    pub fn stack_size(&mut self, stack_size: usize) -> &mut Self {
        self.config.stack_size = NonZeroUsize::new(stack_size);
        self
    }

    pub fn thread_name<F>(&mut self, thread_name: F) -> &mut Self
    where
        F: Fn(u64) -> String + Send + Sync + 'static,
    {
        self.config.thread_name = Some(Arc::new(thread_name));
        self
    }

    /// Runs on the worker thread before it waits to be released.
    ///
    /// Platform specific thread setup, such as adjusting the scheduling
    /// priority, belongs here.
    pub fn on_thread_start<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.config.on_thread_start = Some(Arc::new(callback));
        self
    }

    /// Runs on the worker thread after its loop ends, failed or not.
    pub fn on_thread_stop<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.config.on_thread_stop = Some(Arc::new(callback));
        self
    }

    /// Runs at the start of every step with the worker id and step index.
    /// A panic here fails that worker only.
    pub fn on_step<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(u64, u32) + Send + Sync + 'static,
    {
        self.config.on_step = Some(Arc::new(callback));
        self
    }

    pub fn build(&self) -> Harness {
        Harness {
            config: self.config.build(),
        }
    }
}
