use std::{num::NonZeroUsize, sync::Arc};

pub type NameFn = Arc<dyn Fn(u64) -> String + Send + Sync + 'static>;
pub type ThreadHook = Arc<dyn Fn(u64) + Send + Sync + 'static>;
pub type StepHook = Arc<dyn Fn(u64, u32) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Config {
    /// Upper bound on threads spawned per run. `None` leaves it to the OS.
    pub max_threads: Option<NonZeroUsize>,
    pub stack_size: NonZeroUsize,
    pub thread_name: NameFn,
    pub on_thread_start: ThreadHook,
    pub on_thread_stop: ThreadHook,
    pub on_step: StepHook,
}

#[derive(Default)]
pub struct ConfigBuilder {
    pub max_threads: Option<NonZeroUsize>,
    pub stack_size: Option<NonZeroUsize>,
    pub thread_name: Option<NameFn>,
    pub on_thread_start: Option<ThreadHook>,
    pub on_thread_stop: Option<ThreadHook>,
    pub on_step: Option<StepHook>,
}

impl ConfigBuilder {
    const DEFAULT_STACK_SIZE: NonZeroUsize = match NonZeroUsize::new(2 * 1024 * 1024) {
        Some(stack_size) => stack_size,
        None => unreachable!(),
    };

    pub fn build(&self) -> Config {
        Config {
            max_threads: self.max_threads,
            stack_size: self.stack_size.unwrap_or(Self::DEFAULT_STACK_SIZE),
            thread_name: self
                .thread_name
                .as_ref()
                .map(|callback| callback.clone())
                .unwrap_or_else(|| Arc::new(|id: u64| format!("worker-{}", id))),
            on_thread_start: self
                .on_thread_start
                .as_ref()
                .map(|callback| callback.clone())
                .unwrap_or_else(|| Arc::new(|_: u64| {})),
            on_thread_stop: self
                .on_thread_stop
                .as_ref()
                .map(|callback| callback.clone())
                .unwrap_or_else(|| Arc::new(|_: u64| {})),
            on_step: self
                .on_step
                .as_ref()
                .map(|callback| callback.clone())
                .unwrap_or_else(|| Arc::new(|_: u64, _: u32| {})),
        }
    }
}
