use std::{process, time::Duration};
use tracing_subscriber::EnvFilter;
use worker_harness::{harness::log_panics, Harness, WorkerDescriptor};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();
    log_panics();

    let step_delay = Duration::from_millis(100);
    let descriptors = [
        WorkerDescriptor::new(1, 10, step_delay).yielding(),
        WorkerDescriptor::new(2, 10, step_delay),
        WorkerDescriptor::new(3, 10, step_delay),
    ];

    let report = match Harness::default().run(&descriptors) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("harness failed: {}", err);
            process::exit(1);
        }
    };

    for result in &report {
        match result.completed {
            true => println!(
                "Thread {} finished execution in {} milliseconds",
                result.id,
                result.elapsed.as_millis()
            ),
            false => println!(
                "Thread {} failed after {} milliseconds",
                result.id,
                result.elapsed.as_millis()
            ),
        }
    }
}
