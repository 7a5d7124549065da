use std::{
    panic, thread,
    time::{Duration, Instant},
};
use tracing::Level;

/// Replaces the process panic hook with one that reports through `tracing`.
///
/// Worker panics are caught and recorded in the worker's [`LogBuffer`], but
/// the default hook still writes its own message to stderr from the panicking
/// thread. Binaries that want all output to go through the subscriber call
/// this once at startup.
pub fn log_panics() {
    panic::set_hook(Box::new(|info| {
        let thread = thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        tracing::error!(thread, "{}", info);
    }));
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub at: Duration,
    pub level: Level,
    pub message: String,
}

/// Records produced by a single worker while it runs.
///
/// Workers never write to the shared output directly. The harness takes the
/// buffer back after joining the worker and replays it through `tracing`,
/// tagged with the worker id, so output from different workers never
/// interleaves mid-record.
#[derive(Debug)]
pub struct LogBuffer {
    started: Instant,
    records: Vec<LogRecord>,
}

impl LogBuffer {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.records.push(LogRecord {
            at: self.started.elapsed(),
            level,
            message: message.into(),
        });
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn flush(self, worker: u64) {
        for record in self.records {
            let at_ms = record.at.as_millis() as u64;
            let message = record.message.as_str();
            match record.level {
                Level::ERROR => tracing::error!(worker, at_ms, "{}", message),
                Level::WARN => tracing::warn!(worker, at_ms, "{}", message),
                Level::INFO => tracing::info!(worker, at_ms, "{}", message),
                Level::DEBUG => tracing::debug!(worker, at_ms, "{}", message),
                _ => tracing::trace!(worker, at_ms, "{}", message),
            }
        }
    }
}
