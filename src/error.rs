use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to spawn worker {id}: {source}")]
    Spawn {
        id: u64,
        #[source]
        source: io::Error,
    },

    #[error("cannot spawn worker {id}: thread limit of {max_threads} reached")]
    ThreadLimit { id: u64, max_threads: usize },

    #[error("worker id {0} appears more than once")]
    DuplicateId(u64),
}

impl Error {
    /// Whether the error came from failing to create a worker thread.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::Spawn { .. } | Self::ThreadLimit { .. })
    }
}
