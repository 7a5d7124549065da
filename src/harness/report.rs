use std::{slice, time::Duration, vec};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WorkerResult {
    pub id: u64,
    /// Time from the start of the worker's loop to its end, or to the point
    /// where it failed when `completed` is false.
    pub elapsed: Duration,
    pub completed: bool,
    /// Number of loop steps that finished.
    pub steps: u32,
}

/// One [`WorkerResult`] per descriptor, in the order the descriptors were given.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HarnessReport {
    results: Vec<WorkerResult>,
}

impl HarnessReport {
    pub(super) fn new(results: Vec<WorkerResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WorkerResult> {
        self.results.get(index)
    }

    pub fn find(&self, id: u64) -> Option<&WorkerResult> {
        self.results.iter().find(|result| result.id == id)
    }

    pub fn iter(&self) -> slice::Iter<'_, WorkerResult> {
        self.results.iter()
    }

    pub fn all_completed(&self) -> bool {
        self.results.iter().all(|result| result.completed)
    }

    pub fn max_elapsed(&self) -> Duration {
        self.results
            .iter()
            .map(|result| result.elapsed)
            .max()
            .unwrap_or_default()
    }
}

impl IntoIterator for HarnessReport {
    type Item = WorkerResult;
    type IntoIter = vec::IntoIter<WorkerResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a HarnessReport {
    type Item = &'a WorkerResult;
    type IntoIter = slice::Iter<'a, WorkerResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
