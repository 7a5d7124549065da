use parking_lot::{Condvar, Mutex};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// One-shot start signal shared by every worker of a run.
///
/// Workers block in [`Gate::wait`] until the harness either opens the gate,
/// once every worker thread exists, or aborts it after a spawn failure.
pub struct Gate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
            cond: Condvar::new(),
        }
    }
}

impl Gate {
    pub fn open(&self) {
        self.release(GateState::Open);
    }

    pub fn abort(&self) {
        self.release(GateState::Aborted);
    }

    fn release(&self, new_state: GateState) {
        let mut state = self.state.lock();
        if *state != GateState::Closed {
            return;
        }

        *state = new_state;
        drop(state);
        self.cond.notify_all();
    }

    /// Returns `true` if the gate was opened and `false` if it was aborted.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while *state == GateState::Closed {
            self.cond.wait(&mut state);
        }

        *state == GateState::Open
    }
}
