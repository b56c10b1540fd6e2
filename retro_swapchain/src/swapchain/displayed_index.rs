/// Displayed index - the one piece of state shared with the frontend's thread
///
/// `present` publishes the index it just handed to the frontend; a host-side
/// callback running on the frontend's presentation thread reads it, or blocks
/// on the condition variable until the next publication.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct DisplayState {
    /// Last published sync index, `None` until the first present after a create
    index: Option<u32>,
    /// Bumped on every publication
    generation: u64,
}

/// Mutex-guarded displayed index with a wait/notify primitive
///
/// Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct DisplayedIndex {
    shared: Arc<(Mutex<DisplayState>, Condvar)>,
}

impl DisplayedIndex {
    /// Create a new displayed index with no image published
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        // The guarded value is plain data, a poisoned lock is still consistent
        self.shared.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Index currently displayed, if any
    pub fn current(&self) -> Option<u32> {
        self.state().index
    }

    /// Number of publications so far
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    /// Forget the displayed index (every recreation)
    pub(crate) fn reset(&self) {
        let mut state = self.state();
        state.index = None;
        state.generation += 1;
        self.shared.1.notify_all();
    }

    /// Publish `index`, running `handoff` while the lock is held
    ///
    /// Waiters are woken after `handoff` returns.
    pub(crate) fn publish_with<F: FnOnce()>(&self, index: u32, handoff: F) {
        let mut state = self.state();
        handoff();
        state.index = Some(index);
        state.generation += 1;
        drop(state);
        self.shared.1.notify_all();
    }

    /// Block until an index newer than generation `seen` is published
    ///
    /// Returns the new generation and the published index. A reset does not
    /// wake the caller unless an index follows it.
    pub fn wait_for_next(&self, seen: u64) -> (u64, u32) {
        let mut state = self.state();
        loop {
            if state.generation > seen {
                if let Some(index) = state.index {
                    return (state.generation, index);
                }
            }
            state = self
                .shared
                .1
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// [`wait_for_next`](Self::wait_for_next) with an upper bound on the wait
    ///
    /// Returns `None` on timeout. A timeout past the clock's range waits
    /// without bound.
    pub fn wait_for_next_timeout(&self, seen: u64, timeout: Duration) -> Option<(u64, u32)> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Some(self.wait_for_next(seen));
        };
        let mut state = self.state();
        loop {
            if state.generation > seen {
                if let Some(index) = state.index {
                    return Some((state.generation, index));
                }
            }
            let remaining = deadline.checked_duration_since(Instant::now())?;
            if remaining.is_zero() {
                return None;
            }
            let (guard, _) = self
                .shared
                .1
                .wait_timeout(state, remaining)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state = guard;
        }
    }
}

#[cfg(test)]
#[path = "displayed_index_tests.rs"]
mod tests;
