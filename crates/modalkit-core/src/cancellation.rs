//! Per-run resolution signal for offloaded animation runs.
//!
//! A [`RunSignal`] is shared between the driver and the worker of one run.
//! It holds the run's [`RunState`] and is the single place where the
//! finish-vs-cancel race is decided: the worker calls
//! [`finish`](RunSignal::finish), the driver calls
//! [`cancel`](RunSignal::cancel), and only the first of the two leaves
//! `Running`.
//!
//! # Invariants
//!
//! 1. A signal leaves `Running` at most once; later `finish`/`cancel` calls
//!    return `false` and change nothing.
//! 2. [`wait_frame`](RunSignal::wait_frame) returns as soon as the state is
//!    `Cancelled`, without waiting out the frame.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use modalkit_core::cancellation::RunSignal;
//!
//! let signal = Arc::new(RunSignal::new());
//! let worker = {
//!     let signal = Arc::clone(&signal);
//!     std::thread::spawn(move || {
//!         let mut frames = 0;
//!         while !signal.wait_frame(Duration::from_millis(5)) {
//!             frames += 1;
//!         }
//!         frames
//!     })
//! };
//!
//! std::thread::sleep(Duration::from_millis(20));
//! assert!(signal.cancel());
//! assert!(!signal.finish());
//! assert!(worker.join().unwrap() > 0);
//! ```

#![forbid(unsafe_code)]

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// The worker reached the run's duration first.
    Finished,
    /// The driver stopped the run first.
    Cancelled,
}

/// Resolution state of one run plus a wakeup for its sleeping worker.
#[derive(Debug)]
pub struct RunSignal {
    state: Mutex<RunState>,
    wake: Condvar,
}

impl Default for RunSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSignal {
    /// A signal in `Running`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunState::Running),
            wake: Condvar::new(),
        }
    }

    // A panicking worker must not wedge the driver, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, to: RunState) -> bool {
        let mut state = self.lock();
        if *state != RunState::Running {
            return false;
        }
        *state = to;
        true
    }

    /// Claim the run as finished. Returns `false` if it was already resolved.
    pub fn finish(&self) -> bool {
        self.resolve(RunState::Finished)
    }

    /// Claim the run as cancelled and wake its worker. Returns `false` if it
    /// was already resolved, in which case the worker is left alone.
    pub fn cancel(&self) -> bool {
        let won = self.resolve(RunState::Cancelled);
        if won {
            self.wake.notify_all();
        }
        won
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        *self.lock()
    }

    /// Sleep for up to `frame` while the run is `Running`.
    ///
    /// Returns `true` if the run was cancelled.
    pub fn wait_frame(&self, frame: Duration) -> bool {
        let guard = self.lock();
        let (state, _) = self
            .wake
            .wait_timeout_while(guard, frame, |state| *state == RunState::Running)
            .unwrap_or_else(PoisonError::into_inner);
        *state == RunState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn starts_running() {
        assert_eq!(RunSignal::new().state(), RunState::Running);
    }

    #[test]
    fn finish_then_cancel_keeps_finished() {
        let signal = RunSignal::new();
        assert!(signal.finish());
        assert!(!signal.cancel());
        assert!(!signal.finish());
        assert_eq!(signal.state(), RunState::Finished);
    }

    #[test]
    fn cancel_then_finish_keeps_cancelled() {
        let signal = RunSignal::default();
        assert!(signal.cancel());
        assert!(!signal.finish());
        assert!(!signal.cancel());
        assert_eq!(signal.state(), RunState::Cancelled);
    }

    #[test]
    fn wait_frame_times_out_while_running() {
        let signal = RunSignal::new();
        assert!(!signal.wait_frame(Duration::from_millis(5)));
        assert_eq!(signal.state(), RunState::Running);
    }

    #[test]
    fn wait_frame_short_circuits_after_cancel() {
        let signal = RunSignal::new();
        signal.cancel();
        let started = Instant::now();
        assert!(signal.wait_frame(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn wait_frame_after_finish_is_not_cancelled() {
        let signal = RunSignal::new();
        signal.finish();
        assert!(!signal.wait_frame(Duration::from_secs(10)));
    }

    #[test]
    fn cancel_wakes_sleeping_worker() {
        let signal = Arc::new(RunSignal::new());
        let worker = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait_frame(Duration::from_secs(10)))
        };
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        assert!(signal.cancel());
        assert!(worker.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn exactly_one_side_wins_a_race() {
        for _ in 0..50 {
            let signal = Arc::new(RunSignal::new());
            let finisher = {
                let signal = Arc::clone(&signal);
                thread::spawn(move || signal.finish())
            };
            let cancelled = signal.cancel();
            let finished = finisher.join().unwrap();
            assert!(cancelled ^ finished);
        }
    }
}
