#![forbid(unsafe_code)]

//! Driver that offloads each run to a worker thread.
//!
//! Workers publish a sampled value every frame interval and send their
//! `Finished` completion over a channel. The controlling thread only sees
//! completions when it calls [`AnimationDriver::poll_completions`], so all
//! decisions stay on that thread.
//!
//! # Invariants
//!
//! - Each run resolves exactly once. Worker and canceller race on the run's
//!   [`RunSignal`]; whichever resolves it first owns the completion.
//! - Dropping the driver cancels and joins every worker.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use web_time::Instant;

use super::Interpolation;
use super::driver::{AnimationDriver, AnimationOutcome, AnimationTicket, Completion};
use crate::cancellation::RunSignal;

/// Default worker frame interval (about 60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

struct ThreadRun {
    signal: Arc<RunSignal>,
    value: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadRun {
    fn value(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Acquire))
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Worker-thread driver.
pub struct ThreadDriver {
    next_id: u64,
    frame_interval: Duration,
    runs: HashMap<AnimationTicket, ThreadRun>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    /// Completions pulled off the channel early (by `cancel`) or produced locally.
    pending: Vec<Completion>,
}

impl std::fmt::Debug for ThreadDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadDriver")
            .field("frame_interval", &self.frame_interval)
            .field("runs", &self.runs.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Default for ThreadDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadDriver {
    /// Create a driver with [`DEFAULT_FRAME_INTERVAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL)
    }

    /// Create a driver whose workers publish a value every `interval`.
    ///
    /// A zero interval is raised to 1ms.
    #[must_use]
    pub fn with_frame_interval(interval: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            next_id: 0,
            frame_interval: interval.max(Duration::from_millis(1)),
            runs: HashMap::new(),
            sender,
            receiver,
            pending: Vec::new(),
        }
    }

    /// Worker frame interval.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of runs not yet drained by `poll_completions`.
    #[must_use]
    pub fn tracked_runs(&self) -> usize {
        self.runs.len()
    }

    fn drain_channel(&mut self) {
        while let Ok(completion) = self.receiver.try_recv() {
            self.pending.push(completion);
        }
    }
}

impl AnimationDriver for ThreadDriver {
    fn start(&mut self, run: Interpolation) -> AnimationTicket {
        self.next_id += 1;
        let ticket = AnimationTicket::from_raw(self.next_id);

        let signal = Arc::new(RunSignal::new());
        let value = Arc::new(AtomicU64::new(run.from().to_bits()));
        let sender = self.sender.clone();
        let frame_interval = self.frame_interval;

        let worker_value = Arc::clone(&value);
        let worker_signal = Arc::clone(&signal);
        let handle = thread::spawn(move || {
            let started = Instant::now();
            loop {
                let elapsed = started.elapsed();
                worker_value.store(run.value_at(elapsed).to_bits(), Ordering::Release);
                if run.is_finished_at(elapsed) {
                    if worker_signal.finish() {
                        // Receiver may be gone if the driver is being dropped.
                        let _ = sender.send(Completion {
                            ticket,
                            outcome: AnimationOutcome::Finished,
                            value: run.to(),
                        });
                    }
                    return;
                }
                let remaining = run.duration().saturating_sub(elapsed);
                if worker_signal.wait_frame(frame_interval.min(remaining)) {
                    return;
                }
            }
        });

        tracing::trace!(
            target: "modalkit.driver",
            ticket = ticket.raw(),
            from = run.from(),
            to = run.to(),
            duration_ms = run.duration().as_millis() as u64,
            "worker run started"
        );

        self.runs.insert(
            ticket,
            ThreadRun {
                signal,
                value,
                handle: Some(handle),
            },
        );
        ticket
    }

    fn cancel(&mut self, ticket: AnimationTicket) -> Option<f64> {
        let run = self.runs.get_mut(&ticket)?;
        if !run.signal.cancel() {
            // The worker already finished; its completion is in the channel.
            return None;
        }
        run.join();
        let value = run.value();
        tracing::trace!(
            target: "modalkit.driver",
            ticket = ticket.raw(),
            value,
            "worker run cancelled"
        );
        // Keep channel completions ahead of this one so resolution order holds.
        self.drain_channel();
        self.pending.push(Completion {
            ticket,
            outcome: AnimationOutcome::Cancelled,
            value,
        });
        Some(value)
    }

    fn sample(&self, ticket: AnimationTicket) -> Option<f64> {
        self.runs.get(&ticket).map(ThreadRun::value)
    }

    fn poll_completions(&mut self) -> Vec<Completion> {
        self.drain_channel();
        let completions = std::mem::take(&mut self.pending);
        for completion in &completions {
            if let Some(mut run) = self.runs.remove(&completion.ticket) {
                run.join();
            }
        }
        completions
    }
}

impl Drop for ThreadDriver {
    fn drop(&mut self) {
        for run in self.runs.values_mut() {
            run.signal.cancel();
            run.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for_completions(driver: &mut ThreadDriver, limit: Duration) -> Vec<Completion> {
        let deadline = Instant::now() + limit;
        loop {
            let done = driver.poll_completions();
            if !done.is_empty() || Instant::now() >= deadline {
                return done;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn run_finishes_on_worker() {
        let mut driver = ThreadDriver::with_frame_interval(Duration::from_millis(2));
        let t = driver.start(Interpolation::new(0.0, 1.0, Duration::from_millis(20)));
        let done = wait_for_completions(&mut driver, Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, t);
        assert!(done[0].is_finished());
        assert_eq!(done[0].value, 1.0);
        assert_eq!(driver.tracked_runs(), 0);
    }

    #[test]
    fn cancel_resolves_exactly_once() {
        let mut driver = ThreadDriver::with_frame_interval(Duration::from_millis(2));
        let t = driver.start(Interpolation::new(0.0, 1.0, Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(10));

        let stopped = driver.cancel(t).expect("run still in flight");
        assert!((0.0..=1.0).contains(&stopped));
        assert_eq!(driver.cancel(t), None);

        let done = driver.poll_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].outcome, AnimationOutcome::Cancelled);
        assert!(driver.poll_completions().is_empty());
    }

    #[test]
    fn cancel_loses_to_finished_worker() {
        let mut driver = ThreadDriver::with_frame_interval(Duration::from_millis(1));
        let t = driver.start(Interpolation::new(0.0, 1.0, Duration::from_millis(1)));
        thread::sleep(Duration::from_millis(100));

        assert_eq!(driver.cancel(t), None);
        let done = wait_for_completions(&mut driver, Duration::from_secs(5));
        assert_eq!(done.len(), 1);
        assert!(done[0].is_finished());
    }

    #[test]
    fn sampled_value_stays_in_bounds() {
        let mut driver = ThreadDriver::with_frame_interval(Duration::from_millis(1));
        let t = driver.start(Interpolation::new(1.0, 0.0, Duration::from_millis(30)));
        for _ in 0..10 {
            if let Some(v) = driver.sample(t) {
                assert!((0.0..=1.0).contains(&v), "sample {v} out of bounds");
            }
            thread::sleep(Duration::from_millis(3));
        }
    }

    #[test]
    fn drop_stops_in_flight_workers() {
        let mut driver = ThreadDriver::new();
        driver.start(Interpolation::new(0.0, 1.0, Duration::from_secs(30)));
        let started = Instant::now();
        drop(driver);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
