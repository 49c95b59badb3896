#![forbid(unsafe_code)]

//! The animation-driver capability and a deterministic tick-driven driver.
//!
//! A driver runs [`Interpolation`]s and resolves each one exactly once, as a
//! [`Completion`] tagged [`AnimationOutcome::Finished`] or
//! [`AnimationOutcome::Cancelled`]. Completions are queued inside the driver
//! and only surface through [`AnimationDriver::poll_completions`], so the
//! thread that polls is the thread that makes decisions.

use std::time::Duration;

use super::Interpolation;

/// Identifier of one interpolation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationTicket(u64);

impl AnimationTicket {
    /// Wrap a raw id. Drivers allocate ids monotonically.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// How a run resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The run reached its target.
    Finished,
    /// The run was stopped before reaching its target.
    Cancelled,
}

/// The resolved result of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    /// Which run resolved.
    pub ticket: AnimationTicket,
    /// Finished or cancelled.
    pub outcome: AnimationOutcome,
    /// Value at the moment the run resolved.
    pub value: f64,
}

impl Completion {
    /// Whether the run reached its target naturally.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.outcome, AnimationOutcome::Finished)
    }
}

/// Starts, samples, and cancels timed interpolations.
///
/// Implementations must resolve every started run exactly once: a cancelled
/// run yields one `Cancelled` completion, a run that reaches its duration
/// yields one `Finished` completion, never both.
pub trait AnimationDriver {
    /// Begin a run. Other in-flight runs are unaffected.
    fn start(&mut self, run: Interpolation) -> AnimationTicket;

    /// Stop a run and return the value it stopped at.
    ///
    /// Returns `None` for unknown tickets and for runs that already resolved
    /// (in which case their `Finished` completion is still delivered).
    fn cancel(&mut self, ticket: AnimationTicket) -> Option<f64>;

    /// Current value of an unresolved or not-yet-polled run.
    fn sample(&self, ticket: AnimationTicket) -> Option<f64>;

    /// Drain completions resolved since the previous call, in resolution order.
    fn poll_completions(&mut self) -> Vec<Completion>;
}

impl<D: AnimationDriver + ?Sized> AnimationDriver for Box<D> {
    fn start(&mut self, run: Interpolation) -> AnimationTicket {
        (**self).start(run)
    }

    fn cancel(&mut self, ticket: AnimationTicket) -> Option<f64> {
        (**self).cancel(ticket)
    }

    fn sample(&self, ticket: AnimationTicket) -> Option<f64> {
        (**self).sample(ticket)
    }

    fn poll_completions(&mut self) -> Vec<Completion> {
        (**self).poll_completions()
    }
}

impl<D: AnimationDriver + ?Sized> AnimationDriver for &mut D {
    fn start(&mut self, run: Interpolation) -> AnimationTicket {
        (**self).start(run)
    }

    fn cancel(&mut self, ticket: AnimationTicket) -> Option<f64> {
        (**self).cancel(ticket)
    }

    fn sample(&self, ticket: AnimationTicket) -> Option<f64> {
        (**self).sample(ticket)
    }

    fn poll_completions(&mut self) -> Vec<Completion> {
        (**self).poll_completions()
    }
}

// ---------------------------------------------------------------------------
// TickDriver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TickRun {
    ticket: AnimationTicket,
    interpolation: Interpolation,
    elapsed: Duration,
}

impl TickRun {
    fn value(&self) -> f64 {
        self.interpolation.value_at(self.elapsed)
    }
}

/// Deterministic driver advanced explicitly by the host's frame clock.
///
/// Time only moves in [`advance`](Self::advance), which makes runs fully
/// reproducible in tests and headless hosts.
#[derive(Debug, Default)]
pub struct TickDriver {
    next_id: u64,
    runs: Vec<TickRun>,
    /// Finished runs keep their final value until polled.
    finished: Vec<TickRun>,
    completions: Vec<Completion>,
}

impl TickDriver {
    /// Create an idle driver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every in-flight run by `dt` and resolve those that reach their target.
    pub fn advance(&mut self, dt: Duration) {
        let mut still_running = Vec::with_capacity(self.runs.len());
        for mut run in self.runs.drain(..) {
            run.elapsed = run.elapsed.saturating_add(dt);
            if run.interpolation.is_finished_at(run.elapsed) {
                tracing::trace!(
                    target: "modalkit.driver",
                    ticket = run.ticket.raw(),
                    value = run.interpolation.to(),
                    "run finished"
                );
                self.completions.push(Completion {
                    ticket: run.ticket,
                    outcome: AnimationOutcome::Finished,
                    value: run.interpolation.to(),
                });
                self.finished.push(run);
            } else {
                still_running.push(run);
            }
        }
        self.runs = still_running;
    }

    /// Number of unresolved runs.
    #[inline]
    #[must_use]
    pub fn active_runs(&self) -> usize {
        self.runs.len()
    }

    /// Elapsed time of an unresolved run.
    #[must_use]
    pub fn elapsed(&self, ticket: AnimationTicket) -> Option<Duration> {
        self.runs
            .iter()
            .find(|run| run.ticket == ticket)
            .map(|run| run.elapsed)
    }
}

impl AnimationDriver for TickDriver {
    fn start(&mut self, run: Interpolation) -> AnimationTicket {
        self.next_id += 1;
        let ticket = AnimationTicket(self.next_id);
        tracing::trace!(
            target: "modalkit.driver",
            ticket = ticket.raw(),
            from = run.from(),
            to = run.to(),
            duration_ms = run.duration().as_millis() as u64,
            "run started"
        );
        self.runs.push(TickRun {
            ticket,
            interpolation: run,
            elapsed: Duration::ZERO,
        });
        ticket
    }

    fn cancel(&mut self, ticket: AnimationTicket) -> Option<f64> {
        let idx = self.runs.iter().position(|run| run.ticket == ticket)?;
        let run = self.runs.remove(idx);
        let value = run.value();
        tracing::trace!(
            target: "modalkit.driver",
            ticket = ticket.raw(),
            value,
            "run cancelled"
        );
        self.completions.push(Completion {
            ticket,
            outcome: AnimationOutcome::Cancelled,
            value,
        });
        Some(value)
    }

    fn sample(&self, ticket: AnimationTicket) -> Option<f64> {
        self.runs
            .iter()
            .chain(self.finished.iter())
            .find(|run| run.ticket == ticket)
            .map(TickRun::value)
    }

    fn poll_completions(&mut self) -> Vec<Completion> {
        self.finished.clear();
        std::mem::take(&mut self.completions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn tickets_are_monotonic() {
        let mut driver = TickDriver::new();
        let a = driver.start(Interpolation::new(0.0, 1.0, MS_300));
        let b = driver.start(Interpolation::new(0.0, 1.0, MS_300));
        assert!(b > a);
    }

    #[test]
    fn advance_moves_sampled_value() {
        let mut driver = TickDriver::new();
        let t = driver.start(Interpolation::new(0.0, 1.0, MS_300));
        assert_eq!(driver.sample(t), Some(0.0));
        driver.advance(MS_100);
        let v = driver.sample(t).expect("in flight");
        assert!((v - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(driver.elapsed(t), Some(MS_100));
    }

    #[test]
    fn finished_run_resolves_once() {
        let mut driver = TickDriver::new();
        let t = driver.start(Interpolation::new(0.0, 1.0, MS_300));
        driver.advance(MS_300);
        assert_eq!(driver.active_runs(), 0);
        // Final value stays observable until polled.
        assert_eq!(driver.sample(t), Some(1.0));

        let done = driver.poll_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, t);
        assert!(done[0].is_finished());
        assert_eq!(done[0].value, 1.0);

        driver.advance(MS_300);
        assert!(driver.poll_completions().is_empty());
        assert_eq!(driver.sample(t), None);
    }

    #[test]
    fn cancel_reports_stop_value() {
        let mut driver = TickDriver::new();
        let t = driver.start(Interpolation::new(0.0, 1.0, MS_300));
        driver.advance(Duration::from_millis(150));
        let stopped = driver.cancel(t).expect("in flight");
        assert!((stopped - 0.5).abs() < 1e-9);

        let done = driver.poll_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].outcome, AnimationOutcome::Cancelled);
        assert!((done[0].value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cancel_after_finish_is_none() {
        let mut driver = TickDriver::new();
        let t = driver.start(Interpolation::new(1.0, 0.0, MS_100));
        driver.advance(MS_100);
        assert_eq!(driver.cancel(t), None);
        let done = driver.poll_completions();
        assert_eq!(done.len(), 1);
        assert!(done[0].is_finished());
    }

    #[test]
    fn cancel_unknown_ticket_is_none() {
        let mut driver = TickDriver::new();
        assert_eq!(driver.cancel(AnimationTicket::from_raw(42)), None);
        assert!(driver.poll_completions().is_empty());
    }

    #[test]
    fn zero_duration_finishes_on_next_advance() {
        let mut driver = TickDriver::new();
        let t = driver.start(Interpolation::new(0.0, 1.0, Duration::ZERO));
        driver.advance(Duration::ZERO);
        let done = driver.poll_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, t);
        assert!(done[0].is_finished());
    }

    #[test]
    fn boxed_driver_delegates() {
        let mut driver: Box<dyn AnimationDriver> = Box::new(TickDriver::new());
        let t = driver.start(Interpolation::new(0.0, 1.0, MS_100));
        assert_eq!(driver.sample(t), Some(0.0));
        assert_eq!(driver.cancel(t), Some(0.0));
        assert_eq!(driver.poll_completions().len(), 1);
    }
}
