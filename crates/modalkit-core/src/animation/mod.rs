#![forbid(unsafe_code)]

//! Progress interpolation primitives.
//!
//! Everything here works on a normalized progress value where `0.0` means
//! fully hidden and `1.0` means fully shown. Drivers move that value over
//! time; pure mapping functions turn it into opacity, offsets, or scale.
//!
//! # Invariants
//!
//! 1. [`clamp_progress`] always returns a value in `[0.0, 1.0]` (NaN maps to 0).
//! 2. [`Interpolation::value_at`] never leaves the closed range between
//!    `from` and `to`.
//! 3. [`Keyframes`] stops are strictly increasing; evaluation outside the
//!    first/last stop holds the first/last output.
//!
//! # Failure Modes
//!
//! - Zero-duration interpolations finish immediately at `to`.
//! - Malformed keyframe tables are rejected at construction with
//!   [`KeyframesError`]; evaluation itself cannot fail.

mod driver;
mod thread_driver;

use std::fmt;
use std::time::Duration;

pub use driver::{AnimationDriver, AnimationOutcome, AnimationTicket, Completion, TickDriver};
pub use thread_driver::{DEFAULT_FRAME_INTERVAL, ThreadDriver};

// ---------------------------------------------------------------------------
// Scalar helpers
// ---------------------------------------------------------------------------

/// Clamp a progress value into `[0.0, 1.0]`.
#[inline]
#[must_use]
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Linear interpolation between `a` and `b`; `t` is clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let t = clamp_progress(t);
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

/// Why a keyframe table was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframesError {
    /// Input and output tables have different lengths.
    LengthMismatch { inputs: usize, outputs: usize },
    /// Fewer than two stops.
    TooFewStops(usize),
    /// Input stops are not strictly increasing (index of the first offender).
    NotIncreasing(usize),
    /// An input stop is outside `[0, 1]` or not finite.
    OutOfRange(usize),
}

impl fmt::Display for KeyframesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { inputs, outputs } => {
                write!(f, "keyframes have {inputs} inputs but {outputs} outputs")
            }
            Self::TooFewStops(n) => write!(f, "keyframes need at least 2 stops, got {n}"),
            Self::NotIncreasing(i) => write!(f, "keyframe input {i} is not strictly increasing"),
            Self::OutOfRange(i) => write!(f, "keyframe input {i} is outside [0, 1]"),
        }
    }
}

impl std::error::Error for KeyframesError {}

/// Piecewise-linear curve from progress to an output value.
///
/// ```
/// use modalkit_core::animation::Keyframes;
///
/// let curve = Keyframes::new(vec![0.0, 0.5, 1.0], vec![100.0, -20.0, 0.0]).unwrap();
/// assert_eq!(curve.eval(0.0), 100.0);
/// assert_eq!(curve.eval(0.5), -20.0);
/// assert_eq!(curve.eval(0.75), -10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl Keyframes {
    /// Build a curve from matching input stops and outputs.
    pub fn new(inputs: Vec<f64>, outputs: Vec<f64>) -> Result<Self, KeyframesError> {
        if inputs.len() != outputs.len() {
            return Err(KeyframesError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if inputs.len() < 2 {
            return Err(KeyframesError::TooFewStops(inputs.len()));
        }
        for (i, &stop) in inputs.iter().enumerate() {
            if !stop.is_finite() || !(0.0..=1.0).contains(&stop) {
                return Err(KeyframesError::OutOfRange(i));
            }
            if i > 0 && stop <= inputs[i - 1] {
                return Err(KeyframesError::NotIncreasing(i));
            }
        }
        Ok(Self { inputs, outputs })
    }

    /// Two-stop linear curve from `start` at 0 to `end` at 1.
    #[must_use]
    pub fn linear(start: f64, end: f64) -> Self {
        Self {
            inputs: vec![0.0, 1.0],
            outputs: vec![start, end],
        }
    }

    /// Evaluate the curve at `progress`.
    #[must_use]
    pub fn eval(&self, progress: f64) -> f64 {
        let p = clamp_progress(progress);
        let last = self.inputs.len() - 1;
        if p <= self.inputs[0] {
            return self.outputs[0];
        }
        if p >= self.inputs[last] {
            return self.outputs[last];
        }
        // First stop strictly greater than p; guaranteed in 1..=last here.
        let hi = self.inputs.partition_point(|&stop| stop <= p);
        let lo = hi - 1;
        if p == self.inputs[lo] {
            return self.outputs[lo];
        }
        let span = self.inputs[hi] - self.inputs[lo];
        let t = (p - self.inputs[lo]) / span;
        lerp(self.outputs[lo], self.outputs[hi], t)
    }

    /// Input stops.
    #[must_use]
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// Output values, one per stop.
    #[must_use]
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// A timed run moving progress from `from` to `to` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    from: f64,
    to: f64,
    duration: Duration,
}

impl Interpolation {
    /// Create a run. Endpoints are clamped to `[0, 1]`.
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from: clamp_progress(from),
            to: clamp_progress(to),
            duration,
        }
    }

    /// Start value.
    #[inline]
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Target value.
    #[inline]
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Run length.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the run has reached its target after `elapsed`.
    #[inline]
    #[must_use]
    pub fn is_finished_at(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Value after `elapsed` time.
    #[must_use]
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.is_finished_at(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        lerp(self.from, self.to, t)
    }
}
