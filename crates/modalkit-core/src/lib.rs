#![forbid(unsafe_code)]

//! Core: progress interpolation, animation drivers, and cooperative cancellation.
//!
//! # Role in modalkit
//! `modalkit-core` knows nothing about overlays or surfaces. It owns the
//! numeric side of an animation (a progress value in `[0, 1]`, linear and
//! keyframed interpolation) and the [`AnimationDriver`](animation::AnimationDriver)
//! capability that runs timed interpolations and reports whether each run
//! finished or was cancelled.
//!
//! # Primary responsibilities
//! - **Interpolation**: [`clamp_progress`](animation::clamp_progress),
//!   [`lerp`](animation::lerp), [`Keyframes`](animation::Keyframes).
//! - **Drivers**: [`TickDriver`](animation::TickDriver) for hosts with their
//!   own frame clock, [`ThreadDriver`](animation::ThreadDriver) for offloading
//!   runs to worker threads.
//! - **Cancellation**: [`RunSignal`](cancellation::RunSignal), the per-run
//!   finish-or-cancel decision shared with worker threads.
//! - **Logging**: the `tracing` facade and an optional subscriber installer.

pub mod animation;
pub mod cancellation;
pub mod logging;

pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
