#![forbid(unsafe_code)]

//! The animated overlay controller.
//!
//! [`AnimatedOverlay`] coordinates three things for one overlay instance:
//! whether the host surface is mounted, a progress value in `[0, 1]`, and
//! the timing of unmount relative to the exit run finishing.
//!
//! # State Machine
//!
//! ```text
//!                set_visible(true)
//!   ┌────────┐ ─────────────────▶ ┌──────────┐  finished   ┌───────┐
//!   │ Hidden │                    │ Entering │ ──────────▶ │ Shown │
//!   └────────┘ ◀───────────────── └──────────┘             └───────┘
//!        ▲          finished        ▲      │                   │
//!        │                          │      │ set_visible(false)│
//!        │                  (true)  │      ▼                   │
//!        │                        ┌─────────┐ ◀────────────────┘
//!        └─────────────────────── │ Exiting │   set_visible(false)
//!                 finished        └─────────┘
//! ```
//!
//! # Invariants
//!
//! 1. The surface is mounted whenever the visibility intent is `true`.
//! 2. At most one run drives progress at any time. Reversing direction
//!    cancels the active run and starts the new one from the value the old
//!    one stopped at.
//! 3. Only a `Finished` completion of the active run changes phase.
//!    Cancelled and superseded runs are ignored, so an interrupted exit
//!    never unmounts and an interrupted entry never reaches `Shown`.
//! 4. After `set_visible(true)` from `Hidden`, [`AnimatedOverlay::view`]
//!    returns a frame at progress 0 before any time has elapsed.
//! 5. Progress stays in `[0, 1]`.
//!
//! # Failure Modes
//!
//! There is no error path. Malformed configuration is sanitized when it is
//! installed; a driver that cancels a run on its own (shutdown) makes the
//! controller restart toward the current target from the stopped value.

use std::fmt;
use std::time::Duration;

use modalkit_core::animation::{
    AnimationDriver, AnimationOutcome, AnimationTicket, Interpolation, TickDriver, clamp_progress,
};

use super::backdrop::{BackdropGate, DismissSource};
use super::spec::{AnimationFamily, AnimationSpec};
use super::style::{
    BackdropStyle, ResolvedStyle, StyleOverride, Viewport, backdrop_style, content_style,
};
use super::surface::{SurfaceHost, SurfaceOptions};

/// Lifecycle phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayPhase {
    /// Unmounted; progress 0.
    #[default]
    Hidden,
    /// Mounted; progress animating toward 1.
    Entering,
    /// Mounted; progress held at 1.
    Shown,
    /// Mounted; progress animating toward 0.
    Exiting,
}

impl OverlayPhase {
    /// Whether the surface is in the render tree during this phase.
    #[inline]
    #[must_use]
    pub fn is_mounted(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether a run is driving progress during this phase.
    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting)
    }

    /// Progress target for this phase.
    #[inline]
    #[must_use]
    pub fn target(self) -> f64 {
        match self {
            Self::Entering | Self::Shown => 1.0,
            Self::Hidden | Self::Exiting => 0.0,
        }
    }

    /// Stable name for logs and frame dumps.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Entering => "entering",
            Self::Shown => "shown",
            Self::Exiting => "exiting",
        }
    }
}

impl fmt::Display for OverlayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run finished naturally and the overlay settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTransition {
    /// The entry run finished; the overlay is fully shown.
    Entered,
    /// The exit run finished; the surface has been closed.
    Exited,
}

/// One rendered frame of a mounted overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayView {
    pub phase: OverlayPhase,
    pub progress: f64,
    pub backdrop: BackdropStyle,
    /// Animated content style with caller overrides applied.
    pub content: ResolvedStyle,
    /// Caller overrides for the full-screen container, passed through.
    pub container: StyleOverride,
}

/// Coordinates mount state, progress, and exit timing for one overlay.
///
/// The owner holds the visibility flag and reports it with
/// [`set_visible`](Self::set_visible); the controller never hides itself.
/// Dismissal gestures go to the owner's callback through
/// [`press_backdrop`](Self::press_backdrop) and
/// [`request_close`](Self::request_close).
///
/// ```
/// use std::time::Duration;
///
/// use modalkit_core::animation::TickDriver;
/// use modalkit_widgets::modal::{
///     AnimatedOverlay, AnimationFamily, AnimationSpec, OverlayPhase, OverlayTransition,
///     RecordingSurface, Viewport,
/// };
///
/// let spec = AnimationSpec::new().animation_in(AnimationFamily::Zoom);
/// let mut overlay = AnimatedOverlay::new(spec, RecordingSurface::new(), TickDriver::new(), || {});
///
/// overlay.set_visible(true);
/// assert!(overlay.is_mounted());
/// let first = overlay.view(Viewport::default()).unwrap();
/// assert_eq!(first.content.transform.scale, 0.0);
///
/// assert_eq!(overlay.tick(Duration::from_millis(300)), Some(OverlayTransition::Entered));
/// assert_eq!(overlay.phase(), OverlayPhase::Shown);
/// ```
pub struct AnimatedOverlay<H: SurfaceHost, D: AnimationDriver> {
    spec: AnimationSpec,
    host: H,
    driver: D,
    on_backdrop_press: Box<dyn FnMut()>,
    intent: bool,
    phase: OverlayPhase,
    mounted: bool,
    progress: f64,
    active: Option<AnimationTicket>,
}

impl<H: SurfaceHost, D: AnimationDriver> AnimatedOverlay<H, D> {
    /// Create a hidden overlay.
    ///
    /// `spec` is sanitized on the way in.
    pub fn new(
        spec: AnimationSpec,
        host: H,
        driver: D,
        on_backdrop_press: impl FnMut() + 'static,
    ) -> Self {
        Self {
            spec: spec.sanitized(),
            host,
            driver,
            on_backdrop_press: Box::new(on_backdrop_press),
            intent: false,
            phase: OverlayPhase::Hidden,
            mounted: false,
            progress: 0.0,
            active: None,
        }
    }

    // --- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Progress as of the last [`pump`](Self::pump) or transition.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The last visibility value reported by the owner.
    #[inline]
    #[must_use]
    pub fn is_visible_intent(&self) -> bool {
        self.intent
    }

    #[inline]
    #[must_use]
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for injecting host events.
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Ticket of the run currently driving progress.
    #[inline]
    #[must_use]
    pub fn active_run(&self) -> Option<AnimationTicket> {
        self.active
    }

    // --- Owner input --------------------------------------------------------

    /// Report the owner's visibility flag.
    ///
    /// Reporting the same value twice is a no-op: no new run starts and
    /// nothing visible changes.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.intent {
            return;
        }
        self.intent = visible;
        if visible {
            self.enter();
        } else {
            self.exit();
        }
    }

    /// Replace the configuration.
    ///
    /// An in-flight run keeps its duration; the new spec applies to the next
    /// run and to every mapping from now on.
    pub fn set_spec(&mut self, spec: AnimationSpec) {
        self.spec = spec.sanitized();
    }

    /// Forward a backdrop tap. Returns whether the callback ran.
    pub fn press_backdrop(&mut self) -> bool {
        self.dismiss(DismissSource::BackdropPress)
    }

    /// Forward a host close request (hardware back). Always reaches the
    /// callback while mounted.
    pub fn request_close(&mut self) -> bool {
        self.dismiss(DismissSource::CloseRequest)
    }

    fn dismiss(&mut self, source: DismissSource) -> bool {
        if !self.mounted {
            return false;
        }
        BackdropGate::new(self.spec.close_on_backdrop_press)
            .forward(source, &mut *self.on_backdrop_press)
    }

    // --- Driver input -------------------------------------------------------

    /// Sample the active run, apply resolved runs, and forward a pending
    /// host close request.
    ///
    /// Returns the transition if the active run finished naturally.
    pub fn pump(&mut self) -> Option<OverlayTransition> {
        if self.mounted && self.host.take_close_request() {
            self.request_close();
        }

        if let Some(value) = self.active.and_then(|ticket| self.driver.sample(ticket)) {
            self.progress = clamp_progress(value);
        }

        let mut transition = None;
        for completion in self.driver.poll_completions() {
            if Some(completion.ticket) != self.active {
                tracing::trace!(
                    target: "modalkit.overlay",
                    ticket = completion.ticket.raw(),
                    "ignoring superseded run"
                );
                continue;
            }
            self.active = None;
            self.progress = clamp_progress(completion.value);
            match completion.outcome {
                AnimationOutcome::Finished => transition = self.settle(),
                AnimationOutcome::Cancelled => {
                    // Cancelled by the driver itself, not by us.
                    tracing::warn!(
                        target: "modalkit.overlay",
                        phase = self.phase.as_str(),
                        progress = self.progress,
                        "active run cancelled by driver, restarting"
                    );
                    if self.phase.is_animating() {
                        self.start_run(self.phase.target());
                    }
                }
            }
        }
        transition
    }

    /// Style the current frame for `viewport`. `None` while unmounted.
    #[must_use]
    pub fn view(&self, viewport: Viewport) -> Option<OverlayView> {
        if !self.mounted {
            return None;
        }
        let family = self.current_family();
        let computed = content_style(family, self.spec.direction, self.progress, viewport);
        Some(OverlayView {
            phase: self.phase,
            progress: self.progress,
            backdrop: backdrop_style(
                self.spec.backdrop_color,
                self.spec.backdrop_opacity,
                self.progress,
            ),
            content: self.spec.content_style.resolve(computed),
            container: self.spec.container_style,
        })
    }

    /// Family driving the content style in the current phase.
    #[must_use]
    pub fn current_family(&self) -> AnimationFamily {
        match self.phase {
            OverlayPhase::Exiting => self.spec.exit_family(),
            OverlayPhase::Hidden | OverlayPhase::Entering | OverlayPhase::Shown => {
                self.spec.animation_in
            }
        }
    }

    // --- Internals ----------------------------------------------------------

    fn enter(&mut self) {
        match self.phase {
            OverlayPhase::Hidden => {
                self.host.open(&SurfaceOptions {
                    status_bar_translucent: self.spec.status_bar_translucent,
                });
                self.mounted = true;
                self.progress = 0.0;
            }
            OverlayPhase::Exiting => {
                self.stop_active();
            }
            OverlayPhase::Entering | OverlayPhase::Shown => return,
        }
        self.set_phase(OverlayPhase::Entering);
        self.start_run(1.0);
    }

    fn exit(&mut self) {
        match self.phase {
            OverlayPhase::Shown => {}
            OverlayPhase::Entering => {
                self.stop_active();
            }
            OverlayPhase::Hidden | OverlayPhase::Exiting => return,
        }
        self.set_phase(OverlayPhase::Exiting);
        self.start_run(0.0);
    }

    /// Cancel the active run and hold progress at the value it stopped at.
    fn stop_active(&mut self) {
        let Some(ticket) = self.active.take() else {
            return;
        };
        // A run that already finished can't be cancelled but still samples
        // its final value until its completion is polled.
        let stopped = self
            .driver
            .cancel(ticket)
            .or_else(|| self.driver.sample(ticket));
        if let Some(value) = stopped {
            self.progress = clamp_progress(value);
        }
    }

    fn start_run(&mut self, target: f64) {
        let run = Interpolation::new(self.progress, target, self.spec.duration);
        let ticket = self.driver.start(run);
        self.active = Some(ticket);
        tracing::debug!(
            target: "modalkit.overlay",
            ticket = ticket.raw(),
            from = self.progress,
            to = target,
            duration_ms = self.spec.duration.as_millis() as u64,
            "run started"
        );
    }

    fn settle(&mut self) -> Option<OverlayTransition> {
        match self.phase {
            OverlayPhase::Entering => {
                self.progress = 1.0;
                self.set_phase(OverlayPhase::Shown);
                Some(OverlayTransition::Entered)
            }
            OverlayPhase::Exiting => {
                self.progress = 0.0;
                self.mounted = false;
                self.host.close();
                self.set_phase(OverlayPhase::Hidden);
                Some(OverlayTransition::Exited)
            }
            OverlayPhase::Hidden | OverlayPhase::Shown => None,
        }
    }

    fn set_phase(&mut self, next: OverlayPhase) {
        if next == self.phase {
            return;
        }
        tracing::debug!(
            target: "modalkit.overlay",
            from = self.phase.as_str(),
            to = next.as_str(),
            progress = self.progress,
            mounted = self.mounted,
            "phase transition"
        );
        self.phase = next;
    }
}

impl<H: SurfaceHost> AnimatedOverlay<H, TickDriver> {
    /// Advance the tick driver by `dt`, then [`pump`](Self::pump).
    pub fn tick(&mut self, dt: Duration) -> Option<OverlayTransition> {
        self.driver.advance(dt);
        self.pump()
    }
}

impl<H: SurfaceHost, D: AnimationDriver> Drop for AnimatedOverlay<H, D> {
    fn drop(&mut self) {
        if let Some(ticket) = self.active.take() {
            let _ = self.driver.cancel(ticket);
        }
        if self.mounted {
            self.mounted = false;
            self.host.close();
        }
    }
}

impl<H: SurfaceHost + fmt::Debug, D: AnimationDriver + fmt::Debug> fmt::Debug
    for AnimatedOverlay<H, D>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedOverlay")
            .field("phase", &self.phase)
            .field("intent", &self.intent)
            .field("mounted", &self.mounted)
            .field("progress", &self.progress)
            .field("active", &self.active)
            .field("spec", &self.spec)
            .field("host", &self.host)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}
