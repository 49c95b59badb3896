//! Scripted overlay scenes sampled frame by frame.
//!
//! Every scene runs a real [`AnimatedOverlay`] on a [`TickDriver`] against a
//! [`RecordingSurface`], so a played scene is fully deterministic.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use modalkit_core::animation::TickDriver;
use modalkit_widgets::ModalVisibility;
use modalkit_widgets::modal::{
    AnimatedOverlay, AnimationSpec, OverlayPhase, OverlayTransition, OverlayView,
    RecordingSurface, SurfaceEvent, Viewport,
};

use crate::catalog::ShowcaseEntry;

type Overlay = AnimatedOverlay<RecordingSurface, TickDriver>;

/// Sampling knobs shared by every scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerOptions {
    pub viewport: Viewport,
    /// Time between sampled frames.
    pub frame: Duration,
    /// Frames to hold the fully shown overlay before dismissing it.
    pub hold_frames: usize,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            frame: Duration::from_millis(50),
            hold_frames: 4,
        }
    }
}

/// One sampled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Scene time.
    pub at: Duration,
    /// Script step that happened right before this frame, if any.
    pub cue: Option<&'static str>,
    pub phase: OverlayPhase,
    pub progress: f64,
    /// `None` once the surface is unmounted.
    pub view: Option<OverlayView>,
}

impl Frame {
    /// Fixed-width text rendering.
    #[must_use]
    pub fn to_line(&self) -> String {
        let cue = self.cue.map(|c| format!("  <- {c}")).unwrap_or_default();
        match &self.view {
            Some(view) => {
                let t = view.content.transform;
                format!(
                    "{:>6}ms  {:<8}  p={:.3}  backdrop={:.3}  opacity={:.3} x={:>8.1} y={:>8.1} scale={:.3}{cue}",
                    self.at.as_millis(),
                    self.phase.as_str(),
                    self.progress,
                    view.backdrop.opacity,
                    t.opacity,
                    t.translate_x,
                    t.translate_y,
                    t.scale,
                )
            }
            None => format!(
                "{:>6}ms  {:<8}  (unmounted){cue}",
                self.at.as_millis(),
                self.phase.as_str()
            ),
        }
    }

    /// JSON rendering, one object per frame.
    #[must_use]
    pub fn to_json(&self, scene: &str) -> serde_json::Value {
        let content = self.view.map(|view| {
            let t = view.content.transform;
            serde_json::json!({
                "opacity": t.opacity,
                "translate_x": t.translate_x,
                "translate_y": t.translate_y,
                "scale": t.scale,
            })
        });
        serde_json::json!({
            "scene": scene,
            "at_ms": self.at.as_millis() as u64,
            "cue": self.cue,
            "phase": self.phase.as_str(),
            "progress": self.progress,
            "mounted": self.view.is_some(),
            "backdrop_opacity": self.view.map(|v| v.backdrop.opacity),
            "backdrop_color": self.view.map(|v| v.backdrop.color.to_hex()),
            "content": content,
        })
    }
}

/// Everything a played scene produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub scene: String,
    pub frames: Vec<Frame>,
    pub surface_events: Vec<SurfaceEvent>,
    /// Times the dismiss callback ran.
    pub dismissals: u32,
}

impl Recording {
    /// How many times the surface was opened.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.surface_events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Opened(_)))
            .count()
    }

    #[must_use]
    pub fn closes(&self) -> usize {
        self.surface_events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Closed))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Scene plumbing
// ---------------------------------------------------------------------------

struct Scene {
    overlay: Overlay,
    visibility: ModalVisibility,
    dismissals: Rc<Cell<u32>>,
    options: PlayerOptions,
    at: Duration,
    frames: Vec<Frame>,
    pending_cue: Option<&'static str>,
}

impl Scene {
    fn new(spec: AnimationSpec, options: PlayerOptions) -> Self {
        let visibility = ModalVisibility::new(false);
        let dismissals = Rc::new(Cell::new(0));
        let on_dismiss = {
            let visibility = visibility.clone();
            let dismissals = Rc::clone(&dismissals);
            move || {
                dismissals.set(dismissals.get() + 1);
                visibility.hide();
            }
        };
        let overlay =
            AnimatedOverlay::new(spec, RecordingSurface::new(), TickDriver::new(), on_dismiss);
        Self {
            overlay,
            visibility,
            dismissals,
            options,
            at: Duration::ZERO,
            frames: Vec::new(),
            pending_cue: None,
        }
    }

    /// Report the owner's flag to the overlay.
    fn sync(&mut self) {
        self.overlay.set_visible(self.visibility.is_visible());
    }

    fn cue(&mut self, cue: &'static str) {
        self.pending_cue = Some(cue);
    }

    fn sample(&mut self) {
        self.frames.push(Frame {
            at: self.at,
            cue: self.pending_cue.take(),
            phase: self.overlay.phase(),
            progress: self.overlay.progress(),
            view: self.overlay.view(self.options.viewport),
        });
    }

    fn step(&mut self) -> Option<OverlayTransition> {
        self.at += self.options.frame;
        let transition = self.overlay.tick(self.options.frame);
        // The dismiss callback may have flipped the flag during the pump.
        self.sync();
        self.sample();
        transition
    }

    /// Step until `wanted` happens or a full run plus slack has elapsed.
    fn run_until(&mut self, wanted: OverlayTransition) {
        let budget = self.frames_per_run() + 2;
        for _ in 0..budget {
            if self.step() == Some(wanted) {
                return;
            }
        }
        tracing::warn!(
            target: "modalkit.demo",
            ?wanted,
            "scene did not settle within one run"
        );
    }

    fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    fn frames_per_run(&self) -> usize {
        let frame = self.options.frame.as_nanos().max(1);
        let run = self.overlay.spec().duration.as_nanos();
        usize::try_from(run.div_ceil(frame)).unwrap_or(usize::MAX)
    }

    fn show(&mut self) {
        self.visibility.show();
        self.sync();
        self.cue("show");
        self.sample();
    }

    fn hide(&mut self) {
        self.visibility.hide();
        self.sync();
        self.cue("hide");
        self.sample();
    }

    fn finish(self, scene: impl Into<String>) -> Recording {
        Recording {
            scene: scene.into(),
            frames: self.frames,
            surface_events: self.overlay.host().events().to_vec(),
            dismissals: self.dismissals.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// Show the entry's overlay, hold it, tap the backdrop, and play the exit.
///
/// When backdrop taps are disabled the scene presses the content's close
/// button instead, which hides the overlay directly.
#[must_use]
pub fn play_entry(entry: &ShowcaseEntry, base: &AnimationSpec, options: PlayerOptions) -> Recording {
    let spec = entry.spec(base);
    tracing::info!(target: "modalkit.demo", entry = entry.name, "playing");

    let mut scene = Scene::new(spec, options);
    scene.show();
    scene.run_until(OverlayTransition::Entered);
    scene.steps(options.hold_frames);

    if scene.overlay.press_backdrop() {
        scene.sync();
        scene.cue("backdrop tap");
        scene.sample();
    } else {
        scene.hide();
    }
    scene.run_until(OverlayTransition::Exited);
    scene.finish(entry.name)
}

/// Show, hide mid-entry, show again mid-exit, then dismiss normally.
#[must_use]
pub fn rapid_toggle(base: &AnimationSpec, options: PlayerOptions) -> Recording {
    let mut scene = Scene::new(base.clone(), options);
    let run = scene.frames_per_run();

    scene.show();
    scene.steps((run * 2 / 5).max(1));
    scene.hide();
    scene.steps((run / 5).max(1));
    scene.show();
    scene.run_until(OverlayTransition::Entered);
    scene.hide();
    scene.run_until(OverlayTransition::Exited);
    scene.finish("rapid-toggle")
}
