//! Property-based invariant tests for the animated overlay.
//!
//! ## Invariants
//!
//! 1. Progress bound: progress stays in [0, 1] under any toggle/tick sequence.
//! 2. Mount: the overlay is mounted whenever the visibility intent is true.
//! 3. Single run: at most one run is in flight on the driver.
//! 4. Backdrop endpoints: opacity is exactly 0 at progress 0 and exactly the
//!    ceiling at progress 1, for every family.
//! 5. Symmetry: an exit run with the entry family retraces the entry frames
//!    in reverse.
//! 6. Settling: after a full duration of idle ticks the overlay matches the
//!    last intent.

use std::time::Duration;

use modalkit_core::animation::TickDriver;
use modalkit_widgets::modal::{
    AnimatedOverlay, AnimationDirection, AnimationFamily, AnimationSpec, OverlayPhase,
    RecordingSurface, Rgba, Viewport, backdrop_style,
};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_family() -> impl Strategy<Value = AnimationFamily> {
    prop::sample::select(AnimationFamily::ALL.to_vec())
}

fn arb_direction() -> impl Strategy<Value = AnimationDirection> {
    prop::sample::select(AnimationDirection::ALL.to_vec())
}

fn arb_spec() -> impl Strategy<Value = AnimationSpec> {
    (arb_family(), arb_family(), arb_direction(), 1u64..=1000, 0u32..=100).prop_map(
        |(family_in, family_out, direction, duration_ms, opacity)| {
            AnimationSpec::new()
                .animation_in(family_in)
                .animation_out(family_out)
                .direction(direction)
                .duration(Duration::from_millis(duration_ms))
                .backdrop_opacity(f64::from(opacity) / 100.0)
        },
    )
}

#[derive(Debug, Clone)]
enum Op {
    Show,
    Hide,
    Tick(u64),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            Just(Op::Show),
            Just(Op::Hide),
            (0u64..=400).prop_map(Op::Tick),
        ],
        1..80,
    )
}

fn arb_viewport() -> impl Strategy<Value = Viewport> {
    (1u32..=4000, 1u32..=4000).prop_map(|(w, h)| Viewport::new(f64::from(w), f64::from(h)))
}

// ── 1-3, 6. Lifecycle ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn lifecycle_invariants_hold(spec in arb_spec(), ops in arb_ops(), viewport in arb_viewport()) {
        let duration = spec.duration;
        let mut o = AnimatedOverlay::new(spec, RecordingSurface::new(), TickDriver::new(), || {});
        for op in &ops {
            match op {
                Op::Show => o.set_visible(true),
                Op::Hide => o.set_visible(false),
                Op::Tick(ms) => {
                    o.tick(Duration::from_millis(*ms));
                }
            }
            prop_assert!((0.0..=1.0).contains(&o.progress()), "progress {}", o.progress());
            if o.is_visible_intent() {
                prop_assert!(o.is_mounted());
            }
            prop_assert!(o.driver().active_runs() <= 1);
            prop_assert_eq!(o.is_mounted(), o.host().is_open());
            prop_assert_eq!(o.is_mounted(), o.phase() != OverlayPhase::Hidden);
            if let Some(view) = o.view(viewport) {
                prop_assert!(view.backdrop.opacity >= 0.0);
                prop_assert!(view.backdrop.opacity <= o.spec().backdrop_opacity);
            }
        }

        o.tick(duration);
        o.tick(Duration::ZERO);
        if o.is_visible_intent() {
            prop_assert_eq!(o.phase(), OverlayPhase::Shown);
            prop_assert_eq!(o.progress(), 1.0);
        } else {
            prop_assert_eq!(o.phase(), OverlayPhase::Hidden);
            prop_assert!(!o.is_mounted());
        }
    }
}

// ── 4. Backdrop endpoints ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn backdrop_endpoints_exact(ceiling in 0u32..=100, r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let ceiling = f64::from(ceiling) / 100.0;
        let color = Rgba::rgb(r, g, b);
        prop_assert_eq!(backdrop_style(color, ceiling, 0.0).opacity, 0.0);
        prop_assert_eq!(backdrop_style(color, ceiling, 1.0).opacity, ceiling);
    }
}

// ── 5. Symmetry ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn entry_and_exit_runs_meet_at_same_frames(
        family in arb_family(),
        direction in arb_direction(),
        steps in 2u64..=30,
    ) {
        let viewport = Viewport::new(360.0, 640.0);
        let spec = AnimationSpec::new()
            .animation_in(family)
            .direction(direction)
            .duration(Duration::from_millis(steps * 10));
        let mut o = AnimatedOverlay::new(spec, RecordingSurface::new(), TickDriver::new(), || {});
        o.set_visible(true);
        let mut entry = Vec::new();
        for _ in 0..steps {
            entry.push(o.view(viewport).map(|v| v.content.transform));
            o.tick(Duration::from_millis(10));
        }
        o.set_visible(false);
        let mut exit = Vec::new();
        for _ in 0..steps {
            o.tick(Duration::from_millis(10));
            exit.push(o.view(viewport).map(|v| v.content.transform));
        }
        // exit[i] sits at elapsed (i+1)*10 of the exit, which is entry index steps-1-i.
        for i in 0..(steps as usize - 1) {
            let a = entry[steps as usize - 1 - i].expect("mounted during entry");
            let b = exit[i].expect("mounted during exit");
            prop_assert!((a.opacity - b.opacity).abs() < 1e-6);
            prop_assert!((a.scale - b.scale).abs() < 1e-6);
            prop_assert!((a.translate_x - b.translate_x).abs() < 1e-6);
            prop_assert!((a.translate_y - b.translate_y).abs() < 1e-6);
        }
        prop_assert!(!o.is_mounted());
    }
}
