#![forbid(unsafe_code)]

//! End-to-end lifecycle scenarios for the animated overlay.
//!
//! Every scenario drives a real [`AnimatedOverlay`] with a [`TickDriver`]
//! and a [`RecordingSurface`], then checks mount state, progress, and the
//! rendered styles frame by frame.
//!
//! Run:
//!   cargo test -p modalkit-widgets --test overlay_lifecycle

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use modalkit_core::animation::TickDriver;
use modalkit_widgets::ModalVisibility;
use modalkit_widgets::modal::{
    AnimatedOverlay, AnimationDirection, AnimationFamily, AnimationSpec, OverlayPhase,
    OverlayTransition, RecordingSurface, SimpleAnimation, StyleOverride, SurfaceEvent, Viewport,
    content_style,
};

const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);
const FRAME: Duration = Duration::from_millis(10);

type Overlay = AnimatedOverlay<RecordingSurface, TickDriver>;

fn overlay(spec: AnimationSpec) -> Overlay {
    AnimatedOverlay::new(spec, RecordingSurface::new(), TickDriver::new(), || {})
}

fn shown(spec: AnimationSpec) -> Overlay {
    let mut o = overlay(spec);
    o.set_visible(true);
    let done = o.tick(Duration::from_millis(300));
    assert_eq!(done, Some(OverlayTransition::Entered));
    o
}

// ============================================================================
// Mount timing
// ============================================================================

#[test]
fn zoom_entry_end_to_end() {
    let mut o = overlay(AnimationSpec::new().animation_in(AnimationFamily::Zoom));
    o.set_visible(true);

    let first = o.view(VIEWPORT).expect("mounted before any time passes");
    assert_eq!(first.content.transform.scale, 0.0);
    assert_eq!(first.backdrop.opacity, 0.0);

    let mut transition = None;
    for _ in 0..30 {
        assert!(o.is_mounted());
        transition = o.tick(FRAME).or(transition);
        let view = o.view(VIEWPORT).expect("mounted throughout");
        assert!((0.0..=1.0).contains(&view.content.transform.scale));
    }
    assert_eq!(transition, Some(OverlayTransition::Entered));

    let last = o.view(VIEWPORT).expect("shown");
    assert_eq!(last.content.transform.scale, 1.0);
    assert_eq!(last.backdrop.opacity, 0.5);
    assert_eq!(last.phase, OverlayPhase::Shown);
}

#[test]
fn hidden_exit_stays_unmounted_until_shown_again() {
    let mut o = shown(AnimationSpec::new());
    o.set_visible(false);
    assert_eq!(o.tick(Duration::from_millis(300)), Some(OverlayTransition::Exited));
    assert!(!o.is_mounted());

    for _ in 0..50 {
        assert_eq!(o.tick(FRAME), None);
        assert!(!o.is_mounted());
        assert!(o.view(VIEWPORT).is_none());
    }

    o.set_visible(true);
    assert!(o.is_mounted());
    assert_eq!(
        o.host()
            .events()
            .iter()
            .filter(|e| **e == SurfaceEvent::Closed)
            .count(),
        1
    );
}

#[test]
fn show_then_immediate_hide_never_unmounts_early() {
    let mut o = overlay(AnimationSpec::new());
    o.set_visible(true);
    o.tick(Duration::from_millis(120));
    let interrupted = o.progress();
    assert!(interrupted > 0.0 && interrupted < 1.0);

    o.set_visible(false);
    // Exit starts from where the entry stopped, not from 1.
    let first_exit_frame = o.view(VIEWPORT).expect("still mounted");
    assert!((first_exit_frame.progress - interrupted).abs() < 1e-9);

    let mut last = interrupted;
    loop {
        let transition = o.tick(FRAME);
        if transition == Some(OverlayTransition::Exited) {
            break;
        }
        assert!(o.is_mounted(), "unmounted before exit finished");
        assert!(o.progress() <= last + 1e-12, "exit progress went up");
        last = o.progress();
    }
    assert!(!o.is_mounted());
}

#[test]
fn show_while_shown_produces_no_new_run() {
    let mut o = shown(AnimationSpec::new());
    let before = o.view(VIEWPORT);
    o.set_visible(true);
    o.set_visible(true);
    assert_eq!(o.driver().active_runs(), 0);
    assert!(o.active_run().is_none());
    assert_eq!(o.tick(FRAME), None);
    assert_eq!(o.view(VIEWPORT), before);
}

#[test]
fn rapid_toggle_settles_on_last_intent() {
    let mut o = overlay(AnimationSpec::new());
    for step in 0..25 {
        o.set_visible(step % 3 != 0);
        o.tick(Duration::from_millis(17));
        assert!(o.driver().active_runs() <= 1);
        if o.is_visible_intent() {
            assert!(o.is_mounted());
        }
    }
    let target = o.is_visible_intent();
    for _ in 0..40 {
        o.tick(FRAME);
    }
    assert_eq!(o.is_mounted(), target);
    assert_eq!(o.progress(), if target { 1.0 } else { 0.0 });
}

// ============================================================================
// Style mapping through the controller
// ============================================================================

#[test]
fn bounce_up_checkpoints_are_exact() {
    let expected = [(0.0, 800.0), (0.5, -20.0), (0.8, 10.0), (1.0, 0.0)];
    for (progress, offset) in expected {
        let style = content_style(
            AnimationFamily::Bounce,
            AnimationDirection::Up,
            progress,
            VIEWPORT,
        );
        assert_eq!(style.translate_y, offset, "progress {progress}");
        assert_eq!(style.translate_x, 0.0);
    }
}

#[test]
fn bounce_up_through_controller() {
    let mut o = overlay(
        AnimationSpec::new()
            .animation_in(AnimationFamily::Bounce)
            .direction(AnimationDirection::Up),
    );
    o.set_visible(true);
    assert_eq!(o.view(VIEWPORT).expect("mounted").content.transform.translate_y, 800.0);

    o.tick(Duration::from_millis(150));
    let mid = o.view(VIEWPORT).expect("mounted").content.transform.translate_y;
    assert!((mid + 20.0).abs() < 1e-6, "mid = {mid}");

    o.tick(Duration::from_millis(90));
    let late = o.view(VIEWPORT).expect("mounted").content.transform.translate_y;
    assert!((late - 10.0).abs() < 1e-6, "late = {late}");

    o.tick(Duration::from_millis(60));
    assert_eq!(o.view(VIEWPORT).expect("mounted").content.transform.translate_y, 0.0);
}

#[test]
fn slide_left_entry_and_exit_are_inverse() {
    let spec = AnimationSpec::new()
        .animation_in(AnimationFamily::Slide)
        .direction(AnimationDirection::Left);
    let mut o = overlay(spec);
    o.set_visible(true);

    let mut entry = vec![o.view(VIEWPORT).expect("mounted").content.transform.translate_x];
    for _ in 0..30 {
        o.tick(FRAME);
        entry.push(o.view(VIEWPORT).expect("mounted").content.transform.translate_x);
    }
    assert_eq!(entry[0], 400.0, "left enters from the right edge");
    assert_eq!(*entry.last().expect("frames"), 0.0);

    o.set_visible(false);
    let mut exit = vec![o.view(VIEWPORT).expect("mounted").content.transform.translate_x];
    for _ in 0..29 {
        o.tick(FRAME);
        exit.push(o.view(VIEWPORT).expect("mounted").content.transform.translate_x);
    }
    exit.reverse();
    // Exit frames retrace entry frames (the final frame is unmounted).
    for (a, b) in entry.iter().skip(1).zip(&exit) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        assert!(*a >= 0.0);
    }
}

#[test]
fn backdrop_endpoints_exact_for_every_family() {
    for family in AnimationFamily::ALL {
        let mut o = overlay(
            AnimationSpec::new()
                .animation_in(family)
                .backdrop_opacity(0.65),
        );
        o.set_visible(true);
        assert_eq!(o.view(VIEWPORT).expect("mounted").backdrop.opacity, 0.0, "{family}");
        o.tick(Duration::from_millis(300));
        assert_eq!(o.view(VIEWPORT).expect("mounted").backdrop.opacity, 0.65, "{family}");
    }
}

#[test]
fn none_family_leaves_content_unchanged() {
    let mut o = overlay(AnimationSpec::new().animation_in(AnimationFamily::None));
    o.set_visible(true);
    o.tick(Duration::from_millis(100));
    let view = o.view(VIEWPORT).expect("mounted");
    assert_eq!(view.content.transform.opacity, 1.0);
    assert_eq!(view.content.transform.scale, 1.0);
    assert_eq!(view.content.transform.translate_x, 0.0);
    assert_eq!(view.content.transform.translate_y, 0.0);
}

#[test]
fn caller_style_wins_over_computed() {
    let mut o = overlay(
        AnimationSpec::new()
            .animation_in(AnimationFamily::Fade)
            .content_style(StyleOverride::new().opacity(0.9).padding(8.0)),
    );
    o.set_visible(true);
    let view = o.view(VIEWPORT).expect("mounted");
    assert_eq!(view.content.transform.opacity, 0.9);
    assert_eq!(view.content.padding, Some(8.0));
}

#[test]
fn simple_preset_uses_card_and_slides_up() {
    let mut o = overlay(AnimationSpec::simple(SimpleAnimation::Slide));
    o.set_visible(true);
    let view = o.view(VIEWPORT).expect("mounted");
    assert_eq!(view.content.transform.translate_y, 800.0);
    assert_eq!(view.content.border_radius, Some(10.0));
    assert_eq!(view.content.max_width_pct, Some(80.0));
}

// ============================================================================
// Dismissal
// ============================================================================

#[test]
fn backdrop_tap_disabled_never_calls_back() {
    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&calls);
    let mut o = AnimatedOverlay::new(
        AnimationSpec::new().close_on_backdrop_press(false),
        RecordingSurface::new(),
        TickDriver::new(),
        move || seen.set(seen.get() + 1),
    );
    o.set_visible(true);
    for _ in 0..5 {
        assert!(!o.press_backdrop());
        o.tick(FRAME);
    }
    o.tick(Duration::from_millis(300));
    assert!(!o.press_backdrop());
    assert_eq!(calls.get(), 0);
}

#[test]
fn backdrop_tap_drives_owner_visibility() {
    let visibility = ModalVisibility::new(false);
    let dismiss = visibility.clone();
    let mut o = AnimatedOverlay::new(
        AnimationSpec::new(),
        RecordingSurface::new(),
        TickDriver::new(),
        move || dismiss.hide(),
    );

    visibility.show();
    o.set_visible(visibility.is_visible());
    o.tick(Duration::from_millis(300));

    assert!(o.press_backdrop());
    assert!(!visibility.is_visible());
    // The controller only exits once the owner reports the new flag.
    assert_eq!(o.phase(), OverlayPhase::Shown);
    o.set_visible(visibility.is_visible());
    assert_eq!(o.phase(), OverlayPhase::Exiting);
    assert_eq!(o.tick(Duration::from_millis(300)), Some(OverlayTransition::Exited));
}

#[test]
fn host_back_request_reaches_owner_even_when_taps_disabled() {
    let visibility = ModalVisibility::new(true);
    let dismiss = visibility.clone();
    let mut o = AnimatedOverlay::new(
        AnimationSpec::new().close_on_backdrop_press(false),
        RecordingSurface::new(),
        TickDriver::new(),
        move || dismiss.hide(),
    );
    o.set_visible(true);
    o.host_mut().request_close();
    o.tick(FRAME);
    assert!(!visibility.is_visible());
}

// ============================================================================
// Worker-thread driver
// ============================================================================

#[test]
fn thread_driver_completes_full_cycle() {
    use modalkit_core::animation::ThreadDriver;

    fn pump_until(
        o: &mut AnimatedOverlay<RecordingSurface, ThreadDriver>,
        wanted: OverlayTransition,
    ) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if o.pump() == Some(wanted) {
                return true;
            }
            assert!((0.0..=1.0).contains(&o.progress()));
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    let mut o = AnimatedOverlay::new(
        AnimationSpec::new().duration(Duration::from_millis(30)),
        RecordingSurface::new(),
        ThreadDriver::with_frame_interval(Duration::from_millis(2)),
        || {},
    );
    o.set_visible(true);
    assert!(pump_until(&mut o, OverlayTransition::Entered));
    assert_eq!(o.progress(), 1.0);

    o.set_visible(false);
    assert!(o.is_mounted());
    assert!(pump_until(&mut o, OverlayTransition::Exited));
    assert!(!o.is_mounted());
    assert_eq!(o.driver().tracked_runs(), 0);
}
