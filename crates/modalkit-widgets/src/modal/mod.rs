#![forbid(unsafe_code)]

//! Animated modal overlay.
//!
//! - [`spec`]: configuration ([`AnimationSpec`]) and its presets.
//! - [`style`]: pure progress-to-style mapping.
//! - [`backdrop`]: dismiss-gesture gating.
//! - [`surface`]: the host surface capability.
//! - [`controller`]: the lifecycle state machine tying them together.

pub mod backdrop;
pub mod controller;
pub mod spec;
pub mod style;
pub mod surface;

pub use backdrop::{BackdropGate, DismissSource};
pub use controller::{AnimatedOverlay, OverlayPhase, OverlayTransition, OverlayView};
pub use spec::{
    AnimationDirection, AnimationFamily, AnimationSpec, ColorParseError, DEFAULT_BACKDROP_OPACITY,
    DEFAULT_DURATION, Rgba, SimpleAnimation, UnknownName,
};
pub use style::{
    BOUNCE_CORRECTION, BOUNCE_OVERSHOOT, BOUNCE_STOPS, BackdropStyle, ContentStyle, ResolvedStyle,
    StyleOverride, Viewport, backdrop_style, bounce_curve, content_style, off_screen_offset,
};
pub use surface::{RecordingSurface, SurfaceEvent, SurfaceHost, SurfaceOptions};
