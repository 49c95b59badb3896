#![forbid(unsafe_code)]

//! Pure mapping from progress to backdrop and content styles.
//!
//! Nothing in this module holds state. Every function takes the progress
//! value plus configuration and returns a fresh style, so the same progress
//! always renders the same frame and entry/exit runs trace the same path in
//! opposite directions.
//!
//! | Family | Content at progress 0 | Content at progress 1 |
//! |--------|----------------------|-----------------------|
//! | fade   | opacity 0            | opacity 1             |
//! | slide  | offset off-screen    | offset 0              |
//! | bounce | offset off-screen, then -20 / +10 at 0.5 / 0.8 | offset 0 |
//! | zoom   | scale 0              | scale 1               |
//! | none   | unchanged            | unchanged             |
//!
//! The backdrop always goes linearly from opacity 0 to the configured ceiling.

use modalkit_core::animation::{Keyframes, clamp_progress, lerp};

use super::spec::{AnimationDirection, AnimationFamily, Rgba};

/// Overshoot past the resting position at progress 0.5, in logical pixels.
pub const BOUNCE_OVERSHOOT: f64 = 20.0;
/// Correction back toward the start at progress 0.8, in logical pixels.
pub const BOUNCE_CORRECTION: f64 = 10.0;
/// Progress stops of the bounce curve.
pub const BOUNCE_STOPS: [f64; 4] = [0.0, 0.5, 0.8, 1.0];

/// Logical size of the screen the overlay covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

/// Animated transform and opacity of the content container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentStyle {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ContentStyle {
    /// Fully visible, untransformed.
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };
}

impl Default for ContentStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Backdrop fill at the current progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropStyle {
    pub color: Rgba,
    pub opacity: f64,
}

/// Off-screen start offset along the direction's axis.
///
/// Up starts one viewport height below, down one height above, left one
/// width to the right, right one width to the left.
#[must_use]
pub fn off_screen_offset(direction: AnimationDirection, viewport: Viewport) -> f64 {
    let extent = if direction.is_vertical() {
        viewport.height
    } else {
        viewport.width
    };
    direction.start_sign() * extent
}

/// The four-stop overshoot-and-settle curve for `direction`.
#[must_use]
pub fn bounce_curve(direction: AnimationDirection, viewport: Viewport) -> Keyframes {
    let start = off_screen_offset(direction, viewport);
    let sign = direction.start_sign();
    let outputs = vec![
        start,
        -sign * BOUNCE_OVERSHOOT,
        sign * BOUNCE_CORRECTION,
        0.0,
    ];
    // The stop table is constant and valid; the linear curve is unreachable.
    Keyframes::new(BOUNCE_STOPS.to_vec(), outputs).unwrap_or_else(|_| Keyframes::linear(start, 0.0))
}

/// Content style for `family` at `progress`.
#[must_use]
pub fn content_style(
    family: AnimationFamily,
    direction: AnimationDirection,
    progress: f64,
    viewport: Viewport,
) -> ContentStyle {
    let p = clamp_progress(progress);
    let offset = match family {
        AnimationFamily::Slide => lerp(off_screen_offset(direction, viewport), 0.0, p),
        AnimationFamily::Bounce => bounce_curve(direction, viewport).eval(p),
        AnimationFamily::Fade | AnimationFamily::Zoom | AnimationFamily::None => 0.0,
    };
    let mut style = ContentStyle::IDENTITY;
    match family {
        AnimationFamily::Fade => style.opacity = p,
        AnimationFamily::Zoom => style.scale = p,
        AnimationFamily::Slide | AnimationFamily::Bounce => {
            if direction.is_vertical() {
                style.translate_y = offset;
            } else {
                style.translate_x = offset;
            }
        }
        AnimationFamily::None => {}
    }
    style
}

/// Backdrop style at `progress`: opacity runs linearly from 0 to `ceiling`.
#[must_use]
pub fn backdrop_style(color: Rgba, ceiling: f64, progress: f64) -> BackdropStyle {
    BackdropStyle {
        color,
        opacity: lerp(0.0, clamp_progress(ceiling), progress),
    }
}

// ============================================================================
// Caller overrides
// ============================================================================

/// Optional caller-supplied style fields. Every `Some` wins over the
/// computed value it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleOverride {
    pub opacity: Option<f64>,
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
    pub scale: Option<f64>,
    pub background: Option<Rgba>,
    pub padding: Option<f64>,
    pub border_radius: Option<f64>,
    /// Maximum width as a percentage of the viewport.
    pub max_width_pct: Option<f64>,
    /// Maximum height as a percentage of the viewport.
    pub max_height_pct: Option<f64>,
}

impl StyleOverride {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The simple modal's content card: white, rounded, padded, at most 80% of the screen.
    #[must_use]
    pub fn card() -> Self {
        Self {
            background: Some(Rgba::WHITE),
            padding: Some(20.0),
            border_radius: Some(10.0),
            max_width_pct: Some(80.0),
            max_height_pct: Some(80.0),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn translate(mut self, x: f64, y: f64) -> Self {
        self.translate_x = Some(x);
        self.translate_y = Some(y);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn border_radius(mut self, radius: f64) -> Self {
        self.border_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn max_size_pct(mut self, width: f64, height: f64) -> Self {
        self.max_width_pct = Some(width);
        self.max_height_pct = Some(height);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            opacity: other.opacity.or(self.opacity),
            translate_x: other.translate_x.or(self.translate_x),
            translate_y: other.translate_y.or(self.translate_y),
            scale: other.scale.or(self.scale),
            background: other.background.or(self.background),
            padding: other.padding.or(self.padding),
            border_radius: other.border_radius.or(self.border_radius),
            max_width_pct: other.max_width_pct.or(self.max_width_pct),
            max_height_pct: other.max_height_pct.or(self.max_height_pct),
        }
    }

    /// Apply these overrides to a computed content style.
    #[must_use]
    pub fn resolve(&self, computed: ContentStyle) -> ResolvedStyle {
        ResolvedStyle {
            transform: ContentStyle {
                opacity: self.opacity.unwrap_or(computed.opacity),
                translate_x: self.translate_x.unwrap_or(computed.translate_x),
                translate_y: self.translate_y.unwrap_or(computed.translate_y),
                scale: self.scale.unwrap_or(computed.scale),
            },
            background: self.background,
            padding: self.padding,
            border_radius: self.border_radius,
            max_width_pct: self.max_width_pct,
            max_height_pct: self.max_height_pct,
        }
    }
}

/// Content style after caller overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub transform: ContentStyle,
    pub background: Option<Rgba>,
    pub padding: Option<f64>,
    pub border_radius: Option<f64>,
    pub max_width_pct: Option<f64>,
    pub max_height_pct: Option<f64>,
}
