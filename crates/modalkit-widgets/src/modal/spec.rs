#![forbid(unsafe_code)]

//! Overlay animation configuration.
//!
//! [`AnimationSpec`] is the full configuration surface (entry and exit
//! families, direction, timing, backdrop). [`AnimationSpec::simple`] is the
//! narrow preset that only picks one of [`SimpleAnimation`].
//!
//! # Failure Modes
//!
//! Nothing here fails hard. Unrecognized names parse to the default variant,
//! non-positive durations become [`DEFAULT_DURATION`], and out-of-range
//! opacities are clamped. Each fallback logs a warning on `modalkit.overlay`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::style::StyleOverride;

/// Run length used when none (or a non-positive one) is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

/// Backdrop opacity ceiling used when none (or NaN) is configured.
pub const DEFAULT_BACKDROP_OPACITY: f64 = 0.5;

// ============================================================================
// Name parsing
// ============================================================================

/// An enum name that matched no variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownName {}

fn parse_name<T: Copy>(
    kind: &'static str,
    input: &str,
    table: &[(&'static str, T)],
) -> Result<T, UnknownName> {
    let needle = input.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|&(_, value)| value)
        .ok_or_else(|| UnknownName {
            kind,
            value: input.to_string(),
        })
}

fn parse_or_default<T: Copy + Default + fmt::Debug>(
    kind: &'static str,
    input: &str,
    table: &[(&'static str, T)],
) -> T {
    parse_name(kind, input, table).unwrap_or_else(|err| {
        let fallback = T::default();
        tracing::warn!(
            target: "modalkit.overlay",
            kind = err.kind,
            value = %err.value,
            fallback = ?fallback,
            "unrecognized name, using default"
        );
        fallback
    })
}

// ============================================================================
// Families and directions
// ============================================================================

/// Content animation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationFamily {
    /// Content opacity follows progress.
    #[default]
    Fade,
    /// Content translates in from off-screen along one axis.
    Slide,
    /// Like slide, with one overshoot and a settle.
    Bounce,
    /// Content scales from 0 to 1.
    Zoom,
    /// Content is left untouched; only the backdrop animates.
    None,
}

impl AnimationFamily {
    /// Every family, in declaration order.
    pub const ALL: [Self; 5] = [Self::Fade, Self::Slide, Self::Bounce, Self::Zoom, Self::None];

    const NAMES: [(&'static str, Self); 5] = [
        ("fade", Self::Fade),
        ("slide", Self::Slide),
        ("bounce", Self::Bounce),
        ("zoom", Self::Zoom),
        ("none", Self::None),
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Slide => "slide",
            Self::Bounce => "bounce",
            Self::Zoom => "zoom",
            Self::None => "none",
        }
    }

    /// Whether the family uses [`AnimationDirection`].
    #[inline]
    #[must_use]
    pub fn is_directional(self) -> bool {
        matches!(self, Self::Slide | Self::Bounce)
    }

    /// Parse a name, falling back to [`AnimationFamily::Fade`].
    #[must_use]
    pub fn parse_lossy(input: &str) -> Self {
        parse_or_default("animation family", input, &Self::NAMES)
    }
}

impl FromStr for AnimationFamily {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("animation family", s, &Self::NAMES)
    }
}

impl fmt::Display for AnimationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where slide and bounce content comes from.
///
/// The name is the direction of travel: `Up` enters from below the viewport,
/// `Left` enters from the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationDirection {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl AnimationDirection {
    /// Every direction, in declaration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    const NAMES: [(&'static str, Self); 4] = [
        ("up", Self::Up),
        ("down", Self::Down),
        ("left", Self::Left),
        ("right", Self::Right),
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Motion happens on the y axis.
    #[inline]
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Sign of the off-screen start offset: `+1` for up/left, `-1` for down/right.
    #[inline]
    #[must_use]
    pub fn start_sign(self) -> f64 {
        match self {
            Self::Up | Self::Left => 1.0,
            Self::Down | Self::Right => -1.0,
        }
    }

    /// Parse a name, falling back to [`AnimationDirection::Up`].
    #[must_use]
    pub fn parse_lossy(input: &str) -> Self {
        parse_or_default("animation direction", input, &Self::NAMES)
    }
}

impl FromStr for AnimationDirection {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("animation direction", s, &Self::NAMES)
    }
}

impl fmt::Display for AnimationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Animation choice of the simple modal preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimpleAnimation {
    None,
    Slide,
    #[default]
    Fade,
}

impl SimpleAnimation {
    const NAMES: [(&'static str, Self); 3] = [
        ("none", Self::None),
        ("slide", Self::Slide),
        ("fade", Self::Fade),
    ];

    /// The family this choice maps onto.
    #[must_use]
    pub fn family(self) -> AnimationFamily {
        match self {
            Self::None => AnimationFamily::None,
            Self::Slide => AnimationFamily::Slide,
            Self::Fade => AnimationFamily::Fade,
        }
    }

    /// Parse a name, falling back to [`SimpleAnimation::Fade`].
    #[must_use]
    pub fn parse_lossy(input: &str) -> Self {
        parse_or_default("animation type", input, &Self::NAMES)
    }
}

impl FromStr for SimpleAnimation {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("animation type", s, &Self::NAMES)
    }
}

// ============================================================================
// Color
// ============================================================================

/// Why a color string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa` (the `#` is optional).
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(input.to_string());
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let parsed = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(255)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(err()),
        };
        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self { r, g, b, a }),
            _ => Err(err()),
        }
    }

    /// Parse a hex color, falling back to black.
    #[must_use]
    pub fn parse_lossy(input: &str) -> Self {
        Self::parse_hex(input).unwrap_or_else(|err| {
            tracing::warn!(
                target: "modalkit.overlay",
                value = %err.0,
                "invalid backdrop color, using black"
            );
            Self::BLACK
        })
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// AnimationSpec
// ============================================================================

/// Per-overlay animation and backdrop configuration.
///
/// Fields are public for struct-update syntax; the controller runs every
/// spec through [`sanitized`](Self::sanitized) before using it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    /// Family used while entering and shown.
    pub animation_in: AnimationFamily,
    /// Family used while exiting. `None` means "same as `animation_in`".
    pub animation_out: Option<AnimationFamily>,
    /// Axis and sign for slide and bounce.
    pub direction: AnimationDirection,
    /// Length of every entry and exit run.
    pub duration: Duration,
    /// Whether backdrop taps reach the dismiss callback.
    pub close_on_backdrop_press: bool,
    /// Backdrop opacity at progress 1, in `[0, 1]`.
    pub backdrop_opacity: f64,
    /// Backdrop fill.
    pub backdrop_color: Rgba,
    /// Forwarded to the surface host.
    pub status_bar_translucent: bool,
    /// Caller overrides merged onto the animated content style.
    pub content_style: StyleOverride,
    /// Caller overrides for the full-screen container.
    pub container_style: StyleOverride,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            animation_in: AnimationFamily::Fade,
            animation_out: None,
            direction: AnimationDirection::Up,
            duration: DEFAULT_DURATION,
            close_on_backdrop_press: true,
            backdrop_opacity: DEFAULT_BACKDROP_OPACITY,
            backdrop_color: Rgba::BLACK,
            status_bar_translucent: true,
            content_style: StyleOverride::default(),
            container_style: StyleOverride::default(),
        }
    }
}

impl AnimationSpec {
    /// Default configuration: fade in and out over 300ms, 0.5 black backdrop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The simple-modal preset.
    ///
    /// Slide always travels up and content sits in the default card style.
    #[must_use]
    pub fn simple(animation: SimpleAnimation) -> Self {
        Self {
            animation_in: animation.family(),
            content_style: StyleOverride::card(),
            ..Self::default()
        }
    }

    /// Set the entry family. The exit family follows unless set explicitly.
    #[must_use]
    pub fn animation_in(mut self, family: AnimationFamily) -> Self {
        self.animation_in = family;
        self
    }

    /// Set the exit family explicitly.
    #[must_use]
    pub fn animation_out(mut self, family: AnimationFamily) -> Self {
        self.animation_out = Some(family);
        self
    }

    /// Set the slide/bounce direction.
    #[must_use]
    pub fn direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the run length. Zero falls back to [`DEFAULT_DURATION`] when sanitized.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the run length in milliseconds; values `<= 0` use [`DEFAULT_DURATION`].
    #[must_use]
    pub fn duration_ms(mut self, ms: i64) -> Self {
        self.duration = if ms > 0 {
            Duration::from_millis(ms as u64)
        } else {
            tracing::warn!(
                target: "modalkit.overlay",
                duration_ms = ms,
                "non-positive animation duration, using default"
            );
            DEFAULT_DURATION
        };
        self
    }

    /// Gate backdrop taps.
    #[must_use]
    pub fn close_on_backdrop_press(mut self, close: bool) -> Self {
        self.close_on_backdrop_press = close;
        self
    }

    /// Set the backdrop opacity ceiling (clamped when sanitized).
    #[must_use]
    pub fn backdrop_opacity(mut self, opacity: f64) -> Self {
        self.backdrop_opacity = opacity;
        self
    }

    /// Set the backdrop color.
    #[must_use]
    pub fn backdrop_color(mut self, color: Rgba) -> Self {
        self.backdrop_color = color;
        self
    }

    /// Set the status-bar flag forwarded to the host surface.
    #[must_use]
    pub fn status_bar_translucent(mut self, translucent: bool) -> Self {
        self.status_bar_translucent = translucent;
        self
    }

    /// Set content overrides.
    #[must_use]
    pub fn content_style(mut self, style: StyleOverride) -> Self {
        self.content_style = style;
        self
    }

    /// Set container overrides.
    #[must_use]
    pub fn container_style(mut self, style: StyleOverride) -> Self {
        self.container_style = style;
        self
    }

    /// Exit family (the entry family unless overridden).
    #[inline]
    #[must_use]
    pub fn exit_family(&self) -> AnimationFamily {
        self.animation_out.unwrap_or(self.animation_in)
    }

    /// Copy with every out-of-range value replaced by a safe default.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut spec = self.clone();
        if spec.duration.is_zero() {
            tracing::warn!(
                target: "modalkit.overlay",
                "zero animation duration, using default"
            );
            spec.duration = DEFAULT_DURATION;
        }
        if spec.backdrop_opacity.is_nan() {
            tracing::warn!(
                target: "modalkit.overlay",
                "NaN backdrop opacity, using default"
            );
            spec.backdrop_opacity = DEFAULT_BACKDROP_OPACITY;
        } else if !(0.0..=1.0).contains(&spec.backdrop_opacity) {
            tracing::warn!(
                target: "modalkit.overlay",
                backdrop_opacity = spec.backdrop_opacity,
                "backdrop opacity outside [0, 1], clamping"
            );
            spec.backdrop_opacity = spec.backdrop_opacity.clamp(0.0, 1.0);
        }
        spec
    }
}
