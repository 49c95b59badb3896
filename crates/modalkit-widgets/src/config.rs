#![forbid(unsafe_code)]

//! Modal configuration as data.
//!
//! [`ModalConfig`] mirrors the overlay's option surface with plain strings
//! and numbers so it can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # modal.toml
//! animation_in = "bounce"
//! animation_direction = "left"
//! animation_duration_ms = 450
//! backdrop_color = "#102030"
//!
//! [content_style]
//! background = "#fff"
//! border_radius = 12
//! ```
//!
//! ```rust,ignore
//! let config = ModalConfig::from_toml_file("modal.toml")?;
//! let spec = config.to_spec();
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the overlay's default, so an empty document
//! produces `AnimationSpec::default()`. Conversion never fails:
//! [`ModalConfig::validate`] lists the problems and [`ModalConfig::to_spec`]
//! replaces each bad field with its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::modal::{
    AnimationDirection, AnimationFamily, AnimationSpec, Rgba, SimpleAnimation, StyleOverride,
};

// ---------------------------------------------------------------------------
// ModalConfig
// ---------------------------------------------------------------------------

/// Serializable overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Simple preset: `none`, `slide`, or `fade`. When set, the entry/exit
    /// families and direction are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_type: Option<String>,

    /// Entry family: `fade`, `slide`, `bounce`, `zoom`, or `none`.
    pub animation_in: String,

    /// Exit family. Defaults to the entry family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_out: Option<String>,

    /// `up`, `down`, `left`, or `right`.
    pub animation_direction: String,

    /// Run length in milliseconds. Values `<= 0` fall back to 300.
    pub animation_duration_ms: i64,

    pub close_on_backdrop_press: bool,

    /// Backdrop opacity ceiling in `[0, 1]`.
    pub backdrop_opacity: f64,

    /// Hex backdrop color.
    pub backdrop_color: String,

    pub status_bar_translucent: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_style: Option<StyleConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_style: Option<StyleConfig>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            animation_type: None,
            animation_in: "fade".to_string(),
            animation_out: None,
            animation_direction: "up".to_string(),
            animation_duration_ms: 300,
            close_on_backdrop_press: true,
            backdrop_opacity: 0.5,
            backdrop_color: "#000".to_string(),
            status_bar_translucent: true,
            content_style: None,
            container_style: None,
        }
    }
}

impl ModalConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format from its extension (`.toml` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Check every field.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(kind) = &self.animation_type {
            if let Err(e) = kind.parse::<SimpleAnimation>() {
                errors.push(format!("animation_type: {e}"));
            }
        }
        if let Err(e) = self.animation_in.parse::<AnimationFamily>() {
            errors.push(format!("animation_in: {e}"));
        }
        if let Some(out) = &self.animation_out {
            if let Err(e) = out.parse::<AnimationFamily>() {
                errors.push(format!("animation_out: {e}"));
            }
        }
        if let Err(e) = self.animation_direction.parse::<AnimationDirection>() {
            errors.push(format!("animation_direction: {e}"));
        }
        if self.animation_duration_ms <= 0 {
            errors.push(format!(
                "animation_duration_ms must be > 0, got {}",
                self.animation_duration_ms
            ));
        }
        if !(0.0..=1.0).contains(&self.backdrop_opacity) {
            errors.push(format!(
                "backdrop_opacity must be in [0, 1], got {}",
                self.backdrop_opacity
            ));
        }
        if let Err(e) = Rgba::parse_hex(&self.backdrop_color) {
            errors.push(format!("backdrop_color: {e}"));
        }
        if let Some(style) = &self.content_style {
            style.validate("content_style", &mut errors);
        }
        if let Some(style) = &self.container_style {
            style.validate("container_style", &mut errors);
        }

        errors
    }

    /// Convert to an [`AnimationSpec`], replacing invalid fields with defaults.
    #[must_use]
    pub fn to_spec(&self) -> AnimationSpec {
        let mut spec = match &self.animation_type {
            Some(kind) => AnimationSpec::simple(SimpleAnimation::parse_lossy(kind)),
            None => {
                let mut spec = AnimationSpec::new()
                    .animation_in(AnimationFamily::parse_lossy(&self.animation_in))
                    .direction(AnimationDirection::parse_lossy(&self.animation_direction));
                if let Some(out) = &self.animation_out {
                    spec = spec.animation_out(AnimationFamily::parse_lossy(out));
                }
                spec
            }
        };

        spec = spec
            .duration_ms(self.animation_duration_ms)
            .close_on_backdrop_press(self.close_on_backdrop_press)
            .backdrop_opacity(self.backdrop_opacity)
            .backdrop_color(Rgba::parse_lossy(&self.backdrop_color))
            .status_bar_translucent(self.status_bar_translucent);

        if let Some(style) = &self.content_style {
            spec.content_style = spec.content_style.merge(style.to_override());
        }
        if let Some(style) = &self.container_style {
            spec.container_style = spec.container_style.merge(style.to_override());
        }

        spec.sanitized()
    }
}

// ---------------------------------------------------------------------------
// StyleConfig
// ---------------------------------------------------------------------------

/// Serializable [`StyleOverride`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub opacity: Option<f64>,
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
    pub scale: Option<f64>,
    /// Hex color.
    pub background: Option<String>,
    pub padding: Option<f64>,
    pub border_radius: Option<f64>,
    pub max_width_pct: Option<f64>,
    pub max_height_pct: Option<f64>,
}

impl StyleConfig {
    fn validate(&self, section: &str, errors: &mut Vec<String>) {
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                errors.push(format!("{section}.opacity must be in [0, 1], got {opacity}"));
            }
        }
        if let Some(background) = &self.background {
            if let Err(e) = Rgba::parse_hex(background) {
                errors.push(format!("{section}.background: {e}"));
            }
        }
        for (name, value) in [
            ("padding", self.padding),
            ("border_radius", self.border_radius),
            ("max_width_pct", self.max_width_pct),
            ("max_height_pct", self.max_height_pct),
        ] {
            if let Some(v) = value {
                if !(v >= 0.0) {
                    errors.push(format!("{section}.{name} must be >= 0, got {v}"));
                }
            }
        }
    }

    /// Convert to a [`StyleOverride`]. An invalid background is dropped with a warning.
    #[must_use]
    pub fn to_override(&self) -> StyleOverride {
        let background = self
            .background
            .as_deref()
            .and_then(|hex| match Rgba::parse_hex(hex) {
                Ok(color) => Some(color),
                Err(err) => {
                    tracing::warn!(
                        target: "modalkit.overlay",
                        value = %err.0,
                        "invalid style background, ignoring"
                    );
                    None
                }
            });
        StyleOverride {
            opacity: self.opacity,
            translate_x: self.translate_x,
            translate_y: self.translate_y,
            scale: self.scale,
            background,
            padding: self.padding,
            border_radius: self.border_radius,
            max_width_pct: self.max_width_pct,
            max_height_pct: self.max_height_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a modal configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse or serialize error.
    Json(serde_json::Error),
    /// The file extension is neither `.toml` nor `.json`.
    UnsupportedFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported config format (expected .toml or .json): {path}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::UnsupportedFormat(_) => None,
        }
    }
}
