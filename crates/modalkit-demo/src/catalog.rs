//! The showcase catalog: one entry per button of the demo screen.

use modalkit_widgets::modal::{
    AnimationDirection, AnimationFamily, AnimationSpec, SimpleAnimation, StyleOverride,
};

use crate::error::{DemoError, Result};

/// How an entry configures its overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// The simple modal preset.
    Simple(SimpleAnimation),
    /// Independent entry and exit families.
    Full {
        animation_in: AnimationFamily,
        animation_out: AnimationFamily,
        direction: AnimationDirection,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowcaseEntry {
    /// Command-line name.
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub preset: Preset,
}

const fn full(
    animation_in: AnimationFamily,
    animation_out: AnimationFamily,
    direction: AnimationDirection,
) -> Preset {
    Preset::Full {
        animation_in,
        animation_out,
        direction,
    }
}

pub const CATALOG: [ShowcaseEntry; 9] = [
    ShowcaseEntry {
        name: "basic",
        title: "Basic Modal",
        description: "A simple modal with a touchable backdrop. Tap outside to close it.",
        preset: Preset::Simple(SimpleAnimation::Fade),
    },
    ShowcaseEntry {
        name: "fade",
        title: "Fade Animation",
        description: "Fades in and out.",
        preset: full(
            AnimationFamily::Fade,
            AnimationFamily::Fade,
            AnimationDirection::Up,
        ),
    },
    ShowcaseEntry {
        name: "slide-up",
        title: "Slide Up Animation",
        description: "Slides up from the bottom.",
        preset: full(
            AnimationFamily::Slide,
            AnimationFamily::Slide,
            AnimationDirection::Up,
        ),
    },
    ShowcaseEntry {
        name: "slide-down",
        title: "Slide Down Animation",
        description: "Slides down from the top.",
        preset: full(
            AnimationFamily::Slide,
            AnimationFamily::Slide,
            AnimationDirection::Down,
        ),
    },
    ShowcaseEntry {
        name: "slide-left",
        title: "Slide Left Animation",
        description: "Slides left, entering from the right edge.",
        preset: full(
            AnimationFamily::Slide,
            AnimationFamily::Slide,
            AnimationDirection::Left,
        ),
    },
    ShowcaseEntry {
        name: "slide-right",
        title: "Slide Right Animation",
        description: "Slides right, entering from the left edge.",
        preset: full(
            AnimationFamily::Slide,
            AnimationFamily::Slide,
            AnimationDirection::Right,
        ),
    },
    ShowcaseEntry {
        name: "bounce-up",
        title: "Bounce Up Animation",
        description: "Bounces up from the bottom and slides back out.",
        preset: full(
            AnimationFamily::Bounce,
            AnimationFamily::Slide,
            AnimationDirection::Up,
        ),
    },
    ShowcaseEntry {
        name: "bounce-down",
        title: "Bounce Down Animation",
        description: "Bounces down from the top and slides back out.",
        preset: full(
            AnimationFamily::Bounce,
            AnimationFamily::Slide,
            AnimationDirection::Down,
        ),
    },
    ShowcaseEntry {
        name: "zoom",
        title: "Zoom Animation",
        description: "Zooms in and out.",
        preset: full(
            AnimationFamily::Zoom,
            AnimationFamily::Zoom,
            AnimationDirection::Up,
        ),
    },
];

impl ShowcaseEntry {
    /// This entry's spec, layered over `base` (timing, backdrop, and styles
    /// come from `base`; the animation choice comes from the entry).
    #[must_use]
    pub fn spec(&self, base: &AnimationSpec) -> AnimationSpec {
        match self.preset {
            Preset::Simple(animation) => {
                let preset = AnimationSpec::simple(animation);
                AnimationSpec {
                    animation_in: preset.animation_in,
                    animation_out: None,
                    direction: preset.direction,
                    content_style: StyleOverride::card().merge(base.content_style),
                    ..base.clone()
                }
            }
            Preset::Full {
                animation_in,
                animation_out,
                direction,
            } => base
                .clone()
                .animation_in(animation_in)
                .animation_out(animation_out)
                .direction(direction),
        }
    }
}

/// Look up an entry by name (case-insensitive).
#[must_use]
pub fn find(name: &str) -> Option<&'static ShowcaseEntry> {
    CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
}

/// Resolve requested names; no names means the whole catalog.
pub fn resolve(names: &[String]) -> Result<Vec<&'static ShowcaseEntry>> {
    if names.is_empty() {
        return Ok(CATALOG.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            find(name).ok_or_else(|| DemoError::UnknownEntry {
                name: name.clone(),
            })
        })
        .collect()
}
