#![forbid(unsafe_code)]

//! Animated overlay widgets for modalkit.
//!
//! The centerpiece is [`modal::AnimatedOverlay`]: given an owner-held
//! visibility flag it mounts a host surface, drives a progress value from 0
//! to 1 (or back), maps that progress to backdrop and content styles, and
//! only unmounts once the exit run has finished.
//!
//! # Feature Flags
//!
//! - `config`: load [`config::ModalConfig`] from TOML or JSON.

pub mod modal;
pub mod visibility;

#[cfg(feature = "config")]
pub mod config;

pub use modal::{AnimatedOverlay, AnimationSpec, OverlayPhase, OverlayTransition, OverlayView};
pub use visibility::ModalVisibility;
