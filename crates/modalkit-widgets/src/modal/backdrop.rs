#![forbid(unsafe_code)]

//! Backdrop-dismiss gating.
//!
//! The controller never hides itself. It only decides whether a dismissal
//! gesture reaches the owner's callback; the owner then flips its
//! visibility flag (or doesn't).

/// Where a dismissal gesture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissSource {
    /// Tap on the backdrop region around the content.
    BackdropPress,
    /// Close request raised by the host surface (back button, system gesture).
    CloseRequest,
}

impl DismissSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::BackdropPress => "backdrop_press",
            Self::CloseRequest => "close_request",
        }
    }
}

/// Decides which dismissal gestures reach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackdropGate {
    close_on_backdrop_press: bool,
}

impl BackdropGate {
    /// Create a gate.
    #[must_use]
    pub const fn new(close_on_backdrop_press: bool) -> Self {
        Self {
            close_on_backdrop_press,
        }
    }

    /// Whether a gesture from `source` should be forwarded.
    ///
    /// Backdrop taps follow `close_on_backdrop_press`; host close requests
    /// are always forwarded.
    #[must_use]
    pub fn should_forward(&self, source: DismissSource) -> bool {
        match source {
            DismissSource::BackdropPress => self.close_on_backdrop_press,
            DismissSource::CloseRequest => true,
        }
    }

    /// Forward `source` to `callback` if allowed. Returns whether it ran.
    pub fn forward(&self, source: DismissSource, callback: &mut dyn FnMut()) -> bool {
        let forward = self.should_forward(source);
        tracing::trace!(
            target: "modalkit.overlay",
            source = source.as_str(),
            forward,
            "dismiss gesture"
        );
        if forward {
            callback();
        }
        forward
    }
}
