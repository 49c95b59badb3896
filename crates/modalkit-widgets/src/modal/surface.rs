#![forbid(unsafe_code)]

//! The host overlay-surface capability.
//!
//! A [`SurfaceHost`] is whatever actually puts a layer above the app: a
//! native modal window, a compositor layer, a terminal alt-screen. The
//! controller only opens it, closes it, and asks whether the user requested
//! a close through the host (hardware back, system gesture).

/// Options forwarded to the host when the surface opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    /// Draw under a translucent status bar.
    pub status_bar_translucent: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            status_bar_translucent: true,
        }
    }
}

/// Opens and closes the overlay layer.
pub trait SurfaceHost {
    /// Insert the overlay layer into the render tree.
    fn open(&mut self, options: &SurfaceOptions);

    /// Remove the overlay layer.
    fn close(&mut self);

    /// Take a pending host close request, if any.
    fn take_close_request(&mut self) -> bool;
}

impl<H: SurfaceHost + ?Sized> SurfaceHost for Box<H> {
    fn open(&mut self, options: &SurfaceOptions) {
        (**self).open(options);
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn take_close_request(&mut self) -> bool {
        (**self).take_close_request()
    }
}

impl<H: SurfaceHost + ?Sized> SurfaceHost for &mut H {
    fn open(&mut self, options: &SurfaceOptions) {
        (**self).open(options);
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn take_close_request(&mut self) -> bool {
        (**self).take_close_request()
    }
}

/// Something the recording surface observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Opened(SurfaceOptions),
    Closed,
}

/// In-memory host for headless runs: records every open/close and lets the
/// caller inject close requests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    open: bool,
    close_requested: bool,
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    /// Create a closed surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the layer is currently in the render tree.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Everything observed so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Simulate a host close request (for example the back button).
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }
}

impl SurfaceHost for RecordingSurface {
    fn open(&mut self, options: &SurfaceOptions) {
        self.open = true;
        self.events.push(SurfaceEvent::Opened(*options));
    }

    fn close(&mut self) {
        self.open = false;
        self.events.push(SurfaceEvent::Closed);
    }

    fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }
}
