#![forbid(unsafe_code)]

//! Owner-side visibility flag.

use std::cell::Cell;
use std::rc::Rc;

/// The owner's "should the overlay show" flag.
///
/// Shareable between a dismiss callback and the code that reports the flag
/// to the controller: clones observe the same value.
///
/// ```
/// use modalkit_widgets::ModalVisibility;
///
/// let visibility = ModalVisibility::new(false);
/// let dismiss = visibility.clone();
/// visibility.show();
/// dismiss.hide();
/// assert!(!visibility.is_visible());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModalVisibility {
    visible: Rc<Cell<bool>>,
}

impl ModalVisibility {
    #[must_use]
    pub fn new(initial: bool) -> Self {
        Self {
            visible: Rc::new(Cell::new(initial)),
        }
    }

    pub fn show(&self) {
        self.visible.set(true);
    }

    pub fn hide(&self) {
        self.visible.set(false);
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.visible.get();
        self.visible.set(next);
        next
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}
