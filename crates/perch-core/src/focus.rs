//! # Screen focus
//!
//! `FocusNotifier` tracks whether a screen is in the foreground and calls its
//! subscribers once per background→foreground transition. Repeated
//! `set_focused(true)` calls while already focused are ignored, and nothing
//! fires while the screen stays in the background.
//!
//! ```rust
//! use perch_core::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let focus = FocusNotifier::new();
//! let hits = Rc::new(Cell::new(0));
//! let sub = focus.subscribe({
//!     let hits = hits.clone();
//!     move || hits.set(hits.get() + 1)
//! });
//!
//! focus.set_focused(true);
//! focus.set_focused(true); // already focused
//! assert_eq!(hits.get(), 1);
//!
//! drop(sub);
//! focus.set_focused(false);
//! focus.set_focused(true);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::signal::{SubId, WeakSignal};
use crate::{Dispose, Signal, signal};

#[derive(Clone)]
pub struct FocusNotifier {
    focused: Rc<Cell<bool>>,
    /// Bumped on every foreground transition.
    generation: Signal<u64>,
}

impl Default for FocusNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusNotifier {
    /// Starts in the background.
    pub fn new() -> Self {
        Self {
            focused: Rc::new(Cell::new(false)),
            generation: signal(0),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// Number of foreground transitions so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Records the screen's focus state; notifies only on background→foreground.
    pub fn set_focused(&self, focused: bool) {
        let was = self.focused.replace(focused);
        if focused && !was {
            log::trace!("screen focused (generation {})", self.generation.get() + 1);
            self.generation.update(|g| *g = g.wrapping_add(1));
        }
    }

    pub fn subscribe(&self, f: impl Fn() + 'static) -> FocusSubscription {
        let id = self.generation.subscribe(move |_| f());
        FocusSubscription {
            signal: self.generation.downgrade(),
            id: Cell::new(Some(id)),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.generation.subscriber_count()
    }
}

/// Live focus subscription; unsubscribes when dropped or released.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct FocusSubscription {
    signal: WeakSignal<u64>,
    id: Cell<Option<SubId>>,
}

impl FocusSubscription {
    /// Unsubscribes now. Later calls and the eventual drop are no-ops.
    pub fn release(&self) {
        let Some(id) = self.id.take() else {
            return;
        };
        // The notifier may already be gone together with its screen.
        if let Some(sig) = self.signal.upgrade() {
            sig.unsubscribe(id);
        }
    }

    pub fn is_active(&self) -> bool {
        let Some(id) = self.id.get() else {
            return false;
        };
        self.signal
            .upgrade()
            .is_some_and(|sig| sig.has_subscriber(id))
    }

    /// Converts into a [`Dispose`] that releases the subscription.
    pub fn into_dispose(self) -> Dispose {
        Dispose::new(move || self.release())
    }
}

impl Drop for FocusSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
