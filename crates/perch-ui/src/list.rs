//! # Scroll-preserving list
//!
//! A [`LazyList`] loses its scroll position when the screen hosting it is
//! frozen: the list is unmounted and a fresh one starts at the top when the
//! screen comes back. `ScrollPreservingList` wraps the list and keeps the
//! position in the screen's [`ScrollSlot`]:
//!
//! - every `on_momentum_scroll_end` writes the resting offset into the slot
//!   (per-frame `on_scroll` events are passed through but never stored, so a
//!   half-finished fling is never remembered);
//! - every time the screen's [`FocusNotifier`] reports a foreground
//!   transition, the list is scrolled back to the stored offset, without
//!   animation.
//!
//! Both the slot and the notifier come from the screen locals
//! ([`scroll_slot`], [`focus_notifier`]). Without a slot the wrapper is a
//! plain pass-through list.
//!
//! ```rust
//! use perch_core::*;
//! use perch_ui::*;
//! use std::time::Duration;
//!
//! let clock = TestClock::default().install();
//! let slot = ScrollSlot::new();
//! let focus = FocusNotifier::new();
//! let rows = || (0..1000).collect::<Vec<u32>>();
//!
//! let mut list = with_focus_notifier(focus.clone(), || {
//!     with_scroll_slot(slot.clone(), || {
//!         ScrollPreservingList::mount(LazyListProps::new(rows(), 48.0, |n, _| {
//!             Text(n.to_string())
//!         }))
//!     })
//! });
//! list.drag(240.0);
//! clock.advance(Duration::from_millis(300)); // finger rests, no fling
//! list.release();
//! assert_eq!(slot.read().map(ScrollOffset::get), Some(240.0));
//!
//! // frozen: the list goes away, the slot stays with the screen
//! drop(list);
//! focus.set_focused(false);
//!
//! let list = with_focus_notifier(focus.clone(), || {
//!     with_scroll_slot(slot.clone(), || {
//!         ScrollPreservingList::mount(LazyListProps::new(rows(), 48.0, |n, _| {
//!             Text(n.to_string())
//!         }))
//!     })
//! });
//! focus.set_focused(true);
//! assert_eq!(list.offset(), 240.0);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use perch_core::*;

use crate::handle::{HandleRef, ListHandle, ListRef, ScrollToOffset};
use crate::lazy::{LazyColumnState, LazyList, LazyListProps, Motion, ScrollEvent};

/// What a focus notification did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RestoreOutcome {
    /// `scroll_to_offset(offset, false)` was issued.
    Restored(ScrollOffset),
    /// Nothing has settled on this screen yet.
    SlotUnset,
    /// No `ScrollSlot` was provided; the list does not preserve anything.
    NoSlot,
    /// The handle is not attached to a live list.
    HandleDetached,
    /// The caller's ref is a callback, so there is no handle to drive.
    NoHandleCapability,
}

/// Where restores are sent.
enum RestoreTarget {
    Handle(HandleRef),
    Unavailable,
}

struct Restorer {
    slot: Option<ScrollSlot>,
    target: RestoreTarget,
    last: Cell<Option<RestoreOutcome>>,
}

impl Restorer {
    fn on_focus(&self) -> RestoreOutcome {
        let outcome = self.try_restore();
        self.last.set(Some(outcome));
        outcome
    }

    fn try_restore(&self) -> RestoreOutcome {
        let Some(slot) = &self.slot else {
            return RestoreOutcome::NoSlot;
        };
        let Some(offset) = slot.read() else {
            log::trace!("focus: nothing to restore");
            return RestoreOutcome::SlotUnset;
        };
        let handle = match &self.target {
            RestoreTarget::Unavailable => {
                log::debug!("focus: callback ref, skipping restore to {offset}");
                return RestoreOutcome::NoHandleCapability;
            }
            RestoreTarget::Handle(r) => r.current(),
        };
        let Some(handle) = handle else {
            log::debug!("focus: list handle not attached, skipping restore to {offset}");
            return RestoreOutcome::HandleDetached;
        };
        // Not clamped here: the list clamps against its current content.
        log::debug!("focus: restoring scroll offset {offset}");
        handle.scroll_to_offset(offset.get(), false);
        RestoreOutcome::Restored(offset)
    }
}

/// Drop-in [`LazyList`] that survives freeze/unfreeze cycles.
pub struct ScrollPreservingList<T> {
    restorer: Rc<Restorer>,
    focus_sub: Option<Dispose>,
    list: LazyList<T>,
}

impl<T> ScrollPreservingList<T> {
    /// Mounts with the slot and notifier from the current screen locals.
    pub fn mount(props: LazyListProps<T>) -> Self {
        Self::mount_with(props, scroll_slot(), focus_notifier().as_ref())
    }

    /// Mounts with an explicit slot and notifier.
    ///
    /// Restores also run when the caller passed no ref (through a private
    /// handle) and when the stored offset is 0; only an unset slot, a
    /// callback ref or a detached handle skip them.
    ///
    /// The focus subscription is released when the list is dropped, and also
    /// when the current [`Scope`] (if any) is disposed.
    pub fn mount_with(
        mut props: LazyListProps<T>,
        slot: Option<ScrollSlot>,
        focus: Option<&FocusNotifier>,
    ) -> Self {
        let target = match &props.list_ref {
            Some(ListRef::Handle(r)) => RestoreTarget::Handle(r.clone()),
            Some(ListRef::Callback(_)) => RestoreTarget::Unavailable,
            None => {
                // No ref from the caller: keep a private one so restores
                // still reach the list.
                let r = HandleRef::new();
                props.list_ref = Some(ListRef::Handle(r.clone()));
                RestoreTarget::Handle(r)
            }
        };

        match &slot {
            Some(slot) => {
                let caller = props.on_momentum_scroll_end.take();
                let slot = slot.clone();
                props.on_momentum_scroll_end = Some(Rc::new(move |ev: &ScrollEvent| {
                    store_settled(&slot, ev);
                    if let Some(cb) = &caller {
                        cb(ev);
                    }
                }));
            }
            None => log::debug!("ScrollPreservingList without a ScrollSlot; not preserving"),
        }

        let restorer = Rc::new(Restorer {
            slot,
            target,
            last: Cell::new(None),
        });

        let list = LazyList::mount(props);

        let focus_sub = match (focus, &restorer.slot) {
            (Some(focus), Some(_)) => {
                let weak = Rc::downgrade(&restorer);
                let sub = focus.subscribe(move || {
                    if let Some(r) = weak.upgrade() {
                        r.on_focus();
                    }
                });
                Some(effect(move || sub.into_dispose()))
            }
            _ => None,
        };

        Self {
            restorer,
            focus_sub,
            list,
        }
    }

    /// Runs the focus handler by hand, e.g. for a screen that was focused
    /// before this list subscribed.
    pub fn restore(&self) -> RestoreOutcome {
        self.restorer.on_focus()
    }

    /// Outcome of the most recent focus notification.
    pub fn last_restore(&self) -> Option<RestoreOutcome> {
        self.restorer.last.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.focus_sub.as_ref().is_some_and(|d| !d.is_disposed())
    }

    pub fn preserves(&self) -> bool {
        self.restorer.slot.is_some()
    }

    pub fn handle(&self) -> ListHandle {
        self.list.handle()
    }

    pub fn state(&self) -> &LazyColumnState {
        self.list.state()
    }

    pub fn offset(&self) -> f32 {
        self.list.offset()
    }

    pub fn set_viewport_height(&mut self, h: f32) {
        self.list.set_viewport_height(h);
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.list.set_items(items);
    }

    pub fn drag(&mut self, dy: f32) -> f32 {
        self.list.drag(dy)
    }

    pub fn release(&mut self) {
        self.list.release();
    }

    pub fn tick(&mut self) -> Motion {
        self.list.tick()
    }

    pub fn view(&self) -> View {
        self.list.view()
    }
}

fn store_settled(slot: &ScrollSlot, ev: &ScrollEvent) {
    // Overscroll can report slightly negative offsets; store those as 0.
    match ScrollOffset::saturating(ev.offset_y) {
        Ok(offset) => slot.write(offset),
        Err(e) => log::warn!("not storing settled offset: {e}"),
    }
}

impl<T> ScrollToOffset for ScrollPreservingList<T> {
    fn scroll_to_offset(&self, offset: f32, animated: bool) {
        self.list.scroll_to_offset(offset, animated);
    }
}

impl<T> Drop for ScrollPreservingList<T> {
    fn drop(&mut self) {
        if let Some(d) = self.focus_sub.take() {
            d.run();
        }
    }
}

impl<T> fmt::Debug for ScrollPreservingList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollPreservingList")
            .field("offset", &self.offset())
            .field("slot", &self.restorer.slot)
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}
