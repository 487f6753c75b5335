//! # Screen locals
//!
//! Perch uses thread‑local “composition locals” to hand screen-owned values
//! to whatever is composed inside that screen, without threading them through
//! every constructor:
//!
//! - `ScrollSlot`: the screen's shared scroll offset.
//! - `FocusNotifier`: the screen's foreground notifications.
//!
//! Values are provided for the duration of a closure and looked up from the
//! innermost frame outwards:
//!
//! ```rust
//! use perch_core::*;
//!
//! let slot = ScrollSlot::new();
//! assert!(scroll_slot().is_none());
//!
//! with_scroll_slot(slot.clone(), || {
//!     assert!(scroll_slot().is_some_and(|s| s.ptr_eq(&slot)));
//! });
//!
//! assert!(scroll_slot().is_none());
//! ```
//!
//! A missing local is not an error: callers decide how to degrade.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::{FocusNotifier, ScrollSlot};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        let mut st = st.borrow_mut();
        if let Some(top) = st.last_mut() {
            top.insert(t, v);
        } else {
            // no frame: create a temporary one
            let mut m = HashMap::new();
            m.insert(t, v);
            st.push(m);
        }
    });
}

/// Provides `value` to everything `f` composes.
pub fn provide<T: Clone + 'static, R>(value: T, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<T>(), Box::new(value));
        f()
    })
}

/// Innermost provided value of type `T`, if any.
pub fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&TypeId::of::<T>())?.downcast_ref::<T>().cloned())
    })
}

// Typed API

pub fn with_scroll_slot<R>(slot: ScrollSlot, f: impl FnOnce() -> R) -> R {
    provide(slot, f)
}

pub fn scroll_slot() -> Option<ScrollSlot> {
    local::<ScrollSlot>()
}

pub fn with_focus_notifier<R>(focus: FocusNotifier, f: impl FnOnce() -> R) -> R {
    provide(focus, f)
}

pub fn focus_notifier() -> Option<FocusNotifier> {
    local::<FocusNotifier>()
}
