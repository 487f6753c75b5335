//! Imperative list handles.
//!
//! A list exposes `scroll_to_offset` through a [`ListHandle`]. Callers get at
//! it through a [`ListRef`] they pass in the list's props: either a
//! [`HandleRef`] cell the list attaches itself to while mounted, or a
//! callback that receives the handle on mount and `None` on teardown.
//!
//! `HandleRef` only keeps a weak reference, so a handle read after the list
//! is gone comes back as `None` instead of dangling.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub trait ScrollToOffset {
    /// Scrolls so that `offset` px of content sit above the viewport.
    /// Out-of-range offsets are clamped by the list.
    fn scroll_to_offset(&self, offset: f32, animated: bool);
}

pub type ListHandle = Rc<dyn ScrollToOffset>;

#[derive(Clone, Default)]
pub struct HandleRef(Rc<RefCell<Option<Weak<dyn ScrollToOffset>>>>);

impl HandleRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, handle: &ListHandle) {
        *self.0.borrow_mut() = Some(Rc::downgrade(handle));
    }

    /// Clears the ref, but only if it still points at `handle`; a newer mount
    /// that already took the ref over is left alone.
    pub fn detach(&self, handle: &ListHandle) {
        let mut cur = self.0.borrow_mut();
        let points_here = cur
            .as_ref()
            .is_some_and(|w| std::ptr::addr_eq(w.as_ptr(), Rc::as_ptr(handle)));
        if points_here {
            *cur = None;
        }
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }

    /// The attached handle, if its list is still alive.
    pub fn current(&self) -> Option<ListHandle> {
        self.0.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn is_attached(&self) -> bool {
        self.current().is_some()
    }

    pub fn ptr_eq(&self, other: &HandleRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HandleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRef")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[derive(Clone)]
pub enum ListRef {
    Handle(HandleRef),
    Callback(Rc<dyn Fn(Option<ListHandle>)>),
}

impl ListRef {
    pub fn callback(f: impl Fn(Option<ListHandle>) + 'static) -> Self {
        ListRef::Callback(Rc::new(f))
    }

    pub(crate) fn attach(&self, handle: &ListHandle) {
        match self {
            ListRef::Handle(r) => r.attach(handle),
            ListRef::Callback(f) => f(Some(handle.clone())),
        }
    }

    pub(crate) fn detach(&self, handle: &ListHandle) {
        match self {
            ListRef::Handle(r) => r.detach(handle),
            ListRef::Callback(f) => f(None),
        }
    }
}

impl From<HandleRef> for ListRef {
    fn from(r: HandleRef) -> Self {
        ListRef::Handle(r)
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRef::Handle(r) => f.debug_tuple("Handle").field(r).finish(),
            ListRef::Callback(_) => write!(f, "Callback(<fn>)"),
        }
    }
}
