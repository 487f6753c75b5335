use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Handle returned by [`Signal::subscribe`].
    pub struct SubId;
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

struct Inner<T> {
    value: T,
    subs: SlotMap<SubId, Subscriber<T>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T)
    where
        T: Clone,
    {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.borrow_mut().subs.insert(Rc::new(f))
    }

    /// Returns false if `id` was already removed.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.borrow_mut().subs.remove(id).is_some()
    }

    pub(crate) fn has_subscriber(&self, id: SubId) -> bool {
        self.0.borrow().subs.contains_key(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    pub(crate) fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal(Rc::downgrade(&self.0))
    }

    // Subscribers run outside the borrow so they may read the signal or
    // unsubscribe. A subscriber removed mid-notification is skipped.
    fn notify(&self)
    where
        T: Clone,
    {
        let (value, subs) = {
            let inner = self.0.borrow();
            if inner.subs.is_empty() {
                return;
            }
            let subs: SmallVec<[(SubId, Subscriber<T>); 4]> =
                inner.subs.iter().map(|(id, s)| (id, s.clone())).collect();
            (inner.value.clone(), subs)
        };
        for (id, s) in subs {
            if self.0.borrow().subs.contains_key(id) {
                s(&value);
            }
        }
    }
}

/// Non-owning signal handle, used by subscription guards.
pub(crate) struct WeakSignal<T: 'static>(Weak<RefCell<Inner<T>>>);

impl<T> WeakSignal<T> {
    pub(crate) fn upgrade(&self) -> Option<Signal<T>> {
        self.0.upgrade().map(Signal)
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
