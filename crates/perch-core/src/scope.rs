use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::Dispose;

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Ownership boundary for cleanups.
///
/// A screen owns one scope per back-stack entry and a frozen subtree owns a
/// child scope per mount. Disposing a scope disposes its children first, then
/// runs its own disposers in registration order.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Dispose>>,
    children: RefCell<Vec<Scope>>,
    disposed: Cell<bool>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Runs `f` with this scope installed as the current scope.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
            }
        }

        let prev = CURRENT_SCOPE.with(|current| {
            current
                .borrow_mut()
                .replace(Rc::downgrade(&self.inner))
        });
        let _restore = Restore(prev);
        f()
    }

    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        self.own(Dispose::new(disposer));
    }

    /// Takes shared ownership of `d`: it runs when the scope is disposed,
    /// unless its other owner ran it first. Handles that already ran are
    /// dropped here, so a scope that outlives many mounts stays small.
    pub fn own(&self, d: Dispose) {
        if self.inner.disposed.get() {
            // Registered after teardown: run right away so nothing leaks.
            log::warn!("disposer added to an already disposed scope; running it now");
            d.run();
            return;
        }
        let mut disposers = self.inner.disposers.borrow_mut();
        disposers.retain(|d| !d.is_disposed());
        disposers.push(d);
    }

    /// Cleanups held by this scope. Ones that already ran are pruned on the
    /// next registration.
    pub fn disposer_count(&self) -> usize {
        self.inner.disposers.borrow().len()
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        let mut children = self.inner.children.borrow_mut();
        children.retain(|c| !c.is_disposed());
        children.push(child.clone());
        child
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.teardown();
    }
}

impl ScopeInner {
    fn teardown(&self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer.run();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        if !self.disposed.replace(true) {
            self.teardown();
        }
    }
}
