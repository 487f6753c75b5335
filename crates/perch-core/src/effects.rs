use std::cell::RefCell;
use std::rc::Rc;

/// Cleanup handle. Clones share the same cleanup, which runs at most once.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispose")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Runs `f()` immediately and returns its `Dispose`.
///
/// If a [`Scope`](crate::Scope) is current, the cleanup is also registered
/// there, so it runs when either the scope is disposed or the caller runs the
/// returned handle, whichever comes first.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let d = f();

    if let Some(scope) = crate::scope::current_scope() {
        scope.own(d.clone());
    }

    d
}

/// Helper to register cleanup inside effect.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
