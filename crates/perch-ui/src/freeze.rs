//! Freezing a subtree.
//!
//! A screen that goes to the background can drop its content to save work
//! and rebuild it when it comes back. `Freeze` owns that content together
//! with a child [`Scope`], so cleanups registered while building it run when
//! it is frozen. The screen locals seen at construction are provided again
//! on every rebuild, so a rebuilt list finds the same `ScrollSlot`.

use perch_core::*;

pub struct Freeze<C> {
    build: Box<dyn Fn() -> C>,
    parent: Option<Scope>,
    slot: Option<ScrollSlot>,
    focus: Option<FocusNotifier>,
    mounted: Option<(C, Scope)>,
}

impl<C> Freeze<C> {
    /// Builds the content right away.
    pub fn new(build: impl Fn() -> C + 'static) -> Self {
        let mut f = Self {
            build: Box::new(build),
            parent: current_scope(),
            slot: scroll_slot(),
            focus: focus_notifier(),
            mounted: None,
        };
        f.unfreeze();
        f
    }

    pub fn is_frozen(&self) -> bool {
        self.mounted.is_none()
    }

    pub fn content(&self) -> Option<&C> {
        self.mounted.as_ref().map(|(c, _)| c)
    }

    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.mounted.as_mut().map(|(c, _)| c)
    }

    /// Drops the content and disposes its scope. Returns false if already frozen.
    pub fn freeze(&mut self) -> bool {
        let Some((content, scope)) = self.mounted.take() else {
            return false;
        };
        drop(content);
        scope.dispose();
        log::debug!("subtree frozen");
        true
    }

    /// Rebuilds the content. Returns false if it was not frozen.
    pub fn unfreeze(&mut self) -> bool {
        if self.mounted.is_some() {
            return false;
        }
        let scope = match &self.parent {
            Some(p) if !p.is_disposed() => p.child(),
            _ => Scope::new(),
        };
        let content = scope.run(|| self.with_locals(|| (self.build)()));
        self.mounted = Some((content, scope));
        log::debug!("subtree unfrozen");
        true
    }

    fn with_locals<R>(&self, f: impl FnOnce() -> R) -> R {
        let f = || match &self.slot {
            Some(slot) => with_scroll_slot(slot.clone(), f),
            None => f(),
        };
        match &self.focus {
            Some(focus) => with_focus_notifier(focus.clone(), f),
            None => f(),
        }
    }
}

impl<C> Drop for Freeze<C> {
    fn drop(&mut self) {
        self.freeze();
    }
}
