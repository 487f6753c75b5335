//! # Screens
//!
//! A back stack of screens. Each entry owns the context its content runs in:
//!
//! - a [`Scope`], disposed when the entry is popped or replaced;
//! - a [`ScrollSlot`], so a list on the screen can find its last settled
//!   offset again after being frozen;
//! - a [`FocusNotifier`], foregrounded only while the entry is on top and the
//!   app itself is in the foreground.
//!
//! Mutations (`push`, `pop`, …) blur screens right away, but focus is only
//! handed to the new top in [`NavBackStack::compose`], after its content has
//! been composed. Content that was frozen while covered is therefore mounted
//! again before its focus handlers run.
//!
//! ```rust
//! use perch_core::*;
//! use perch_navigation::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
//! enum Route {
//!     Inbox,
//!     Thread(u32),
//! }
//!
//! let stack = NavBackStack::new(Route::Inbox);
//! let inbox_slot = stack.compose(|e| e.scroll_slot()).unwrap();
//! inbox_slot.write(ScrollOffset::new(640.0).unwrap());
//!
//! let nav = stack.navigator();
//! nav.push(Route::Thread(7));
//! stack.compose(|e| assert_eq!(e.key(), &Route::Thread(7)));
//!
//! nav.pop();
//! let slot = stack.compose(|e| e.scroll_slot()).unwrap();
//! assert!(slot.ptr_eq(&inbox_slot));
//! ```

use std::{any::Any, cell::RefCell, fmt::Debug, rc::Rc};

use perch_core::*;
use serde::{Deserialize, Serialize};

pub mod tests;

pub trait NavKey: Clone + Debug + 'static + Serialize + for<'de> Deserialize<'de> {}
impl<T> NavKey for T where T: Clone + Debug + 'static + Serialize + for<'de> Deserialize<'de> {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionDir {
    None,
    Push,
    Pop,
}

/// Per-entry storage that lives as long as the entry.
#[derive(Default)]
pub struct SavedState {
    map: RefCell<std::collections::HashMap<&'static str, Box<dyn Any>>>,
}
impl SavedState {
    pub fn remember<T: 'static>(
        &self,
        key: &'static str,
        init: impl FnOnce() -> T,
    ) -> Rc<RefCell<T>> {
        if let Some(b) = self.map.borrow().get(key)
            && let Some(rc) = b.downcast_ref::<Rc<RefCell<T>>>()
        {
            return rc.clone();
        }
        let rc = Rc::new(RefCell::new(init()));
        self.map.borrow_mut().insert(key, Box::new(rc.clone()));
        rc
    }
}

struct Entry<K: NavKey> {
    id: u64,
    key: K,
    saved: Rc<SavedState>,
    scope: Scope,
    slot: ScrollSlot,
    focus: FocusNotifier,
}

impl<K: NavKey> Entry<K> {
    fn new(id: u64, key: K) -> Self {
        Self {
            id,
            key,
            saved: Rc::new(SavedState::default()),
            scope: Scope::new(),
            slot: ScrollSlot::new(),
            focus: FocusNotifier::new(),
        }
    }

    /// Blurs, then disposes the scope so `effect` cleanups run.
    fn dispose(self) {
        log::debug!("disposing screen #{} ({:?})", self.id, self.key);
        self.focus.set_focused(false);
        self.scope.dispose();
    }
}

struct BackState<K: NavKey> {
    entries: Vec<Entry<K>>,
    next_id: u64,
    last_dir: TransitionDir,
    app_foreground: bool,
}

impl<K: NavKey> BackState<K> {
    fn alloc(&mut self, key: K) -> Entry<K> {
        let id = self.next_id;
        self.next_id += 1;
        Entry::new(id, key)
    }
}

#[derive(Clone)]
pub struct NavBackStack<K: NavKey> {
    inner: Rc<RefCell<BackState<K>>>,
    version: Signal<u64>,
}

impl<K: NavKey> NavBackStack<K> {
    pub fn new(start: K) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BackState {
                entries: vec![Entry::new(1, start)],
                next_id: 2,
                last_dir: TransitionDir::None,
                app_foreground: true,
            })),
            version: signal(0),
        }
    }

    pub fn navigator(&self) -> Navigator<K> {
        Navigator {
            stack: self.clone(),
        }
    }

    pub fn top(&self) -> Option<EntryScope<K>> {
        let s = self.inner.borrow();
        s.entries.last().map(|e| EntryScope {
            id: e.id,
            key: e.key.clone(),
            saved: e.saved.clone(),
            scope: e.scope.clone(),
            slot: e.slot.clone(),
            focus: e.focus.clone(),
            nav: self.navigator(),
        })
    }

    pub fn size(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Entry ids, bottom first.
    pub fn ids(&self) -> Vec<u64> {
        self.inner.borrow().entries.iter().map(|e| e.id).collect()
    }

    pub fn last_dir(&self) -> TransitionDir {
        self.inner.borrow().last_dir
    }

    /// Bumped on every change to the stack.
    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn subscribe(&self, f: impl Fn(u64) + 'static) -> SubId {
        self.version.subscribe(move |v| f(*v))
    }

    pub fn is_app_foreground(&self) -> bool {
        self.inner.borrow().app_foreground
    }

    /// The whole app went to the background or came back.
    ///
    /// Coming back focuses the top entry right away; hosts that froze its
    /// content should rebuild it first (or call [`compose`](Self::compose)).
    pub fn set_app_foreground(&self, foreground: bool) {
        self.inner.borrow_mut().app_foreground = foreground;
        self.sync_focus();
    }

    /// Runs `f` for the top entry inside the entry's scope, with its scroll
    /// slot and focus notifier provided as locals, then focuses it.
    pub fn compose<R>(&self, f: impl FnOnce(&EntryScope<K>) -> R) -> Option<R> {
        let top = self.top()?;
        let out = top.scope.run(|| {
            with_focus_notifier(top.focus.clone(), || {
                with_scroll_slot(top.slot.clone(), || f(&top))
            })
        });
        self.sync_focus();
        Some(out)
    }

    /// Focus follows "on top and app in foreground" for every entry.
    pub fn sync_focus(&self) {
        // Collect first: focus handlers may read the stack.
        let wanted: Vec<(FocusNotifier, bool)> = {
            let s = self.inner.borrow();
            let top = s.entries.len().saturating_sub(1);
            s.entries
                .iter()
                .enumerate()
                .map(|(i, e)| (e.focus.clone(), i == top && s.app_foreground))
                .collect()
        };
        // Blur before focusing so at most one screen is ever focused.
        for (focus, _) in wanted.iter().filter(|(_, on)| !on) {
            focus.set_focused(false);
        }
        for (focus, _) in wanted.iter().filter(|(_, on)| *on) {
            focus.set_focused(true);
        }
    }

    fn blur_all(&self) {
        let all: Vec<FocusNotifier> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|e| e.focus.clone())
            .collect();
        for f in all {
            f.set_focused(false);
        }
    }

    fn bump(&self) {
        let v = self.version.get();
        self.version.set(v.wrapping_add(1));
    }

    fn push_inner(&self, key: K) {
        self.blur_all();
        let mut s = self.inner.borrow_mut();
        let entry = s.alloc(key);
        log::debug!("push screen #{} ({:?})", entry.id, entry.key);
        s.entries.push(entry);
        s.last_dir = TransitionDir::Push;
    }

    /// Pop the top entry (if any) and dispose it.
    fn pop_inner(&self) -> bool {
        let entry = {
            let mut s = self.inner.borrow_mut();
            s.last_dir = TransitionDir::Pop;
            s.entries.pop()
        };

        match entry {
            Some(e) => {
                e.dispose();
                self.blur_all();
                true
            }
            None => false,
        }
    }

    /// Swaps the top entry for a fresh one (new scope, slot and notifier).
    fn replace_inner(&self, key: K) {
        let old = {
            let mut s = self.inner.borrow_mut();
            let old = s.entries.pop();
            let entry = s.alloc(key);
            s.entries.push(entry);
            s.last_dir = TransitionDir::Push;
            old
        };
        if let Some(e) = old {
            e.dispose();
        }
    }

    pub fn to_json(&self) -> String {
        let s = self.inner.borrow();
        let keys: Vec<&K> = s.entries.iter().map(|e| &e.key).collect();
        serde_json::to_string(&keys).unwrap_or_else(|e| {
            log::warn!("back stack not serializable: {e}");
            "[]".into()
        })
    }

    /// Replaces the stack with the keys in `json`. Scroll positions are not
    /// part of the saved form; restored screens start unscrolled.
    pub fn from_json(&self, json: &str) -> Result<(), serde_json::Error> {
        let keys = serde_json::from_str::<Vec<K>>(json)?;

        let old_entries = {
            let mut s = self.inner.borrow_mut();
            std::mem::take(&mut s.entries)
        };
        for e in old_entries {
            e.dispose();
        }

        {
            let mut s = self.inner.borrow_mut();
            for k in keys {
                let entry = s.alloc(k);
                s.entries.push(entry);
            }
            s.last_dir = TransitionDir::None;
        }
        self.bump();
        Ok(())
    }
}

#[derive(Clone)]
pub struct Navigator<K: NavKey> {
    pub stack: NavBackStack<K>,
}
impl<K: NavKey> Navigator<K> {
    pub fn push(&self, k: K) {
        self.stack.push_inner(k);
        self.stack.bump();
    }
    pub fn replace(&self, k: K) {
        self.stack.replace_inner(k);
        self.stack.bump();
    }
    pub fn pop(&self) -> bool {
        // Don't pop if only one entry is present
        if self.stack.size() <= 1 {
            return false;
        }
        let ok = self.stack.pop_inner();
        if ok {
            self.stack.bump();
        }
        ok
    }
    pub fn clear_and_push(&self, k: K) {
        while self.stack.pop_inner() {}
        self.stack.push_inner(k);
        self.stack.bump();
    }
    pub fn pop_to<F: Fn(&K) -> bool>(&self, pred: F, inclusive: bool) {
        let count = {
            let s = self.stack.inner.borrow();
            if let Some(idx) = s.entries.iter().rposition(|e| pred(&e.key)) {
                s.entries.len() - idx - (if inclusive { 0 } else { 1 })
            } else {
                0
            }
        };
        for _ in 0..count {
            let _ = self.stack.pop_inner();
        }
        if count > 0 {
            self.stack.bump();
        }
    }
}

/// What content sees of its screen.
pub struct EntryScope<K: NavKey> {
    id: u64,
    key: K,
    saved: Rc<SavedState>,
    scope: Scope,
    slot: ScrollSlot,
    focus: FocusNotifier,
    nav: Navigator<K>,
}
impl<K: NavKey> EntryScope<K> {
    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn key(&self) -> &K {
        &self.key
    }
    pub fn navigator(&self) -> Navigator<K> {
        self.nav.clone()
    }
    pub fn scroll_slot(&self) -> ScrollSlot {
        self.slot.clone()
    }
    pub fn focus(&self) -> FocusNotifier {
        self.focus.clone()
    }
    pub fn remember_saveable<T: 'static>(
        &self,
        slot: &'static str,
        init: impl FnOnce() -> T,
    ) -> Rc<RefCell<T>> {
        self.saved.remember(slot, init)
    }
}
