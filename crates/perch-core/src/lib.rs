//! # Signals, scopes, and the screen scroll slot
//!
//! `perch-core` holds the small runtime that Perch's lists and screens are
//! built on. The pieces:
//!
//! - `Signal<T>`: observable value with removable subscriptions.
//! - `Scope` / `Dispose` / `effect`: cleanup ownership, so anything a
//!   mounted widget subscribes to is released when it goes away.
//! - `ScrollSlot`: one per screen; remembers the last settled offset of the
//!   screen's list across freeze/unfreeze cycles.
//! - `FocusNotifier`: fires once per background→foreground transition.
//! - Locals: `with_scroll_slot` / `scroll_slot` and friends, for handing
//!   screen-owned values to whatever the screen composes.
//!
//! ## Signals
//!
//! ```rust
//! use perch_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use perch_core::*;
//! use std::{cell::Cell, rc::Rc};
//!
//! let scope = Scope::new();
//! let released = Rc::new(Cell::new(false));
//!
//! scope.run(|| {
//!     let released = released.clone();
//!     effect(move || {
//!         log::info!("mounted");
//!         on_unmount(move || released.set(true))
//!     });
//! });
//!
//! scope.dispose();
//! assert!(released.get());
//! ```
//!
//! - `effect` runs immediately and returns a `Dispose`; inside a `Scope` the
//!   cleanup is also registered with that scope.
//! - `Dispose::run` is idempotent, so a widget may release eagerly on drop and
//!   still let its scope run the same cleanup later.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); all handlers run to
//! completion on the UI thread before the next one starts.

pub mod clock;
pub mod effects;
pub mod focus;
pub mod locals;
pub mod prelude;
pub mod scope;
pub mod scroll_slot;
pub mod signal;
pub mod tests;
pub mod view;

pub use prelude::*;
