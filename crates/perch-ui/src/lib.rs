#![allow(non_snake_case)]
//! Lists and containers.
//!
//! - [`lazy`]: the virtualized list (`LazyList`) with inertia and an
//!   imperative `scroll_to_offset` handle.
//! - [`list`]: `ScrollPreservingList`, a drop-in `LazyList` that remembers
//!   its settled offset in the screen's `ScrollSlot` and restores it when the
//!   screen comes back to the foreground.
//! - [`freeze`]: unmounts a subtree while its screen is in the background.

pub mod freeze;
pub mod handle;
pub mod lazy;
pub mod list;

pub use freeze::Freeze;
pub use handle::{HandleRef, ListHandle, ListRef, ScrollToOffset};
pub use lazy::{LazyColumnState, LazyList, LazyListConfig, LazyListProps, Motion, ScrollEvent};
pub use list::{RestoreOutcome, ScrollPreservingList};

use perch_core::*;

pub fn Box() -> View {
    View::new(0, ViewKind::Box)
}

pub fn Column() -> View {
    View::new(0, ViewKind::Column)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(0, ViewKind::Text { text: text.into() })
}

/// Fixed-height filler.
pub fn Spacer(height: f32) -> View {
    View::new(
        0,
        ViewKind::Spacer {
            height: height.max(0.0),
        },
    )
}
