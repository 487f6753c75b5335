//! # Shared scroll slot
//!
//! A screen-scoped cell holding the last settled scroll offset of the
//! screen's list. The slot is created with the screen and handed to lists
//! through the locals stack (see [`with_scroll_slot`](crate::with_scroll_slot)),
//! so the value outlives any single list instance: a list that is torn down
//! while its screen is frozen and mounted again later finds the offset it
//! last wrote.
//!
//! ```rust
//! use perch_core::*;
//!
//! let slot = ScrollSlot::new();
//! assert_eq!(slot.read(), None);
//!
//! slot.write(ScrollOffset::new(240.0).unwrap());
//! assert_eq!(slot.read().map(ScrollOffset::get), Some(240.0));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OffsetError {
    #[error("scroll offset {0} is negative")]
    Negative(f32),
    #[error("scroll offset {0} is not finite")]
    NotFinite(f32),
}

/// Vertical scroll distance in layout px; finite and `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ScrollOffset(f32);

impl ScrollOffset {
    pub const ZERO: ScrollOffset = ScrollOffset(0.0);

    pub fn new(px: f32) -> Result<Self, OffsetError> {
        if !px.is_finite() {
            return Err(OffsetError::NotFinite(px));
        }
        if px < 0.0 {
            return Err(OffsetError::Negative(px));
        }
        // -0.0 passes the check above.
        Ok(Self(if px == 0.0 { 0.0 } else { px }))
    }

    /// Like [`ScrollOffset::new`], but pulls overscroll (negative values)
    /// back to zero. Only non-finite input is rejected.
    pub fn saturating(px: f32) -> Result<Self, OffsetError> {
        if !px.is_finite() {
            return Err(OffsetError::NotFinite(px));
        }
        Ok(Self(if px <= 0.0 { 0.0 } else { px }))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// One per screen. Clones share storage.
#[derive(Clone, Default)]
pub struct ScrollSlot {
    offset: Rc<Cell<Option<ScrollOffset>>>,
}

impl ScrollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional overwrite.
    pub fn write(&self, offset: ScrollOffset) {
        log::trace!("scroll slot <- {offset}");
        self.offset.set(Some(offset));
    }

    pub fn read(&self) -> Option<ScrollOffset> {
        self.offset.get()
    }

    /// Back to unset. Reserved for the screen owner; lists never clear.
    pub fn clear(&self) {
        self.offset.set(None);
    }

    /// True if both handles point at the same storage.
    pub fn ptr_eq(&self, other: &ScrollSlot) -> bool {
        Rc::ptr_eq(&self.offset, &other.offset)
    }
}

impl fmt::Debug for ScrollSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScrollSlot").field(&self.read()).finish()
    }
}
