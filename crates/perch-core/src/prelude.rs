pub use crate::clock::{Clock, SystemClock, TestClock, reset_clock, set_clock};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::focus::{FocusNotifier, FocusSubscription};
pub use crate::locals::{
    focus_notifier, local, provide, scroll_slot, with_focus_notifier, with_scroll_slot,
};
pub use crate::scope::{Scope, current_scope};
pub use crate::scroll_slot::{OffsetError, ScrollOffset, ScrollSlot};
pub use crate::signal::{Signal, SubId, signal};
pub use crate::view::{View, ViewId, ViewKind};
