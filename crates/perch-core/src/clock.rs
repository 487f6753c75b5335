//! Frame clock used by list inertia.
//!
//! Platforms leave the default [`SystemClock`] in place. Tests install a
//! [`TestClock`] on their own thread and advance it by hand, so fling physics
//! stays deterministic.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_time::{Duration, Instant};

pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

thread_local! {
    static CLOCK: RefCell<Option<Rc<dyn Clock>>> = const { RefCell::new(None) };
}

/// Install a clock for the current thread, replacing any previous one.
pub fn set_clock(clock: Rc<dyn Clock>) {
    CLOCK.with(|c| *c.borrow_mut() = Some(clock));
}

/// Remove an installed clock; `now()` falls back to the system clock.
pub fn reset_clock() {
    CLOCK.with(|c| *c.borrow_mut() = None);
}

pub fn now() -> Instant {
    CLOCK
        .with(|c| c.borrow().as_ref().map(|c| c.now()))
        .unwrap_or_else(Instant::now)
}

/// A test clock you can drive deterministically.
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl TestClock {
    pub fn new(start: Instant) -> Self {
        Self {
            t: Rc::new(Cell::new(start)),
        }
    }

    /// Installs a clone of this clock as the thread's clock and returns it.
    pub fn install(self) -> Self {
        set_clock(Rc::new(self.clone()));
        self
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}
