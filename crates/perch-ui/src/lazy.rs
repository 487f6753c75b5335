//! # Virtualized list
//!
//! `LazyList` renders only the rows inside (or near) its viewport and keeps
//! its own scroll physics in a [`LazyColumnState`]:
//!
//! - `drag(dy)` moves the content with the finger and estimates velocity.
//! - `release()` ends the gesture; fast enough releases start a fling.
//! - `tick()` advances the fling (or an animated `scroll_to_offset`) one
//!   frame.
//!
//! Every frame that moves the content is reported to `on_scroll`. When the
//! content comes to rest after a gesture or animation, a single
//! `on_momentum_scroll_end` is reported with the resting offset. A
//! non-animated `scroll_to_offset` jumps silently apart from one `on_scroll`,
//! so programmatic restores never look like a settled user scroll.
//!
//! ```rust
//! use perch_core::*;
//! use perch_ui::*;
//!
//! let handle = HandleRef::new();
//! let mut list = LazyList::mount(
//!     LazyListProps::new((0..100).collect::<Vec<u32>>(), 50.0, |n, _| Text(format!("Row {n}")))
//!         .list_ref(handle.clone()),
//! );
//! list.set_viewport_height(500.0);
//!
//! if let Some(h) = handle.current() {
//!     h.scroll_to_offset(1200.0, false);
//! }
//! assert_eq!(list.offset(), 1200.0);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use perch_core::clock;
use perch_core::*;
use web_time::{Duration, Instant};

use crate::handle::{ListHandle, ListRef, ScrollToOffset};

/// Physics and windowing knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LazyListConfig {
    /// Release velocity (px/s) above which a fling starts.
    pub fling_threshold: f32,
    /// A finger resting longer than this before lifting does not fling.
    pub fling_window: Duration,
    /// Velocity kept per 60Hz frame while flinging.
    pub decay_per_frame: f32,
    /// Fling stops below this velocity (px/s).
    pub stop_velocity: f32,
    /// Fraction of the remaining distance an animated scroll covers per 60Hz frame.
    pub glide_per_frame: f32,
    /// Extra rows rendered above and below the viewport.
    pub overscan: usize,
    /// Viewport height until layout reports the real one.
    pub initial_viewport: f32,
}

impl Default for LazyListConfig {
    fn default() -> Self {
        Self {
            fling_threshold: 10.0,
            fling_window: Duration::from_millis(100),
            decay_per_frame: 0.90,
            stop_velocity: 5.0,
            glide_per_frame: 0.25,
            overscan: 2,
            initial_viewport: 600.0,
        }
    }
}

/// Result of one physics step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Nothing was moving.
    Idle,
    /// Still moving after this step.
    Moving,
    /// Came to rest during this step.
    Settled,
}

/// Scroll position report handed to list callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub offset_y: f32,
    pub viewport_height: f32,
    pub content_height: f32,
}

pub type ScrollCallback = Rc<dyn Fn(&ScrollEvent)>;

pub struct LazyColumnState {
    scroll_offset: Signal<f32>,   // px
    viewport_height: Signal<f32>, // px
    content_height: Cell<f32>,    // px

    config: LazyListConfig,

    // physics
    vel_px_s: Cell<f32>, // px/sec
    last_t: Cell<Instant>,
    last_input_t: Cell<Instant>,
    dragging: Cell<bool>,
    flinging: Cell<bool>,
    glide_target: Cell<Option<f32>>,
}

impl Default for LazyColumnState {
    fn default() -> Self {
        Self::new(LazyListConfig::default())
    }
}

impl LazyColumnState {
    pub fn new(config: LazyListConfig) -> Self {
        let now = clock::now();
        Self {
            scroll_offset: signal(0.0),
            viewport_height: signal(config.initial_viewport.max(0.0)),
            content_height: Cell::new(0.0),
            config,
            vel_px_s: Cell::new(0.0),
            last_t: Cell::new(now),
            last_input_t: Cell::new(now),
            dragging: Cell::new(false),
            flinging: Cell::new(false),
            glide_target: Cell::new(None),
        }
    }

    pub fn offset(&self) -> f32 {
        self.scroll_offset.get()
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height.get()
    }

    pub fn content_height(&self) -> f32 {
        self.content_height.get()
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_height.get() - self.viewport_height.get()).max(0.0)
    }

    pub fn set_viewport_height(&self, h: f32) {
        self.viewport_height.set(h.max(0.0));
        self.clamp_offset();
    }

    pub fn set_content_height(&self, h: f32) {
        self.content_height.set(h.max(0.0));
        self.clamp_offset();
    }

    /// Jumps to `off` (clamped) and stops any motion.
    pub fn set_offset(&self, off: f32) {
        self.stop();
        self.scroll_offset.set(off.clamp(0.0, self.max_offset()));
    }

    /// Glides towards `off` (clamped) over the next ticks.
    pub fn animate_to(&self, off: f32) {
        self.stop();
        self.glide_target
            .set(Some(off.clamp(0.0, self.max_offset())));
        self.last_t.set(clock::now());
    }

    pub fn is_animating(&self) -> bool {
        self.flinging.get() || self.glide_target.get().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    fn stop(&self) {
        self.vel_px_s.set(0.0);
        self.flinging.set(false);
        self.glide_target.set(None);
    }

    fn clamp_offset(&self) {
        let max_off = self.max_offset();
        let off = self.scroll_offset.get();
        if !(0.0..=max_off).contains(&off) {
            self.scroll_offset.set(off.clamp(0.0, max_off));
        }
    }

    /// Consume delta in px. Returns leftover in px (for nested scroll).
    pub fn scroll_immediate(&self, delta_px: f32) -> f32 {
        if !self.dragging.replace(true) {
            // gesture start: cancel any fling/glide in flight
            self.stop();
            self.last_input_t.set(clock::now());
        }

        let before = self.scroll_offset.get();
        let new_offset = (before + delta_px).clamp(0.0, self.max_offset());
        self.scroll_offset.set(new_offset);

        let consumed = new_offset - before;

        // estimate velocity (px/sec) from input cadence
        let now = clock::now();
        let dt = (now - self.last_input_t.get())
            .as_secs_f32()
            .clamp(1.0 / 240.0, 1.0 / 15.0);
        self.last_input_t.set(now);
        self.vel_px_s.set(consumed / dt);

        delta_px - consumed
    }

    /// Ends the gesture. Returns true if a fling started.
    pub fn release(&self) -> bool {
        if !self.dragging.replace(false) {
            return false;
        }
        let idle = clock::now().saturating_duration_since(self.last_input_t.get());
        if idle > self.config.fling_window {
            self.vel_px_s.set(0.0);
        }
        let fling = self.vel_px_s.get().abs() > self.config.fling_threshold;
        self.flinging.set(fling);
        if fling {
            self.last_t.set(clock::now());
        } else {
            self.vel_px_s.set(0.0);
        }
        fling
    }

    pub fn tick(&self) -> Motion {
        self.tick_at(clock::now())
    }

    /// Advance inertia (or a glide) to `now`.
    pub fn tick_at(&self, now: Instant) -> Motion {
        if let Some(target) = self.glide_target.get() {
            return self.glide_step(now, target);
        }
        if !self.flinging.get() {
            return Motion::Idle;
        }

        let dt = now
            .saturating_duration_since(self.last_t.get())
            .as_secs_f32()
            .min(0.1);
        self.last_t.set(now);
        if dt <= 0.0 {
            return Motion::Moving;
        }

        let vel0 = self.vel_px_s.get();
        if vel0.abs() < self.config.stop_velocity {
            self.stop();
            return Motion::Settled;
        }

        let before = self.scroll_offset.get();
        let max_offset = self.max_offset();
        let new_off = (before + vel0 * dt).clamp(0.0, max_offset);
        self.scroll_offset.set(new_off);

        // Stop quickly at bounds
        if (new_off - before).abs() < 0.01 && (before <= 0.0 || before >= max_offset) {
            self.stop();
            return Motion::Settled;
        }

        let decay = self.config.decay_per_frame.powf(dt * 60.0);
        self.vel_px_s.set(vel0 * decay);

        Motion::Moving
    }

    fn glide_step(&self, now: Instant, target: f32) -> Motion {
        let dt = now
            .saturating_duration_since(self.last_t.get())
            .as_secs_f32()
            .min(0.1);
        self.last_t.set(now);

        let before = self.scroll_offset.get();
        let remaining = target - before;
        let k = 1.0 - (1.0 - self.config.glide_per_frame).powf(dt * 60.0);
        let next = before + remaining * k;

        if (target - next).abs() < 0.5 {
            self.scroll_offset.set(target);
            self.glide_target.set(None);
            return Motion::Settled;
        }
        self.scroll_offset.set(next);
        Motion::Moving
    }
}

/// Configuration accepted by [`LazyList::mount`].
pub struct LazyListProps<T> {
    pub items: Vec<T>,
    /// Fixed row height, px.
    pub item_height: f32,
    pub row: Rc<dyn Fn(&T, usize) -> View>,
    pub on_scroll: Option<ScrollCallback>,
    pub on_momentum_scroll_end: Option<ScrollCallback>,
    pub list_ref: Option<ListRef>,
    pub config: LazyListConfig,
}

impl<T> LazyListProps<T> {
    pub fn new(
        items: Vec<T>,
        item_height: f32,
        row: impl Fn(&T, usize) -> View + 'static,
    ) -> Self {
        Self {
            items,
            item_height: item_height.max(0.0),
            row: Rc::new(row),
            on_scroll: None,
            on_momentum_scroll_end: None,
            list_ref: None,
            config: LazyListConfig::default(),
        }
    }

    pub fn on_scroll(mut self, f: impl Fn(&ScrollEvent) + 'static) -> Self {
        self.on_scroll = Some(Rc::new(f));
        self
    }

    pub fn on_momentum_scroll_end(mut self, f: impl Fn(&ScrollEvent) + 'static) -> Self {
        self.on_momentum_scroll_end = Some(Rc::new(f));
        self
    }

    pub fn list_ref(mut self, r: impl Into<ListRef>) -> Self {
        self.list_ref = Some(r.into());
        self
    }

    pub fn config(mut self, config: LazyListConfig) -> Self {
        self.config = config;
        self
    }
}

/// The shared part of a mounted list: what the imperative handle points at.
struct ListCore {
    state: LazyColumnState,
    on_scroll: Option<ScrollCallback>,
    on_momentum_scroll_end: Option<ScrollCallback>,
}

impl ListCore {
    fn event(&self) -> ScrollEvent {
        ScrollEvent {
            offset_y: self.state.offset(),
            viewport_height: self.state.viewport_height(),
            content_height: self.state.content_height(),
        }
    }

    fn emit_scroll(&self) {
        if let Some(cb) = &self.on_scroll {
            cb(&self.event());
        }
    }

    fn emit_momentum_end(&self) {
        let ev = self.event();
        log::trace!("momentum scroll end at {}px", ev.offset_y);
        if let Some(cb) = &self.on_momentum_scroll_end {
            cb(&ev);
        }
    }

    /// Reports a physics step that started at offset `before`.
    fn report(&self, motion: Motion, before: f32) -> Motion {
        let moved = self.state.offset() != before;
        match motion {
            Motion::Idle => {}
            Motion::Moving => {
                if moved {
                    self.emit_scroll();
                }
            }
            Motion::Settled => {
                if moved {
                    self.emit_scroll();
                }
                self.emit_momentum_end();
            }
        }
        motion
    }
}

impl ScrollToOffset for ListCore {
    fn scroll_to_offset(&self, offset: f32, animated: bool) {
        if animated {
            self.state.animate_to(offset);
        } else {
            let before = self.state.offset();
            self.state.set_offset(offset);
            if self.state.offset() != before {
                self.emit_scroll();
            }
        }
    }
}

/// A mounted virtualized list.
///
/// Attaches its handle to `props.list_ref` on mount and detaches it on drop.
pub struct LazyList<T> {
    core: Rc<ListCore>,
    items: Vec<T>,
    item_height: f32,
    row: Rc<dyn Fn(&T, usize) -> View>,
    overscan: usize,
    list_ref: Option<ListRef>,
}

impl<T> LazyList<T> {
    pub fn mount(props: LazyListProps<T>) -> Self {
        let LazyListProps {
            items,
            item_height,
            row,
            on_scroll,
            on_momentum_scroll_end,
            list_ref,
            config,
        } = props;

        let core = Rc::new(ListCore {
            state: LazyColumnState::new(config),
            on_scroll,
            on_momentum_scroll_end,
        });
        core.state
            .set_content_height(items.len() as f32 * item_height);

        let list = Self {
            core,
            items,
            item_height,
            row,
            overscan: config.overscan,
            list_ref,
        };
        if let Some(r) = &list.list_ref {
            r.attach(&list.handle());
        }
        log::debug!(
            "LazyList mounted: {} rows, {}px content",
            list.items.len(),
            list.core.state.content_height()
        );
        list
    }

    /// The imperative handle for this list.
    pub fn handle(&self) -> ListHandle {
        self.core.clone()
    }

    pub fn state(&self) -> &LazyColumnState {
        &self.core.state
    }

    pub fn offset(&self) -> f32 {
        self.core.state.offset()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn list_ref(&self) -> Option<&ListRef> {
        self.list_ref.as_ref()
    }

    /// Layout reported a new viewport height.
    pub fn set_viewport_height(&mut self, h: f32) {
        self.core.state.set_viewport_height(h);
    }

    /// Replaces the rows. The offset is clamped if the content shrank.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.core
            .state
            .set_content_height(self.items.len() as f32 * self.item_height);
    }

    /// Finger moved by `dy` px. Returns the part that could not be consumed.
    pub fn drag(&mut self, dy: f32) -> f32 {
        let before = self.core.state.offset();
        let leftover = self.core.state.scroll_immediate(dy);
        if self.core.state.offset() != before {
            self.core.emit_scroll();
        }
        leftover
    }

    /// Finger lifted. Without a fling the list is already at rest.
    pub fn release(&mut self) {
        if !self.core.state.is_dragging() {
            return;
        }
        if !self.core.state.release() {
            self.core.emit_momentum_end();
        }
    }

    pub fn tick(&mut self) -> Motion {
        self.tick_at(clock::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Motion {
        let before = self.core.state.offset();
        let motion = self.core.state.tick_at(now);
        self.core.report(motion, before)
    }

    pub fn view(&self) -> View {
        LazyColumn(
            &self.items,
            self.item_height,
            &self.core.state,
            self.overscan,
            self.row.as_ref(),
        )
    }
}

impl<T> ScrollToOffset for LazyList<T> {
    fn scroll_to_offset(&self, offset: f32, animated: bool) {
        self.core.scroll_to_offset(offset, animated);
    }
}

impl<T> Drop for LazyList<T> {
    fn drop(&mut self) {
        if let Some(r) = self.list_ref.take() {
            r.detach(&self.handle());
        }
        log::trace!("LazyList unmounted");
    }
}

/// Renders the visible window of `items`, padded with spacers so the column
/// keeps the full content height.
pub fn LazyColumn<T>(
    items: &[T],
    item_height: f32,
    state: &LazyColumnState,
    overscan: usize,
    row: &dyn Fn(&T, usize) -> View,
) -> View {
    let scroll_offset = state.offset();
    let viewport_height = state.viewport_height();

    let mut children = Vec::new();

    if item_height > 0.0 && !items.is_empty() {
        let first_visible = (scroll_offset / item_height).floor().max(0.0) as usize;
        let last_visible = ((scroll_offset + viewport_height) / item_height).ceil() as usize;

        let first = first_visible.saturating_sub(overscan).min(items.len());
        let end = last_visible.saturating_add(overscan).min(items.len());

        if first > 0 {
            children.push(crate::Spacer(first as f32 * item_height));
        }
        for (i, item) in items.iter().enumerate().take(end).skip(first) {
            children.push(row(item, i).id(i as ViewId));
        }
        if end < items.len() {
            children.push(crate::Spacer((items.len() - end) as f32 * item_height));
        }
    }

    View::new(
        0,
        ViewKind::ScrollV {
            offset: scroll_offset,
            viewport_height,
            content_height: state.content_height(),
        },
    )
    .child(crate::Column().with_children(children))
}
