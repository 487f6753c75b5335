#[cfg(test)]
mod tests {
    use crate::*;
    use perch_core::*;
    use perch_ui::*;
    use serde::{Deserialize, Serialize};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    enum Route {
        Reports,
        Report(u32),
        Settings,
    }

    type Holder = Rc<RefCell<Freeze<ScrollPreservingList<u32>>>>;

    fn report_list(e: &EntryScope<Route>) -> Holder {
        e.remember_saveable("list", || {
            Freeze::new(|| {
                ScrollPreservingList::mount(LazyListProps::new(
                    (0..500).collect::<Vec<u32>>(),
                    64.0,
                    |n, _| Text(format!("Report {n}")),
                ))
            })
        })
    }

    #[test]
    fn only_top_is_focused() {
        let stack = NavBackStack::new(Route::Reports);
        let first = stack.compose(|e| e.focus()).unwrap();
        assert!(first.is_focused());

        let nav = stack.navigator();
        nav.push(Route::Settings);
        assert!(!first.is_focused());
        let second = stack.compose(|e| e.focus()).unwrap();
        assert!(second.is_focused());
        assert!(!first.is_focused());

        assert!(nav.pop());
        assert!(!second.is_focused());
        stack.compose(|_| ());
        assert!(first.is_focused());
        assert_eq!(first.generation(), 2);
    }

    #[test]
    fn compose_provides_screen_locals() {
        let stack = NavBackStack::new(Route::Reports);
        let (slot, from_local, focus_local) = stack
            .compose(|e| (e.scroll_slot(), scroll_slot(), focus_notifier()))
            .unwrap();
        assert!(from_local.is_some_and(|s| s.ptr_eq(&slot)));
        assert!(focus_local.is_some());
        assert!(scroll_slot().is_none());
    }

    #[test]
    fn list_position_survives_push_and_pop() {
        let clock = TestClock::default().install();
        let stack = NavBackStack::new(Route::Reports);
        let nav = stack.navigator();

        let holder = stack.compose(report_list).unwrap();
        {
            let mut f = holder.borrow_mut();
            let list = f.content_mut().unwrap();
            list.drag(240.0);
            clock.advance(Duration::from_millis(250));
            list.release();
        }

        nav.push(Route::Report(3));
        holder.borrow_mut().freeze();
        stack.compose(|e| assert_eq!(e.key(), &Route::Report(3)));

        nav.pop();
        let again = stack
            .compose(|e| {
                let h = report_list(e);
                h.borrow_mut().unfreeze();
                h
            })
            .unwrap();
        assert!(Rc::ptr_eq(&again, &holder));

        let f = again.borrow();
        let list = f.content().unwrap();
        assert_eq!(list.offset(), 240.0);
        assert_eq!(
            list.last_restore(),
            Some(RestoreOutcome::Restored(ScrollOffset::new(240.0).unwrap()))
        );
        reset_clock();
    }

    #[test]
    fn app_background_blurs_and_refocuses() {
        let stack = NavBackStack::new(Route::Reports);
        let focus = stack.compose(|e| e.focus()).unwrap();

        stack.set_app_foreground(false);
        assert!(!focus.is_focused());
        assert!(!stack.is_app_foreground());
        stack.compose(|_| ());
        assert!(!focus.is_focused());

        stack.set_app_foreground(true);
        assert!(focus.is_focused());
        assert_eq!(focus.generation(), 2);
    }

    #[test]
    fn pop_disposes_entry_scope() {
        let stack = NavBackStack::new(Route::Reports);
        let nav = stack.navigator();
        let cleaned = Rc::new(Cell::new(false));

        nav.push(Route::Settings);
        stack.compose(|_| {
            let cleaned = cleaned.clone();
            effect(move || on_unmount(move || cleaned.set(true)));
        });
        assert!(!cleaned.get());

        assert!(nav.pop());
        assert!(cleaned.get());
        assert!(!nav.pop());
        assert_eq!(stack.size(), 1);
        assert_eq!(stack.last_dir(), TransitionDir::Pop);
    }

    #[test]
    fn replace_starts_with_fresh_slot() {
        let stack = NavBackStack::new(Route::Reports);
        let old = stack.compose(|e| e.scroll_slot()).unwrap();
        old.write(ScrollOffset::new(80.0).unwrap());

        stack.navigator().replace(Route::Settings);
        let new = stack.compose(|e| e.scroll_slot()).unwrap();
        assert!(!new.ptr_eq(&old));
        assert_eq!(new.read(), None);
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn pop_to_and_clear() {
        let stack = NavBackStack::new(Route::Reports);
        let nav = stack.navigator();
        nav.push(Route::Report(1));
        nav.push(Route::Report(2));
        nav.push(Route::Settings);

        nav.pop_to(|k| *k == Route::Report(1), false);
        assert_eq!(stack.top().map(|e| e.key().clone()), Some(Route::Report(1)));

        nav.clear_and_push(Route::Settings);
        assert_eq!(stack.size(), 1);
        assert_eq!(stack.top().map(|e| e.key().clone()), Some(Route::Settings));
    }

    #[test]
    fn json_roundtrip_rebuilds_entries() {
        let stack = NavBackStack::new(Route::Reports);
        stack.navigator().push(Route::Report(9));
        let json = stack.to_json();
        assert_eq!(json, r#"["Reports",{"Report":9}]"#);

        let ids_before = stack.ids();
        let other = NavBackStack::new(Route::Settings);
        other.from_json(&json).unwrap();
        assert_eq!(other.size(), 2);
        assert_eq!(other.top().map(|e| e.key().clone()), Some(Route::Report(9)));
        assert_eq!(other.last_dir(), TransitionDir::None);
        assert_eq!(ids_before, vec![1, 2]);
        assert_eq!(other.ids(), vec![2, 3]);

        assert!(other.from_json("not json").is_err());
        assert_eq!(other.size(), 2);
    }

    #[test]
    fn version_bumps_on_change() {
        let stack = NavBackStack::new(Route::Reports);
        let seen = Rc::new(Cell::new(0u64));
        stack.subscribe({
            let seen = seen.clone();
            move |v| seen.set(v)
        });

        let nav = stack.navigator();
        nav.push(Route::Settings);
        nav.pop();
        assert_eq!(stack.version(), 2);
        assert_eq!(seen.get(), 2);
    }
}
