#[cfg(test)]
mod tests {
    use crate::clock::*;
    use crate::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_unsubscribe() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let id = sig.subscribe({
            let seen = seen.clone();
            move |v| seen.borrow_mut().push(*v)
        });
        sig.set(1);
        assert!(sig.unsubscribe(id));
        assert!(!sig.unsubscribe(id));
        sig.set(2);

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_signal_subscriber_can_unsubscribe_itself() {
        let sig = signal(0u32);
        let id_cell: Rc<Cell<Option<SubId>>> = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));

        let id = sig.subscribe({
            let sig = sig.clone();
            let id_cell = id_cell.clone();
            let hits = hits.clone();
            move |_| {
                hits.set(hits.get() + 1);
                if let Some(id) = id_cell.get() {
                    sig.unsubscribe(id);
                }
            }
        });
        id_cell.set(Some(id));

        sig.set(1);
        sig.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscriber_removed_mid_notification_is_skipped() {
        let sig = signal(0u32);
        let second_hits = Rc::new(Cell::new(0));
        let second: Rc<Cell<Option<SubId>>> = Rc::new(Cell::new(None));

        sig.subscribe({
            let sig = sig.clone();
            let second = second.clone();
            move |_| {
                if let Some(id) = second.get() {
                    sig.unsubscribe(id);
                }
            }
        });
        second.set(Some(sig.subscribe({
            let second_hits = second_hits.clone();
            move |_| second_hits.set(second_hits.get() + 1)
        })));

        sig.set(1);
        assert_eq!(second_hits.get(), 0);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(false));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || cleaned_up_clone.set(true));

        assert!(!cleaned_up.get());
        scope.dispose();
        assert!(cleaned_up.get());
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_scope_disposes_children_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::new();
        let child = parent.child();

        parent.add_disposer({
            let order = order.clone();
            move || order.borrow_mut().push("parent")
        });
        child.add_disposer({
            let order = order.clone();
            move || order.borrow_mut().push("child")
        });

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
        assert!(child.is_disposed());
    }

    #[test]
    fn test_scope_runs_disposers_on_last_drop() {
        let cleaned_up = Rc::new(Cell::new(false));
        {
            let scope = Scope::new();
            let c = cleaned_up.clone();
            scope.add_disposer(move || c.set(true));
        }
        assert!(cleaned_up.get());
    }

    #[test]
    fn test_late_disposer_runs_immediately() {
        let scope = Scope::new();
        scope.dispose();

        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        scope.add_disposer(move || r.set(true));
        assert!(ran.get());
    }

    #[test]
    fn test_current_scope_restored_after_run() {
        assert!(current_scope().is_none());
        let outer = Scope::new();
        outer.run(|| {
            assert!(current_scope().is_some());
            Scope::new().run(|| assert!(current_scope().is_some()));
            assert!(current_scope().is_some());
        });
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_effect_cleanup_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let scope = Scope::new();

        let d = scope.run(|| {
            let runs = runs.clone();
            effect(move || on_unmount(move || runs.set(runs.get() + 1)))
        });

        d.run();
        scope.dispose();
        d.run();
        assert_eq!(runs.get(), 1);
        assert!(d.is_disposed());
    }

    #[test]
    fn test_released_effects_do_not_pile_up_in_scope() {
        let scope = Scope::new();
        let focus = FocusNotifier::new();

        for _ in 0..1000 {
            let d = scope.run(|| {
                let sub = focus.subscribe(|| {});
                effect(move || sub.into_dispose())
            });
            d.run();
        }
        assert_eq!(focus.subscriber_count(), 0);
        assert!(scope.disposer_count() <= 1);

        let kept = scope.run(|| {
            let sub = focus.subscribe(|| {});
            effect(move || sub.into_dispose())
        });
        assert_eq!(scope.disposer_count(), 1);
        scope.dispose();
        assert!(kept.is_disposed());
        assert_eq!(focus.subscriber_count(), 0);
    }

    #[test]
    fn test_negative_zero_offset_is_plain_zero() {
        let z = ScrollOffset::new(-0.0).unwrap();
        assert!(z.get().is_sign_positive());
        assert!(ScrollOffset::saturating(-0.0).unwrap().get().is_sign_positive());
    }

    #[test]
    fn test_offset_validation() {
        assert_eq!(ScrollOffset::new(12.5).map(ScrollOffset::get), Ok(12.5));
        assert_eq!(ScrollOffset::new(-1.0), Err(OffsetError::Negative(-1.0)));
        assert!(matches!(
            ScrollOffset::new(f32::NAN),
            Err(OffsetError::NotFinite(_))
        ));
        assert_eq!(ScrollOffset::saturating(-8.0), Ok(ScrollOffset::ZERO));
        assert!(ScrollOffset::saturating(f32::INFINITY).is_err());
        assert_eq!(
            OffsetError::Negative(-1.0).to_string(),
            "scroll offset -1 is negative"
        );
    }

    #[test]
    fn test_scroll_slot_shared_between_clones() {
        let slot = ScrollSlot::new();
        let other = slot.clone();
        assert_eq!(slot.read(), None);

        other.write(ScrollOffset::new(100.0).unwrap());
        other.write(ScrollOffset::new(50.0).unwrap());
        assert_eq!(slot.read().map(ScrollOffset::get), Some(50.0));
        assert!(slot.ptr_eq(&other));

        slot.clear();
        assert_eq!(other.read(), None);
        assert!(!slot.ptr_eq(&ScrollSlot::new()));
    }

    #[test]
    fn test_focus_fires_only_on_foreground_transitions() {
        let focus = FocusNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let _sub = focus.subscribe({
            let hits = hits.clone();
            move || hits.set(hits.get() + 1)
        });

        focus.set_focused(false);
        assert_eq!(hits.get(), 0);
        focus.set_focused(true);
        focus.set_focused(true);
        assert_eq!(hits.get(), 1);
        focus.set_focused(false);
        focus.set_focused(true);
        assert_eq!(hits.get(), 2);
        assert_eq!(focus.generation(), 2);
    }

    #[test]
    fn test_focus_subscription_release() {
        let focus = FocusNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let sub = focus.subscribe({
            let hits = hits.clone();
            move || hits.set(hits.get() + 1)
        });
        assert!(sub.is_active());
        assert_eq!(focus.subscriber_count(), 1);

        let d = sub.into_dispose();
        d.run();
        assert_eq!(focus.subscriber_count(), 0);

        focus.set_focused(true);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_focus_subscription_outlives_notifier() {
        let focus = FocusNotifier::new();
        let sub = focus.subscribe(|| {});
        drop(focus);
        assert!(!sub.is_active());
        sub.release();
    }

    #[test]
    fn test_locals_nesting() {
        let outer = ScrollSlot::new();
        let inner = ScrollSlot::new();

        with_scroll_slot(outer.clone(), || {
            with_scroll_slot(inner.clone(), || {
                assert!(scroll_slot().is_some_and(|s| s.ptr_eq(&inner)));
            });
            assert!(scroll_slot().is_some_and(|s| s.ptr_eq(&outer)));
            assert!(focus_notifier().is_none());
        });
        assert!(scroll_slot().is_none());
    }

    #[test]
    fn test_clock_deterministic() {
        let clock = TestClock::default().install();
        let t0 = now();
        clock.advance(Duration::from_millis(16));
        assert_eq!(now() - t0, Duration::from_millis(16));
        reset_clock();
    }
}
