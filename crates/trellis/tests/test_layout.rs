//! Layout pass behavior: extents at rest, incremental work and resizing.

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Instant,
    };

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use trellis::{
        Error, Geometry, NodeId, Result, Widget, Window,
        draw::DrawList,
        frame::Frame,
        geom::{Extent, Rect},
        needs::Need,
        solver::{CassowarySolver, SolverError},
        theme::Palette,
    };

    /// Counts its layouts.
    struct Counter {
        extent: Extent,
        layouts: Arc<AtomicUsize>,
    }

    impl Widget for Counter {
        fn default_extent(&self) -> Extent {
            self.extent
        }

        fn layout(&mut self, _geometry: &Geometry, _frame: &Frame) {
            self.layouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn window(w: f32, h: f32) -> Result<Window<CassowarySolver>> {
        Window::new(CassowarySolver::new(), Box::new(Palette::dark()), Extent::new(w, h))
    }

    fn counter(
        win: &Window<CassowarySolver>,
        parent: NodeId,
        w: f32,
        h: f32,
    ) -> Result<(NodeId, Arc<AtomicUsize>)> {
        let layouts = Arc::new(AtomicUsize::new(0));
        let id = win.add(
            parent,
            Counter {
                extent: Extent::new(w, h),
                layouts: layouts.clone(),
            },
        )?;
        Ok((id, layouts))
    }

    fn frame(win: &Window<CassowarySolver>) -> Result<Option<DrawList>> {
        win.render(Instant::now())
    }

    fn rect(win: &Window<CassowarySolver>, id: NodeId) -> Result<Rect> {
        Ok(win.geometry(id)?.window_rectangle)
    }

    #[test]
    fn free_widgets_take_their_preferred_size() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (a, _) = counter(&win, win.root(), 30.0, 20.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?, Rect::new(0.0, 0.0, 30.0, 20.0));

        win.set_preferred_extent(a, Extent::new(50.0, 40.0))?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.extent(), Extent::new(50.0, 40.0));

        // A preferred extent below the minimum yields to it.
        win.set_preferred_extent(a, Extent::new(5.0, 5.0))?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.extent(), Extent::new(30.0, 20.0));
        Ok(())
    }

    #[test]
    fn fixed_extent_wins() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (a, _) = counter(&win, win.root(), 10.0, 10.0)?;
        win.set_fixed_width(a, 40.0)?;
        win.set_preferred_extent(a, Extent::new(60.0, 10.0))?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.extent(), Extent::new(40.0, 10.0));

        win.set_fixed_height(a, 25.0)?;
        frame(&win)?;
        assert_eq!(win.extents(a)?.fixed, Extent::new(0.0, 25.0));
        assert_eq!(rect(&win, a)?.extent(), Extent::new(60.0, 25.0));

        win.set_fixed_extent(a, Extent::zero())?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.extent(), Extent::new(60.0, 10.0));
        Ok(())
    }

    #[test]
    fn placement_relations() -> Result<()> {
        let win = window(200.0, 100.0)?;
        let (a, _) = counter(&win, win.root(), 20.0, 10.0)?;
        let (b, _) = counter(&win, win.root(), 20.0, 10.0)?;
        let (c, _) = counter(&win, win.root(), 20.0, 10.0)?;
        win.place_left(a, 5.0)?;
        win.place_at_top(a, 5.0)?;
        win.place_right_of(b, a, 3.0)?;
        win.place_below(b, a, 2.0)?;
        win.place_right(c, 4.0)?;
        win.place_at_bottom(c, 6.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?, Rect::new(5.0, 85.0, 20.0, 10.0));
        assert_eq!(rect(&win, b)?, Rect::new(28.0, 73.0, 20.0, 10.0));
        assert_eq!(rect(&win, c)?, Rect::new(176.0, 6.0, 20.0, 10.0));
        assert_eq!(win.geometry(b)?.offset_from_parent, rect(&win, b)?.offset());
        Ok(())
    }

    #[test]
    fn released_placements_stop_applying() -> Result<()> {
        let win = window(200.0, 100.0)?;
        let (a, _) = counter(&win, win.root(), 20.0, 10.0)?;
        let h = win.place_left(a, 50.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.x, 50.0);
        win.remove_constraint(h)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.x, 0.0);
        Ok(())
    }

    #[test]
    fn unsatisfiable_updates_leave_extents_alone() -> Result<()> {
        let win = window(100.0, 100.0)?;
        let (a, _) = counter(&win, win.root(), 30.0, 20.0)?;
        win.place_left(a, 0.0)?;
        win.place_right(a, 0.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.w, 100.0);

        assert_eq!(
            win.set_fixed_width(a, 50.0),
            Err(Error::Solver(SolverError::Unsatisfiable))
        );
        assert_eq!(win.extents(a)?.fixed, Extent::zero());
        assert_eq!(
            win.set_minimum_extent(a, Extent::new(150.0, 20.0)),
            Err(Error::Solver(SolverError::Unsatisfiable))
        );
        assert_eq!(win.extents(a)?.minimum, Extent::new(30.0, 20.0));

        frame(&win)?;
        assert_eq!(rect(&win, a)?, Rect::new(0.0, 0.0, 100.0, 20.0));
        // The solver is still usable.
        win.set_minimum_extent(a, Extent::new(60.0, 20.0))?;
        win.set_preferred_extent(a, Extent::new(60.0, 45.0))?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?, Rect::new(0.0, 0.0, 100.0, 45.0));
        Ok(())
    }

    #[test]
    #[should_panic(expected = "below the minimum")]
    fn fixed_below_minimum_panics() {
        let win = window(100.0, 100.0).unwrap();
        let (a, _) = counter(&win, win.root(), 30.0, 20.0).unwrap();
        drop(win.set_fixed_width(a, 10.0));
    }

    #[test]
    #[should_panic(expected = "finite and non-negative")]
    fn negative_minimum_panics() {
        let win = window(100.0, 100.0).unwrap();
        let (a, _) = counter(&win, win.root(), 30.0, 20.0).unwrap();
        drop(win.set_minimum_extent(a, Extent::new(-1.0, 0.0)));
    }

    #[test]
    #[should_panic(expected = "finite and non-negative")]
    fn non_finite_preferred_panics() {
        let win = window(100.0, 100.0).unwrap();
        let (a, _) = counter(&win, win.root(), 30.0, 20.0).unwrap();
        drop(win.set_preferred_extent(a, Extent::new(f32::NAN, 0.0)));
    }

    #[test]
    fn layout_is_idempotent() -> Result<()> {
        let win = window(300.0, 200.0)?;
        let (a, la) = counter(&win, win.root(), 30.0, 20.0)?;
        let (b, lb) = counter(&win, a, 10.0, 10.0)?;
        win.place_left(a, 7.0)?;
        win.place_right_of(b, a, 1.0)?;
        assert!(frame(&win)?.is_some());
        let before = (win.geometry(a)?, win.geometry(b)?);
        let counts = (la.load(Ordering::Relaxed), lb.load(Ordering::Relaxed));

        assert!(frame(&win)?.is_none());
        assert!(frame(&win)?.is_none());
        assert_eq!((win.geometry(a)?, win.geometry(b)?), before);
        assert_eq!((la.load(Ordering::Relaxed), lb.load(Ordering::Relaxed)), counts);
        for id in [win.root(), a, b] {
            assert_eq!(win.needs_pending(id)?, Need::empty());
        }
        Ok(())
    }

    #[test]
    fn only_changed_widgets_are_laid_out() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (c, lc) = counter(&win, win.root(), 0.0, 0.0)?;
        let (l1, ll1) = counter(&win, c, 10.0, 10.0)?;
        let (l2, ll2) = counter(&win, c, 10.0, 10.0)?;
        let (l3, ll3) = counter(&win, c, 10.0, 10.0)?;
        win.place_left(c, 0.0)?;
        win.place_left(l1, 0.0)?;
        win.place_right_of(l2, l1, 5.0)?;
        win.place_left(l3, 100.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, l2)?.x, 15.0);
        for l in [&lc, &ll1, &ll2, &ll3] {
            assert_eq!(l.load(Ordering::Relaxed), 1);
            l.store(0, Ordering::Relaxed);
        }

        win.set_preferred_extent(l1, Extent::new(50.0, 10.0))?;
        assert!(win.needs_pending(l1)?.needs_layout());
        assert!(frame(&win)?.is_some());
        assert_eq!(rect(&win, l1)?.w, 50.0);
        assert_eq!(rect(&win, l2)?.x, 55.0);
        assert_eq!(ll1.load(Ordering::Relaxed), 1);
        assert_eq!(ll2.load(Ordering::Relaxed), 1);
        assert_eq!(ll3.load(Ordering::Relaxed), 0);
        assert_eq!(lc.load(Ordering::Relaxed), 0);
        Ok(())
    }

    #[test]
    fn children_track_moving_parents() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (p, _) = counter(&win, win.root(), 100.0, 100.0)?;
        let (c, _) = counter(&win, p, 10.0, 10.0)?;
        let h = win.place_left(p, 10.0)?;
        win.place_left(c, 5.0)?;
        frame(&win)?;
        assert_eq!(win.geometry(c)?.offset_from_parent.x, 5.0);
        assert_eq!(win.geometry(c)?.offset_from_window.x, 15.0);

        win.remove_constraint(h)?;
        win.place_left(p, 40.0)?;
        frame(&win)?;
        assert_eq!(win.geometry(p)?.offset_from_window.x, 40.0);
        assert_eq!(win.geometry(c)?.offset_from_window.x, 45.0);
        assert_eq!(win.geometry(c)?.offset_from_parent.x, 5.0);
        Ok(())
    }

    #[test]
    fn resize_relays_out_everything_once() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (a, la) = counter(&win, win.root(), 10.0, 10.0)?;
        let (b, lb) = counter(&win, win.root(), 10.0, 10.0)?;
        let (c, lc) = counter(&win, a, 10.0, 10.0)?;
        win.place_left(a, 10.0)?;
        win.place_right(a, 10.0)?;
        win.place_right(c, 0.0)?;
        frame(&win)?;
        assert_eq!(rect(&win, a)?.w, 780.0);
        assert_eq!(rect(&win, c)?.x, 780.0);
        for l in [&la, &lb, &lc] {
            l.store(0, Ordering::Relaxed);
        }

        win.set_extent(Extent::new(1000.0, 600.0))?;
        assert_eq!(win.extent(), Extent::new(1000.0, 600.0));
        assert!(frame(&win)?.is_some());
        assert_eq!(rect(&win, win.root())?, Rect::new(0.0, 0.0, 1000.0, 600.0));
        assert_eq!(rect(&win, a)?.w, 980.0);
        assert_eq!(rect(&win, c)?.x, 980.0);
        assert_eq!(rect(&win, b)?.w, 10.0);
        for l in [&la, &lb, &lc] {
            assert_eq!(l.load(Ordering::Relaxed), 1);
        }
        Ok(())
    }

    #[test]
    fn impossible_resize_is_rejected() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let (a, _) = counter(&win, win.root(), 100.0, 10.0)?;
        win.place_left(a, 10.0)?;
        win.place_right(a, 10.0)?;
        frame(&win)?;
        assert_eq!(
            win.set_extent(Extent::new(50.0, 600.0)),
            Err(Error::Solver(SolverError::Unsatisfiable))
        );
        assert_eq!(win.extent(), Extent::new(800.0, 600.0));
        frame(&win)?;
        assert_eq!(rect(&win, a)?.w, 780.0);
        Ok(())
    }

    #[test]
    fn removing_widgets_releases_their_constraints() -> Result<()> {
        let win = window(800.0, 600.0)?;
        let base = win.with_solver(CassowarySolver::len);
        let (a, _) = counter(&win, win.root(), 10.0, 10.0)?;
        let (b, _) = counter(&win, a, 10.0, 10.0)?;
        counter(&win, b, 10.0, 10.0)?;
        win.set_fixed_extent(b, Extent::new(20.0, 20.0))?;
        assert_eq!(win.with_solver(CassowarySolver::len), base + 14);
        win.remove(a)?;
        assert_eq!(win.with_solver(CassowarySolver::len), base);
        assert_eq!(win.widget_count(), 1);
        assert!(frame(&win)?.is_some());
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn rest_respects_minimum_and_fixed(
            min_w in 0u16..300,
            min_h in 0u16..300,
            pref_w in 0u16..300,
            extra in 0u16..50,
            fix in any::<bool>(),
        ) {
            let win = window(800.0, 600.0).unwrap();
            let (a, _) = counter(&win, win.root(), 0.0, 0.0).unwrap();
            let min = Extent::new(f32::from(min_w), f32::from(min_h));
            win.set_minimum_extent(a, min).unwrap();
            win.set_preferred_extent(a, Extent::new(f32::from(pref_w), 0.0)).unwrap();
            let fixed_w = f32::from(min_w + extra);
            // A zero fixed width means unconstrained.
            let fix = fix && fixed_w > 0.0;
            if fix {
                win.set_fixed_width(a, fixed_w).unwrap();
            }
            frame(&win).unwrap();
            let r = rect(&win, a).unwrap();
            prop_assert!(r.w >= min.w);
            prop_assert!(r.h >= min.h);
            if fix {
                prop_assert_eq!(r.w, fixed_w);
            } else {
                prop_assert_eq!(r.w, min.w.max(f32::from(pref_w)));
            }
        }
    }
}
