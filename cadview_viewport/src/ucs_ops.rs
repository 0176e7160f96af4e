// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! UCS lifecycle, grid coupling, and named views.

use alloc::borrow::ToOwned;
use alloc::string::String;

use cadview_ucs::{IsoView, Ucs, UcsId, is_custom_frame};
use kurbo::{Point, Vec2};

use crate::config::UcsApplyPolicy;
use crate::error::ZoomError;
use crate::grid::GridSettings;
use crate::listener::RedrawMethod;
use crate::named_view::NamedView;
use crate::viewport::Viewport;
use crate::zoom::to_pixel;

impl Viewport {
    /// Switches the active frame and then repositions the view according to
    /// [`UcsApplyPolicy`].
    ///
    /// A frame indistinguishable from the world frame deactivates the UCS.
    pub fn set_ucs(&mut self, origin: Point, x_axis_direction: f64, isometric: bool, iso_view: IsoView) {
        self.assert_not_dispatching();
        let origin_in_ucs = self.apply_ucs_frame(origin, x_axis_direction, isometric, iso_view);
        match self.config.ucs_apply_policy {
            UcsApplyPolicy::ZoomAuto => {
                if let Err(err) = self.zoom_auto(true, true) {
                    tracing::debug!(%err, "fit after UCS switch skipped");
                }
            }
            UcsApplyPolicy::PanOriginCenter => {
                let Vec2 { x: fx, y: fy } = self.factor;
                let ox = f64::from(self.borders.left) + self.usable_width() / 2.0 - origin_in_ucs.x * fx;
                let oy = f64::from(self.borders.bottom) + self.usable_height() / 2.0 - origin_in_ucs.y * fy;
                self.set_offset(to_pixel(ox), to_pixel(oy));
            }
            UcsApplyPolicy::PanOriginLowerLeft => {
                let Vec2 { x: fx, y: fy } = self.factor;
                let ox = f64::from(self.borders.left) - origin_in_ucs.x * fx;
                let oy = f64::from(self.borders.bottom) - origin_in_ucs.y * fy;
                self.set_offset(to_pixel(ox), to_pixel(oy));
            }
        }
    }

    /// Updates the mapper and the document's isometric grid flags without
    /// notifying. Returns `origin` expressed in the new frame.
    fn apply_ucs_frame(&mut self, origin: Point, x_axis_direction: f64, isometric: bool, iso_view: IsoView) -> Point {
        if is_custom_frame(origin, x_axis_direction) {
            self.mapper.set_frame(origin, x_axis_direction);
        } else {
            self.mapper.clear();
        }
        tracing::debug!(?origin, x_axis_direction, isometric, "UCS frame applied");

        let grid_changed = self
            .with_document_mut(|d| {
                let changed = d.is_isometric_grid() != isometric || d.iso_view() != iso_view;
                if changed {
                    d.set_isometric_grid(isometric);
                    if isometric {
                        d.set_iso_view(iso_view);
                    }
                }
                changed
            })
            .unwrap_or(false);
        if grid_changed {
            self.load_grid_settings();
        }
        self.mapper.to_ucs(origin)
    }

    /// Interns a frame built from the current grid mode, makes it current and
    /// notifies.
    ///
    /// Returns `None` without side effects when the frame equals the world
    /// frame or no document is attached.
    pub fn create_ucs(&mut self, origin: Point, x_axis_direction: f64) -> Option<UcsId> {
        self.assert_not_dispatching();
        if !is_custom_frame(origin, x_axis_direction) {
            return None;
        }
        let candidate = Ucs::with_iso(origin, x_axis_direction, self.grid.is_isometric(), self.grid.iso_view());
        let (id, ucs) = self.intern(candidate)?;
        self.set_ucs(ucs.origin(), ucs.x_axis_direction(), ucs.is_isometric(), ucs.iso_view());
        self.with_document_mut(|d| d.set_current_ucs(Some(ucs)));
        self.fire_ucs_changed(Some(ucs));
        Some(id)
    }

    /// Interns the active frame and re-applies it.
    ///
    /// Returns `None` when no UCS is active or no document is attached.
    pub fn extract_ucs(&mut self) -> Option<UcsId> {
        self.assert_not_dispatching();
        let candidate = self.current_ucs()?;
        let (id, ucs) = self.intern(candidate)?;
        self.apply_ucs(Some(&ucs));
        Some(id)
    }

    fn intern(&self, candidate: Ucs) -> Option<(UcsId, Ucs)> {
        self.with_document_mut(|d| {
            let registry = d.ucs_registry_mut();
            let id = registry.try_add(candidate);
            registry.ucs(id).map(|ucs| (id, ucs))
        })
        .flatten()
    }

    /// Makes `ucs` the active frame, records it in the document and notifies.
    ///
    /// `None` is ignored. A frame equal to the world frame is recorded as
    /// "no UCS".
    pub fn apply_ucs(&mut self, ucs: Option<&Ucs>) {
        self.assert_not_dispatching();
        let Some(&ucs) = ucs else {
            return;
        };
        self.set_ucs(ucs.origin(), ucs.x_axis_direction(), ucs.is_isometric(), ucs.iso_view());
        let current = (!ucs.is_wcs()).then_some(ucs);
        self.with_document_mut(|d| d.set_current_ucs(current));
        self.fire_ucs_changed(current);
    }

    /// Applies a registry entry by id. Unknown ids are ignored.
    pub fn apply_ucs_id(&mut self, id: UcsId) {
        let ucs = self.with_document(|d| d.ucs_registry().ucs(id)).flatten();
        self.apply_ucs(ucs.as_ref());
    }

    /// The active frame, or `None` for the world frame.
    #[must_use]
    pub fn current_ucs(&self) -> Option<Ucs> {
        self.mapper.has_ucs().then(|| {
            Ucs::with_iso(
                self.mapper.ucs_origin(),
                self.mapper.x_axis_direction(),
                self.grid.is_isometric(),
                self.grid.iso_view(),
            )
        })
    }

    /// Origin (world) and x-axis direction of the active frame.
    #[must_use]
    pub fn current_ucs_origin_and_direction(&self) -> (Point, f64) {
        (self.mapper.ucs_origin(), self.mapper.x_axis_direction())
    }

    /// Applies the UCS stored with a freshly opened document.
    pub fn init_after_document_open(&mut self) {
        self.assert_not_dispatching();
        self.load_grid_settings();
        let Some(ucs) = self.with_document(|d| d.current_ucs()).flatten() else {
            return;
        };
        self.apply_ucs_frame(ucs.origin(), ucs.x_axis_direction(), ucs.is_isometric(), ucs.iso_view());
        self.fire_ucs_changed(Some(ucs));
    }

    /// Pushes the document's grid parameters into the grid and requests a
    /// grid repaint.
    pub fn load_grid_settings(&mut self) {
        self.assert_not_dispatching();
        let settings = self.with_document(|d| GridSettings {
            spacing: d.grid_spacing(),
            isometric: d.is_isometric_grid(),
            iso_view: d.iso_view(),
        });
        if let Some(settings) = settings {
            self.grid.load_settings(&settings);
        }
        self.fire_redraw_needed(RedrawMethod::Grid);
    }

    /// Snaps a world point to the grid of the active frame.
    #[must_use]
    pub fn snap_grid(&self, world: Point) -> Point {
        if self.mapper.has_ucs() {
            self.mapper.to_world(self.grid.snap_grid(self.mapper.to_ucs(world)))
        } else {
            self.grid.snap_grid(world)
        }
    }

    // --- named views ---

    /// Captures the visible area and active frame under `name`.
    #[must_use]
    pub fn create_named_view(&self, name: impl Into<String>) -> NamedView {
        let mut view = NamedView::new(name);
        self.update_named_view(&mut view);
        view
    }

    /// Overwrites `view` with the visible area and active frame.
    pub fn update_named_view(&self, view: &mut NamedView) {
        let visible = self.visible_ucs_rect();
        view.center = visible.center();
        view.size = visible.size();
        view.is_paper_view = self.print_preview;
        view.ucs = self.current_ucs();
        view.ucs_name = view.ucs.and_then(|ucs| {
            self.with_document(|d| {
                let registry = d.ucs_registry();
                registry
                    .find_existing(&ucs)
                    .and_then(|id| registry.get(id))
                    .map(|entry| entry.name().to_owned())
            })
            .flatten()
        });
    }

    /// Switches to the view's frame and fits its area.
    pub fn restore_named_view(&mut self, view: &NamedView) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let ucs = view.ucs.unwrap_or(Ucs::WCS);
        self.apply_ucs_frame(ucs.origin(), ucs.x_axis_direction(), ucs.is_isometric(), ucs.iso_view());
        self.with_document_mut(|d| d.set_current_ucs(view.ucs));
        self.fire_ucs_changed(view.ucs);
        let half = view.size.to_vec2() / 2.0;
        self.zoom_window(view.center - half, view.center + half, true)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use core::f64::consts::FRAC_PI_2;

    use cadview_ucs::IsoView;
    use kurbo::{Point, Rect};

    use crate::clock::ManualClock;
    use crate::config::{UcsApplyPolicy, ViewportConfig};
    use crate::document::{Document, Drawing};
    use crate::listener::{RedrawMethod, ViewportListener};
    use crate::viewport::Viewport;

    fn viewport_with(policy: UcsApplyPolicy) -> (Viewport, alloc::rc::Rc<core::cell::RefCell<Drawing>>) {
        let config = ViewportConfig {
            ucs_apply_policy: policy,
            ..ViewportConfig::default()
        };
        let mut vp = Viewport::with_clock(config, Box::new(ManualClock::new()));
        vp.set_size(200, 100);
        let (drawing, doc) = Drawing::with_bounds(Rect::new(0.0, 0.0, 20.0, 10.0)).into_shared();
        vp.set_document(doc);
        (vp, drawing)
    }

    #[test]
    fn pan_center_policy_puts_origin_mid_device() {
        let (mut vp, _) = viewport_with(UcsApplyPolicy::PanOriginCenter);
        vp.set_factor(2.0);
        vp.set_ucs(Point::new(5.0, 5.0), 0.0, false, IsoView::Top);
        let gui = vp.to_gui(Point::new(5.0, 5.0));
        assert_eq!(gui, Point::new(100.0, 50.0));
    }

    #[test]
    fn pan_lower_left_policy_puts_origin_in_corner() {
        let (mut vp, _) = viewport_with(UcsApplyPolicy::PanOriginLowerLeft);
        vp.set_ucs(Point::new(5.0, 5.0), FRAC_PI_2, false, IsoView::Top);
        let gui = vp.to_gui(Point::new(5.0, 5.0));
        assert!((gui - Point::new(0.0, 100.0)).hypot() < 1e-9, "{gui:?}");
    }

    #[test]
    fn world_frame_is_not_interned() {
        let (mut vp, drawing) = viewport_with(UcsApplyPolicy::ZoomAuto);
        assert_eq!(vp.create_ucs(Point::ORIGIN, 0.0), None);
        assert!(drawing.borrow().ucs_registry().is_empty());
        assert!(!vp.has_ucs());
    }

    #[test]
    fn isometric_switch_reloads_grid() {
        let (mut vp, drawing) = viewport_with(UcsApplyPolicy::PanOriginCenter);
        vp.set_ucs(Point::new(1.0, 0.0), 0.0, true, IsoView::Right);
        assert!(drawing.borrow().isometric_grid);
        assert_eq!(drawing.borrow().iso_view, IsoView::Right);
        assert!(vp.is_grid_isometric());
        assert_eq!(vp.grid().iso_view(), IsoView::Right);
    }

    #[derive(Default)]
    struct GridRedraws(Cell<u32>);

    impl ViewportListener for GridRedraws {
        fn on_redraw_needed(&self, method: RedrawMethod) {
            if method == RedrawMethod::Grid {
                self.0.set(self.0.get() + 1);
            }
        }
    }

    #[test]
    fn iso_view_difference_reloads_grid_even_when_not_isometric() {
        let (mut vp, drawing) = viewport_with(UcsApplyPolicy::PanOriginCenter);
        let redraws = Rc::new(GridRedraws::default());
        vp.add_listener(redraws.clone());

        vp.set_ucs(Point::new(1.0, 0.0), 0.0, false, IsoView::Top);
        assert_eq!(redraws.0.get(), 0);

        vp.set_ucs(Point::new(1.0, 0.0), 0.0, false, IsoView::Left);
        assert_eq!(redraws.0.get(), 1);
        assert!(!drawing.borrow().isometric_grid);
        // The stored face only follows an isometric grid.
        assert_eq!(drawing.borrow().iso_view, IsoView::Top);
    }

    #[test]
    fn snap_goes_through_active_frame() {
        let (mut vp, _) = viewport_with(UcsApplyPolicy::PanOriginCenter);
        vp.set_ucs(Point::new(3.0, 3.0), 0.0, false, IsoView::Top);
        // Default spacing 10 in a frame whose origin is at (3, 3).
        assert_eq!(vp.snap_grid(Point::new(11.0, 4.0)), Point::new(13.0, 3.0));
    }

    #[test]
    fn named_view_round_trips_area_and_frame() {
        let (mut vp, _) = viewport_with(UcsApplyPolicy::PanOriginCenter);
        let id = vp.create_ucs(Point::new(2.0, 0.0), 0.5).unwrap();
        vp.zoom_window(Point::new(0.0, 0.0), Point::new(40.0, 20.0), true).unwrap();
        let view = vp.create_named_view("detail");
        assert_eq!(view.ucs_name.as_deref(), Some("UCS 1"));

        vp.apply_ucs(Some(&cadview_ucs::Ucs::WCS));
        vp.zoom_window(Point::new(-500.0, -500.0), Point::new(500.0, 500.0), true).unwrap();
        assert!(!vp.has_ucs());

        vp.restore_named_view(&view).unwrap();
        assert!(vp.has_ucs());
        let restored = vp.create_named_view("again");
        assert!((restored.center - view.center).hypot() < 1e-6);
        assert_eq!(restored.ucs, view.ucs);
        assert_eq!(vp.extract_ucs(), Some(id));
    }
}
