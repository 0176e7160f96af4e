// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom, fit, pan, and view history operations.
//!
//! Every rejected request is reported through [`tracing`] and the optional
//! command messenger before the error is returned, and leaves the viewport
//! unchanged.

use kurbo::{Point, Rect, Vec2};

use crate::error::ZoomError;
use crate::history::{SaveOutcome, SavedView, ViewHistory};
use crate::listener::ViewportEvent;
use crate::units::Unit;
use crate::viewport::Viewport;

/// Smallest accepted zoom factor and scale.
pub const MIN_FACTOR: f64 = 1e-6;

/// Extents shorter than this count as flat.
pub const MIN_EXTENT: f64 = 1e-6;

/// Horizontal scale used when a zoom window is flat in x.
pub const FALLBACK_FACTOR_X: f64 = 480.0;

/// Vertical scale used when a zoom window is flat in y.
pub const FALLBACK_FACTOR_Y: f64 = 640.0;

/// Pixels moved by one [`Viewport::zoom_scroll`] step.
pub const SCROLL_STEP: i32 = 50;

/// Direction of a [`Viewport::zoom_scroll`] step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Show content further up.
    Up,
    /// Show content further down.
    Down,
    /// Show content further left.
    Left,
    /// Show content further right.
    Right,
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn valid_factor(f: f64) -> bool {
    f.is_finite() && f >= MIN_FACTOR
}

fn fits_i32(v: f64) -> bool {
    v.is_finite() && v > f64::from(i32::MIN) && v < f64::from(i32::MAX)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel offsets are whole pixels; out-of-range values saturate"
)]
pub(crate) fn to_pixel(v: f64) -> i32 {
    v as i32
}

impl Viewport {
    /// Zooms in by `factor` about `center` (UCS; defaults to the view centre).
    ///
    /// The visible area shrinks by `factor` towards `center` and is then fitted
    /// with [`Viewport::zoom_window`], keeping the aspect ratio.
    pub fn zoom_in(&mut self, factor: f64, center: Option<Point>) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.zoom_about(factor, center)
    }

    /// Zooms out by `factor`; the inverse of [`Viewport::zoom_in`].
    ///
    /// Both `factor` and its reciprocal must be valid zoom factors.
    pub fn zoom_out(&mut self, factor: f64, center: Option<Point>) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) || !valid_factor(1.0 / factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.zoom_about(1.0 / factor, center)
    }

    fn zoom_about(&mut self, factor: f64, center: Option<Point>) -> Result<(), ZoomError> {
        let visible = self.visible_ucs_rect();
        let c = center.unwrap_or_else(|| visible.center());
        let scale = |p: Point| c + (p - c) / factor;
        self.zoom_window(
            scale(Point::new(visible.x0, visible.y0)),
            scale(Point::new(visible.x1, visible.y1)),
            true,
        )
    }

    /// Scales the horizontal factor by `factor`, keeping the device centre fixed.
    ///
    /// Does nothing while zoom is frozen.
    pub fn zoom_in_x(&mut self, factor: f64) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.scale_axis(Axis::X, factor)
    }

    /// Scales the vertical factor by `factor`, keeping the device centre fixed.
    ///
    /// Does nothing while zoom is frozen.
    pub fn zoom_in_y(&mut self, factor: f64) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.scale_axis(Axis::Y, factor)
    }

    /// The inverse of [`Viewport::zoom_in_x`].
    pub fn zoom_out_x(&mut self, factor: f64) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) || !valid_factor(1.0 / factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.scale_axis(Axis::X, 1.0 / factor)
    }

    /// The inverse of [`Viewport::zoom_in_y`].
    pub fn zoom_out_y(&mut self, factor: f64) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(factor) || !valid_factor(1.0 / factor) {
            return self.reject(ZoomError::InvalidFactor(factor));
        }
        self.scale_axis(Axis::Y, 1.0 / factor)
    }

    fn scale_axis(&mut self, axis: Axis, ratio: f64) -> Result<(), ZoomError> {
        if self.zoom_frozen {
            return Ok(());
        }
        let (factor, offset, extent) = match axis {
            Axis::X => (self.factor.x, self.offset_x, self.width),
            Axis::Y => (self.factor.y, self.offset_y, self.height),
        };
        let half = f64::from(extent) / 2.0;
        let new_factor = factor * ratio;
        let new_offset = (f64::from(offset) - half) * ratio + half;
        if !valid_factor(new_factor) || !fits_i32(new_offset) {
            return self.reject(ZoomError::OutOfRange);
        }
        match axis {
            Axis::X => {
                self.factor.x = new_factor;
                self.offset_x = to_pixel(new_offset);
            }
            Axis::Y => {
                self.factor.y = new_factor;
                self.offset_y = to_pixel(new_offset);
            }
        }
        self.fire_viewport_changed();
        Ok(())
    }

    /// Fits the UCS rectangle spanned by two corners into the device.
    ///
    /// The corners may be given in any order. With `keep_aspect_ratio` both
    /// axes get the smaller of the two scales. A window flat on one axis uses a
    /// fallback scale for that axis; a window flat on both is rejected. The
    /// previous view is saved before the new one is committed.
    pub fn zoom_window(
        &mut self,
        corner1: Point,
        corner2: Point,
        keep_aspect_ratio: bool,
    ) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        match self.fit_window(corner1, corner2, keep_aspect_ratio) {
            Ok(view) => {
                self.save_view();
                self.commit_view(view);
                Ok(())
            }
            Err(err) => self.reject(err),
        }
    }

    fn fit_window(&self, c1: Point, c2: Point, keep_aspect_ratio: bool) -> Result<SavedView, ZoomError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ZoomError::EmptyDevice);
        }
        let r = Rect::from_points(c1, c2);
        if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) {
            return Err(ZoomError::OutOfRange);
        }
        let x_flat = r.width() < MIN_EXTENT;
        let y_flat = r.height() < MIN_EXTENT;
        if x_flat && y_flat {
            return Err(ZoomError::DegenerateExtents);
        }
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let mut zoom_x = if x_flat { FALLBACK_FACTOR_X } else { w / r.width() };
        let mut zoom_y = if y_flat { FALLBACK_FACTOR_Y } else { h / r.height() };

        // Borders shrink the scale in proportion to the area they take.
        let ratio_x = self.usable_width() / w;
        let ratio_y = self.usable_height() / h;
        if keep_aspect_ratio {
            let zoom = if zoom_x < zoom_y { zoom_x * ratio_x } else { zoom_y * ratio_y };
            zoom_x = zoom;
            zoom_y = zoom;
        } else {
            zoom_x *= ratio_x;
            zoom_y *= ratio_y;
        }
        if !valid_factor(zoom_x) || !valid_factor(zoom_y) {
            return Err(ZoomError::OutOfRange);
        }
        // A frozen zoom keeps its scale, so centre for that scale.
        if self.zoom_frozen {
            zoom_x = self.factor.x;
            zoom_y = self.factor.y;
        }

        let offset_x = f64::from(self.borders.left) + (self.usable_width() - (r.x0 + r.x1) * zoom_x) / 2.0;
        let offset_y =
            f64::from(self.borders.bottom) + (self.usable_height() - (r.y0 + r.y1) * zoom_y) / 2.0;
        let pixels = [r.x0 * zoom_x, r.x1 * zoom_x, r.y0 * zoom_y, r.y1 * zoom_y, offset_x, offset_y];
        if !pixels.iter().all(|&v| fits_i32(v)) {
            return Err(ZoomError::OutOfRange);
        }
        Ok(SavedView {
            offset_x: to_pixel(offset_x),
            offset_y: to_pixel(offset_y),
            factor: Vec2::new(zoom_x, zoom_y),
        })
    }

    /// Fits the document extents (in the active UCS) into the device.
    ///
    /// With `axis` the UCS origin is kept in view too. Without a document this
    /// does nothing; an empty document is rejected as degenerate.
    pub fn zoom_auto(&mut self, axis: bool, keep_aspect_ratio: bool) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let Some(bounds) = self.with_document(|d| d.bounds()) else {
            return Ok(());
        };
        let Some(bounds) = bounds else {
            return self.reject(ZoomError::DegenerateExtents);
        };
        let container = self.mapper.ucs_bounding_box(bounds);
        self.fit_container(container, axis, keep_aspect_ratio)
    }

    /// Fits the vertical extent of the document's line segments that are at
    /// least partly visible horizontally.
    ///
    /// With `axis` the UCS x axis is kept in view too. Only the vertical scale
    /// and offset change. Without a document this does nothing; an extent
    /// shorter than one drawing unit is rejected as degenerate.
    pub fn zoom_auto_y(&mut self, axis: bool) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let width = f64::from(self.width);
        let mut span: Option<(f64, f64)> = None;
        let visited = self.with_document(|d| {
            d.visit_lines(&mut |line| {
                let a = self.mapper.to_ucs(line.p0);
                let b = self.mapper.to_ucs(line.p1);
                let on_screen = |x: f64| {
                    let gx = self.to_gui_x(x);
                    gx > 0.0 && gx < width
                };
                if on_screen(a.x) || on_screen(b.x) {
                    let (lo, hi) = span.unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
                    span = Some((lo.min(a.y).min(b.y), hi.max(a.y).max(b.y)));
                }
            });
        });
        if visited.is_none() {
            return Ok(());
        }
        let Some((lo, hi)) = span else {
            return self.reject(ZoomError::DegenerateExtents);
        };
        let (lo, hi) = if axis { (lo.min(0.0), hi.max(0.0)) } else { (lo, hi) };
        let extent = hi - lo;
        if extent < 1.0 {
            return self.reject(ZoomError::DegenerateExtents);
        }
        let usable_h = self.usable_height();
        if usable_h <= 0.0 {
            return self.reject(ZoomError::EmptyDevice);
        }
        let fy = usable_h / extent;
        if !valid_factor(fy) {
            return self.reject(ZoomError::OutOfRange);
        }
        if !self.zoom_frozen {
            self.factor.y = fy;
        }
        self.offset_y = self.centered_offset_y(lo, extent);
        self.fire_viewport_changed();
        Ok(())
    }

    /// Fits the document extents together with extra world points.
    pub fn zoom_auto_ensure_points_included(&mut self, world_points: &[Point]) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let bounds = self.with_document(|d| d.bounds()).flatten();
        let mut container = bounds.map(|b| self.mapper.ucs_bounding_box(b));
        for &p in world_points {
            let p = self.mapper.to_ucs(p);
            container = Some(match container {
                Some(r) => r.union_pt(p),
                None => Rect::from_points(p, p),
            });
        }
        match container {
            Some(container) => self.fit_container(container, false, true),
            None => self.reject(ZoomError::DegenerateExtents),
        }
    }

    fn fit_container(&mut self, container: Rect, axis: bool, keep_aspect_ratio: bool) -> Result<(), ZoomError> {
        let container = if axis { container.union_pt(Point::ORIGIN) } else { container };
        let usable_w = self.usable_width();
        let usable_h = self.usable_height();
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return self.reject(ZoomError::EmptyDevice);
        }
        let size_x = container.width();
        let size_y = container.height();
        let (fx, fy) = match (size_x > MIN_EXTENT, size_y > MIN_EXTENT) {
            (false, false) => return self.reject(ZoomError::DegenerateExtents),
            (true, false) => (usable_w / size_x, usable_w / size_x),
            (false, true) => (usable_h / size_y, usable_h / size_y),
            (true, true) => {
                let (fx, fy) = (usable_w / size_x, usable_h / size_y);
                if keep_aspect_ratio {
                    let f = fx.min(fy);
                    (f, f)
                } else {
                    (fx, fy)
                }
            }
        };
        let fx_ok = valid_factor(fx);
        let fy_ok = valid_factor(fy);
        if !fx_ok && !fy_ok {
            return self.reject(ZoomError::OutOfRange);
        }
        let fx = if fx_ok { fx } else { 1.0 };
        let fy = if fy_ok { fy } else { 1.0 };

        self.save_view();
        if !self.zoom_frozen {
            self.factor = Vec2::new(fx, fy);
        }
        tracing::debug!(fx, fy, "fitted extents");
        self.center_offset_x_and_y(container.origin(), container.size().to_vec2());
        Ok(())
    }

    /// Centres a UCS box of the given origin and size in the usable area at
    /// the current scale, and notifies.
    pub fn center_offset_x_and_y(&mut self, min: Point, size: Vec2) {
        self.assert_not_dispatching();
        self.offset_x = self.centered_offset_x(min.x, size.x);
        self.offset_y = self.centered_offset_y(min.y, size.y);
        self.fire_viewport_changed();
    }

    /// Centres horizontally only; see [`Viewport::center_offset_x_and_y`].
    pub fn center_offset_x(&mut self, min_x: f64, size_x: f64) {
        self.assert_not_dispatching();
        self.offset_x = self.centered_offset_x(min_x, size_x);
        self.fire_viewport_changed();
    }

    /// Centres vertically only; see [`Viewport::center_offset_x_and_y`].
    pub fn center_offset_y(&mut self, min_y: f64, size_y: f64) {
        self.assert_not_dispatching();
        self.offset_y = self.centered_offset_y(min_y, size_y);
        self.fire_viewport_changed();
    }

    /// Scrolls horizontally so UCS `x` sits in the middle of the usable area.
    pub fn center_x(&mut self, x: f64) {
        self.assert_not_dispatching();
        let ox = self.usable_width() / 2.0 - x * self.factor.x;
        self.offset_x = to_pixel(ox).saturating_add(self.borders.left);
        self.fire_viewport_changed();
    }

    /// Scrolls vertically so UCS `y` sits in the middle of the usable area.
    pub fn center_y(&mut self, y: f64) {
        self.assert_not_dispatching();
        let oy = self.usable_height() / 2.0 - y * self.factor.y;
        self.offset_y = to_pixel(oy).saturating_add(self.borders.bottom);
        self.fire_viewport_changed();
    }

    fn centered_offset_x(&self, min_x: f64, size_x: f64) -> i32 {
        let fx = self.factor.x;
        to_pixel((self.usable_width() - size_x * fx) / 2.0 - min_x * fx).saturating_add(self.borders.left)
    }

    fn centered_offset_y(&self, min_y: f64, size_y: f64) -> i32 {
        let fy = self.factor.y;
        to_pixel((self.usable_height() - size_y * fy) / 2.0 - min_y * fy).saturating_add(self.borders.bottom)
    }

    /// Shifts the view by a device-pixel delta (`dy` grows downward).
    pub fn zoom_pan(&mut self, dx: i32, dy: i32) {
        self.assert_not_dispatching();
        self.offset_x = self.offset_x.saturating_add(dx);
        self.offset_y = self.offset_y.saturating_sub(dy);
        self.fire_viewport_changed();
    }

    /// Scrolls the view by [`SCROLL_STEP`] pixels.
    pub fn zoom_scroll(&mut self, direction: ScrollDirection) {
        self.assert_not_dispatching();
        match direction {
            ScrollDirection::Up => self.offset_y = self.offset_y.saturating_sub(SCROLL_STEP),
            ScrollDirection::Down => self.offset_y = self.offset_y.saturating_add(SCROLL_STEP),
            ScrollDirection::Left => self.offset_x = self.offset_x.saturating_sub(SCROLL_STEP),
            ScrollDirection::Right => self.offset_x = self.offset_x.saturating_add(SCROLL_STEP),
        }
        self.fire_viewport_changed();
    }

    /// Fits the printable paper area and centres the document extents on it.
    ///
    /// Does nothing without a document.
    pub fn zoom_page(&mut self) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let Some((area, scale, bounds)) =
            self.with_document(|d| (d.print_area_size(), d.paper_scale(), d.bounds()))
        else {
            return Ok(());
        };
        let scale = if valid_factor(scale) { scale } else { 1.0 };
        let paper = Vec2::new(area.width / scale, area.height / scale);
        let factor = self.paper_factor(paper)?;
        if !self.zoom_frozen {
            self.factor = Vec2::new(factor, factor);
        }
        let container = bounds.unwrap_or(Rect::ZERO);
        self.center_offset_x_and_y(container.origin(), container.size().to_vec2());
        Ok(())
    }

    /// Fits the whole sheet, margins included, honouring the paper insertion base.
    ///
    /// The paper's lower-left corner sits at `-insertion_base / paper_scale` in
    /// world coordinates. Does nothing without a document.
    pub fn zoom_page_ex(&mut self) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        let Some((area, margins, unit, scale, base)) = self.with_document(|d| {
            (
                d.print_area_size(),
                d.paper_margins(),
                d.unit(),
                d.paper_scale(),
                d.paper_insertion_base(),
            )
        }) else {
            return Ok(());
        };
        let scale = if valid_factor(scale) { scale } else { 1.0 };
        let margins_w = Unit::convert(margins.left + margins.right, Unit::Millimeter, unit);
        let margins_h = Unit::convert(margins.top + margins.bottom, Unit::Millimeter, unit);
        let paper = Vec2::new((area.width + margins_w) / scale, (area.height + margins_h) / scale);
        let factor = self.paper_factor(paper)?;
        if !self.zoom_frozen {
            self.factor = Vec2::new(factor, factor);
        }
        let Vec2 { x: fx, y: fy } = self.factor;
        let ox = (self.usable_width() - paper.x * fx) / 2.0 + base.x * fx / scale;
        let oy = (self.usable_height() - paper.y * fy) / 2.0 + base.y * fy / scale;
        self.offset_x = to_pixel(ox).saturating_add(self.borders.left);
        self.offset_y = to_pixel(oy).saturating_add(self.borders.bottom);
        self.fire_viewport_changed();
        Ok(())
    }

    fn paper_factor(&self, paper: Vec2) -> Result<f64, ZoomError> {
        let usable_w = self.usable_width();
        let usable_h = self.usable_height();
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return self.reject(ZoomError::EmptyDevice);
        }
        let fx = if paper.x > MIN_EXTENT { usable_w / paper.x } else { 1.0 };
        let fy = if paper.y > MIN_EXTENT { usable_h / paper.y } else { 1.0 };
        let f = fx.min(fy);
        Ok(if valid_factor(f) { f } else { 1.0 })
    }

    /// Moves the paper under a fixed drawing by a device-pixel delta.
    ///
    /// Only the document's paper insertion base changes; the drawing stays
    /// where it is on screen.
    pub fn move_paper(&mut self, dx: i32, dy: i32) {
        self.assert_not_dispatching();
        let Vec2 { x: fx, y: fy } = self.factor;
        let moved = self.with_document_mut(|d| {
            let scale = d.paper_scale();
            let delta = Vec2::new(f64::from(dx) / fx, -f64::from(dy) / fy) * scale;
            let base = d.paper_insertion_base() - delta;
            d.set_paper_insertion_base(base);
        });
        if moved.is_some() {
            self.fire_viewport_changed();
        }
    }

    /// Sets the document's paper scale and refits the sheet.
    pub fn set_paper_scale(&mut self, scale: f64) -> Result<(), ZoomError> {
        self.assert_not_dispatching();
        if !valid_factor(scale) {
            return self.reject(ZoomError::InvalidFactor(scale));
        }
        self.with_document_mut(|d| d.set_paper_scale(scale));
        self.zoom_page_ex()
    }

    // --- history ---

    /// Scale and offset currently shown.
    #[must_use]
    pub fn current_view(&self) -> SavedView {
        SavedView {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            factor: self.factor,
        }
    }

    /// Returns the history of previous views.
    #[must_use]
    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    /// Pushes the current view onto the history.
    ///
    /// Marks the document modified when configured to, even if the save itself
    /// is debounced.
    pub fn save_view(&mut self) {
        self.assert_not_dispatching();
        if self.config.modify_on_zoom {
            self.with_document_mut(|d| d.set_modified(true));
        }
        let view = self.current_view();
        match self.history.save(view, self.clock.now()) {
            SaveOutcome::Saved { became_available } => {
                tracing::trace!(depth = self.history.len(), "saved view");
                if became_available {
                    self.dispatch(ViewportEvent::PreviousZoomAvailable(true));
                }
            }
            SaveOutcome::Debounced => tracing::trace!("view save debounced"),
        }
    }

    /// Pops and shows the most recently saved view.
    ///
    /// Returns `false` if the history is empty.
    pub fn restore_view(&mut self) -> bool {
        self.assert_not_dispatching();
        let Some(view) = self.history.restore() else {
            return false;
        };
        self.offset_x = view.offset_x;
        self.offset_y = view.offset_y;
        self.factor = view.factor;
        self.fire_viewport_changed();
        if self.history.is_empty() {
            self.dispatch(ViewportEvent::PreviousZoomAvailable(false));
        }
        true
    }

    /// Restores the previous view if a document is attached.
    pub fn zoom_previous(&mut self) -> bool {
        self.document.is_some() && self.restore_view()
    }

    fn commit_view(&mut self, view: SavedView) {
        self.offset_x = view.offset_x;
        self.offset_y = view.offset_y;
        if !self.zoom_frozen {
            self.factor = view.factor;
        }
        self.fire_viewport_changed();
    }

    pub(crate) fn reject<T>(&self, err: ZoomError) -> Result<T, ZoomError> {
        self.report(&err);
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use kurbo::{Line, Point, Rect, Vec2};

    use crate::clock::ManualClock;
    use crate::config::ViewportConfig;
    use crate::document::Drawing;
    use crate::error::ZoomError;
    use crate::viewport::{Borders, Viewport};

    fn viewport(w: i32, h: i32) -> Viewport {
        let mut vp = Viewport::with_clock(ViewportConfig::default(), Box::new(ManualClock::new()));
        vp.set_size(w, h);
        vp
    }

    #[test]
    fn window_keeps_aspect_with_smaller_scale() {
        let mut vp = viewport(800, 600);
        vp.zoom_window(Point::new(100.0, 50.0), Point::new(0.0, 0.0), true).unwrap();
        assert_eq!(vp.factor(), Vec2::new(8.0, 8.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 100));
    }

    #[test]
    fn window_without_aspect_scales_axes_independently() {
        let mut vp = viewport(800, 600);
        vp.zoom_window(Point::new(0.0, 0.0), Point::new(100.0, 50.0), false).unwrap();
        assert_eq!(vp.factor(), Vec2::new(8.0, 12.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 0));
    }

    #[test]
    fn flat_window_uses_fallback_on_flat_axis() {
        let mut vp = viewport(800, 600);
        vp.zoom_window(Point::new(0.0, 0.0), Point::new(100.0, 0.0), false).unwrap();
        assert_eq!(vp.factor(), Vec2::new(8.0, 640.0));
    }

    #[test]
    fn point_window_is_rejected_without_mutation() {
        let mut vp = viewport(800, 600);
        vp.just_set_offset_and_factor(3, 4, 2.0);
        let p = Point::new(5.0, 5.0);
        assert_eq!(vp.zoom_window(p, p, true), Err(ZoomError::DegenerateExtents));
        assert_eq!(vp.factor(), Vec2::new(2.0, 2.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (3, 4));
        assert!(vp.history().is_empty());
    }

    #[test]
    fn huge_window_offsets_are_rejected() {
        let mut vp = viewport(800, 600);
        let far = Point::new(1e12, 1e12);
        let err = vp.zoom_window(far, far + Vec2::new(1e-3, 1e-3), true);
        assert_eq!(err, Err(ZoomError::OutOfRange));
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn zoom_in_keeps_center_fixed() {
        let mut vp = viewport(800, 600);
        vp.zoom_in(2.0, None).unwrap();
        assert_eq!(vp.factor(), Vec2::new(2.0, 2.0));
        let center = vp.to_ucs_from_gui(400.0, 300.0);
        assert!((center - Point::new(400.0, 300.0)).hypot() < 1e-9, "{center:?}");
    }

    #[test]
    fn zoom_rejects_tiny_factors() {
        let mut vp = viewport(800, 600);
        assert_eq!(vp.zoom_in(1e-9, None), Err(ZoomError::InvalidFactor(1e-9)));
        assert_eq!(vp.zoom_out(0.0, None), Err(ZoomError::InvalidFactor(0.0)));
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn zoom_auto_centres_extents_inside_borders() {
        let mut vp = viewport(120, 120);
        vp.set_borders(Borders::uniform(10));
        let (_, doc) = Drawing::with_bounds(Rect::new(0.0, 0.0, 50.0, 25.0)).into_shared();
        vp.set_document(doc);
        vp.zoom_auto(false, true).unwrap();
        assert_eq!(vp.factor(), Vec2::new(2.0, 2.0));
        assert_eq!(vp.offset_x(), 10);
        assert_eq!(vp.offset_y(), 35);
    }

    #[test]
    fn zoom_auto_with_axis_includes_origin() {
        let mut vp = viewport(100, 100);
        let (_, doc) = Drawing::with_bounds(Rect::new(50.0, 50.0, 100.0, 100.0)).into_shared();
        vp.set_document(doc);
        vp.zoom_auto(true, true).unwrap();
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 0));
    }

    #[test]
    fn pan_and_scroll_move_offsets() {
        let mut vp = viewport(100, 100);
        vp.zoom_pan(5, 7);
        assert_eq!((vp.offset_x(), vp.offset_y()), (5, -7));
        vp.zoom_scroll(super::ScrollDirection::Up);
        vp.zoom_scroll(super::ScrollDirection::Right);
        assert_eq!((vp.offset_x(), vp.offset_y()), (55, -57));
    }

    #[test]
    fn zoom_page_fits_print_area() {
        let mut vp = viewport(400, 300);
        let mut drawing = Drawing::with_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        drawing.print_area = kurbo::Size::new(200.0, 100.0);
        drawing.paper_scale = 2.0;
        let (_, doc) = drawing.into_shared();
        vp.set_document(doc);
        vp.zoom_page().unwrap();
        // Paper is 100 x 50 drawing units: min(400 / 100, 300 / 50) = 4.
        assert_eq!(vp.factor(), Vec2::new(4.0, 4.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, -50));
    }

    #[test]
    fn zoom_page_ex_includes_margins_and_base() {
        let mut vp = viewport(400, 400);
        let mut drawing = Drawing::new();
        drawing.print_area = kurbo::Size::new(80.0, 80.0);
        drawing.margins = crate::document::PaperMargins {
            left: 10.0,
            top: 10.0,
            right: 10.0,
            bottom: 10.0,
        };
        drawing.insertion_base = Point::new(10.0, 0.0);
        let (_, doc) = drawing.into_shared();
        vp.set_document(doc);
        vp.zoom_page_ex().unwrap();
        assert_eq!(vp.factor(), Vec2::new(4.0, 4.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (40, 0));
    }

    #[test]
    fn frozen_window_fit_centres_for_retained_scale() {
        let mut vp = viewport(800, 600);
        vp.set_factor(2.0);
        vp.freeze_zoom(true);
        vp.zoom_window(Point::new(0.0, 0.0), Point::new(100.0, 50.0), true).unwrap();
        assert_eq!(vp.factor(), Vec2::new(2.0, 2.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (300, 250));
        assert_eq!(vp.ucs_to_gui(Point::new(50.0, 25.0)), Point::new(400.0, 300.0));
    }

    #[test]
    fn zoom_out_reports_the_factor_it_was_given() {
        let mut vp = viewport(800, 600);
        assert_eq!(vp.zoom_out(1e7, None), Err(ZoomError::InvalidFactor(1e7)));
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
        vp.zoom_out(2.0, None).unwrap();
        assert_eq!(vp.factor(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn per_axis_zoom_keeps_device_centre() {
        let mut vp = viewport(800, 600);
        vp.zoom_in_x(2.0).unwrap();
        assert_eq!(vp.factor(), Vec2::new(2.0, 1.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (-400, 0));
        assert_eq!(vp.to_gui_x(400.0), 400.0);

        vp.zoom_in_y(4.0).unwrap();
        assert_eq!(vp.factor(), Vec2::new(2.0, 4.0));
        assert_eq!(vp.offset_y(), -900);
        assert_eq!(vp.to_gui_y(300.0), 300.0);

        vp.zoom_out_x(2.0).unwrap();
        vp.zoom_out_y(4.0).unwrap();
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 0));
    }

    #[test]
    fn per_axis_zoom_out_rejects_tiny_and_huge_factors() {
        let mut vp = viewport(800, 600);
        assert_eq!(vp.zoom_out_x(1e-9), Err(ZoomError::InvalidFactor(1e-9)));
        assert_eq!(vp.zoom_out_y(1e7), Err(ZoomError::InvalidFactor(1e7)));
        assert_eq!(vp.zoom_in_x(0.0), Err(ZoomError::InvalidFactor(0.0)));
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn per_axis_zoom_is_ignored_while_frozen() {
        let mut vp = viewport(800, 600);
        vp.freeze_zoom(true);
        vp.zoom_in_y(3.0).unwrap();
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 0));
    }

    #[test]
    fn zoom_auto_y_fits_lines_visible_across() {
        let mut vp = viewport(800, 600);
        let mut drawing = Drawing::new();
        drawing.lines = alloc::vec![
            Line::new((0.0, 0.0), (100.0, 10.0)),
            Line::new((200.0, -20.0), (300.0, 30.0)),
            // Entirely right of the device; ignored.
            Line::new((1000.0, 500.0), (1200.0, 900.0)),
        ];
        let (_, doc) = drawing.into_shared();
        vp.set_document(doc);
        vp.zoom_auto_y(false).unwrap();
        assert_eq!(vp.factor(), Vec2::new(1.0, 12.0));
        assert_eq!(vp.offset_y(), 240);
        assert_eq!(vp.to_gui_y(30.0), 0.0);
        assert_eq!(vp.to_gui_y(-20.0), 600.0);
    }

    #[test]
    fn zoom_auto_y_with_axis_includes_zero() {
        let mut vp = viewport(800, 600);
        let mut drawing = Drawing::new();
        drawing.lines = alloc::vec![Line::new((10.0, 20.0), (50.0, 50.0))];
        let (_, doc) = drawing.into_shared();
        vp.set_document(doc);
        vp.zoom_auto_y(true).unwrap();
        assert_eq!(vp.factor(), Vec2::new(1.0, 12.0));
        assert_eq!(vp.offset_y(), 0);
    }

    #[test]
    fn zoom_auto_y_without_visible_lines_is_degenerate() {
        let mut vp = viewport(800, 600);
        let (_, doc) = Drawing::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)).into_shared();
        vp.set_document(doc);
        assert_eq!(vp.zoom_auto_y(false), Err(ZoomError::DegenerateExtents));
        assert_eq!(vp.factor(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn center_x_and_y_put_coordinate_mid_device() {
        let mut vp = viewport(800, 600);
        vp.set_factor(2.0);
        vp.center_x(100.0);
        vp.center_y(50.0);
        assert_eq!((vp.offset_x(), vp.offset_y()), (200, 200));
        assert_eq!(vp.ucs_to_gui(Point::new(100.0, 50.0)), Point::new(400.0, 300.0));
    }

    #[test]
    fn move_paper_shifts_insertion_base_only() {
        let mut vp = viewport(400, 400);
        let (drawing, doc) = Drawing::new().into_shared();
        vp.set_document(doc);
        vp.set_factor(2.0);
        vp.move_paper(10, -4);
        assert_eq!(drawing.borrow().insertion_base, Point::new(-5.0, -2.0));
        assert_eq!((vp.offset_x(), vp.offset_y()), (0, 0));
    }
}
