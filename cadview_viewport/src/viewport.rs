// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport state and the world ↔ UCS ↔ device mapping.
//!
//! The mapping from a UCS point to a device pixel is
//!
//! ```text
//! gui.x = ucs.x * factor.x + offset_x
//! gui.y = height - (ucs.y * factor.y + offset_y)
//! ```
//!
//! so `offset_y` is measured from the bottom edge and device `y` grows
//! downward. [`Viewport::ucs_to_gui`] and [`Viewport::gui_to_ucs`] are the only
//! places that flip.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::ToString;
use core::fmt;

use cadview_ucs::{CoordinateMapper, angles};
use kurbo::{Point, Rect, Vec2};

use crate::clock::Clock;
use crate::config::{SettingsSource, ViewportConfig};
use crate::document::{Document, SharedDocument};
use crate::error::{ConfigError, ZoomError};
use crate::grid::{Grid, SnapGrid};
use crate::history::ViewHistory;
use crate::listener::{
    CommandMessenger, ListenerList, RedrawMethod, ViewportEvent, ViewportListener,
};

/// Device-pixel margins kept free of content by fit operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Borders {
    /// Left border.
    pub left: i32,
    /// Top border.
    pub top: i32,
    /// Right border.
    pub right: i32,
    /// Bottom border.
    pub bottom: i32,
}

impl Borders {
    /// Same border on every side.
    #[must_use]
    pub fn uniform(border: i32) -> Self {
        Self {
            left: border,
            top: border,
            right: border,
            bottom: border,
        }
    }
}

/// A 2D CAD view over a document.
///
/// A `Viewport` owns the scale and pixel offset that place UCS coordinates
/// on a device of `width × height` pixels, the active UCS frame, the history
/// of previous views and the relative-zero marker. It shares its document
/// with other viewports and notifies registered listeners on every change.
///
/// Every mutating method must be called from outside listener callbacks.
pub struct Viewport {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) factor: Vec2,
    pub(crate) offset_x: i32,
    pub(crate) offset_y: i32,
    pub(crate) borders: Borders,
    pub(crate) zoom_frozen: bool,
    pub(crate) mapper: CoordinateMapper,
    pub(crate) config: ViewportConfig,
    pub(crate) history: ViewHistory,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) document: Option<SharedDocument>,
    pub(crate) grid: Box<dyn Grid>,
    pub(crate) listeners: ListenerList,
    pub(crate) messenger: Option<Rc<dyn CommandMessenger>>,
    pub(crate) relative_zero: Point,
    pub(crate) marked_relative_zero: Point,
    pub(crate) relative_zero_locked: bool,
    pub(crate) relative_zero_hidden: bool,
    pub(crate) print_preview: bool,
    pub(crate) printing: bool,
    pub(crate) panning: bool,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("factor", &self.factor)
            .field("offset_x", &self.offset_x)
            .field("offset_y", &self.offset_y)
            .field("borders", &self.borders)
            .field("zoom_frozen", &self.zoom_frozen)
            .field("mapper", &self.mapper)
            .field("config", &self.config)
            .field("history", &self.history)
            .field("has_document", &self.document.is_some())
            .field("listeners", &self.listeners)
            .field("relative_zero", &self.relative_zero)
            .field("print_preview", &self.print_preview)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    /// Creates a viewport timed by the system clock.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self::with_clock(config, Box::new(crate::clock::StdClock::default()))
    }

    /// Creates a viewport timed by `clock`.
    ///
    /// The viewport starts with a zero-sized device, unit scale, zero offset,
    /// no document and a default [`SnapGrid`].
    #[must_use]
    pub fn with_clock(config: ViewportConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            width: 0,
            height: 0,
            factor: Vec2::new(1.0, 1.0),
            offset_x: 0,
            offset_y: 0,
            borders: Borders::default(),
            zoom_frozen: false,
            mapper: CoordinateMapper::new(),
            config,
            history: ViewHistory::new(),
            clock,
            document: None,
            grid: Box::new(SnapGrid::default()),
            listeners: ListenerList::new(),
            messenger: None,
            relative_zero: Point::ORIGIN,
            marked_relative_zero: Point::ORIGIN,
            relative_zero_locked: false,
            relative_zero_hidden: false,
            print_preview: false,
            printing: false,
            panning: false,
        }
    }

    // --- collaborators ---

    /// Attaches the document to show.
    pub fn set_document(&mut self, document: SharedDocument) {
        self.assert_not_dispatching();
        self.document = Some(document);
    }

    /// Returns the attached document.
    #[must_use]
    pub fn document(&self) -> Option<&SharedDocument> {
        self.document.as_ref()
    }

    /// Replaces the grid.
    pub fn set_grid(&mut self, grid: Box<dyn Grid>) {
        self.assert_not_dispatching();
        self.grid = grid;
    }

    /// Returns the grid.
    #[must_use]
    pub fn grid(&self) -> &dyn Grid {
        &*self.grid
    }

    /// Sets the sink for user-facing messages.
    pub fn set_messenger(&mut self, messenger: Option<Rc<dyn CommandMessenger>>) {
        self.messenger = messenger;
    }

    /// Registers `listener`. Registering a handle twice delivers every event twice.
    pub fn add_listener(&mut self, listener: Rc<dyn ViewportListener>) {
        self.assert_not_dispatching();
        self.listeners.add(listener);
    }

    /// Removes the first registration of `listener`; returns `false` if absent.
    pub fn remove_listener(&mut self, listener: &Rc<dyn ViewportListener>) -> bool {
        self.assert_not_dispatching();
        self.listeners.remove(listener)
    }

    // --- configuration ---

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: ViewportConfig) {
        self.config = config;
    }

    /// Reloads configuration from `source` and refreshes the grid settings.
    pub fn load_settings(&mut self, source: &dyn SettingsSource) -> Result<(), ConfigError> {
        self.assert_not_dispatching();
        self.config.apply_settings(source)?;
        self.load_grid_settings();
        Ok(())
    }

    // --- device ---

    /// Sets the device size in pixels. Does not notify.
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.assert_not_dispatching();
        self.width = width.max(0);
        self.height = height.max(0);
    }

    /// Device width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Device height in pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Sets the borders kept free by fit operations.
    pub fn set_borders(&mut self, borders: Borders) {
        self.assert_not_dispatching();
        self.borders = borders;
    }

    /// Returns the borders.
    #[must_use]
    pub fn borders(&self) -> Borders {
        self.borders
    }

    pub(crate) fn usable_width(&self) -> f64 {
        f64::from(self.width - self.borders.left - self.borders.right)
    }

    pub(crate) fn usable_height(&self) -> f64 {
        f64::from(self.height - self.borders.top - self.borders.bottom)
    }

    // --- scale and offset ---

    /// Pixels per UCS unit on each axis.
    #[must_use]
    pub fn factor(&self) -> Vec2 {
        self.factor
    }

    /// Horizontal pixel offset.
    #[must_use]
    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    /// Vertical pixel offset, measured from the bottom edge.
    #[must_use]
    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    /// Sets both factors to `|f|` and notifies. Ignored while zoom is frozen.
    pub fn set_factor(&mut self, f: f64) {
        self.assert_not_dispatching();
        if self.zoom_frozen {
            return;
        }
        self.factor = Vec2::new(f.abs(), f.abs());
        self.fire_viewport_changed();
    }

    /// Sets the horizontal factor to `|f|` and notifies. Ignored while zoom is frozen.
    pub fn set_factor_x(&mut self, f: f64) {
        self.assert_not_dispatching();
        if self.zoom_frozen {
            return;
        }
        self.factor.x = f.abs();
        self.fire_viewport_changed();
    }

    /// Sets the vertical factor to `|f|` and notifies. Ignored while zoom is frozen.
    pub fn set_factor_y(&mut self, f: f64) {
        self.assert_not_dispatching();
        if self.zoom_frozen {
            return;
        }
        self.factor.y = f.abs();
        self.fire_viewport_changed();
    }

    /// Sets both offsets and notifies.
    pub fn set_offset(&mut self, offset_x: i32, offset_y: i32) {
        self.assert_not_dispatching();
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self.fire_viewport_changed();
    }

    /// Sets the horizontal offset and notifies.
    pub fn set_offset_x(&mut self, offset_x: i32) {
        self.set_offset(offset_x, self.offset_y);
    }

    /// Sets the vertical offset and notifies.
    pub fn set_offset_y(&mut self, offset_y: i32) {
        self.set_offset(self.offset_x, offset_y);
    }

    /// Sets offsets and a uniform factor at once, notifying once.
    ///
    /// The factor is left alone while zoom is frozen.
    pub fn set_offset_and_factor(&mut self, offset_x: i32, offset_y: i32, factor: f64) {
        self.assert_not_dispatching();
        self.just_set_offset_and_factor(offset_x, offset_y, factor);
        self.fire_viewport_changed();
    }

    /// Like [`Viewport::set_offset_and_factor`] without notifying.
    pub fn just_set_offset_and_factor(&mut self, offset_x: i32, offset_y: i32, factor: f64) {
        self.assert_not_dispatching();
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        if !self.zoom_frozen {
            self.factor = Vec2::new(factor.abs(), factor.abs());
        }
    }

    /// Freezes or unfreezes the scale.
    pub fn freeze_zoom(&mut self, frozen: bool) {
        self.zoom_frozen = frozen;
    }

    /// Returns `true` while the scale is frozen.
    #[must_use]
    pub fn is_zoom_frozen(&self) -> bool {
        self.zoom_frozen
    }

    // --- flags ---

    /// Switches print preview mode.
    pub fn set_print_preview(&mut self, on: bool) {
        self.print_preview = on;
    }

    /// Returns `true` in print preview mode.
    #[must_use]
    pub fn is_print_preview(&self) -> bool {
        self.print_preview
    }

    /// Marks the view as rendering for print.
    pub fn set_printing(&mut self, on: bool) {
        self.printing = on;
    }

    /// Returns `true` while rendering for print.
    #[must_use]
    pub fn is_printing(&self) -> bool {
        self.printing
    }

    /// Marks an interactive pan in progress.
    pub fn set_panning(&mut self, on: bool) {
        self.panning = on;
    }

    /// Returns `true` while an interactive pan is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Returns `true` if the document shows its grid.
    #[must_use]
    pub fn is_grid_on(&self) -> bool {
        self.with_document(|d| d.is_grid_on()).unwrap_or(false)
    }

    /// Returns `true` if the grid is isometric.
    #[must_use]
    pub fn is_grid_isometric(&self) -> bool {
        self.grid.is_isometric()
    }

    // --- world ↔ UCS ---

    /// Returns the world ↔ UCS mapper.
    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Returns `true` if a UCS other than the world frame is active.
    #[must_use]
    pub fn has_ucs(&self) -> bool {
        self.mapper.has_ucs()
    }

    /// Converts a world point into the active UCS.
    #[must_use]
    pub fn to_ucs(&self, world: Point) -> Point {
        self.mapper.to_ucs(world)
    }

    /// Converts a UCS point into world coordinates.
    #[must_use]
    pub fn to_world(&self, ucs: Point) -> Point {
        self.mapper.to_world(ucs)
    }

    /// Converts an absolute UCS angle into the user's angle basis.
    #[must_use]
    pub fn to_ucs_basis_angle(&self, ucs_abs_angle: f64) -> f64 {
        angles::to_ucs_basis_angle(
            ucs_abs_angle,
            self.config.angles_base,
            self.config.angles_counter_clockwise,
        )
    }

    /// Converts an angle in the user's basis into an absolute UCS angle.
    #[must_use]
    pub fn to_ucs_abs_angle(&self, ucs_basis_angle: f64) -> f64 {
        angles::to_ucs_abs_angle(
            ucs_basis_angle,
            self.config.angles_base,
            self.config.angles_counter_clockwise,
        )
    }

    // --- UCS ↔ device ---

    /// Maps a UCS point to device pixels.
    #[must_use]
    pub fn ucs_to_gui(&self, ucs: Point) -> Point {
        Point::new(
            ucs.x * self.factor.x + f64::from(self.offset_x),
            self.flip(ucs.y * self.factor.y + f64::from(self.offset_y)),
        )
    }

    /// Maps device pixels to a UCS point.
    #[must_use]
    pub fn gui_to_ucs(&self, gui: Point) -> Point {
        Point::new(
            (gui.x - f64::from(self.offset_x)) / self.factor.x,
            (self.flip(gui.y) - f64::from(self.offset_y)) / self.factor.y,
        )
    }

    fn flip(&self, y: f64) -> f64 {
        f64::from(self.height) - y
    }

    /// Device x of a UCS x.
    #[must_use]
    pub fn to_gui_x(&self, ucs_x: f64) -> f64 {
        self.ucs_to_gui(Point::new(ucs_x, 0.0)).x
    }

    /// Device y of a UCS y.
    #[must_use]
    pub fn to_gui_y(&self, ucs_y: f64) -> f64 {
        self.ucs_to_gui(Point::new(0.0, ucs_y)).y
    }

    /// Device length of a horizontal UCS distance.
    #[must_use]
    pub fn to_gui_dx(&self, d: f64) -> f64 {
        d * self.factor.x
    }

    /// Device length of a vertical UCS distance.
    #[must_use]
    pub fn to_gui_dy(&self, d: f64) -> f64 {
        d * self.factor.y
    }

    /// UCS x of a device x.
    #[must_use]
    pub fn to_ucs_x(&self, gui_x: f64) -> f64 {
        self.gui_to_ucs(Point::new(gui_x, 0.0)).x
    }

    /// UCS y of a device y.
    #[must_use]
    pub fn to_ucs_y(&self, gui_y: f64) -> f64 {
        self.gui_to_ucs(Point::new(0.0, gui_y)).y
    }

    /// UCS length of a horizontal device distance.
    #[must_use]
    pub fn to_ucs_dx(&self, d: f64) -> f64 {
        d / self.factor.x
    }

    /// UCS length of a vertical device distance.
    #[must_use]
    pub fn to_ucs_dy(&self, d: f64) -> f64 {
        d / self.factor.y
    }

    /// Maps a world point to device pixels.
    #[must_use]
    pub fn to_gui(&self, world: Point) -> Point {
        self.ucs_to_gui(self.mapper.to_ucs(world))
    }

    /// Maps device pixels to a world point.
    #[must_use]
    pub fn to_world_from_gui(&self, gui: Point) -> Point {
        self.mapper.to_world(self.gui_to_ucs(gui))
    }

    /// Maps device pixels to a UCS point.
    #[must_use]
    pub fn to_ucs_from_gui(&self, gui_x: f64, gui_y: f64) -> Point {
        self.gui_to_ucs(Point::new(gui_x, gui_y))
    }

    /// UCS area covered by the device.
    #[must_use]
    pub fn visible_ucs_rect(&self) -> Rect {
        Rect::from_points(
            self.to_ucs_from_gui(0.0, 0.0),
            self.to_ucs_from_gui(f64::from(self.width), f64::from(self.height)),
        )
    }

    /// Lower-left corner of the visible UCS area.
    #[must_use]
    pub fn ucs_view_left_bottom(&self) -> Point {
        self.visible_ucs_rect().origin()
    }

    /// Upper-right corner of the visible UCS area.
    #[must_use]
    pub fn ucs_view_right_top(&self) -> Point {
        let r = self.visible_ucs_rect();
        Point::new(r.x1, r.y1)
    }

    // --- notification ---

    pub(crate) fn assert_not_dispatching(&self) {
        debug_assert!(
            !self.listeners.is_dispatching(),
            "viewport mutated from inside a listener callback"
        );
    }

    pub(crate) fn dispatch(&self, event: ViewportEvent) {
        self.listeners.dispatch(&event);
    }

    fn invalidate_grid(&mut self) {
        let grid_on = self.is_grid_on();
        self.grid.invalidate(grid_on);
    }

    /// Invalidates the grid, then notifies listeners that scale or offset changed.
    pub fn fire_viewport_changed(&mut self) {
        self.invalidate_grid();
        self.dispatch(ViewportEvent::ViewportChanged);
    }

    /// Invalidates the grid, then notifies listeners of the active UCS.
    pub fn fire_ucs_changed(&mut self, ucs: Option<cadview_ucs::Ucs>) {
        self.invalidate_grid();
        self.dispatch(ViewportEvent::UcsChanged(ucs));
    }

    /// Requests a repaint.
    pub fn fire_redraw_needed(&self, method: RedrawMethod) {
        self.dispatch(ViewportEvent::RedrawNeeded(method));
    }

    /// Requests a full repaint.
    pub fn notify_changed(&self) {
        self.fire_redraw_needed(RedrawMethod::All);
    }

    pub(crate) fn report(&self, err: &ZoomError) {
        tracing::warn!(%err, "view change rejected");
        if let Some(messenger) = &self.messenger {
            messenger.command_message(&err.to_string());
        }
    }

    // --- document access ---

    pub(crate) fn with_document<R>(&self, f: impl FnOnce(&dyn Document) -> R) -> Option<R> {
        self.document.as_ref().map(|doc| f(&*doc.borrow()))
    }

    pub(crate) fn with_document_mut<R>(
        &self,
        f: impl FnOnce(&mut dyn Document) -> R,
    ) -> Option<R> {
        self.document.as_ref().map(|doc| f(&mut *doc.borrow_mut()))
    }
}
