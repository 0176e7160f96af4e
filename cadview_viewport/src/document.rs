// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document collaborator.
//!
//! A viewport reads content extents, paper layout, grid flags and the UCS
//! registry from the document it shows. It writes back only the current UCS,
//! the isometric grid flags, the paper placement and the modified flag.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use cadview_ucs::{IsoView, Ucs, UcsRegistry};
use kurbo::{Line, Point, Rect, Size, Vec2};

use crate::units::Unit;

/// Shared handle to a document; several viewports may show one document.
pub type SharedDocument = Rc<RefCell<dyn Document>>;

/// Paper margins in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaperMargins {
    /// Left margin.
    pub left: f64,
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
}

/// What a viewport needs from the document it shows.
pub trait Document {
    /// World-space extents of the content, or `None` for an empty document.
    fn bounds(&self) -> Option<Rect>;
    /// Calls `f` with each straight line segment of the content, in world
    /// coordinates. Documents without line geometry visit nothing.
    fn visit_lines(&self, _f: &mut dyn FnMut(Line)) {}
    /// Printable paper area (paper size minus margins) in document units.
    fn print_area_size(&self) -> Size;
    /// Paper margins in millimetres.
    fn paper_margins(&self) -> PaperMargins;
    /// Drawing units per paper unit.
    fn paper_scale(&self) -> f64;
    /// Sets the paper scale.
    fn set_paper_scale(&mut self, scale: f64);
    /// Offset of the paper relative to the drawing, in paper units.
    fn paper_insertion_base(&self) -> Point;
    /// Sets the paper insertion base.
    fn set_paper_insertion_base(&mut self, base: Point);
    /// Drawing unit.
    fn unit(&self) -> Unit;
    /// Whether the grid is shown.
    fn is_grid_on(&self) -> bool;
    /// Grid spacing in drawing units.
    fn grid_spacing(&self) -> Vec2;
    /// Whether the grid is isometric.
    fn is_isometric_grid(&self) -> bool;
    /// Sets the isometric grid flag.
    fn set_isometric_grid(&mut self, isometric: bool);
    /// Isometric face shown by the grid.
    fn iso_view(&self) -> IsoView;
    /// Sets the isometric face.
    fn set_iso_view(&mut self, view: IsoView);
    /// UCS saved as current with the document; `None` for the world frame.
    fn current_ucs(&self) -> Option<Ucs>;
    /// Records the current UCS.
    fn set_current_ucs(&mut self, ucs: Option<Ucs>);
    /// Named UCS entries of this document.
    fn ucs_registry(&self) -> &UcsRegistry;
    /// Mutable access to the named UCS entries.
    fn ucs_registry_mut(&mut self) -> &mut UcsRegistry;
    /// Marks the document as having unsaved changes.
    fn set_modified(&mut self, modified: bool);
}

/// Plain in-memory [`Document`].
#[derive(Clone, Debug)]
pub struct Drawing {
    /// Content extents.
    pub bounds: Option<Rect>,
    /// Line segments of the content.
    pub lines: Vec<Line>,
    /// Printable area in document units.
    pub print_area: Size,
    /// Paper margins in millimetres.
    pub margins: PaperMargins,
    /// Drawing units per paper unit.
    pub paper_scale: f64,
    /// Paper insertion base.
    pub insertion_base: Point,
    /// Drawing unit.
    pub unit: Unit,
    /// Grid shown.
    pub grid_on: bool,
    /// Grid spacing.
    pub grid_spacing: Vec2,
    /// Isometric grid.
    pub isometric_grid: bool,
    /// Isometric face.
    pub iso_view: IsoView,
    /// Current UCS.
    pub current_ucs: Option<Ucs>,
    /// Unsaved changes.
    pub modified: bool,
    registry: UcsRegistry,
}

impl Default for Drawing {
    fn default() -> Self {
        Self {
            bounds: None,
            lines: Vec::new(),
            print_area: Size::new(210.0, 297.0),
            margins: PaperMargins::default(),
            paper_scale: 1.0,
            insertion_base: Point::ORIGIN,
            unit: Unit::Millimeter,
            grid_on: true,
            grid_spacing: Vec2::new(10.0, 10.0),
            isometric_grid: false,
            iso_view: IsoView::Top,
            current_ucs: None,
            modified: false,
            registry: UcsRegistry::new(),
        }
    }
}

impl Drawing {
    /// Creates an empty drawing with A4 portrait paper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a drawing whose content spans `bounds`.
    #[must_use]
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Wraps the drawing in a [`SharedDocument`] handle, keeping a typed handle too.
    #[must_use]
    pub fn into_shared(self) -> (Rc<RefCell<Self>>, SharedDocument) {
        let typed = Rc::new(RefCell::new(self));
        let shared: SharedDocument = typed.clone();
        (typed, shared)
    }
}

impl Document for Drawing {
    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    fn visit_lines(&self, f: &mut dyn FnMut(Line)) {
        for &line in &self.lines {
            f(line);
        }
    }

    fn print_area_size(&self) -> Size {
        self.print_area
    }

    fn paper_margins(&self) -> PaperMargins {
        self.margins
    }

    fn paper_scale(&self) -> f64 {
        self.paper_scale
    }

    fn set_paper_scale(&mut self, scale: f64) {
        self.paper_scale = scale;
    }

    fn paper_insertion_base(&self) -> Point {
        self.insertion_base
    }

    fn set_paper_insertion_base(&mut self, base: Point) {
        self.insertion_base = base;
    }

    fn unit(&self) -> Unit {
        self.unit
    }

    fn is_grid_on(&self) -> bool {
        self.grid_on
    }

    fn grid_spacing(&self) -> Vec2 {
        self.grid_spacing
    }

    fn is_isometric_grid(&self) -> bool {
        self.isometric_grid
    }

    fn set_isometric_grid(&mut self, isometric: bool) {
        self.isometric_grid = isometric;
    }

    fn iso_view(&self) -> IsoView {
        self.iso_view
    }

    fn set_iso_view(&mut self, view: IsoView) {
        self.iso_view = view;
    }

    fn current_ucs(&self) -> Option<Ucs> {
        self.current_ucs
    }

    fn set_current_ucs(&mut self, ucs: Option<Ucs>) {
        self.current_ucs = ucs;
    }

    fn ucs_registry(&self) -> &UcsRegistry {
        &self.registry
    }

    fn ucs_registry_mut(&mut self) -> &mut UcsRegistry {
        &mut self.registry
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}
