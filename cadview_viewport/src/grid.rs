// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid collaborator.
//!
//! The viewport does not draw a grid; it tells one when its cached lattice is
//! stale and asks it for snap points. Snap points are computed in UCS
//! coordinates.

use cadview_ucs::IsoView;
use kurbo::{Point, Vec2};

/// Grid parameters read from the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    /// Lattice spacing on each axis, in UCS units. For isometric grids only
    /// `x` is used, as the length of a lattice edge.
    pub spacing: Vec2,
    /// Whether the lattice is isometric.
    pub isometric: bool,
    /// Which face an isometric lattice presents.
    pub iso_view: IsoView,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: Vec2::new(10.0, 10.0),
            isometric: false,
            iso_view: IsoView::Top,
        }
    }
}

/// What a viewport needs from a grid.
pub trait Grid {
    /// Replaces the grid parameters.
    fn load_settings(&mut self, settings: &GridSettings);
    /// Marks the cached lattice stale; `grid_on` reports whether the grid is
    /// shown at all.
    fn invalidate(&mut self, grid_on: bool);
    /// Returns the lattice point nearest to `ucs_point`.
    fn snap_grid(&self, ucs_point: Point) -> Point;
    /// Returns `true` for an isometric lattice.
    fn is_isometric(&self) -> bool;
    /// Returns the face an isometric lattice presents.
    fn iso_view(&self) -> IsoView;
}

/// A rectangular or isometric snapping lattice.
#[derive(Clone, Debug, Default)]
pub struct SnapGrid {
    settings: GridSettings,
    visible: bool,
    valid: bool,
    invalidations: u64,
}

impl SnapGrid {
    /// Creates a grid with the given settings.
    #[must_use]
    pub fn new(settings: GridSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Whether the last invalidation reported the grid as shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the cached lattice is current.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Marks the cached lattice as rebuilt.
    pub fn mark_valid(&mut self) {
        self.valid = true;
    }

    /// How many times the grid has been invalidated.
    #[must_use]
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations
    }

    fn snap_orthogonal(&self, p: Point) -> Point {
        let s = self.settings.spacing;
        Point::new(snap_axis(p.x, s.x), snap_axis(p.y, s.y))
    }

    // Isometric lattice points are `(k * w, m * h)` with `k` and `m` of equal
    // parity, where `w = edge * cos 30°` and `h = edge / 2`.
    fn snap_isometric(&self, p: Point) -> Point {
        let edge = self.settings.spacing.x.abs();
        if edge.is_nan() || edge <= 0.0 {
            return p;
        }
        let w = edge * 0.5 * libm::sqrt(3.0);
        let h = edge * 0.5;
        let k0 = libm::round(p.x / w);
        let mut best = p;
        let mut best_dist = f64::INFINITY;
        for k in [k0 - 1.0, k0, k0 + 1.0] {
            let parity = libm::fabs(k % 2.0);
            let m = 2.0 * libm::round((p.y / h - parity) / 2.0) + parity;
            let candidate = Point::new(k * w, m * h);
            let d = candidate.distance_squared(p);
            if d < best_dist {
                best = candidate;
                best_dist = d;
            }
        }
        best
    }
}

fn snap_axis(v: f64, spacing: f64) -> f64 {
    let spacing = spacing.abs();
    if spacing > 0.0 {
        libm::round(v / spacing) * spacing
    } else {
        v
    }
}

impl Grid for SnapGrid {
    fn load_settings(&mut self, settings: &GridSettings) {
        self.settings = *settings;
        self.valid = false;
    }

    fn invalidate(&mut self, grid_on: bool) {
        self.visible = grid_on;
        self.valid = false;
        self.invalidations += 1;
    }

    fn snap_grid(&self, ucs_point: Point) -> Point {
        if self.settings.isometric {
            self.snap_isometric(ucs_point)
        } else {
            self.snap_orthogonal(ucs_point)
        }
    }

    fn is_isometric(&self) -> bool {
        self.settings.isometric
    }

    fn iso_view(&self) -> IsoView {
        self.settings.iso_view
    }
}
