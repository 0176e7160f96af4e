// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{Point, Vec2};

/// Distances shorter than this are treated as zero.
pub const DISTANCE_TOLERANCE: f64 = 1e-10;

/// Angles (radians) smaller than this are treated as zero.
pub const ANGLE_TOLERANCE: f64 = 1e-8;

/// Returns `true` if `angle` is far enough from zero to rotate anything.
#[must_use]
pub fn is_meaningful_angle(angle: f64) -> bool {
    angle.abs() >= ANGLE_TOLERANCE
}

/// Returns `true` if `a` and `b` are distinct points.
#[must_use]
pub fn is_meaningful_distance(a: Point, b: Point) -> bool {
    a.distance(b) >= DISTANCE_TOLERANCE
}

/// Returns `true` if two angles describe the same direction.
///
/// The comparison is done modulo a full turn, so `0` and `2π` compare equal.
#[must_use]
pub fn is_same_angle(a: f64, b: f64) -> bool {
    let diff = ((a - b) % TAU).abs();
    diff < ANGLE_TOLERANCE || TAU - diff < ANGLE_TOLERANCE
}

/// Which pair of isometric axes an isometric grid presents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum IsoView {
    /// Left face of the isometric cube.
    Left,
    /// Top face of the isometric cube.
    #[default]
    Top,
    /// Right face of the isometric cube.
    Right,
}

/// Orthographic classification of a UCS, as stored with named UCS entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OrthoType {
    /// A plain (non-isometric) frame.
    #[default]
    NonOrtho,
    /// Isometric, left face.
    Left,
    /// Isometric, right face.
    Right,
    /// Isometric, top face.
    Top,
}

impl OrthoType {
    /// Classifies an `(isometric, iso_view)` pair.
    ///
    /// The iso view is ignored for non-isometric frames.
    #[must_use]
    pub fn from_iso(isometric: bool, iso_view: IsoView) -> Self {
        if !isometric {
            return Self::NonOrtho;
        }
        match iso_view {
            IsoView::Left => Self::Left,
            IsoView::Top => Self::Top,
            IsoView::Right => Self::Right,
        }
    }

    /// Returns the iso view for isometric types, `None` for [`OrthoType::NonOrtho`].
    #[must_use]
    pub fn iso_view(self) -> Option<IsoView> {
        match self {
            Self::NonOrtho => None,
            Self::Left => Some(IsoView::Left),
            Self::Top => Some(IsoView::Top),
            Self::Right => Some(IsoView::Right),
        }
    }
}

/// A user coordinate system: a translated and rotated frame over world space.
///
/// `Ucs` is a plain value. Viewports build transient instances on every frame
/// change; a [`UcsRegistry`](crate::UcsRegistry) interns the ones a user wants
/// to keep and hands back a stable id.
///
/// The x-axis direction is the counter-clockwise angle (radians) of the UCS
/// x axis measured in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ucs {
    origin: Point,
    x_axis_direction: f64,
    isometric: bool,
    iso_view: IsoView,
}

impl Default for Ucs {
    fn default() -> Self {
        Self::WCS
    }
}

impl Ucs {
    /// The world coordinate system expressed as a UCS (identity frame).
    pub const WCS: Self = Self {
        origin: Point::ORIGIN,
        x_axis_direction: 0.0,
        isometric: false,
        iso_view: IsoView::Top,
    };

    /// Creates a non-isometric UCS.
    #[must_use]
    pub fn new(origin: Point, x_axis_direction: f64) -> Self {
        Self {
            origin,
            x_axis_direction,
            isometric: false,
            iso_view: IsoView::Top,
        }
    }

    /// Creates a UCS with explicit isometric settings.
    #[must_use]
    pub fn with_iso(origin: Point, x_axis_direction: f64, isometric: bool, iso_view: IsoView) -> Self {
        Self {
            origin,
            x_axis_direction,
            isometric,
            iso_view,
        }
    }

    /// Returns the UCS origin in world coordinates.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the direction of the x axis in world space (radians).
    #[must_use]
    pub fn x_axis_direction(&self) -> f64 {
        self.x_axis_direction
    }

    /// Returns `true` if the UCS drives an isometric grid.
    #[must_use]
    pub fn is_isometric(&self) -> bool {
        self.isometric
    }

    /// Returns the isometric view.
    ///
    /// Only meaningful when [`Ucs::is_isometric`] is `true`.
    #[must_use]
    pub fn iso_view(&self) -> IsoView {
        self.iso_view
    }

    /// Returns the orthographic classification of this UCS.
    #[must_use]
    pub fn ortho_type(&self) -> OrthoType {
        OrthoType::from_iso(self.isometric, self.iso_view)
    }

    /// Unit vector of the x axis in world space.
    #[must_use]
    pub fn x_axis(&self) -> Vec2 {
        Vec2::from_angle(self.x_axis_direction)
    }

    /// Unit vector of the y axis in world space.
    #[must_use]
    pub fn y_axis(&self) -> Vec2 {
        Vec2::from_angle(self.x_axis_direction + FRAC_PI_2)
    }

    /// Returns `true` if the frame differs from the world frame, i.e. it is
    /// rotated or its origin is moved away from the world origin.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        is_custom_frame(self.origin, self.x_axis_direction)
    }

    /// Returns `true` if this UCS is equivalent to the world coordinate system.
    #[must_use]
    pub fn is_wcs(&self) -> bool {
        self.is_same_as(&Self::WCS)
    }

    /// Structural equality used for interning.
    ///
    /// Origins must be within [`DISTANCE_TOLERANCE`], directions within
    /// [`ANGLE_TOLERANCE`] (modulo a full turn), isometric flags equal and, for
    /// isometric frames, iso views equal.
    #[must_use]
    pub fn is_same_as(&self, other: &Self) -> bool {
        !is_meaningful_distance(self.origin, other.origin)
            && is_same_angle(self.x_axis_direction, other.x_axis_direction)
            && self.ortho_type() == other.ortho_type()
    }
}

/// Returns `true` if a frame with this origin and x-axis direction is
/// distinguishable from the world frame.
#[must_use]
pub fn is_custom_frame(origin: Point, x_axis_direction: f64) -> bool {
    is_meaningful_angle(x_axis_direction) || is_meaningful_distance(origin, Point::ORIGIN)
}
