// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

use crate::angles::{axis_direction_to_rotation, rotation_to_axis_direction};

/// World ↔ UCS coordinate mapping.
///
/// A `CoordinateMapper` is either inactive (the UCS is the world frame and
/// every conversion is the identity) or holds a frame given by an origin and an
/// x-axis direction. World points are mapped into the UCS by translating the
/// origin to zero and then rotating by the frame rotation.
///
/// Conversions ignore device scale; they are the part of the viewport
/// transform that snapping and grid code share.
#[derive(Clone, Debug)]
pub struct CoordinateMapper {
    has_ucs: bool,
    origin: Point,
    rotation: f64,
    rotation_vec: Vec2,
    world_to_ucs: Affine,
    ucs_to_world: Affine,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateMapper {
    /// Creates an inactive mapper (UCS == WCS).
    #[must_use]
    pub fn new() -> Self {
        Self {
            has_ucs: false,
            origin: Point::ORIGIN,
            rotation: 0.0,
            rotation_vec: Vec2::new(1.0, 0.0),
            world_to_ucs: Affine::IDENTITY,
            ucs_to_world: Affine::IDENTITY,
        }
    }

    /// Activates a frame with the given world-space origin and x-axis direction.
    pub fn set_frame(&mut self, origin: Point, x_axis_direction: f64) {
        self.origin = origin;
        self.rotation = axis_direction_to_rotation(x_axis_direction);
        self.has_ucs = true;
        self.rebuild_transforms();
    }

    /// Deactivates the frame; subsequent conversions are the identity.
    pub fn clear(&mut self) {
        self.has_ucs = false;
        self.origin = Point::ORIGIN;
        self.rotation = 0.0;
        self.rebuild_transforms();
    }

    /// Copies the frame of another mapper.
    pub fn apply(&mut self, other: &Self) {
        self.has_ucs = other.has_ucs;
        self.origin = other.origin;
        self.rotation = other.rotation;
        self.rebuild_transforms();
    }

    /// Returns `true` if a non-identity frame is active.
    #[must_use]
    pub fn has_ucs(&self) -> bool {
        self.has_ucs
    }

    /// Returns the frame origin in world coordinates.
    #[must_use]
    pub fn ucs_origin(&self) -> Point {
        self.origin
    }

    /// Returns the rotation applied to world points (the negated x-axis direction).
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Returns the direction of the UCS x axis in world space.
    #[must_use]
    pub fn x_axis_direction(&self) -> f64 {
        rotation_to_axis_direction(self.rotation)
    }

    /// Returns the cached world → UCS transform.
    #[must_use]
    pub fn world_to_ucs_transform(&self) -> Affine {
        self.world_to_ucs
    }

    /// Returns the cached UCS → world transform.
    #[must_use]
    pub fn ucs_to_world_transform(&self) -> Affine {
        self.ucs_to_world
    }

    /// Converts a world point into the UCS.
    #[must_use]
    pub fn to_ucs(&self, world: Point) -> Point {
        if self.has_ucs { self.world_to_ucs * world } else { world }
    }

    /// Converts a UCS point into world coordinates.
    #[must_use]
    pub fn to_world(&self, ucs: Point) -> Point {
        if self.has_ucs { self.ucs_to_world * ucs } else { ucs }
    }

    /// Rotates a world-space displacement into the UCS.
    #[must_use]
    pub fn to_ucs_delta(&self, world_delta: Vec2) -> Vec2 {
        if !self.has_ucs {
            return world_delta;
        }
        let Vec2 { x: c, y: s } = self.rotation_vec;
        Vec2::new(world_delta.x * c - world_delta.y * s, world_delta.x * s + world_delta.y * c)
    }

    /// Rotates a UCS displacement into world space.
    #[must_use]
    pub fn to_world_delta(&self, ucs_delta: Vec2) -> Vec2 {
        if !self.has_ucs {
            return ucs_delta;
        }
        let Vec2 { x: c, y: s } = self.rotation_vec;
        Vec2::new(ucs_delta.x * c + ucs_delta.y * s, -ucs_delta.x * s + ucs_delta.y * c)
    }

    /// Converts a world-space angle into the UCS.
    #[must_use]
    pub fn to_ucs_angle(&self, world_angle: f64) -> f64 {
        if self.has_ucs { world_angle + self.rotation } else { world_angle }
    }

    /// Converts a UCS angle into world space.
    #[must_use]
    pub fn to_world_angle(&self, ucs_angle: f64) -> f64 {
        if self.has_ucs { ucs_angle - self.rotation } else { ucs_angle }
    }

    /// Re-expresses a world-space box as an axis-aligned box in the UCS.
    ///
    /// All four corners of `wcs_rect` are mapped, so the result contains the
    /// whole box under any rotation.
    #[must_use]
    pub fn ucs_bounding_box(&self, wcs_rect: Rect) -> Rect {
        if !self.has_ucs {
            return wcs_rect;
        }
        corner_hull(wcs_rect, |p| self.to_ucs(p))
    }

    /// Re-expresses a UCS box as the axis-aligned world box of its corners.
    #[must_use]
    pub fn world_bounding_box(&self, ucs_rect: Rect) -> Rect {
        if !self.has_ucs {
            return ucs_rect;
        }
        corner_hull(ucs_rect, |p| self.to_world(p))
    }

    /// Projects `world` onto the UCS-horizontal line through `base`.
    #[must_use]
    pub fn restrict_horizontal(&self, base: Point, world: Point) -> Point {
        let b = self.to_ucs(base);
        let p = self.to_ucs(world);
        self.to_world(Point::new(p.x, b.y))
    }

    /// Projects `world` onto the UCS-vertical line through `base`.
    #[must_use]
    pub fn restrict_vertical(&self, base: Point, world: Point) -> Point {
        let b = self.to_ucs(base);
        let p = self.to_ucs(world);
        self.to_world(Point::new(b.x, p.y))
    }

    fn rebuild_transforms(&mut self) {
        self.rotation_vec = Vec2::from_angle(self.rotation);
        // World → UCS: move the origin to zero, then rotate.
        self.world_to_ucs = Affine::rotate(self.rotation) * Affine::translate(-self.origin.to_vec2());
        self.ucs_to_world = Affine::translate(self.origin.to_vec2()) * Affine::rotate(-self.rotation);
    }
}

/// Axis-aligned box of the images of the four corners of `rect`.
fn corner_hull(rect: Rect, map: impl Fn(Point) -> Point) -> Rect {
    let q0 = map(Point::new(rect.x0, rect.y0));
    let q1 = map(Point::new(rect.x1, rect.y0));
    let q2 = map(Point::new(rect.x0, rect.y1));
    let q3 = map(Point::new(rect.x1, rect.y1));
    let min_x = q0.x.min(q1.x).min(q2.x).min(q3.x);
    let min_y = q0.y.min(q1.y).min(q2.y).min(q3.y);
    let max_x = q0.x.max(q1.x).max(q2.x).max(q3.x);
    let max_y = q0.y.max(q1.y).max(q2.y).max(q3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

    use kurbo::{Point, Rect, Vec2};

    use super::CoordinateMapper;

    fn assert_near(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn inactive_mapper_is_identity() {
        let m = CoordinateMapper::new();
        let p = Point::new(3.0, -4.0);
        assert_eq!(m.to_ucs(p), p);
        assert_eq!(m.to_world(p), p);
        assert_eq!(m.to_ucs_angle(0.3), 0.3);
    }

    #[test]
    fn quarter_turn_frame_maps_known_point() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(10.0, 10.0), FRAC_PI_2);
        let ucs = m.to_ucs(Point::new(10.0, 15.0));
        assert_near(ucs, Point::new(5.0, 0.0));
        assert_near(m.to_world(ucs), Point::new(10.0, 15.0));
        assert!((m.x_axis_direction() - FRAC_PI_2).abs() < 1e-12);
        assert!((m.rotation() + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn deltas_ignore_origin() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(100.0, -50.0), FRAC_PI_2);
        let d = m.to_ucs_delta(Vec2::new(0.0, 2.0));
        assert!((d.x - 2.0).abs() < 1e-12 && d.y.abs() < 1e-12);
        let back = m.to_world_delta(d);
        assert!(back.x.abs() < 1e-12 && (back.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn angles_shift_by_rotation() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::ORIGIN, FRAC_PI_2);
        assert!(m.to_ucs_angle(FRAC_PI_2).abs() < 1e-12);
        assert!((m.to_world_angle(0.0) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn ucs_bounding_box_is_axis_aligned_in_frame() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::ORIGIN, FRAC_PI_2);
        let b = m.ucs_bounding_box(Rect::new(0.0, 0.0, 10.0, 20.0));
        // World (10, 20) lands on UCS (20, -10).
        assert!((b.x0 - 0.0).abs() < 1e-9 && (b.x1 - 20.0).abs() < 1e-9);
        assert!((b.y0 + 10.0).abs() < 1e-9 && (b.y1 - 0.0).abs() < 1e-9);
    }

    #[test]
    fn ucs_bounding_box_keeps_height_at_forty_five_degrees() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::ORIGIN, FRAC_PI_4);
        let b = m.ucs_bounding_box(Rect::new(0.0, 0.0, 10.0, 10.0));
        let half_diag = 10.0 * FRAC_1_SQRT_2;
        assert!(b.x0.abs() < 1e-9 && (b.x1 - 2.0 * half_diag).abs() < 1e-9, "{b:?}");
        assert!((b.y0 + half_diag).abs() < 1e-9 && (b.y1 - half_diag).abs() < 1e-9, "{b:?}");
    }

    #[test]
    fn world_bounding_box_contains_all_corners() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(1.0, 1.0), FRAC_PI_6);
        let ucs_rect = Rect::new(-2.0, -1.0, 3.0, 4.0);
        let world = m.world_bounding_box(ucs_rect);
        for corner in [
            Point::new(-2.0, -1.0),
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(3.0, 4.0),
        ] {
            let w = m.to_world(corner);
            assert!(world.inflate(1e-9, 1e-9).contains(w), "{w:?} outside {world:?}");
        }
    }

    #[test]
    fn restrictions_follow_rotated_axes() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::ORIGIN, FRAC_PI_2);
        // UCS-horizontal is world-vertical for a quarter turn.
        let h = m.restrict_horizontal(Point::new(0.0, 0.0), Point::new(3.0, 7.0));
        assert_near(h, Point::new(0.0, 7.0));
        let v = m.restrict_vertical(Point::new(0.0, 0.0), Point::new(3.0, 7.0));
        assert_near(v, Point::new(3.0, 0.0));
    }

    #[test]
    fn clear_restores_identity() {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(5.0, 5.0), 1.0);
        m.clear();
        assert!(!m.has_ucs());
        assert_eq!(m.to_ucs(Point::new(1.0, 2.0)), Point::new(1.0, 2.0));
    }
}
