// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `cadview_ucs` crate.
//!
//! These exercise world ↔ UCS round trips across a spread of frames and the
//! interning contract of the registry.

use core::f64::consts::{FRAC_PI_2, PI};

use cadview_ucs::{CoordinateMapper, IsoView, Ucs, UcsRegistry};
use kurbo::{Point, Rect};

const FRAMES: &[(f64, f64, f64)] = &[
    (0.0, 0.0, 0.0),
    (10.0, 10.0, FRAC_PI_2),
    (-250.5, 13.25, 0.3),
    (1e4, -1e4, -2.0),
    (0.0, 0.0, PI),
];

const POINTS: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 15.0), (-3.5, 7.25), (1e5, -2e5)];

#[test]
fn world_ucs_world_round_trip() {
    for &(ox, oy, dir) in FRAMES {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(ox, oy), dir);
        for &(x, y) in POINTS {
            let p = Point::new(x, y);
            let back = m.to_world(m.to_ucs(p));
            let tol = 1e-6 * (1.0 + p.to_vec2().hypot());
            assert!((back - p).hypot() < tol, "frame ({ox}, {oy}, {dir}) moved {p:?} to {back:?}");
        }
    }
}

#[test]
fn ucs_box_covers_all_transformed_corners() {
    let world = Rect::new(-10.0, -20.0, 30.0, 40.0);
    for &(ox, oy, dir) in FRAMES {
        let mut m = CoordinateMapper::new();
        m.set_frame(Point::new(ox, oy), dir);
        let ucs_box = m.ucs_bounding_box(world).inflate(1e-6, 1e-6);
        for corner in [
            Point::new(world.x0, world.y0),
            Point::new(world.x1, world.y0),
            Point::new(world.x0, world.y1),
            Point::new(world.x1, world.y1),
        ] {
            let c = m.to_ucs(corner);
            assert!(ucs_box.contains(c), "frame ({ox}, {oy}, {dir}): {c:?} outside {ucs_box:?}");
        }
    }
}

#[test]
fn isometric_flag_and_view_take_part_in_interning() {
    let mut r = UcsRegistry::new();
    let origin = Point::new(4.0, 4.0);
    let plain = r.try_add(Ucs::new(origin, 0.0));
    let iso_top = r.try_add(Ucs::with_iso(origin, 0.0, true, IsoView::Top));
    let iso_left = r.try_add(Ucs::with_iso(origin, 0.0, true, IsoView::Left));
    let iso_top_again = r.try_add(Ucs::with_iso(origin, 0.0, true, IsoView::Top));

    assert_ne!(plain, iso_top);
    assert_ne!(iso_top, iso_left);
    assert_eq!(iso_top, iso_top_again);
    assert_eq!(r.len(), 3);
    let names: Vec<&str> = r.iter().map(|(_, e)| e.name()).collect();
    assert_eq!(names, ["UCS 1", "UCS 2", "UCS 3"]);
}

#[test]
fn rename_rejects_blank_and_duplicate_names() {
    let mut r = UcsRegistry::new();
    let a = r.try_add(Ucs::new(Point::new(1.0, 0.0), 0.0));
    let b = r.try_add(Ucs::new(Point::new(2.0, 0.0), 0.0));
    assert!(r.rename(a, "  ").is_err());
    assert!(r.rename(b, "UCS 1").is_err());
    r.rename(a, "Front").unwrap();
    r.rename(a, "Front").unwrap();
    assert_eq!(r.by_name("Front"), Some(a));
    assert_eq!(r.by_name("UCS 1"), None);
}
