// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cadview UCS: user coordinate systems for 2D CAD views.
//!
//! This crate holds the parts of a CAD view transform that do not depend on
//! device pixels:
//! - [`Ucs`]: a value type describing a translated/rotated (optionally
//!   isometric) frame over world space.
//! - [`CoordinateMapper`]: world ↔ UCS conversion of points, deltas, angles,
//!   and bounding boxes.
//! - [`angles`]: the user angle basis (custom zero direction, clockwise or
//!   counter-clockwise) and the single place where a frame's x-axis direction
//!   is turned into the rotation applied to points.
//! - [`UcsRegistry`]: a deduplicating store of named UCS entries.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::f64::consts::FRAC_PI_2;
//! use kurbo::Point;
//! use cadview_ucs::CoordinateMapper;
//!
//! let mut mapper = CoordinateMapper::new();
//! mapper.set_frame(Point::new(10.0, 10.0), FRAC_PI_2);
//!
//! let ucs = mapper.to_ucs(Point::new(10.0, 15.0));
//! assert!((ucs.x - 5.0).abs() < 1e-9 && ucs.y.abs() < 1e-9);
//!
//! let world = mapper.to_world(ucs);
//! assert!((world.x - 10.0).abs() < 1e-9 && (world.y - 15.0).abs() < 1e-9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

pub mod angles;
mod error;
mod mapper;
mod registry;
mod ucs;

pub use error::UcsError;
pub use mapper::CoordinateMapper;
pub use registry::{NamedUcs, UcsId, UcsRegistry};
pub use ucs::{
    ANGLE_TOLERANCE, DISTANCE_TOLERANCE, IsoView, OrthoType, Ucs, is_custom_frame,
    is_meaningful_angle, is_meaningful_distance, is_same_angle,
};
