// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cadview Viewport: headless view state for 2D CAD documents.
//!
//! A [`Viewport`] places a document on a device of `width × height` pixels.
//! It focuses on:
//! - The world → UCS → device mapping, with device `y` growing downward and
//!   the vertical pixel offset measured from the bottom edge.
//! - Zoom and fit operations (window, in/out about a point, fit extents, fit
//!   paper) with bounded view history and a short save debounce.
//! - The user coordinate system lifecycle: creating, interning, extracting,
//!   and applying frames through the document's
//!   [`UcsRegistry`](cadview_ucs::UcsRegistry).
//! - Named views, grid snapping, and the relative-zero marker.
//!
//! It does **not** render anything. Hosts implement [`Document`] for their
//! drawing model (or use [`Drawing`]), optionally supply a [`Grid`], and
//! register [`ViewportListener`]s to repaint when notified.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use cadview_viewport::{Drawing, Viewport, ViewportConfig};
//!
//! let mut view = Viewport::new(ViewportConfig::default());
//! view.set_size(800, 600);
//! let (_drawing, document) = Drawing::with_bounds(Rect::new(0.0, 0.0, 100.0, 50.0)).into_shared();
//! view.set_document(document);
//!
//! view.zoom_window(Point::new(0.0, 0.0), Point::new(100.0, 50.0), true).unwrap();
//! assert_eq!(view.factor().x, 8.0);
//! assert_eq!(view.to_gui(Point::new(0.0, 0.0)), Point::new(0.0, 500.0));
//! ```
//!
//! This crate is `no_std` with an optional `std` feature that supplies the
//! system [`StdClock`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use cadview_ucs;

mod clock;
mod config;
mod document;
mod error;
mod grid;
mod history;
mod listener;
mod named_view;
mod relative_zero;
mod ucs_ops;
mod units;
mod viewport;
mod zoom;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{Clock, ManualClock};
pub use config::{
    APPEARANCE_GROUP, MODIFY_ON_VIEW_CHANGE_KEY, MapSettings, SettingsSource, UCS_APPLY_POLICY_KEY,
    UcsApplyPolicy, ViewportConfig,
};
pub use document::{Document, Drawing, PaperMargins, SharedDocument};
pub use error::{ConfigError, ZoomError};
pub use grid::{Grid, GridSettings, SnapGrid};
pub use history::{SAVE_DEBOUNCE, SaveOutcome, SavedView, VIEW_HISTORY_CAPACITY, ViewHistory};
pub use listener::{CommandMessenger, ListenerList, RedrawMethod, ViewportEvent, ViewportListener};
pub use named_view::NamedView;
pub use relative_zero::RelativeZeroUndo;
pub use units::Unit;
pub use viewport::{Borders, Viewport};
pub use zoom::{
    FALLBACK_FACTOR_X, FALLBACK_FACTOR_Y, MIN_EXTENT, MIN_FACTOR, SCROLL_STEP, ScrollDirection,
};
