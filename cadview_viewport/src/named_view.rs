// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use cadview_ucs::Ucs;
use kurbo::{Point, Size};

/// A saved view: the visible UCS area together with the frame it was seen in.
///
/// Created and refreshed by
/// [`Viewport::create_named_view`](crate::Viewport::create_named_view) and
/// [`Viewport::update_named_view`](crate::Viewport::update_named_view); shown
/// again by [`Viewport::restore_named_view`](crate::Viewport::restore_named_view).
#[derive(Clone, Debug, PartialEq)]
pub struct NamedView {
    /// Display name.
    pub name: String,
    /// Centre of the visible area in UCS coordinates.
    pub center: Point,
    /// Extent of the visible area in UCS units.
    pub size: Size,
    /// Frame the view was saved in; `None` for the world frame.
    pub ucs: Option<Ucs>,
    /// Registry name of [`NamedView::ucs`], if it was interned.
    pub ucs_name: Option<String>,
    /// Whether the view was saved in paper (print preview) mode.
    pub is_paper_view: bool,
}

impl NamedView {
    /// Creates an empty view with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center: Point::ORIGIN,
            size: Size::ZERO,
            ucs: None,
            ucs_name: None,
            is_paper_view: false,
        }
    }
}
