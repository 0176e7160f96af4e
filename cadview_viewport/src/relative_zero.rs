// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Relative zero: the world point relative coordinate input is measured from.

use cadview_ucs::is_meaningful_distance;
use kurbo::Point;

use crate::listener::ViewportEvent;
use crate::viewport::Viewport;

/// Undo record for a relative-zero move.
///
/// Produced by [`Viewport::relative_zero_undoable`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelativeZeroUndo {
    from: Point,
    to: Point,
}

impl RelativeZeroUndo {
    /// Position before the move.
    #[must_use]
    pub fn before(&self) -> Point {
        self.from
    }

    /// Position after the move.
    #[must_use]
    pub fn after(&self) -> Point {
        self.to
    }

    /// Moves the relative zero of `viewport` back.
    pub fn undo(&self, viewport: &mut Viewport) {
        viewport.set_relative_zero(self.from);
        viewport.mark_relative_zero();
    }

    /// Moves the relative zero of `viewport` forward again.
    pub fn redo(&self, viewport: &mut Viewport) {
        viewport.set_relative_zero(self.to);
        viewport.mark_relative_zero();
    }
}

impl Viewport {
    /// Current relative zero (world).
    #[must_use]
    pub fn relative_zero(&self) -> Point {
        self.relative_zero
    }

    /// Moves the relative zero and notifies. Ignored while locked.
    pub fn set_relative_zero(&mut self, pos: Point) {
        self.assert_not_dispatching();
        if self.relative_zero_locked {
            return;
        }
        self.relative_zero = pos;
        self.dispatch(ViewportEvent::RelativeZeroChanged(pos));
    }

    /// Alias of [`Viewport::set_relative_zero`] used by interactive tools.
    pub fn move_relative_zero(&mut self, pos: Point) {
        self.set_relative_zero(pos);
    }

    /// Locks or unlocks the relative zero.
    pub fn lock_relative_zero(&mut self, locked: bool) {
        self.relative_zero_locked = locked;
    }

    /// Returns `true` while the relative zero is locked.
    #[must_use]
    pub fn is_relative_zero_locked(&self) -> bool {
        self.relative_zero_locked
    }

    /// Hides or shows the relative-zero marker.
    pub fn set_relative_zero_hidden(&mut self, hidden: bool) {
        self.relative_zero_hidden = hidden;
    }

    /// Returns `true` if the marker is hidden.
    #[must_use]
    pub fn is_relative_zero_hidden(&self) -> bool {
        self.relative_zero_hidden
    }

    /// Records the current relative zero as the undo baseline.
    pub fn mark_relative_zero(&mut self) {
        self.marked_relative_zero = self.relative_zero;
    }

    /// The last marked relative zero.
    #[must_use]
    pub fn marked_relative_zero(&self) -> Point {
        self.marked_relative_zero
    }

    /// Returns an undo record for the move since the last mark, if the
    /// relative zero actually moved, and marks the current position.
    pub fn relative_zero_undoable(&mut self) -> Option<RelativeZeroUndo> {
        if !is_meaningful_distance(self.marked_relative_zero, self.relative_zero) {
            return None;
        }
        let undo = RelativeZeroUndo {
            from: self.marked_relative_zero,
            to: self.relative_zero,
        };
        self.mark_relative_zero();
        Some(undo)
    }
}
