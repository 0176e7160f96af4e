// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded ring of previously shown views.

use core::time::Duration;

use kurbo::Vec2;

/// Number of views the history keeps.
pub const VIEW_HISTORY_CAPACITY: usize = 16;

/// Saves closer together than this collapse into the earlier one.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Scale and pixel offset of a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedView {
    /// Horizontal offset in device pixels.
    pub offset_x: i32,
    /// Vertical offset in device pixels, counted from the bottom edge.
    pub offset_y: i32,
    /// Pixels per UCS unit on each axis.
    pub factor: Vec2,
}

impl Default for SavedView {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            factor: Vec2::new(1.0, 1.0),
        }
    }
}

/// Result of [`ViewHistory::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The save came too soon after the previous one and was dropped.
    Debounced,
    /// The view was stored.
    Saved {
        /// `true` if the history was empty before this save.
        became_available: bool,
    },
}

/// Ring buffer of the last [`VIEW_HISTORY_CAPACITY`] views.
///
/// Saving past capacity overwrites the oldest entry; restoring pops the most
/// recent one.
#[derive(Clone, Debug)]
pub struct ViewHistory {
    views: [SavedView; VIEW_HISTORY_CAPACITY],
    next: usize,
    count: usize,
    last_save: Option<Duration>,
}

impl Default for ViewHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            views: [SavedView::default(); VIEW_HISTORY_CAPACITY],
            next: 0,
            count: 0,
            last_save: None,
        }
    }

    /// Number of views that can be restored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if there is nothing to restore.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Stores `view` unless the previous save happened less than
    /// [`SAVE_DEBOUNCE`] before `now`.
    pub fn save(&mut self, view: SavedView, now: Duration) -> SaveOutcome {
        if let Some(last) = self.last_save {
            if now.saturating_sub(last) < SAVE_DEBOUNCE {
                return SaveOutcome::Debounced;
            }
        }
        self.last_save = Some(now);
        self.views[self.next] = view;
        self.next = (self.next + 1) % VIEW_HISTORY_CAPACITY;
        let was_empty = self.count == 0;
        if self.count < VIEW_HISTORY_CAPACITY {
            self.count += 1;
        }
        SaveOutcome::Saved {
            became_available: was_empty,
        }
    }

    /// Pops the most recently saved view.
    pub fn restore(&mut self) -> Option<SavedView> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;
        self.next = (self.next + VIEW_HISTORY_CAPACITY - 1) % VIEW_HISTORY_CAPACITY;
        Some(self.views[self.next])
    }

    /// Forgets every saved view.
    pub fn clear(&mut self) {
        self.count = 0;
        self.next = 0;
        self.last_save = None;
    }
}
