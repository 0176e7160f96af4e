// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification.
//!
//! Listeners are shared handles registered with a viewport. Callbacks take
//! `&self`; listeners that record state use interior mutability. Dispatch
//! walks the list in registration order, and a listener registered twice is
//! called twice.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use cadview_ucs::Ucs;
use kurbo::Point;
use smallvec::SmallVec;

/// What a redraw request covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RedrawMethod {
    /// Only the grid layer.
    Grid,
    /// Only overlays (previews, snap markers, relative zero).
    Overlay,
    /// Only the drawing content.
    Drawing,
    /// Everything.
    All,
}

/// A notification emitted by a viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportEvent {
    /// Scale or offset changed.
    ViewportChanged,
    /// The active UCS changed; `None` means the world frame.
    UcsChanged(Option<Ucs>),
    /// The relative zero moved to the given world point.
    RelativeZeroChanged(Point),
    /// Part of the view must be repainted.
    RedrawNeeded(RedrawMethod),
    /// Whether a previous view can be restored.
    PreviousZoomAvailable(bool),
}

/// Receiver of viewport notifications.
///
/// Every method has an empty default so implementors only handle what they
/// care about. Callbacks must not call back into the viewport that is
/// dispatching.
pub trait ViewportListener {
    /// Scale or offset changed.
    fn on_viewport_changed(&self) {}
    /// The active UCS changed; `None` means the world frame.
    fn on_ucs_changed(&self, _ucs: Option<&Ucs>) {}
    /// The relative zero moved.
    fn on_relative_zero_changed(&self, _pos: Point) {}
    /// Part of the view must be repainted.
    fn on_redraw_needed(&self, _method: RedrawMethod) {}
    /// A previous view became available or unavailable.
    fn on_previous_zoom_available(&self, _available: bool) {}
}

/// Sink for user-facing command-line messages.
pub trait CommandMessenger {
    /// Shows `message` to the user.
    fn command_message(&self, message: &str);
}

/// Ordered list of registered listeners.
#[derive(Default)]
pub struct ListenerList {
    listeners: SmallVec<[Rc<dyn ViewportListener>; 4]>,
    dispatching: Cell<bool>,
}

impl fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.listeners.len())
            .field("dispatching", &self.dispatching.get())
            .finish()
    }
}

impl ListenerList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener`. Registering the same handle twice is allowed.
    pub fn add(&mut self, listener: Rc<dyn ViewportListener>) {
        self.listeners.push(listener);
    }

    /// Removes the first registration of `listener`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&mut self, listener: &Rc<dyn ViewportListener>) -> bool {
        match self.listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns `true` while [`ListenerList::dispatch`] is running.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }

    /// Delivers `event` to every listener in registration order.
    pub fn dispatch(&self, event: &ViewportEvent) {
        let _guard = DispatchGuard::enter(&self.dispatching);
        for listener in &self.listeners {
            match event {
                ViewportEvent::ViewportChanged => listener.on_viewport_changed(),
                ViewportEvent::UcsChanged(ucs) => listener.on_ucs_changed(ucs.as_ref()),
                ViewportEvent::RelativeZeroChanged(pos) => listener.on_relative_zero_changed(*pos),
                ViewportEvent::RedrawNeeded(method) => listener.on_redraw_needed(*method),
                ViewportEvent::PreviousZoomAvailable(available) => {
                    listener.on_previous_zoom_available(*available);
                }
            }
        }
    }
}

struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
    was_set: bool,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        let was_set = flag.replace(true);
        Self { flag, was_set }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.was_set);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Tally {
        seen: RefCell<Vec<&'static str>>,
    }

    impl ViewportListener for Tally {
        fn on_viewport_changed(&self) {
            self.seen.borrow_mut().push("viewport");
        }
        fn on_redraw_needed(&self, _method: RedrawMethod) {
            self.seen.borrow_mut().push("redraw");
        }
    }

    #[test]
    fn double_registration_fires_twice_and_removes_once() {
        let tally = Rc::new(Tally::default());
        let handle: Rc<dyn ViewportListener> = tally.clone();
        let mut list = ListenerList::new();
        list.add(handle.clone());
        list.add(handle.clone());
        list.dispatch(&ViewportEvent::ViewportChanged);
        assert_eq!(tally.seen.borrow().len(), 2);

        assert!(list.remove(&handle));
        list.dispatch(&ViewportEvent::RedrawNeeded(RedrawMethod::All));
        assert_eq!(*tally.seen.borrow(), ["viewport", "viewport", "redraw"]);

        assert!(list.remove(&handle));
        assert!(!list.remove(&handle));
        assert!(list.is_empty());
    }

    #[test]
    fn dispatch_flag_is_cleared_afterwards() {
        let mut list = ListenerList::new();
        list.add(Rc::new(Tally::default()));
        assert!(!list.is_dispatching());
        list.dispatch(&ViewportEvent::ViewportChanged);
        assert!(!list.is_dispatching());
    }
}
