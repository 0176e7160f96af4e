// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplicating store of named user coordinate systems.
//!
//! A [`UcsRegistry`] is shared by every viewport of a document. Viewports hand
//! it transient [`Ucs`] candidates; the registry either finds a structurally
//! equal entry (see [`Ucs::is_same_as`]) and returns its id, or stores the
//! candidate under a generated name.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use cadview_ucs::{Ucs, UcsRegistry};
//!
//! let mut registry = UcsRegistry::new();
//! let a = registry.try_add(Ucs::new(Point::new(10.0, 0.0), 0.5));
//! let b = registry.try_add(Ucs::new(Point::new(10.0, 0.0), 0.5));
//! assert_eq!(a, b);
//! assert_eq!(registry.len(), 1);
//! assert_eq!(registry.get(a).unwrap().name(), "UCS 1");
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::UcsError;
use crate::ucs::Ucs;

/// Stable handle of an entry in a [`UcsRegistry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct UcsId(u32);

impl UcsId {
    /// Returns this id as a `usize` index.
    #[inline]
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A UCS stored in the registry together with its name.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedUcs {
    name: String,
    ucs: Ucs,
}

impl NamedUcs {
    /// Returns the registry-assigned (or user-renamed) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored frame.
    #[must_use]
    pub fn ucs(&self) -> Ucs {
        self.ucs
    }
}

/// Arena of named UCS entries, looked up by id, name, or geometry.
#[derive(Clone, Debug, Default)]
pub struct UcsRegistry {
    slots: Vec<Option<NamedUcs>>,
    by_name: HashMap<String, UcsId>,
    name_counter: u32,
}

impl UcsRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if no UCS is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Interns `candidate`.
    ///
    /// If an equal UCS is already stored its id is returned and `candidate`
    /// is dropped; otherwise the candidate is stored under a fresh name.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` entries have ever been stored.
    pub fn try_add(&mut self, candidate: Ucs) -> UcsId {
        if let Some(id) = self.find_existing(&candidate) {
            return id;
        }
        let id = UcsId(u32::try_from(self.slots.len()).expect("too many UCS entries for UcsId (u32)"));
        let name = self.next_name();
        self.by_name.insert(name.clone(), id);
        self.slots.push(Some(NamedUcs {
            name,
            ucs: candidate,
        }));
        id
    }

    /// Returns the id of a stored UCS equal to `ucs`, if any.
    #[must_use]
    pub fn find_existing(&self, ucs: &Ucs) -> Option<UcsId> {
        self.iter().find(|(_, e)| e.ucs.is_same_as(ucs)).map(|(id, _)| id)
    }

    /// Returns the entry for `id`, if it is still stored.
    #[must_use]
    pub fn get(&self, id: UcsId) -> Option<&NamedUcs> {
        self.slots.get(id.as_usize()).and_then(Option::as_ref)
    }

    /// Returns the frame for `id`, if it is still stored.
    #[must_use]
    pub fn ucs(&self, id: UcsId) -> Option<Ucs> {
        self.get(id).map(NamedUcs::ucs)
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<UcsId> {
        self.by_name.get(name).copied()
    }

    /// Renames an entry.
    ///
    /// Renaming an entry to its current name is a no-op.
    pub fn rename(&mut self, id: UcsId, name: impl Into<String>) -> Result<(), UcsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UcsError::EmptyName);
        }
        match self.by_name.get(&name) {
            Some(&existing) if existing == id => return Ok(()),
            Some(_) => return Err(UcsError::DuplicateName(name)),
            None => {}
        }
        let entry = self
            .slots
            .get_mut(id.as_usize())
            .and_then(Option::as_mut)
            .ok_or(UcsError::UnknownId(id))?;
        self.by_name.remove(&entry.name);
        entry.name.clone_from(&name);
        self.by_name.insert(name, id);
        Ok(())
    }

    /// Removes an entry and returns it.
    ///
    /// The id is never reused.
    pub fn remove(&mut self, id: UcsId) -> Result<NamedUcs, UcsError> {
        let entry = self
            .slots
            .get_mut(id.as_usize())
            .and_then(Option::take)
            .ok_or(UcsError::UnknownId(id))?;
        self.by_name.remove(&entry.name);
        Ok(entry)
    }

    /// Iterates stored entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (UcsId, &NamedUcs)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            #[expect(clippy::cast_possible_truncation, reason = "ids are created from u32 indices")]
            let id = UcsId(i as u32);
            slot.as_ref().map(|e| (id, e))
        })
    }

    fn next_name(&mut self) -> String {
        loop {
            self.name_counter += 1;
            let name = format!("UCS {}", self.name_counter);
            if !self.by_name.contains_key(&name) {
                return name;
            }
        }
    }
}
