// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::registry::UcsId;

/// Errors reported by [`UcsRegistry`](crate::UcsRegistry) edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UcsError {
    /// A blank name was supplied.
    #[error("UCS name must not be empty")]
    EmptyName,
    /// Another entry already uses this name.
    #[error("a UCS named `{0}` already exists")]
    DuplicateName(String),
    /// The id does not refer to a stored entry.
    #[error("no UCS with id {0:?}")]
    UnknownId(UcsId),
}
