// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Reasons a zoom or fit request was rejected.
///
/// A rejected request leaves the viewport untouched: no factor, offset, or
/// history entry is written and no listener is notified. The `Display` text is
/// the message shown to the user.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ZoomError {
    /// The requested factor is not a usable positive number.
    #[error("Invalid zoom factor {0}. Zooming not changed")]
    InvalidFactor(f64),
    /// The area to fit has no extent on either axis.
    #[error("Zoom area is empty. Zooming not changed")]
    DegenerateExtents,
    /// The viewport has no device area to fit into.
    #[error("Viewport has no size. Zooming not changed")]
    EmptyDevice,
    /// The resulting factor or pixel offset leaves the representable range.
    #[error("Requested zooming factor out of range. Zooming not changed")]
    OutOfRange,
}

/// A settings value that could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The value was present but not of the expected form.
    #[error("setting `{group}/{key}` has invalid value `{value}`")]
    InvalidValue {
        /// Settings group.
        group: String,
        /// Key within the group.
        key: String,
        /// Raw value as stored.
        value: String,
    },
}
