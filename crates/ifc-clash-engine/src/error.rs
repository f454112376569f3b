// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the clash engine

use ifc_clash_model::GlobalId;
use thiserror::Error;

/// Clash engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Clash engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or degenerate mesh/transform input
    ///
    /// Aborts registration of the affected element only; batch callers are
    /// expected to skip and continue.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Re-registration of an element id already present in a group
    ///
    /// Indicates stale caller state; the group is left unchanged.
    #[error("Element {global_id} is already registered in group '{group}'")]
    DuplicateElement { group: String, global_id: GlobalId },

    /// Query against a group name that was never created
    #[error("Unknown group: '{0}'")]
    UnknownGroup(String),

    /// A clash query was aborted through its cancellation token
    #[error("Clash query cancelled")]
    Cancelled,
}

impl Error {
    /// Create a geometry error
    pub fn geometry(msg: impl Into<String>) -> Self {
        Error::Geometry(msg.into())
    }

    /// Create a duplicate element error
    pub fn duplicate_element(group: impl Into<String>, global_id: GlobalId) -> Self {
        Error::DuplicateElement {
            group: group.into(),
            global_id,
        }
    }

    /// Create an unknown group error
    pub fn unknown_group(name: impl Into<String>) -> Self {
        Error::UnknownGroup(name.into())
    }
}
