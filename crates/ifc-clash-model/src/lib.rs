// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Clash Model - Shared types for IFC clash detection
//!
//! This crate provides the data model shared between the clash engine and
//! the layers around it: element identity, triangulated mesh buffers, the
//! geometry source trait, and the serialized clash-set configuration and
//! result records.
//!
//! # Architecture
//!
//! - [`GlobalId`] / [`ElementInfo`] - element identity as reported in clash results
//! - [`MeshData`] - neutral flat-buffer triangle mesh interface
//! - [`ShapeSource`] - trait implemented by tessellation backends
//! - [`ClashSet`] / [`ClashSource`] - persisted clash-set configuration (JSON)
//! - [`ClashSetResults`] / [`Clash`] - aggregated results for the report layer
//!
//! The engine itself lives in `ifc-clash-engine`; this crate has no geometry
//! dependencies so that configuration tooling can use it on its own.

pub mod config;
pub mod error;
pub mod results;
pub mod source;
pub mod types;

// Re-export all public types
pub use config::*;
pub use error::*;
pub use results::*;
pub use source::*;
pub use types::*;
