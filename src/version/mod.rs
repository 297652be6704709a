//! Version values and classification
//!
//! # Modules
//!
//! - [`coordinate`]: `ModuleCoordinate` and `DeclaredVersion` value types
//! - [`resolver`]: in-development detection, `${property}` resolution and interpolation

pub mod coordinate;
pub mod resolver;

pub use coordinate::{DeclaredVersion, ModuleCoordinate};
pub use resolver::{SNAPSHOT_SUFFIX, interpolate, is_unreleased, resolve_symbolic};

/// Per-module property table (`<properties>` plus built-in project values)
pub type Properties = indexmap::IndexMap<String, String>;
