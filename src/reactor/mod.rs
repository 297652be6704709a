//! Build graph layer
//!
//! The reactor is the ordered set of modules taking part in a release, each
//! carrying the version decided for it. The release engine only reads it.
//!
//! # Modules
//!
//! - [`module`]: `ReleasableModule` and `EffectivePlugin`
//! - [`graph`]: `BuildGraph` trait and the `Reactor` implementation
//! - [`effective`]: inheritance of coordinates, properties and plugins
//! - [`manifest`]: JSON manifest loader

pub mod effective;
pub mod graph;
pub mod manifest;
pub mod module;

pub use graph::{BuildGraph, Reactor, UnresolvedReference};
pub use manifest::{ManifestError, ReactorManifest, load_reactor};
pub use module::{EffectivePlugin, ReleasableModule};
