//! Version propagation layer
//!
//! Walks the reactor in build order and rewrites each module's POM so that it
//! refers to released versions only.
//!
//! # Modules
//!
//! - [`updater`]: `PomUpdater`, the engine
//! - [`store`]: `DocumentStore` trait with filesystem and dry-run stores
//! - [`result`]: `UpdateResult`, validation and fatal errors

pub mod result;
pub mod store;
pub mod updater;

pub use result::{UpdateError, UpdateResult, ValidationError, ValidationKind};
pub use store::{DocumentStore, DryRunStore, FsDocumentStore};
pub use updater::PomUpdater;
