//! POM layer
//! - cursor.rs: pull-style cursor over quick-xml events with byte offsets
//! - document.rs: format-preserving segmented document (the patch engine)
//! - model.rs: declared model reader (identity, parent, references, properties)
//! - error.rs: DocumentError

mod cursor;
pub mod document;
pub mod error;
pub mod model;

pub use document::{LocatedValue, PomDocument, ReferenceKey, Section, Segment};
pub use error::DocumentError;
pub use model::{DeclaredReference, ParentReference, PomModel};
