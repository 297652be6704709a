//! Error type for POM parsing and editing

/// Error type for document operations
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The XML itself could not be read
    #[error("Malformed XML at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    /// Element text holds an entity that cannot be resolved
    #[error("Invalid escape at byte {position}: {source}")]
    Escape {
        position: usize,
        #[source]
        source: quick_xml::escape::EscapeError,
    },

    /// Input ended inside an open element
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// The root element is not `<project>`
    #[error("Root element is <{0}>, expected <project>")]
    NotAProject(String),

    /// A value element such as `<version>` contained a child element
    #[error("Element <{0}> must contain text only")]
    NotALeaf(String),

    /// The POM has no `<version>` of its own
    #[error("Document has no version element of its own")]
    MissingOwnVersion,

    /// The POM has no `<parent>` block with a version
    #[error("Document has no parent version to update")]
    MissingParent,

    /// No versioned dependency or plugin entry at this position
    #[error("Document has no versioned entry at position {0}")]
    UnknownReference(usize),
}
