//! Coordinates and declared versions of POM references

use std::fmt;

use serde::Deserialize;

use crate::version::Properties;
use crate::version::resolver::{placeholder_name, resolve_symbolic};

/// Identity of a module or of a reference target: `groupId:artifactId`.
///
/// Coordinates never carry a version, so the same module is matched no matter
/// which version a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCoordinate {
    pub group_id: String,
    pub artifact_id: String,
}

impl ModuleCoordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A version as written in a POM: either a literal or a `${property}` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredVersion {
    Literal(String),
    Property { name: String, text: String },
}

impl DeclaredVersion {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match placeholder_name(text) {
            Some(name) => DeclaredVersion::Property {
                name: name.to_string(),
                text: text.to_string(),
            },
            None => DeclaredVersion::Literal(text.to_string()),
        }
    }

    /// Returns the version exactly as declared
    pub fn as_str(&self) -> &str {
        match self {
            DeclaredVersion::Literal(text) | DeclaredVersion::Property { text, .. } => text,
        }
    }

    /// Resolves a property reference against the module's property table
    pub fn resolve(&self, properties: &Properties) -> String {
        resolve_symbolic(self.as_str(), properties)
    }
}

impl fmt::Display for DeclaredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
