//! Outcome of a release run

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::pom::DocumentError;

/// What kind of reference could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// The module's parent
    Parent,
    /// An entry in `<dependencies>` or `<dependencyManagement>`
    Dependency,
    /// An entry in `<plugins>` or `<pluginManagement>`
    PluginDependency,
    /// A plugin of the effective (inherited) build
    Plugin,
}

/// A reference to an unreleased version that is not part of the release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Artifact id of the module holding the reference
    pub module: String,
    pub referenced_artifact_id: String,
    pub referenced_version: String,
    pub kind: ValidationKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (module, artifact, version) = (
            &self.module,
            &self.referenced_artifact_id,
            &self.referenced_version,
        );
        match self.kind {
            ValidationKind::Parent => write!(f, "The parent of {module} is {artifact} {version}"),
            ValidationKind::Dependency => {
                write!(f, "{module} references dependency {artifact} {version}")
            }
            ValidationKind::PluginDependency => {
                write!(f, "{module} references plugin dependency {artifact} {version}")
            }
            ValidationKind::Plugin => write!(f, "{module} references plugin {artifact} {version}"),
        }
    }
}

/// Unexpected failure that stops the run
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Failed to update {path:?}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of updating every module of the reactor
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// POMs written so far, in build order
    pub changed_files: Vec<PathBuf>,
    pub validation_errors: Vec<ValidationError>,
    /// Set when the run was aborted
    pub fatal: Option<UpdateError>,
}

impl UpdateResult {
    pub fn success(&self) -> bool {
        self.validation_errors.is_empty() && self.fatal.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn error(kind: ValidationKind) -> ValidationError {
        ValidationError {
            module: "app".to_string(),
            referenced_artifact_id: "core".to_string(),
            referenced_version: "1.0-SNAPSHOT".to_string(),
            kind,
        }
    }

    #[rstest]
    #[case(ValidationKind::Parent, "The parent of app is core 1.0-SNAPSHOT")]
    #[case(ValidationKind::Dependency, "app references dependency core 1.0-SNAPSHOT")]
    #[case(
        ValidationKind::PluginDependency,
        "app references plugin dependency core 1.0-SNAPSHOT"
    )]
    #[case(ValidationKind::Plugin, "app references plugin core 1.0-SNAPSHOT")]
    fn validation_error_message(#[case] kind: ValidationKind, #[case] expected: &str) {
        assert_eq!(error(kind).to_string(), expected);
    }

    #[test]
    fn success_requires_no_errors_and_no_fatal_failure() {
        let mut result = UpdateResult::default();
        assert!(result.success());

        result.validation_errors.push(error(ValidationKind::Dependency));
        assert!(!result.success());

        result.validation_errors.clear();
        result.fatal = Some(UpdateError::Io {
            path: PathBuf::from("pom.xml"),
            source: std::io::Error::other("disk full"),
        });
        assert!(!result.success());
    }
}
