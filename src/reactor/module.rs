//! A module taking part in the release

use std::path::PathBuf;

use crate::pom::{DeclaredReference, ParentReference};
use crate::version::{ModuleCoordinate, Properties};

/// A plugin as the build actually sees it, after inheritance and interpolation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePlugin {
    pub coordinate: ModuleCoordinate,
    pub version: Option<String>,
}

/// One module of the build graph with its release decision already made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasableModule {
    pub coordinate: ModuleCoordinate,
    /// Version currently declared (or inherited) by the module
    pub version: String,
    /// Version the module carries after the release
    pub new_version: String,
    /// Released version equivalent to this one, when the module is not being released
    pub equivalent_version: Option<String>,
    pub will_be_released: bool,
    pub parent: Option<ParentReference>,
    /// Dependency, dependency management, plugin and plugin management entries
    pub references: Vec<DeclaredReference>,
    pub effective_plugins: Vec<EffectivePlugin>,
    /// Plugin management after inheritance, used to fill versions of children's plugins
    pub managed_plugins: Vec<EffectivePlugin>,
    pub properties: Properties,
    pub pom_path: PathBuf,
}

impl ReleasableModule {
    pub fn group_id(&self) -> &str {
        &self.coordinate.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.coordinate.artifact_id
    }

    /// The version dependents should reference after the release
    pub fn version_to_depend_on(&self) -> &str {
        if self.will_be_released {
            return &self.new_version;
        }
        self.equivalent_version
            .as_deref()
            .unwrap_or(&self.new_version)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &DeclaredReference> {
        self.references.iter().filter(|r| !r.section().is_plugin())
    }

    pub fn plugins(&self) -> impl Iterator<Item = &DeclaredReference> {
        self.references.iter().filter(|r| r.section().is_plugin())
    }
}
