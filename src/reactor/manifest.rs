//! Reactor manifest
//!
//! A JSON description of one release run: the POMs in build order, each with
//! the version decided for it. Loading the manifest reads every POM and
//! builds the [`Reactor`] the release engine works on.
//!
//! ```json
//! {
//!   "releaseTool": { "groupId": "...", "artifactId": "..." },
//!   "modules": [
//!     { "pom": "core/pom.xml", "newVersion": "1.0.5", "willBeReleased": true }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ReleaseConfig;
use crate::pom::{DocumentError, PomModel};
use crate::reactor::effective::{
    effective_group_id, effective_plugins, effective_properties, effective_version,
    managed_plugins,
};
use crate::reactor::graph::Reactor;
use crate::reactor::module::ReleasableModule;
use crate::version::ModuleCoordinate;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse {path:?}: {source}")]
    Pom {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("{path:?} does not declare or inherit a {field}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Module {0} is listed more than once")]
    DuplicateModule(ModuleCoordinate),
}

/// Release decision for one module
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestModule {
    /// Path of the POM, relative to the manifest
    pub pom: PathBuf,
    pub new_version: String,
    #[serde(default = "default_will_be_released")]
    pub will_be_released: bool,
    #[serde(default)]
    pub equivalent_version: Option<String>,
}

fn default_will_be_released() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReactorManifest {
    #[serde(flatten)]
    pub config: ReleaseConfig,
    pub modules: Vec<ManifestModule>,
}

impl ReactorManifest {
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Read every POM and build the reactor.
    ///
    /// POM paths are resolved against `base_dir`. A parent is only inherited
    /// from when it is listed before the child.
    pub fn into_reactor(self, base_dir: &Path) -> Result<Reactor, ManifestError> {
        let mut modules: Vec<ReleasableModule> = Vec::with_capacity(self.modules.len());
        for entry in self.modules {
            let module = build_module(entry, base_dir, &modules)?;
            if modules.iter().any(|m| m.coordinate == module.coordinate) {
                return Err(ManifestError::DuplicateModule(module.coordinate));
            }
            debug!(
                "Loaded {} {} -> {}",
                module.coordinate, module.version, module.new_version
            );
            modules.push(module);
        }
        Ok(Reactor::new(modules))
    }
}

/// Load a manifest and the reactor it describes
pub fn load_reactor(manifest_path: &Path) -> Result<(Reactor, ReleaseConfig), ManifestError> {
    let manifest = ReactorManifest::load(manifest_path)?;
    let config = manifest.config.clone();
    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let reactor = manifest.into_reactor(base_dir)?;
    Ok((reactor, config))
}

fn build_module(
    entry: ManifestModule,
    base_dir: &Path,
    loaded: &[ReleasableModule],
) -> Result<ReleasableModule, ManifestError> {
    let pom_path = base_dir.join(&entry.pom);
    let content = std::fs::read_to_string(&pom_path).map_err(|source| ManifestError::Io {
        path: pom_path.clone(),
        source,
    })?;
    let model = PomModel::read(&content).map_err(|source| ManifestError::Pom {
        path: pom_path.clone(),
        source,
    })?;

    let missing = |field| ManifestError::MissingField {
        path: pom_path.clone(),
        field,
    };
    let artifact_id = model.artifact_id.clone().ok_or_else(|| missing("artifactId"))?;
    let group_id = effective_group_id(&model).ok_or_else(|| missing("groupId"))?;
    let version = effective_version(&model).ok_or_else(|| missing("version"))?;
    let coordinate = ModuleCoordinate::new(group_id, artifact_id);

    let parent = model
        .parent
        .as_ref()
        .and_then(|p| loaded.iter().find(|m| m.coordinate == p.coordinate));
    let properties = effective_properties(&model, &coordinate, &version, parent);
    let managed = managed_plugins(&model, parent, &properties);
    let plugins = effective_plugins(&model, parent, &properties, &managed);

    Ok(ReleasableModule {
        coordinate,
        version,
        new_version: entry.new_version,
        equivalent_version: entry.equivalent_version,
        will_be_released: entry.will_be_released,
        parent: model.parent,
        references: model.references,
        effective_plugins: plugins,
        managed_plugins: managed,
        properties,
        pom_path,
    })
}
