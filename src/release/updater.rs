//! Version propagation across the reactor
//!
//! Every module's POM is rewritten so that it carries its new version and
//! every reference to an unreleased module of the reactor points at the
//! version that module is released as. References to unreleased versions
//! that the reactor cannot satisfy are collected as validation errors.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ReleaseConfig;
use crate::pom::{DeclaredReference, DocumentError, PomDocument};
use crate::reactor::{BuildGraph, ReleasableModule};
use crate::release::result::{UpdateError, UpdateResult, ValidationError, ValidationKind};
use crate::release::store::DocumentStore;
use crate::version::{ModuleCoordinate, is_unreleased, resolve_symbolic};

pub struct PomUpdater<'a, G: BuildGraph, S: DocumentStore> {
    graph: &'a G,
    store: &'a S,
    release_tool: ModuleCoordinate,
}

impl<'a, G: BuildGraph, S: DocumentStore> PomUpdater<'a, G, S> {
    pub fn new(graph: &'a G, store: &'a S, config: &ReleaseConfig) -> Self {
        Self {
            graph,
            store,
            release_tool: config.release_tool.clone(),
        }
    }

    /// Update every module in build order.
    ///
    /// Stops at the first fatal error; POMs written before it stay written.
    pub fn update_versions(&self) -> UpdateResult {
        let mut result = UpdateResult::default();
        for module in self.graph.modules_in_build_order() {
            if module.will_be_released {
                info!(
                    "Going to release {} {}",
                    module.artifact_id(),
                    module.new_version
                );
            }
            match self.update_module(module, &mut result.validation_errors) {
                Ok(()) => result.changed_files.push(module.pom_path.clone()),
                Err(e) => {
                    warn!("Aborting version update at {}: {}", module.coordinate, e);
                    result.fatal = Some(e);
                    return result;
                }
            }
        }
        result
    }

    fn update_module(
        &self,
        module: &ReleasableModule,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), UpdateError> {
        let path = module.pom_path.as_path();
        let source = self.store.load(path).map_err(|e| io_error(path, e))?;
        let mut document = PomDocument::parse(&source).map_err(|e| document_error(path, e))?;

        if document.own_version().is_some() {
            document
                .set_own_version(&module.new_version)
                .map_err(|e| document_error(path, e))?;
        } else {
            debug!(
                " {} inherits its version from its parent",
                module.artifact_id()
            );
        }

        self.update_parent(module, &mut document, errors)
            .map_err(|e| document_error(path, e))?;

        for reference in module.dependencies().chain(module.plugins()) {
            self.update_reference(module, reference, &mut document, errors)
                .map_err(|e| document_error(path, e))?;
        }

        self.check_effective_plugins(module, errors);

        self.store
            .save(path, &document.serialize())
            .map_err(|e| io_error(path, e))
    }

    fn update_parent(
        &self,
        module: &ReleasableModule,
        document: &mut PomDocument,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), DocumentError> {
        let Some(parent) = &module.parent else {
            return Ok(());
        };
        if !is_unreleased(parent.version.as_deref()) {
            return Ok(());
        }

        match self.graph.find(
            &parent.coordinate.group_id,
            &parent.coordinate.artifact_id,
            parent.version.as_deref(),
        ) {
            Ok(found) => {
                document.set_parent_version(found.version_to_depend_on())?;
                debug!(
                    " Parent {} rewritten to version {}",
                    found.artifact_id(),
                    found.version_to_depend_on()
                );
            }
            Err(unresolved) => errors.push(ValidationError {
                module: module.artifact_id().to_string(),
                referenced_artifact_id: unresolved.artifact_id,
                referenced_version: unresolved.version,
                kind: ValidationKind::Parent,
            }),
        }
        Ok(())
    }

    fn update_reference(
        &self,
        module: &ReleasableModule,
        reference: &DeclaredReference,
        document: &mut PomDocument,
        errors: &mut Vec<ValidationError>,
    ) -> Result<(), DocumentError> {
        let is_plugin = reference.section().is_plugin();
        let coordinate = reference.coordinate();
        if is_plugin && coordinate == &self.release_tool {
            return Ok(());
        }
        let Some(declared) = &reference.version else {
            return Ok(());
        };

        let resolved = declared.resolve(&module.properties);
        if !is_unreleased(Some(&resolved)) {
            debug!(
                " {} on {} kept at version {}",
                describe(is_plugin),
                coordinate.artifact_id,
                declared
            );
            return Ok(());
        }

        match self.graph.find(
            &coordinate.group_id,
            &coordinate.artifact_id,
            Some(declared.as_str()),
        ) {
            Ok(found) => {
                let version = found.version_to_depend_on();
                document.set_dependency_version(reference.entry, version)?;
                if is_plugin {
                    info!(
                        "Plugin dependency on {} rewritten to version {}",
                        found.artifact_id(),
                        version
                    );
                } else {
                    debug!(
                        " Dependency on {} rewritten to version {}",
                        found.artifact_id(),
                        version
                    );
                }
            }
            Err(unresolved) => errors.push(ValidationError {
                module: module.artifact_id().to_string(),
                referenced_artifact_id: unresolved.artifact_id,
                referenced_version: unresolved.version,
                kind: if is_plugin {
                    ValidationKind::PluginDependency
                } else {
                    ValidationKind::Dependency
                },
            }),
        }
        Ok(())
    }

    /// Report plugins the build will use at an unreleased version that the
    /// reactor does not release. Such versions may come from a parent or a
    /// property, so there is nothing in this POM to rewrite.
    fn check_effective_plugins(&self, module: &ReleasableModule, errors: &mut Vec<ValidationError>) {
        for plugin in &module.effective_plugins {
            let version = plugin.version.as_deref();
            let resolved = version.map(|v| resolve_symbolic(v, &module.properties));
            if !is_unreleased(resolved.as_deref()) || plugin.coordinate == self.release_tool {
                continue;
            }
            let coordinate = &plugin.coordinate;
            if self
                .graph
                .find(&coordinate.group_id, &coordinate.artifact_id, version)
                .is_ok()
            {
                continue;
            }
            errors.push(ValidationError {
                module: module.artifact_id().to_string(),
                referenced_artifact_id: coordinate.artifact_id.clone(),
                referenced_version: version.unwrap_or_default().to_string(),
                kind: ValidationKind::Plugin,
            });
        }
    }
}

fn describe(is_plugin: bool) -> &'static str {
    if is_plugin { "Plugin dependency" } else { "Dependency" }
}

fn io_error(path: &Path, source: std::io::Error) -> UpdateError {
    UpdateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn document_error(path: &Path, source: DocumentError) -> UpdateError {
    UpdateError::Document {
        path: path.to_path_buf(),
        source,
    }
}
