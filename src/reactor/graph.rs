//! Build graph lookup

use thiserror::Error;

use crate::reactor::module::ReleasableModule;

/// A reference that does not point at any module of the build graph
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("No module {group_id}:{artifact_id} found for version {version}")]
pub struct UnresolvedReference {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// Source of modules and coordinate lookups for a release run
pub trait BuildGraph {
    /// Modules ordered so that dependencies come before their dependents
    fn modules_in_build_order(&self) -> &[ReleasableModule];

    /// Find the module a reference points at.
    ///
    /// `version` is only used to describe the failure.
    fn find(
        &self,
        group_id: &str,
        artifact_id: &str,
        version: Option<&str>,
    ) -> Result<&ReleasableModule, UnresolvedReference> {
        self.modules_in_build_order()
            .iter()
            .find(|module| module.coordinate.matches(group_id, artifact_id))
            .ok_or_else(|| UnresolvedReference {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version: version.unwrap_or_default().to_string(),
            })
    }
}

/// The set of modules in a multi-module build
#[derive(Debug, Clone, Default)]
pub struct Reactor {
    modules: Vec<ReleasableModule>,
}

impl Reactor {
    pub fn new(modules: Vec<ReleasableModule>) -> Self {
        Self { modules }
    }

    /// Find a module by its `groupId:artifactId` label
    pub fn find_by_label(&self, label: &str) -> Option<&ReleasableModule> {
        let (group_id, artifact_id) = label.split_once(':')?;
        self.modules
            .iter()
            .find(|module| module.coordinate.matches(group_id, artifact_id))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl BuildGraph for Reactor {
    fn modules_in_build_order(&self) -> &[ReleasableModule] {
        &self.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactor::module::tests::module;

    fn reactor() -> Reactor {
        Reactor::new(vec![
            module("com.example", "parent", "1.0.5"),
            module("my.great.group", "some-arty", "1.0.5"),
            module("com.example", "app", "1.0.5"),
        ])
    }

    #[test]
    fn find_returns_module_by_group_and_artifact() {
        let reactor = reactor();

        let found = reactor
            .find("my.great.group", "some-arty", Some("1.0-SNAPSHOT"))
            .unwrap();

        assert_eq!(found.artifact_id(), "some-arty");
        assert_eq!(
            reactor.find_by_label("my.great.group:some-arty"),
            Some(found)
        );
    }

    #[test]
    fn find_fails_with_unresolved_reference() {
        let reactor = reactor();

        let result = reactor.find("com.example", "missing", Some("2.0-SNAPSHOT"));

        assert_eq!(
            result,
            Err(UnresolvedReference {
                group_id: "com.example".to_string(),
                artifact_id: "missing".to_string(),
                version: "2.0-SNAPSHOT".to_string(),
            })
        );
    }

    #[test]
    fn find_does_not_match_artifact_from_another_group() {
        let reactor = reactor();

        assert!(reactor.find("other.group", "some-arty", None).is_err());
    }

    #[test]
    fn find_by_label_rejects_label_without_separator() {
        let reactor = reactor();

        assert_eq!(reactor.find_by_label("some-arty"), None);
    }

    #[test]
    fn modules_are_kept_in_build_order() {
        let reactor = reactor();

        let order: Vec<&str> = reactor
            .modules_in_build_order()
            .iter()
            .map(|m| m.artifact_id())
            .collect();

        assert_eq!(order, vec!["parent", "some-arty", "app"]);
        assert_eq!(reactor.len(), 3);
        assert!(!reactor.is_empty());
    }
}
