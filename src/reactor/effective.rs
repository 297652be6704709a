//! Effective model: what a module looks like after inheriting from its parent
//!
//! Only the parts the release needs are computed: the coordinate and version
//! (which may be inherited), the property table, and the build plugins with
//! versions filled in from plugin management.

use indexmap::IndexMap;

use crate::pom::{PomModel, Section};
use crate::reactor::module::{EffectivePlugin, ReleasableModule};
use crate::version::{ModuleCoordinate, Properties, interpolate, resolve_symbolic};

/// Group id of the module, inherited from the parent when not declared
pub fn effective_group_id(model: &PomModel) -> Option<String> {
    model
        .group_id
        .clone()
        .or_else(|| model.parent.as_ref().map(|p| p.coordinate.group_id.clone()))
}

/// Version of the module, inherited from the parent when not declared
pub fn effective_version(model: &PomModel) -> Option<String> {
    model
        .version
        .clone()
        .or_else(|| model.parent.as_ref().and_then(|p| p.version.clone()))
}

/// Parent properties overlaid with the module's own, plus built-in project values.
///
/// References between properties are expanded, so `${lib.version}` resolves
/// even when `lib.version` is itself written as `${core.version}`.
pub fn effective_properties(
    model: &PomModel,
    coordinate: &ModuleCoordinate,
    version: &str,
    parent: Option<&ReleasableModule>,
) -> Properties {
    let mut properties = parent
        .map(|p| p.properties.clone())
        .unwrap_or_default();
    properties.extend(
        model
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    properties.insert("project.groupId".to_string(), coordinate.group_id.clone());
    properties.insert(
        "project.artifactId".to_string(),
        coordinate.artifact_id.clone(),
    );
    properties.insert("project.version".to_string(), version.to_string());
    match model.parent.as_ref().and_then(|p| p.version.as_ref()) {
        Some(parent_version) => {
            properties.insert("project.parent.version".to_string(), parent_version.clone());
        }
        None => {
            properties.shift_remove("project.parent.version");
        }
    }
    interpolate(&properties)
}

/// Plugin management after inheritance: the parent's entries overlaid with the module's own
pub fn managed_plugins(
    model: &PomModel,
    parent: Option<&ReleasableModule>,
    properties: &Properties,
) -> Vec<EffectivePlugin> {
    let inherited = parent.map(|p| p.managed_plugins.as_slice()).unwrap_or_default();
    let mut managed = plugin_table(inherited);
    for reference in model
        .references
        .iter()
        .filter(|r| r.section() == Section::PluginManagement)
    {
        let version = reference
            .declared_version()
            .map(|v| resolve_symbolic(v, properties));
        let entry = managed.entry(reference.coordinate().clone()).or_default();
        if version.is_some() {
            *entry = version;
        }
    }
    into_plugins(managed)
}

/// Build plugins after inheritance, with missing versions taken from plugin management
pub fn effective_plugins(
    model: &PomModel,
    parent: Option<&ReleasableModule>,
    properties: &Properties,
    managed: &[EffectivePlugin],
) -> Vec<EffectivePlugin> {
    let inherited = parent
        .map(|p| p.effective_plugins.as_slice())
        .unwrap_or_default();
    let mut plugins = plugin_table(inherited);
    for reference in model
        .references
        .iter()
        .filter(|r| r.section() == Section::Plugins)
    {
        let version = reference.declared_version().map(str::to_string);
        let entry = plugins.entry(reference.coordinate().clone()).or_default();
        if version.is_some() {
            *entry = version;
        }
    }

    let managed = plugin_table(managed);
    for (coordinate, version) in plugins.iter_mut() {
        if version.is_none() {
            *version = managed.get(coordinate).cloned().flatten();
        }
        if let Some(v) = version.as_mut() {
            *v = resolve_symbolic(v, properties);
        }
    }
    into_plugins(plugins)
}

fn plugin_table(plugins: &[EffectivePlugin]) -> IndexMap<ModuleCoordinate, Option<String>> {
    plugins
        .iter()
        .map(|plugin| (plugin.coordinate.clone(), plugin.version.clone()))
        .collect()
}

fn into_plugins(table: IndexMap<ModuleCoordinate, Option<String>>) -> Vec<EffectivePlugin> {
    table
        .into_iter()
        .map(|(coordinate, version)| EffectivePlugin {
            coordinate,
            version,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pom::{DeclaredReference, ParentReference};
    use crate::reactor::module::tests::module;

    fn plugin(group_id: &str, artifact_id: &str, version: Option<&str>) -> EffectivePlugin {
        EffectivePlugin {
            coordinate: ModuleCoordinate::new(group_id, artifact_id),
            version: version.map(str::to_string),
        }
    }

    fn child_model() -> PomModel {
        PomModel {
            group_id: None,
            artifact_id: Some("app".to_string()),
            version: None,
            parent: Some(ParentReference {
                coordinate: ModuleCoordinate::new("com.example", "parent"),
                version: Some("1.0-SNAPSHOT".to_string()),
            }),
            references: vec![
                DeclaredReference::new(
                    0,
                    Section::Plugins,
                    ModuleCoordinate::new("com.example", "checker-plugin"),
                    None,
                ),
                DeclaredReference::new(
                    1,
                    Section::Plugins,
                    ModuleCoordinate::new("org.apache.maven.plugins", "maven-jar-plugin"),
                    Some("${jar.version}"),
                ),
                DeclaredReference::new(
                    2,
                    Section::PluginManagement,
                    ModuleCoordinate::new("com.example", "checker-plugin"),
                    Some("${checker.version}"),
                ),
            ],
            properties: Properties::from([
                ("jar.version".to_string(), "3.3.0".to_string()),
                ("checker.version".to_string(), "2.0-SNAPSHOT".to_string()),
            ]),
        }
    }

    #[test]
    fn group_and_version_are_inherited_from_parent() {
        let model = child_model();

        assert_eq!(effective_group_id(&model).as_deref(), Some("com.example"));
        assert_eq!(effective_version(&model).as_deref(), Some("1.0-SNAPSHOT"));
    }

    #[test]
    fn own_properties_override_parent_properties() {
        let parent = ReleasableModule {
            properties: Properties::from([
                ("jar.version".to_string(), "3.0.0".to_string()),
                ("shared".to_string(), "yes".to_string()),
            ]),
            ..module("com.example", "parent", "1.0.5")
        };
        let model = child_model();
        let coordinate = ModuleCoordinate::new("com.example", "app");

        let properties = effective_properties(&model, &coordinate, "1.0-SNAPSHOT", Some(&parent));

        assert_eq!(properties["jar.version"], "3.3.0");
        assert_eq!(properties["shared"], "yes");
        assert_eq!(properties["project.artifactId"], "app");
        assert_eq!(properties["project.version"], "1.0-SNAPSHOT");
        assert_eq!(properties["project.parent.version"], "1.0-SNAPSHOT");
    }

    #[test]
    fn property_references_are_expanded() {
        let model = PomModel {
            properties: Properties::from([
                ("lib.version".to_string(), "${core.version}".to_string()),
                ("core.version".to_string(), "${project.version}".to_string()),
            ]),
            ..child_model()
        };
        let coordinate = ModuleCoordinate::new("com.example", "app");

        let properties = effective_properties(&model, &coordinate, "1.0-SNAPSHOT", None);

        assert_eq!(properties["lib.version"], "1.0-SNAPSHOT");
        assert_eq!(properties["core.version"], "1.0-SNAPSHOT");
        assert_eq!(resolve_symbolic("${lib.version}", &properties), "1.0-SNAPSHOT");
    }

    #[test]
    fn plugins_inherit_from_parent_and_take_versions_from_management() {
        let parent = ReleasableModule {
            effective_plugins: vec![plugin("com.example", "parent-only-plugin", Some("1.1"))],
            managed_plugins: vec![plugin("com.example", "checker-plugin", Some("1.9"))],
            ..module("com.example", "parent", "1.0.5")
        };
        let model = child_model();
        let properties = model.properties.clone();

        let managed = managed_plugins(&model, Some(&parent), &properties);
        let plugins = effective_plugins(&model, Some(&parent), &properties, &managed);

        assert_eq!(
            managed,
            vec![plugin("com.example", "checker-plugin", Some("2.0-SNAPSHOT"))]
        );
        assert_eq!(
            plugins,
            vec![
                plugin("com.example", "parent-only-plugin", Some("1.1")),
                plugin("com.example", "checker-plugin", Some("2.0-SNAPSHOT")),
                plugin("org.apache.maven.plugins", "maven-jar-plugin", Some("3.3.0")),
            ]
        );
    }

    #[test]
    fn plugin_without_any_version_stays_unversioned() {
        let model = PomModel {
            references: vec![DeclaredReference::new(
                0,
                Section::Plugins,
                ModuleCoordinate::new("org.apache.maven.plugins", "maven-clean-plugin"),
                None,
            )],
            ..PomModel::default()
        };

        let plugins = effective_plugins(&model, None, &Properties::new(), &[]);

        assert_eq!(
            plugins,
            vec![plugin("org.apache.maven.plugins", "maven-clean-plugin", None)]
        );
    }
}
