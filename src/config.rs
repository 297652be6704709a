use serde::Deserialize;
use std::path::PathBuf;

use crate::version::ModuleCoordinate;

// =============================================================================
// Release tool identity
// =============================================================================

/// Group id of the release plugin itself
pub const RELEASE_TOOL_GROUP_ID: &str = "com.github.danielflower.mavenplugins";

/// Artifact id of the release plugin itself
pub const RELEASE_TOOL_ARTIFACT_ID: &str = "multi-module-maven-release-plugin";

/// Environment variable holding a tracing filter directive (overrides `--log-level`)
pub const LOG_ENV_VAR: &str = "POM_RELEASE_LOG";

/// Release run configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// Coordinate of the tool performing the release.
    ///
    /// Plugin references to it are never rewritten nor reported, since the
    /// running tool is available as itself.
    pub release_tool: ModuleCoordinate,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            release_tool: ModuleCoordinate::new(RELEASE_TOOL_GROUP_ID, RELEASE_TOOL_ARTIFACT_ID),
        }
    }
}

/// Returns the path to the data directory for pom-release.
/// Uses $XDG_DATA_HOME/pom-release if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/pom-release,
/// or ./pom-release if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("pom-release.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("pom-release")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn release_config_from_empty_object_uses_default_tool() {
        let result = serde_json::from_value::<ReleaseConfig>(json!({})).unwrap();

        assert_eq!(
            result.release_tool,
            ModuleCoordinate::new(RELEASE_TOOL_GROUP_ID, RELEASE_TOOL_ARTIFACT_ID)
        );
    }

    #[test]
    fn release_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ReleaseConfig>(json!({
            "releaseTool": {
                "groupId": "org.example.tools",
                "artifactId": "release-plugin"
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            ReleaseConfig {
                release_tool: ModuleCoordinate::new("org.example.tools", "release-plugin"),
            }
        );
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/pom-release"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/pom-release"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./pom-release"));
    }
}
