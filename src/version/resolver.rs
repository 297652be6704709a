//! Version classification and property resolution
//!
//! A version is "unreleased" when it still carries the Maven in-development
//! marker. Versions written as `${name}` are looked up in the module's
//! property table before being classified.

use std::sync::LazyLock;

use regex::Regex;

use crate::version::Properties;

/// Suffix marking a version that has not been released yet
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Matches a version made of exactly one property placeholder: `${name}`
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$\{([^${}]+)\}$").expect("placeholder regex is valid"));

/// Matches every `${name}` reference inside a value
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^${}]+)\}").expect("reference regex is valid"));

/// Rounds of expansion applied before giving up on nested or cyclic references
pub const MAX_INTERPOLATION_DEPTH: usize = 16;

/// Returns true if the version carries the in-development marker.
///
/// The match is exact and case-sensitive, so `1.0-snapshot` is a released
/// version as far as the release is concerned.
pub fn is_unreleased(version: Option<&str>) -> bool {
    version.is_some_and(|v| v.trim().ends_with(SNAPSHOT_SUFFIX))
}

/// Returns the property name if the whole version is a single placeholder
pub fn placeholder_name(version: &str) -> Option<&str> {
    PLACEHOLDER_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve a `${name}` version against the property table.
///
/// Unknown properties resolve to the placeholder text itself, and anything
/// that is not a placeholder is returned unchanged.
pub fn resolve_symbolic(version: &str, properties: &Properties) -> String {
    let version = version.trim();
    placeholder_name(version)
        .and_then(|name| properties.get(name))
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| version.to_string())
}

/// Expand `${name}` references inside property values.
///
/// References to unknown properties are kept as written. Cyclic references
/// stop expanding after [`MAX_INTERPOLATION_DEPTH`] rounds.
pub fn interpolate(properties: &Properties) -> Properties {
    let mut current = properties.clone();
    for _ in 0..MAX_INTERPOLATION_DEPTH {
        let mut changed = false;
        let next: Properties = current
            .iter()
            .map(|(name, value)| {
                let expanded = expand(value, &current);
                changed |= &expanded != value;
                (name.clone(), expanded)
            })
            .collect();
        current = next;
        if !changed {
            break;
        }
    }
    current
}

fn expand(value: &str, properties: &Properties) -> String {
    REFERENCE_RE
        .replace_all(value, |caps: &regex::Captures<'_>| {
            properties
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("1.0-SNAPSHOT"), true)]
    #[case(Some("2.3.4-SNAPSHOT"), true)]
    #[case(Some("1.0-SNAPSHOT "), true)]
    #[case(Some("1.0"), false)]
    #[case(Some("1.0-snapshot"), false)] // marker is case-sensitive
    #[case(Some("1.0-SNAPSHOT-1"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn is_unreleased_returns_expected(#[case] version: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_unreleased(version), expected);
    }

    #[rstest]
    #[case("${x.version}", Some("x.version"))]
    #[case("${project.version}", Some("project.version"))]
    #[case("1.0", None)]
    #[case("${a}.${b}", None)]
    #[case("${}", None)]
    #[case("prefix-${x}", None)]
    fn placeholder_name_returns_expected(#[case] version: &str, #[case] expected: Option<&str>) {
        assert_eq!(placeholder_name(version), expected);
    }

    #[test]
    fn resolve_symbolic_looks_up_property() {
        let properties = Properties::from([
            ("x.version".to_string(), "1.0-SNAPSHOT".to_string()),
            ("y.version".to_string(), "2.0".to_string()),
        ]);

        assert_eq!(resolve_symbolic("${x.version}", &properties), "1.0-SNAPSHOT");
        assert_eq!(resolve_symbolic("${y.version}", &properties), "2.0");
    }

    #[test]
    fn resolve_symbolic_returns_placeholder_when_property_missing() {
        let properties = Properties::new();

        assert_eq!(resolve_symbolic("${missing}", &properties), "${missing}");
    }

    #[test]
    fn resolve_symbolic_passes_literals_through() {
        let properties = Properties::from([("1.0".to_string(), "nope".to_string())]);

        assert_eq!(resolve_symbolic("1.0", &properties), "1.0");
        assert_eq!(resolve_symbolic("1.${minor}", &properties), "1.${minor}");
    }

    #[test]
    fn interpolate_expands_nested_references() {
        let properties = Properties::from([
            ("lib.version".to_string(), "${core.version}".to_string()),
            ("core.version".to_string(), "${project.version}".to_string()),
            ("project.version".to_string(), "1.0-SNAPSHOT".to_string()),
            ("label".to_string(), "core-${core.version}-${missing}".to_string()),
        ]);

        let interpolated = interpolate(&properties);

        assert_eq!(interpolated["lib.version"], "1.0-SNAPSHOT");
        assert_eq!(interpolated["core.version"], "1.0-SNAPSHOT");
        assert_eq!(interpolated["label"], "core-1.0-SNAPSHOT-${missing}");
        assert_eq!(
            interpolated.keys().collect::<Vec<_>>(),
            properties.keys().collect::<Vec<_>>()
        );
    }

    #[rstest]
    #[case(&[("a", "${a}")])]
    #[case(&[("a", "${b}"), ("b", "${a}")])]
    #[case(&[("a", "x${a}")])]
    fn interpolate_stops_on_cycles(#[case] entries: &[(&str, &str)]) {
        let properties: Properties = entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        let interpolated = interpolate(&properties);

        assert!(interpolated.values().all(|value| value.contains("${")));
    }
}
