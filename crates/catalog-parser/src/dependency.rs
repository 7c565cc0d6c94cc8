use std::collections::BTreeMap;

use crate::entity::{DependencySource, RawDependency, ResolvedDependency};

/// Version protocols that point somewhere other than the registry
const LOCAL_PROTOCOLS: &[&str] = &[
    "workspace:",
    "catalog:",
    "link:",
    "file:",
    "portal:",
    "git:",
    "git+",
    "github:",
    "http:",
    "https:",
];

/// Build a dependency entry from a declaration.
///
/// `npm:<package>@<range>` aliases are split so that `current_version` only
/// holds the range. Dependencies using a non-registry protocol, and names
/// rejected by `should_update`, are marked as not updatable.
pub fn parse_dependency(
    name: &str,
    version: &str,
    source: DependencySource,
    should_update: impl Fn(&str) -> bool,
) -> RawDependency {
    let (alias_name, current_version) = match version.strip_prefix("npm:") {
        Some(rest) => match rest.rfind('@') {
            Some(at) if at > 0 => (Some(rest[..at].to_string()), rest[at + 1..].to_string()),
            _ => (None, version.to_string()),
        },
        None => (None, version.to_string()),
    };

    let is_local = LOCAL_PROTOCOLS
        .iter()
        .any(|protocol| current_version.starts_with(protocol));

    RawDependency {
        name: name.to_string(),
        update: !is_local && should_update(name),
        current_version,
        source,
        alias_name,
    }
}

/// The versions to write for `source`, keyed by dependency name.
///
/// Only updatable dependencies that resolved to a target are included, so
/// nothing else in the file is touched. `npm:` aliases get their prefix back.
pub fn dump_dependencies(
    resolved: &[ResolvedDependency],
    source: DependencySource,
) -> BTreeMap<String, String> {
    resolved
        .iter()
        .filter(|dep| dep.raw.source == source && dep.raw.update)
        .filter_map(|dep| {
            let target = dep.target_version.as_deref()?;
            let version = match &dep.raw.alias_name {
                Some(package) => format!("npm:{}@{}", package, target),
                None => target.to_string(),
            };
            Some((dep.raw.name.clone(), version))
        })
        .collect()
}
