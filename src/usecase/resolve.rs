use std::collections::BTreeMap;

use catalog_parser::{is_coercible_version, CatalogGroup, ResolvedDependency};
use tracing::{debug, warn};

/// Pick target versions for `group` from the pinned versions.
///
/// A pin applies to a dependency by its key or, for `npm:` aliases, by the
/// aliased package name. Dependencies that may not be updated, or whose pin
/// equals the declared version, get no target.
pub fn resolve_pins(group: &CatalogGroup, pins: &BTreeMap<String, String>) -> Vec<ResolvedDependency> {
    group
        .deps
        .iter()
        .map(|dep| {
            let pin = pins
                .get(&dep.name)
                .or_else(|| dep.alias_name.as_ref().and_then(|alias| pins.get(alias)));
            let target = match pin {
                Some(version) if !dep.update => {
                    debug!("{} in {} is not updatable, ignoring {}", dep.name, group.name, version);
                    None
                }
                Some(version) if *version == dep.current_version => None,
                Some(version) => {
                    if !is_coercible_version(version) {
                        warn!("Pinned version {} of {} does not look like a version", version, dep.name);
                    }
                    Some(version.clone())
                }
                None => None,
            };
            ResolvedDependency::new(dep.clone(), target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_parser::load_catalogs;
    use std::path::Path;

    fn group(text: &str, should_update: impl Fn(&str) -> bool) -> CatalogGroup {
        load_catalogs(text, Path::new("pnpm-workspace.yaml"), "pnpm-workspace.yaml", should_update)
            .remove(0)
    }

    fn pins(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_pins_by_name() {
        let group = group("catalog:\n  react: ^18.2.0\n  vue: ^3.4.0\n", |_| true);
        let resolved = resolve_pins(&group, &pins(&[("react", "^19.0.0")]));

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].target_version.as_deref(), Some("^19.0.0"));
        assert!(resolved[0].is_changed());
        assert_eq!(resolved[1].target_version, None);
    }

    #[test]
    fn test_pins_by_alias_name() {
        let group = group("catalog:\n  react-18: npm:react@^18.2.0\n", |_| true);
        let resolved = resolve_pins(&group, &pins(&[("react", "^18.3.1")]));
        assert_eq!(resolved[0].target_version.as_deref(), Some("^18.3.1"));
    }

    #[test]
    fn test_excluded_and_unchanged_get_no_target() {
        let group = group(
            "catalog:\n  react: ^18.2.0\n  vue: ^3.4.0\n",
            |name| name != "react",
        );
        let resolved = resolve_pins(
            &group,
            &pins(&[("react", "^19.0.0"), ("vue", "^3.4.0")]),
        );
        assert!(resolved.iter().all(|dep| dep.target_version.is_none()));
    }
}
