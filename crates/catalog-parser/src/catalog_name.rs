use yaml_parser::{PathItem, YamlDocument};

use crate::entity::{CATALOG, CATALOGS};

/// Derive the catalog name of a declaration from its structural path.
///
/// The document root is dropped, mappings and sequences are skipped, and the
/// keys of the enclosing pairs are joined with `:`. The result is aligned to
/// pnpm's `catalog:<name>` protocol: `catalogs:<name>` becomes
/// `catalog:<name>` and a bare `catalog` becomes `catalog:default`.
///
/// Sequences never hold catalog entries in a workspace file; a path through
/// one loses the sequence level rather than failing.
pub fn catalog_name(document: &YamlDocument, path: &[PathItem]) -> String {
    let mut segments: Vec<String> = path
        .iter()
        .skip(1)
        .filter_map(|item| match item {
            PathItem::Pair(pair) => Some(document.text_of(pair.key)),
            PathItem::Document | PathItem::Map(_) | PathItem::Seq(_) => None,
        })
        .collect();

    if segments.len() > 1 && segments[0] == CATALOGS {
        segments[0] = CATALOG.to_string();
    }

    let mut name = segments.join(":");
    if name == CATALOG {
        name.push_str(":default");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_parser::{parse, Visit, Visited};

    /// Catalog name of every pair keyed `key`, in document order
    fn names_of(yaml: &str, key: &str) -> Vec<String> {
        let doc = parse(yaml).document;
        let mut names = Vec::new();
        doc.walk::<(), _>(|visited, path| {
            if let Visited::Pair(pair) = visited {
                if doc.text_of(pair.key) == key {
                    names.push(catalog_name(&doc, path));
                }
            }
            Visit::Continue
        });
        names
    }

    #[test]
    fn test_default_catalog() {
        let names = names_of("catalog:\n  react: ^18.2.0\n  vue: ^3.4.0\n", "react");
        assert_eq!(names, vec!["catalog:default"]);
    }

    #[test]
    fn test_named_catalogs() {
        let yaml = "catalogs:\n  react17:\n    react: ^17.0.2\n  react18:\n    react: ^18.2.0\n";
        assert_eq!(
            names_of(yaml, "react"),
            vec!["catalog:react17", "catalog:react18"]
        );
    }

    #[test]
    fn test_other_sections_keep_their_path() {
        let yaml = "overrides:\n  foo: ^1.0.0\nnested:\n  a:\n    foo: ^2.0.0\nfoo: ^3.0.0\n";
        assert_eq!(names_of(yaml, "foo"), vec!["overrides", "nested:a", ""]);
    }

    #[test]
    fn test_bare_catalogs_is_not_renamed() {
        // a version directly under `catalogs` has a single segment
        assert_eq!(names_of("catalogs:\n  foo: ^1.0.0\n", "foo"), vec!["catalogs"]);
    }

    #[test]
    fn test_sequences_are_dropped_from_the_path() {
        let yaml = "catalog:\n  - react: ^18.2.0\n";
        assert_eq!(names_of(yaml, "react"), vec!["catalog:default"]);
    }
}
