use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use yaml_parser::{parse, NodeId, NodeKind, Pair, Visit, Visited, YamlDocument};

use crate::catalog_name::catalog_name;
use crate::dependency::parse_dependency;
use crate::entity::{CatalogGroup, DependencySource, RawDependency, PNPM_WORKSPACE};
use crate::error::CatalogError;
use crate::version::is_coercible_version;

/// Read `relative` (resolved against `cwd`) and load its catalogs.
///
/// Only reading the file can fail. Problems inside the document are logged
/// and the affected entries are left out.
pub async fn load_workspace(
    cwd: &Path,
    relative: &str,
    should_update: impl Fn(&str) -> bool,
) -> Result<Vec<CatalogGroup>, CatalogError> {
    let filepath = cwd.join(relative);
    let text = tokio::fs::read_to_string(&filepath)
        .await
        .map_err(|source| CatalogError::Read {
            path: filepath.clone(),
            source,
        })?;
    Ok(load_catalogs(&text, &filepath, relative, should_update))
}

/// Load every version declaration of a workspace file, grouped by catalog.
///
/// A declaration is a pair with a scalar key whose value is either an
/// un-anchored scalar that looks like a version, or an alias to a string
/// anchor. Groups come out in the order they are first seen, their
/// dependencies in document order.
pub fn load_catalogs(
    text: &str,
    filepath: &Path,
    relative: &str,
    should_update: impl Fn(&str) -> bool,
) -> Vec<CatalogGroup> {
    let result = parse(text);
    for error in &result.errors {
        warn!("Failed to parse {}: {}", filepath.display(), error);
    }
    let document = result.document;

    let mut groups: Vec<(String, Vec<RawDependency>)> = Vec::new();
    document.walk::<(), _>(|visited, path| {
        let Visited::Pair(pair) = visited else {
            return Visit::Continue;
        };
        let Some((name, version)) = declaration(&document, pair, filepath) else {
            return Visit::Continue;
        };

        let group_name = catalog_name(&document, path);
        debug!(
            "Found dependency: {} in {}, currentVersion: {}",
            name, group_name, version
        );
        let dep = parse_dependency(&name, &version, DependencySource::PnpmCatalog, &should_update);
        match groups.iter_mut().find(|(existing, _)| *existing == group_name) {
            Some((_, deps)) => deps.push(dep),
            None => groups.push((group_name, vec![dep])),
        }
        Visit::Continue
    });

    let document = Arc::new(document);
    groups
        .into_iter()
        .map(|(name, deps)| CatalogGroup {
            name,
            deps,
            resolved: Vec::new(),
            document: Arc::clone(&document),
            filepath: filepath.to_path_buf(),
            relative: relative.to_string(),
            kind: PNPM_WORKSPACE,
            private: true,
        })
        .collect()
}

/// Name and effective version declared by `pair`, if it declares one
fn declaration(document: &YamlDocument, pair: &Pair, filepath: &Path) -> Option<(String, String)> {
    let key = document.scalar(pair.key)?;
    let value_id = pair.value?;
    let value = document.node(value_id)?;

    match &value.kind {
        // react: ^18.2.0
        NodeKind::Scalar(scalar) if value.anchor.is_none() && is_coercible_version(&scalar.value) => {
            Some((key.value.clone(), scalar.value.clone()))
        }
        // react: *react
        NodeKind::Alias(alias) => {
            let Some(anchor) = resolve(document, value_id) else {
                warn!(
                    "Cannot find anchor for alias *{} of {} in {}",
                    alias.name,
                    key.value,
                    filepath.display()
                );
                return None;
            };
            Some((key.value.clone(), anchor))
        }
        _ => None,
    }
}

fn resolve(document: &YamlDocument, alias: NodeId) -> Option<String> {
    let anchor = document.resolve_alias(alias)?;
    document.scalar(anchor).map(|s| s.value.clone())
}
