use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use yaml_parser::{NodeId, NodeKind, YamlDocument};

use crate::dependency::dump_dependencies;
use crate::entity::{CatalogGroup, CatalogKey, DependencySource, CATALOG, CATALOGS};
use crate::error::CatalogError;

/// Write the resolved versions of `group` back to its workspace file.
///
/// The group's document is left untouched: edits go to a clone, and the file
/// is only overwritten when at least one version actually changed. Returns
/// the written document, or `None` when there was nothing to write.
pub async fn write_workspace(group: &CatalogGroup) -> Result<Option<YamlDocument>, CatalogError> {
    let versions = dump_dependencies(&group.resolved, DependencySource::PnpmCatalog);
    if versions.is_empty() {
        return Ok(None);
    }

    let Some(document) = apply_versions(&group.document, &group.key(), &versions, &group.filepath)
    else {
        debug!("No changes for {} in {}", group.name, group.filepath.display());
        return Ok(None);
    };

    write_yaml(&group.filepath, &document.to_string()).await?;
    Ok(Some(document))
}

/// Set `versions` in the given catalog of a clone of `document`.
///
/// Aliased values are written through to their anchor, so every alias of
/// that anchor sees the new version. Entries that cannot be located are
/// logged with `filepath` and skipped. Returns the edited clone only when a
/// value ends up different from `document`.
pub fn apply_versions(
    document: &YamlDocument,
    catalog: &CatalogKey,
    versions: &BTreeMap<String, String>,
    filepath: &Path,
) -> Option<YamlDocument> {
    let mut edited = document.clone();

    let maps = catalog_maps(&mut edited, catalog);
    if maps.is_empty() {
        warn!(
            "Cannot find catalog {:?} in {}",
            catalog,
            filepath.display()
        );
        return None;
    }

    // scalar -> (dependency, version) that last wrote it
    let mut written: BTreeMap<NodeId, (&str, &str)> = BTreeMap::new();
    for (name, version) in versions {
        let value = maps
            .iter()
            .find_map(|map| edited.get_pair(*map, name))
            .and_then(|pair| pair.value);
        let Some(value) = value else {
            warn!(
                "Cannot find a value for {} in {}",
                name,
                filepath.display()
            );
            continue;
        };
        let Some(scalar) = scalar_target(&edited, value, name, filepath) else {
            continue;
        };
        if let Some((other, previous)) = written.insert(scalar, (name.as_str(), version.as_str())) {
            if previous != version.as_str() {
                warn!(
                    "{} and {} share a value in {}, keeping {} for both",
                    other,
                    name,
                    filepath.display(),
                    version
                );
            }
        }
        edited.set_scalar(scalar, version);
    }

    let changed = written.keys().any(|id| {
        edited.scalar(*id).map(|s| &s.value) != document.scalar(*id).map(|s| &s.value)
    });
    changed.then_some(edited)
}

/// The maps holding the entries of `catalog`, in document order.
///
/// A repeated top-level key contributes each of its maps, and a lookup takes
/// the first map that has the entry. The default catalog is created when
/// the document has none.
fn catalog_maps(document: &mut YamlDocument, catalog: &CatalogKey) -> Vec<NodeId> {
    let top_level = |document: &YamlDocument, key: &str| -> Vec<NodeId> {
        let Some(root) = document.root() else {
            return Vec::new();
        };
        document
            .get_pairs(root, key)
            .filter_map(|pair| pair.value)
            .filter(|value| document.map(*value).is_some())
            .collect()
    };

    match catalog {
        CatalogKey::Default => {
            let maps = top_level(&*document, CATALOG);
            if maps.is_empty() {
                document.ensure_map(CATALOG).into_iter().collect()
            } else {
                maps
            }
        }
        CatalogKey::Named(name) => top_level(&*document, CATALOGS)
            .into_iter()
            .flat_map(|catalogs| document.get_pairs(catalogs, name).collect::<Vec<_>>())
            .filter_map(|pair| pair.value)
            .filter(|value| document.map(*value).is_some())
            .collect(),
    }
}

/// The scalar holding the value of `name`, following an alias to its anchor
fn scalar_target(document: &YamlDocument, value: NodeId, name: &str, filepath: &Path) -> Option<NodeId> {
    match document.node(value).map(|node| &node.kind) {
        Some(NodeKind::Scalar(_)) => Some(value),
        Some(NodeKind::Alias(alias)) => {
            let anchor = document.resolve_alias(value);
            if anchor.is_none() {
                warn!(
                    "Cannot find anchor for alias *{} of {} in {}",
                    alias.name,
                    name,
                    filepath.display()
                );
            }
            anchor
        }
        _ => {
            warn!(
                "Value of {} in {} is not a scalar",
                name,
                filepath.display()
            );
            None
        }
    }
}

/// Replace the file at `path` with `content`.
///
/// The content goes to `<file name>.tmp` next to it first and is renamed into place,
/// so the file is either fully rewritten or left as it was.
async fn write_yaml(path: &Path, content: &str) -> Result<(), CatalogError> {
    let write_error = |source: std::io::Error| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = temp_path(path);
    tokio::fs::write(&temp_path, content)
        .await
        .map_err(write_error)?;
    if let Err(source) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(write_error(source));
    }
    Ok(())
}

/// `pnpm-workspace.yml` -> `pnpm-workspace.yml.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
