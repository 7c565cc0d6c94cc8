use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use yaml_parser::YamlDocument;

/// File name of the pnpm workspace manifest
pub const PNPM_WORKSPACE: &str = "pnpm-workspace.yaml";

/// Top-level key of the default catalog
pub const CATALOG: &str = "catalog";

/// Top-level key holding the named catalogs
pub const CATALOGS: &str = "catalogs";

/// Where a dependency declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencySource {
    /// `catalog:` / `catalogs:` of pnpm-workspace.yaml
    #[default]
    #[serde(rename = "pnpm:catalog")]
    PnpmCatalog,
}

/// A dependency as declared in the workspace file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDependency {
    /// The key it is declared under
    pub name: String,
    /// Declared version range, without any `npm:<package>@` prefix
    pub current_version: String,
    pub source: DependencySource,
    /// Whether this dependency may be updated at all
    pub update: bool,
    /// Real package name behind an `npm:` alias, e.g. `react` for
    /// `my-react: npm:react@^18.2.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
}

/// A dependency together with the version it should move to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependency {
    #[serde(flatten)]
    pub raw: RawDependency,
    /// `None` when no newer version was chosen
    pub target_version: Option<String>,
}

impl ResolvedDependency {
    pub fn new(raw: RawDependency, target_version: Option<String>) -> Self {
        Self {
            raw,
            target_version,
        }
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    /// Whether writing this dependency would change the file
    pub fn is_changed(&self) -> bool {
        self.raw.update
            && self
                .target_version
                .as_deref()
                .is_some_and(|target| target != self.raw.current_version)
    }
}

/// Which catalog of the workspace file a group maps to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    /// The top-level `catalog:` map
    Default,
    /// `catalogs.<name>`
    Named(String),
}

impl CatalogKey {
    /// `catalog:default` maps to [`CatalogKey::Default`], `catalog:<name>` to
    /// [`CatalogKey::Named`].
    pub fn from_group_name(name: &str) -> Self {
        let key = name.replacen("catalog:", "", 1);
        if key == "default" {
            Self::Default
        } else {
            Self::Named(key)
        }
    }
}

/// All dependencies of one catalog of a workspace file
#[derive(Debug, Clone)]
pub struct CatalogGroup {
    /// Derived catalog name, e.g. `catalog:default` or `catalog:react17`
    pub name: String,
    /// Declarations in document order
    pub deps: Vec<RawDependency>,
    /// Target versions, filled in by the caller after loading
    pub resolved: Vec<ResolvedDependency>,
    /// The parsed file, shared by every group loaded from it
    pub document: Arc<YamlDocument>,
    /// Absolute path of the workspace file
    pub filepath: PathBuf,
    /// Path as given by the caller, relative to its working directory
    pub relative: String,
    /// Always [`PNPM_WORKSPACE`]
    pub kind: &'static str,
    /// Workspace files are never published
    pub private: bool,
}

impl CatalogGroup {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::from_group_name(&self.name)
    }

    /// Resolved dependencies whose target differs from the declared version
    pub fn changes(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.resolved.iter().filter(|dep| dep.is_changed())
    }
}
