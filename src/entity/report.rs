use std::fmt;

use catalog_parser::{CatalogGroup, ResolvedDependency};
use serde::Serialize;

/// Outcome of processing one workspace file
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path as given on the command line
    pub path: String,
    pub catalogs: Vec<CatalogReport>,
    /// Whether the file was rewritten
    pub written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(path: &str, groups: &[CatalogGroup], written: bool) -> Self {
        Self {
            path: path.to_string(),
            catalogs: groups.iter().map(CatalogReport::from).collect(),
            written,
            error: None,
        }
    }

    pub fn failed(path: &str, error: &anyhow::Error) -> Self {
        Self {
            path: path.to_string(),
            error: Some(format!("{:#}", error)),
            ..Default::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn change_count(&self) -> usize {
        self.catalogs.iter().map(|c| c.changes.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReport {
    /// `catalog:default`, `catalog:<name>`
    pub name: String,
    pub dependencies: usize,
    pub changes: Vec<Change>,
}

impl From<&CatalogGroup> for CatalogReport {
    fn from(group: &CatalogGroup) -> Self {
        Self {
            name: group.name.clone(),
            dependencies: group.deps.len(),
            changes: group.changes().map(Change::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl From<&ResolvedDependency> for Change {
    fn from(dep: &ResolvedDependency) -> Self {
        Self {
            name: dep.name().to_string(),
            from: dep.raw.current_version.clone(),
            to: dep.target_version.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return writeln!(f, "{}: {}", self.path, error);
        }
        writeln!(f, "{}", self.path)?;
        if self.catalogs.is_empty() {
            return writeln!(f, "  no catalogs");
        }
        for catalog in &self.catalogs {
            writeln!(
                f,
                "  {} ({} dependencies)",
                catalog.name, catalog.dependencies
            )?;
            let width = catalog
                .changes
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(0);
            for change in &catalog.changes {
                writeln!(
                    f,
                    "    {:width$}  {} -> {}",
                    change.name,
                    change.from,
                    change.to,
                    width = width
                )?;
            }
        }
        match (self.change_count(), self.written) {
            (0, _) => writeln!(f, "  up to date"),
            (n, true) => writeln!(f, "  wrote {} change(s)", n),
            (n, false) => writeln!(f, "  {} change(s), run with --write to apply", n),
        }
    }
}
