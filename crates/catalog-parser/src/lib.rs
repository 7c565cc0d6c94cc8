//! # catalog-parser
//!
//! Load the version catalogs of a `pnpm-workspace.yaml` and write updated
//! versions back without touching comments, anchors or aliases.
//!
//! ## Overview
//!
//! The `catalog-parser` crate sits on top of `yaml-parser`:
//! - **yaml-parser**: lossless YAML tree, walker and anchor resolution
//! - **catalog-parser**: finds version declarations in that tree and edits them
//!
//! ## Data Model
//!
//! Loading produces one [`CatalogGroup`] per catalog, in the order catalogs
//! are first seen:
//! - `catalog:` entries end up in `catalog:default`
//! - `catalogs.<name>` entries end up in `catalog:<name>`
//!
//! Every group of a file shares the same parsed document. A dependency whose
//! value is an alias (`react-dom: *react`) reads the anchored scalar, and
//! writing it updates that anchor, so all aliases stay in sync.
//!
//! ## Example
//!
//! ```ignore
//! use catalog_parser::{load_workspace, write_workspace, ResolvedDependency};
//! use std::path::Path;
//!
//! let mut groups = load_workspace(Path::new("."), "pnpm-workspace.yaml", |_| true).await?;
//! let group = &mut groups[0];
//! group.resolved = group
//!     .deps
//!     .iter()
//!     .map(|dep| ResolvedDependency::new(dep.clone(), Some("^19.0.0".into())))
//!     .collect();
//! if let Some(written) = write_workspace(group).await? {
//!     println!("{}", written);
//! }
//! ```

#[cfg(test)]
mod capture;
mod catalog_name;
mod dependency;
mod entity;
mod error;
mod loader;
mod version;
mod writer;

pub use catalog_name::catalog_name;
pub use dependency::{dump_dependencies, parse_dependency};
pub use entity::{
    CatalogGroup, CatalogKey, DependencySource, RawDependency, ResolvedDependency, CATALOG,
    CATALOGS, PNPM_WORKSPACE,
};
pub use error::CatalogError;
pub use loader::{load_catalogs, load_workspace};
pub use version::{coerce_version, is_coercible_version};
pub use writer::{apply_versions, write_workspace};
