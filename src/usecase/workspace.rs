use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use catalog_parser::{load_workspace, write_workspace, CatalogGroup};
use tracing::{debug, info};
use yaml_parser::YamlDocument;

use crate::config::Config;
use crate::entity::FileReport;

use super::resolve::resolve_pins;

/// Load, resolve and (when configured) write back one workspace file.
pub async fn process_workspace(cwd: &Path, relative: &str, config: &Config) -> anyhow::Result<FileReport> {
    let filter = &config.filter;
    let mut groups = load_workspace(cwd, relative, |name| filter.matches(name))
        .await
        .with_context(|| format!("Failed to load {}", relative))?;
    debug!("{} catalogs in {}", groups.len(), relative);

    for group in &mut groups {
        group.resolved = resolve_pins(group, &config.pins);
    }

    let written = if config.write {
        write_groups(&mut groups)
            .await
            .with_context(|| format!("Failed to write {}", relative))?
    } else {
        false
    };

    Ok(FileReport::new(relative, &groups, written))
}

/// Write the groups of one file in order.
///
/// Each group is applied to the document the previous write produced, so a
/// later group does not overwrite the changes of an earlier one.
async fn write_groups(groups: &mut [CatalogGroup]) -> Result<bool, catalog_parser::CatalogError> {
    let mut latest: Option<Arc<YamlDocument>> = None;
    for group in groups.iter_mut() {
        if let Some(document) = &latest {
            group.document = Arc::clone(document);
        }
        if let Some(written) = write_workspace(group).await? {
            info!("Updated {} in {}", group.name, group.filepath.display());
            latest = Some(Arc::new(written));
        }
    }
    Ok(latest.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;

    const WORKSPACE: &str = "pnpm-workspace.yaml";

    fn config(pins: &[(&str, &str)], exclude: &[&str], write: bool) -> Config {
        UserConfig {
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            pins: pins
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            write,
            ..Default::default()
        }
        .compile()
        .unwrap()
    }

    fn setup(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(WORKSPACE), content).unwrap();
        dir
    }

    const TEXT: &str = "# versions\ncatalog:\n  react: &react ^18.2.0\n  react-dom: *react\n  vue: ^3.4.0\ncatalogs:\n  legacy:\n    lodash: ^3.10.0 # old\n";

    #[tokio::test]
    async fn test_dry_run_does_not_write() {
        let dir = setup(TEXT);
        let report = process_workspace(dir.path(), WORKSPACE, &config(&[("vue", "^3.5.0")], &[], false))
            .await
            .unwrap();

        assert!(!report.written);
        assert_eq!(report.change_count(), 1);
        assert_eq!(std::fs::read_to_string(dir.path().join(WORKSPACE)).unwrap(), TEXT);
    }

    #[tokio::test]
    async fn test_write_all_catalogs() {
        let dir = setup(TEXT);
        let config = config(&[("react-dom", "^18.3.1"), ("vue", "^3.5.0"), ("lodash", "^4.17.21")], &[], true);
        let report = process_workspace(dir.path(), WORKSPACE, &config).await.unwrap();

        assert!(report.written);
        assert_eq!(report.change_count(), 3);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(WORKSPACE)).unwrap(),
            "# versions\ncatalog:\n  react: &react ^18.3.1\n  react-dom: *react\n  vue: ^3.5.0\ncatalogs:\n  legacy:\n    lodash: ^4.17.21 # old\n"
        );
    }

    #[tokio::test]
    async fn test_pin_on_one_alias_reaches_the_anchor() {
        let dir = setup("defines:\n  - &react ^18.2.0\ncatalog:\n  react: *react\n  react-dom: *react\n");
        let config = config(&[("react", "^18.3.1")], &[], true);
        let report = process_workspace(dir.path(), WORKSPACE, &config).await.unwrap();

        assert!(report.written);
        assert_eq!(report.change_count(), 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join(WORKSPACE)).unwrap(),
            "defines:\n  - &react ^18.3.1\ncatalog:\n  react: *react\n  react-dom: *react\n"
        );
    }

    #[tokio::test]
    async fn test_excluded_dependency_is_kept() {
        let dir = setup(TEXT);
        let config = config(&[("vue", "^3.5.0"), ("lodash", "^4.17.21")], &["lodash"], true);
        let report = process_workspace(dir.path(), WORKSPACE, &config).await.unwrap();

        assert_eq!(report.change_count(), 1);
        let text = std::fs::read_to_string(dir.path().join(WORKSPACE)).unwrap();
        assert!(text.contains("vue: ^3.5.0"));
        assert!(text.contains("lodash: ^3.10.0 # old"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_workspace(dir.path(), WORKSPACE, &Config::default())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load pnpm-workspace.yaml"));
    }
}
