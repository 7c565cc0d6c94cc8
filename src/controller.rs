use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::error;

use crate::config::current_config;
use crate::entity::{FileReport, PNPM_WORKSPACE};
use crate::usecase::process_workspace;

/// Runs every requested workspace file against the global config
#[derive(Debug)]
pub struct Appraiser {
    cwd: PathBuf,
}

impl Appraiser {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    /// Process `paths` concurrently, one report per path in the given order.
    ///
    /// Files do not share any state, so a failure in one is reported in its
    /// own [`FileReport`] and the others carry on.
    pub async fn run(&self, paths: &[String]) -> Vec<FileReport> {
        let config = current_config();
        let tasks = paths.iter().map(|path| {
            let relative = workspace_file(&self.cwd, path);
            let config = &config;
            async move {
                match process_workspace(&self.cwd, &relative, config).await {
                    Ok(report) => report,
                    Err(e) => {
                        error!("{:#}", e);
                        FileReport::failed(&relative, &e)
                    }
                }
            }
        });
        join_all(tasks).await
    }
}

/// A directory stands for the workspace file inside it
fn workspace_file(cwd: &Path, path: &str) -> String {
    if cwd.join(path).is_dir() {
        Path::new(path).join(PNPM_WORKSPACE).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("app")).unwrap();

        assert_eq!(
            workspace_file(dir.path(), "app"),
            Path::new("app").join(PNPM_WORKSPACE).to_string_lossy()
        );
        assert_eq!(workspace_file(dir.path(), "custom.yaml"), "custom.yaml");
    }

    #[tokio::test]
    async fn test_run_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(
            dir.path().join("a").join(PNPM_WORKSPACE),
            "catalog:\n  react: ^18.2.0\n",
        )
        .unwrap();

        let appraiser = Appraiser::new(dir.path().to_path_buf());
        let reports = appraiser
            .run(&["a".to_string(), "missing.yaml".to_string()])
            .await;

        assert_eq!(reports.len(), 2);
        assert!(!reports[0].is_failed());
        assert_eq!(reports[0].catalogs[0].name, "catalog:default");
        assert!(reports[1].is_failed());
        assert_eq!(reports[1].path, "missing.yaml");
    }
}
