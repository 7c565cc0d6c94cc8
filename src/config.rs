use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::debug;

use crate::entity::PackageFilter;

#[derive(Default, Debug, Clone)]
pub struct Config {
    /// Decides which dependencies may be updated
    pub filter: PackageFilter,
    /// Target version per dependency name
    pub pins: BTreeMap<String, String>,
    /// Persist changes instead of only reporting them
    pub write: bool,
}

#[derive(Default, Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub pins: BTreeMap<String, String>,
    #[serde(default)]
    pub write: bool,
}

impl UserConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Layer command line options on top of the file config. Patterns are
    /// appended, pins given on the command line win.
    pub fn merge(
        mut self,
        include: Vec<String>,
        exclude: Vec<String>,
        pins: Vec<(String, String)>,
        write: bool,
    ) -> Self {
        self.include.extend(include);
        self.exclude.extend(exclude);
        self.pins.extend(pins);
        self.write |= write;
        self
    }

    pub fn compile(self) -> anyhow::Result<Config> {
        let filter = PackageFilter::new(&self.include, &self.exclude)?;
        Ok(Config {
            filter,
            pins: self.pins,
            write: self.write,
        })
    }
}

pub static GLOBAL_CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

pub fn initialize_config(config: UserConfig) -> anyhow::Result<()> {
    let compiled = config.compile()?;
    let mut global_config = GLOBAL_CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *global_config = compiled;
    debug!("config {:?}", global_config);
    Ok(())
}

/// Snapshot of the current global config
pub fn current_config() -> Config {
    GLOBAL_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_config_from_json() {
        let config: UserConfig = serde_json::from_str(
            r#"{"include": ["react*"], "exclude": ["/^@types//"], "pins": {"react": "^19.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(config.include, vec!["react*"]);
        assert_eq!(config.exclude, vec!["/^@types//"]);
        assert_eq!(config.pins["react"], "^19.0.0");
        assert!(!config.write);

        let empty: UserConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.include.is_empty());
        assert!(empty.pins.is_empty());
    }

    #[test]
    fn test_merge_prefers_command_line_pins() {
        let mut file = UserConfig::default();
        file.pins.insert("react".into(), "^18.3.1".into());
        file.include.push("react".into());

        let merged = file.merge(
            vec!["vue".into()],
            vec![],
            vec![("react".into(), "^19.0.0".into())],
            true,
        );
        assert_eq!(merged.include, vec!["react", "vue"]);
        assert_eq!(merged.pins["react"], "^19.0.0");
        assert!(merged.write);
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        let config = UserConfig {
            include: vec!["/(unclosed/".into()],
            ..Default::default()
        };
        assert!(config.compile().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appraiser.json");
        std::fs::write(&path, r#"{"write": true, "exclude": ["lodash"]}"#).unwrap();

        let config = UserConfig::from_file(&path).unwrap();
        assert!(config.write);
        assert_eq!(config.exclude, vec!["lodash"]);

        assert!(UserConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
