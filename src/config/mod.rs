use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::link::StrategyKind;

pub const CONFIG_FILE: &str = ".deplink.toml";
pub const DEFAULT_RETRIES: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub linker: LinkerSection,
    #[serde(default)]
    pub hooks: HooksSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkerSection {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub retries: Option<usize>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HooksSection {
    #[serde(default)]
    pub post_link: Vec<String>,
}

/// Reads `.deplink.toml` from the working directory. A missing file is
/// not an error; every field has a default.
pub fn load_config(root: &Path) -> Result<ConfigFile, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(ConfigFile::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml { path, source })
}

/// Fully resolved settings for one run, merged once from the config file
/// and CLI flags. Passed by reference into discovery, the resolution
/// engine, and the executor; two runs with different settings can share a
/// process without interfering.
#[derive(Debug, Clone)]
pub struct LinkerOptions {
    pub strategy: StrategyKind,
    pub dry_run: bool,
    pub force: bool,
    pub verbose: u8,
    pub quiet: bool,
    pub retries: usize,
    pub ignore: Vec<String>,
    pub post_link: Vec<String>,
    pub jobs: Option<usize>,
}

impl Default for LinkerOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::PackageManager,
            dry_run: false,
            force: false,
            verbose: 0,
            quiet: false,
            retries: DEFAULT_RETRIES,
            ignore: Vec::new(),
            post_link: Vec::new(),
            jobs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{load_config, ConfigError, CONFIG_FILE};

    fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("deplink-{prefix}-{pid}-{nanos}"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let root = unique_temp_dir("config-missing");
        fs::create_dir_all(&root).expect("create temp dir");

        let config = load_config(&root).expect("load config");
        assert!(config.linker.strategy.is_none());
        assert!(config.linker.retries.is_none());
        assert!(config.hooks.post_link.is_empty());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn parses_all_sections() {
        let root = unique_temp_dir("config-full");
        fs::create_dir_all(&root).expect("create temp dir");
        fs::write(
            root.join(CONFIG_FILE),
            r#"[linker]
strategy = "symlink"
retries = 5
ignore = ["build-*", "docs"]

[hooks]
post_link = ["npm run build"]
"#,
        )
        .expect("write config");

        let config = load_config(&root).expect("load config");
        assert_eq!(config.linker.strategy.as_deref(), Some("symlink"));
        assert_eq!(config.linker.retries, Some(5));
        assert_eq!(config.linker.ignore, vec!["build-*", "docs"]);
        assert_eq!(config.hooks.post_link, vec!["npm run build"]);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let root = unique_temp_dir("config-invalid");
        fs::create_dir_all(&root).expect("create temp dir");
        fs::write(root.join(CONFIG_FILE), "[linker\nstrategy = ").expect("write config");

        let err = load_config(&root).expect_err("invalid config");
        assert!(matches!(err, ConfigError::Toml { .. }));

        let _ = fs::remove_dir_all(root);
    }
}
