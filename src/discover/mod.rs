use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use thiserror::Error;

use crate::config::LinkerOptions;
use crate::core::module::{Module, ModuleName, ModuleSet};
use crate::error::Result;
use crate::util::{output, parallel};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to parse manifest at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("manifest at {0} has no name field")]
    MissingName(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scan the first-level child directories of `root` and read a manifest
/// from each one that carries one. Children whose manifest fails to parse
/// or lacks a name are skipped with a warning; an unreadable `root` is
/// fatal. Children are visited in file-name order, so the resulting set
/// iterates in a stable order on every platform.
pub fn discover(root: &Path, options: &LinkerOptions) -> Result<ModuleSet> {
    let directories = candidate_directories(root, &options.ignore)?;
    if options.verbose > 0 {
        output::debug(&format!(
            "scanning {} candidate directories under {}",
            directories.len(),
            root.display()
        ));
    }

    let results = parallel::map_bounded(directories, options.jobs, |dir| {
        let outcome = read_manifest(&dir);
        (dir, outcome)
    });

    let mut modules = ModuleSet::new();
    for (dir, outcome) in results {
        match outcome {
            Ok(module) => {
                if !modules.insert(module) {
                    output::warn(&format!(
                        "duplicate package name in {}, keeping the first checkout",
                        dir.display()
                    ));
                }
            }
            Err(err) => output::warn(&format!("skipping {}: {err}", dir.display())),
        }
    }

    Ok(modules)
}

/// Read and parse the manifest of a single project directory. Unlike the
/// bulk scan, every failure propagates to the caller.
pub fn read_manifest(dir: &Path) -> std::result::Result<Module, ManifestError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(ManifestError::NotFound(path));
    }

    let contents = fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|source| {
        ManifestError::Json {
            path: path.clone(),
            source,
        }
    })?;

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ManifestError::MissingName(path.clone()))?;

    // runtime and development dependencies are merged; only the names
    // matter for name-level linking
    let mut dependencies = Vec::new();
    for key in ["dependencies", "devDependencies"] {
        if let Some(map) = value.get(key).and_then(|v| v.as_object()) {
            for dep in map.keys() {
                let dep = ModuleName::new(dep.clone());
                if !dependencies.contains(&dep) {
                    dependencies.push(dep);
                }
            }
        }
    }

    Ok(Module {
        name: ModuleName::new(name),
        path: dir.to_path_buf(),
        dependencies,
    })
}

fn candidate_directories(root: &Path, ignore: &[String]) -> Result<Vec<PathBuf>> {
    let patterns: Vec<Pattern> = ignore
        .iter()
        .filter_map(|pat| Pattern::new(pat).ok())
        .collect();

    let mut directories = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns.iter().any(|pattern| pattern.matches(&name)) {
            continue;
        }
        if !path.join(MANIFEST_FILE).is_file() {
            continue;
        }
        directories.push(path);
    }
    directories.sort();

    Ok(directories)
}
