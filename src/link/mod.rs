use std::path::PathBuf;

use crate::core::command::Command;
use crate::core::module::{ModuleName, ModuleSet};

pub mod npm;
pub mod symlink;
pub mod traits;

pub use traits::LinkStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    PackageManager,
    Symlink,
}

pub fn parse_strategy(value: &str) -> Option<StrategyKind> {
    match value {
        "npm-link" | "npm" | "package-manager" => Some(StrategyKind::PackageManager),
        "symlink" | "symlinks" => Some(StrategyKind::Symlink),
        _ => None,
    }
}

pub fn strategy_for(kind: StrategyKind) -> Box<dyn LinkStrategy> {
    match kind {
        StrategyKind::PackageManager => Box::new(npm::NpmLinkStrategy),
        StrategyKind::Symlink => Box::new(symlink::SymlinkStrategy),
    }
}

pub(crate) fn install_command() -> Command {
    Command::Shell("npm install".to_string())
}

pub(crate) fn path_of(modules: &ModuleSet, name: &ModuleName) -> PathBuf {
    modules
        .get(name)
        .map(|module| module.path.clone())
        .unwrap_or_else(|| PathBuf::from(name.as_str()))
}

pub(crate) fn deps_without(deps: &[ModuleName], excluded: &ModuleName) -> Vec<ModuleName> {
    deps.iter().filter(|dep| *dep != excluded).cloned().collect()
}
