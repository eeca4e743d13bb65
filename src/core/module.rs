use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ModuleName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A locally checked-out package: unique name, on-disk path, and the
/// dependency names its manifest declares. Immutable after discovery.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: ModuleName,
    pub path: PathBuf,
    pub dependencies: Vec<ModuleName>,
}

/// Module table keyed by name. Entries keep discovery order, which is the
/// iteration order every downstream pass relies on, so lookups go through
/// a side index instead of reordering the entries.
#[derive(Debug, Default)]
pub struct ModuleSet {
    modules: Vec<Module>,
    index: HashMap<ModuleName, usize>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and keeps the existing entry) when the name is
    /// already taken.
    pub fn insert(&mut self, module: Module) -> bool {
        if self.index.contains_key(&module.name) {
            return false;
        }
        self.index.insert(module.name.clone(), self.modules.len());
        self.modules.push(module);
        true
    }

    pub fn get(&self, name: &ModuleName) -> Option<&Module> {
        self.index.get(name).map(|&idx| &self.modules[idx])
    }

    pub fn contains(&self, name: &ModuleName) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &ModuleName> {
        self.modules.iter().map(|module| &module.name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Module, ModuleName, ModuleSet};

    fn mk_module(name: &str) -> Module {
        Module {
            name: ModuleName::new(name),
            path: PathBuf::from(format!("/ws/{name}")),
            dependencies: Vec::new(),
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut set = ModuleSet::new();
        set.insert(mk_module("zeta"));
        set.insert(mk_module("alpha"));
        set.insert(mk_module("mid"));

        let names: Vec<&str> = set.names().map(ModuleName::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut set = ModuleSet::new();
        assert!(set.insert(mk_module("core")));
        assert!(!set.insert(mk_module("core")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let mut set = ModuleSet::new();
        set.insert(mk_module("core"));

        let found = set.get(&ModuleName::new("core")).expect("core module");
        assert_eq!(found.path, PathBuf::from("/ws/core"));
        assert!(set.get(&ModuleName::new("missing")).is_none());
    }
}
