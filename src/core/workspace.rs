use std::path::{Path, PathBuf};

use crate::config::LinkerOptions;
use crate::core::module::ModuleSet;
use crate::discover;
use crate::error::Result;
use crate::graph::builder::build_graph;
use crate::graph::DependencyGraph;

#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub modules: ModuleSet,
    pub graph: DependencyGraph,
}

impl Workspace {
    pub fn discover(root: impl AsRef<Path>, options: &LinkerOptions) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let modules = discover::discover(&root, options)?;
        let graph = build_graph(&modules);

        Ok(Self {
            root,
            modules,
            graph,
        })
    }
}
