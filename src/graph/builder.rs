use crate::core::module::{Module, ModuleName, ModuleSet};
use crate::graph::{DependencyGraph, GraphNode};

/// Derive the dependency graph for a set of discovered modules. Total over
/// well-formed input: dependencies on packages outside the set are dropped
/// (they cannot be linked locally), a module with no local edges gets
/// empty edge lists, and only a direct two-party mutual reference marks a
/// node cyclic.
pub fn build_graph(modules: &ModuleSet) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for module in modules.iter() {
        let depends_on = local_dependencies(module, modules);
        let referenced_by = referents_of(&module.name, modules);
        let cyclic = depends_on.iter().any(|dep| referenced_by.contains(dep));

        graph.push(GraphNode {
            name: module.name.clone(),
            depends_on,
            referenced_by,
            cyclic,
        });
    }
    graph
}

fn local_dependencies(module: &Module, modules: &ModuleSet) -> Vec<ModuleName> {
    module
        .dependencies
        .iter()
        .filter(|dep| modules.contains(dep))
        .cloned()
        .collect()
}

fn referents_of(name: &ModuleName, modules: &ModuleSet) -> Vec<ModuleName> {
    modules
        .iter()
        .filter(|other| other.name != *name)
        .filter(|other| other.dependencies.contains(name))
        .map(|other| other.name.clone())
        .collect()
}
