use crate::core::command::Command;
use crate::core::module::ModuleSet;
use crate::graph::GraphNode;

/// Policy turning one resolved step into the concrete commands that wire
/// its links. Implementations are pure: they read the node and the module
/// table and emit commands, never touching the filesystem or mutating
/// graph data. When a cycle is broken, the stripped edge list is computed
/// locally; the caller's node is left as-is.
pub trait LinkStrategy: Send + Sync {
    fn id(&self) -> &'static str;
    fn link_module(&self, node: &GraphNode, modules: &ModuleSet) -> Vec<Command>;
    fn link_cycle(&self, node: &GraphNode, partner: &GraphNode, modules: &ModuleSet)
        -> Vec<Command>;
}
