use std::path::PathBuf;

use crate::core::command::Command;
use crate::core::module::{ModuleName, ModuleSet};
use crate::graph::GraphNode;
use crate::link::traits::LinkStrategy;
use crate::link::{deps_without, install_command, path_of};

pub const LINK_TARGET_DIR: &str = "node_modules";

/// Wires dependencies by planting a symlink per edge inside the module's
/// link-target directory. No registration step exists in this strategy;
/// symlinks need no registry, so the cyclic shape keeps the three phases
/// but drops the register-self commands.
pub struct SymlinkStrategy;

fn symlink_to(modules: &ModuleSet, dep: &ModuleName) -> Command {
    Command::Symlink {
        source: path_of(modules, dep),
        dest: PathBuf::from(LINK_TARGET_DIR).join(dep.as_str()),
    }
}

impl LinkStrategy for SymlinkStrategy {
    fn id(&self) -> &'static str {
        "symlink"
    }

    fn link_module(&self, node: &GraphNode, modules: &ModuleSet) -> Vec<Command> {
        let mut commands = vec![Command::Cd(path_of(modules, &node.name))];
        for dep in &node.depends_on {
            commands.push(symlink_to(modules, dep));
        }
        commands.push(install_command());
        commands
    }

    fn link_cycle(
        &self,
        node: &GraphNode,
        partner: &GraphNode,
        modules: &ModuleSet,
    ) -> Vec<Command> {
        let node_path = path_of(modules, &node.name);

        let mut commands = vec![Command::Cd(node_path.clone())];
        for dep in deps_without(&node.depends_on, &partner.name) {
            commands.push(symlink_to(modules, &dep));
        }
        commands.push(install_command());

        commands.push(Command::Cd(path_of(modules, &partner.name)));
        for dep in &partner.depends_on {
            commands.push(symlink_to(modules, dep));
        }
        commands.push(install_command());

        commands.push(Command::Cd(node_path));
        commands.push(symlink_to(modules, &partner.name));
        commands
    }
}
