use crate::core::command::Command;
use crate::core::module::{ModuleName, ModuleSet};
use crate::graph::GraphNode;
use crate::link::traits::LinkStrategy;
use crate::link::{deps_without, install_command, path_of};

/// Wires dependencies through the package manager's global link registry:
/// `npm link <deps>` pulls resolved dependencies in, `npm link` with no
/// arguments registers the module itself for later referents.
pub struct NpmLinkStrategy;

fn npm_link(dependencies: &[ModuleName]) -> Command {
    if dependencies.is_empty() {
        Command::Shell("npm link".to_string())
    } else {
        let names: Vec<&str> = dependencies.iter().map(ModuleName::as_str).collect();
        Command::Shell(format!("npm link {}", names.join(" ")))
    }
}

impl LinkStrategy for NpmLinkStrategy {
    fn id(&self) -> &'static str {
        "npm-link"
    }

    fn link_module(&self, node: &GraphNode, modules: &ModuleSet) -> Vec<Command> {
        let mut commands = vec![Command::Cd(path_of(modules, &node.name))];
        if !node.depends_on.is_empty() {
            commands.push(npm_link(&node.depends_on));
        }
        commands.push(install_command());
        if !node.referenced_by.is_empty() {
            commands.push(npm_link(&[]));
        }
        commands
    }

    fn link_cycle(
        &self,
        node: &GraphNode,
        partner: &GraphNode,
        modules: &ModuleSet,
    ) -> Vec<Command> {
        let node_path = path_of(modules, &node.name);

        // first: link the node to everything except its partner, then
        // register it so the partner can link back
        let kept = deps_without(&node.depends_on, &partner.name);
        let mut commands = vec![Command::Cd(node_path.clone())];
        if !kept.is_empty() {
            commands.push(npm_link(&kept));
        }
        commands.push(install_command());
        commands.push(npm_link(&[]));

        // second: materialize the partner fully; its edge back to the
        // node is kept, the break is asymmetric
        commands.push(Command::Cd(path_of(modules, &partner.name)));
        if !partner.depends_on.is_empty() {
            commands.push(npm_link(&partner.depends_on));
        }
        commands.push(install_command());
        if !partner.referenced_by.is_empty() {
            commands.push(npm_link(&[]));
        }

        // third: close the loop
        commands.push(Command::Cd(node_path));
        commands.push(npm_link(std::slice::from_ref(&partner.name)));
        commands
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::core::command::Command;
    use crate::core::module::{Module, ModuleName, ModuleSet};
    use crate::graph::GraphNode;
    use crate::link::traits::LinkStrategy;

    use super::NpmLinkStrategy;

    fn mk_modules(names: &[&str]) -> ModuleSet {
        let mut set = ModuleSet::new();
        for name in names {
            set.insert(Module {
                name: ModuleName::new(*name),
                path: PathBuf::from(format!("/ws/{name}")),
                dependencies: Vec::new(),
            });
        }
        set
    }

    fn mk_node(name: &str, depends_on: &[&str], referenced_by: &[&str], cyclic: bool) -> GraphNode {
        GraphNode {
            name: ModuleName::new(name),
            depends_on: depends_on.iter().map(|dep| ModuleName::new(*dep)).collect(),
            referenced_by: referenced_by.iter().map(|dep| ModuleName::new(*dep)).collect(),
            cyclic,
        }
    }

    fn lines(commands: &[Command]) -> Vec<String> {
        commands.iter().map(Command::to_string).collect()
    }

    #[test]
    fn plain_module_links_installs_and_registers() {
        let modules = mk_modules(&["app", "core", "util"]);
        let node = mk_node("app", &["core", "util"], &["site"], false);

        let commands = NpmLinkStrategy.link_module(&node, &modules);
        assert_eq!(
            lines(&commands),
            vec!["cd /ws/app", "npm link core util", "npm install", "npm link"]
        );
    }

    #[test]
    fn leaf_module_without_referents_only_installs() {
        let modules = mk_modules(&["solo"]);
        let node = mk_node("solo", &[], &[], false);

        let commands = NpmLinkStrategy.link_module(&node, &modules);
        assert_eq!(lines(&commands), vec!["cd /ws/solo", "npm install"]);
    }

    #[test]
    fn cycle_break_strips_only_the_first_side() {
        let modules = mk_modules(&["left", "right", "core"]);
        let left = mk_node("left", &["core", "right"], &["right"], true);
        let right = mk_node("right", &["left"], &["left"], true);

        let commands = NpmLinkStrategy.link_cycle(&left, &right, &modules);
        assert_eq!(
            lines(&commands),
            vec![
                "cd /ws/left",
                "npm link core",
                "npm install",
                "npm link",
                "cd /ws/right",
                "npm link left",
                "npm install",
                "npm link",
                "cd /ws/left",
                "npm link right",
            ]
        );
    }

    #[test]
    fn cycle_break_leaves_the_node_untouched() {
        let modules = mk_modules(&["left", "right"]);
        let left = mk_node("left", &["right"], &["right"], true);
        let right = mk_node("right", &["left"], &["left"], true);

        let before = left.clone();
        let _ = NpmLinkStrategy.link_cycle(&left, &right, &modules);
        assert_eq!(left, before);
    }
}
