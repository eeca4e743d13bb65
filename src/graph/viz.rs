use crate::core::module::ModuleName;
use crate::graph::{DependencyGraph, GraphNode};

pub fn render_tree(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    for (idx, root) in roots(graph).iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(root.name.as_str());
        if root.cyclic {
            out.push_str(" (cyclic)");
        }
        out.push('\n');
        let mut path = Vec::new();
        render_children(&root.name, graph, "", &mut path, &mut out);
    }
    out
}

pub fn render_dot(graph: &DependencyGraph) -> String {
    let mut out = String::from("digraph deplink {\n");
    for node in graph.iter() {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            node.name.as_str(),
            escape_dot_label(node.name.as_str())
        ));
    }
    for node in graph.iter() {
        for dep in &node.depends_on {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                node.name.as_str(),
                dep.as_str()
            ));
        }
    }
    out.push_str("}\n");
    out
}

// modules nothing depends on come first; a fully cyclic graph has no
// such node, so fall back to every node
fn roots(graph: &DependencyGraph) -> Vec<&GraphNode> {
    let top: Vec<&GraphNode> = graph
        .iter()
        .filter(|node| node.referenced_by.is_empty())
        .collect();
    if top.is_empty() {
        graph.iter().collect()
    } else {
        top
    }
}

fn render_children(
    node: &ModuleName,
    graph: &DependencyGraph,
    prefix: &str,
    path: &mut Vec<ModuleName>,
    out: &mut String,
) {
    let mut children = graph
        .get(node)
        .map(|node| node.depends_on.clone())
        .unwrap_or_default();
    children.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for (idx, child) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(child.as_str());
        if path.iter().any(|name| name == child) {
            out.push_str(" (cycle)");
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push(child.clone());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_children(child, graph, &next_prefix, path, out);
        path.pop();
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
