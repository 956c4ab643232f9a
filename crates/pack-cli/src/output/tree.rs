//! Dependency tree rendering with box-drawing branches.

use pack_resolver::DependencyNode;

use super::colors::ColorSupport;

/// Render a tree, one node per line, root first
pub fn render_tree(root: &DependencyNode, colors: &ColorSupport) -> Vec<String> {
    let mut lines = vec![label(root, colors)];
    render_children(root, "", colors, &mut lines);
    lines
}

fn render_children(node: &DependencyNode, prefix: &str, colors: &ColorSupport, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, branch, label(child, colors)));

        let continuation = if last { "    " } else { "│   " };
        render_children(child, &format!("{}{}", prefix, continuation), colors, lines);
    }
}

fn label(node: &DependencyNode, colors: &ColorSupport) -> String {
    let mut text = format!("{}@{}", colors.bold(&node.name), node.version);
    if node.optional {
        text.push_str(&colors.dim(" (optional)"));
    }
    if node.peer {
        text.push_str(&colors.cyan(" (peer)"));
    }
    if node.circular {
        text.push_str(&colors.yellow(" (circular)"));
    }
    text
}
