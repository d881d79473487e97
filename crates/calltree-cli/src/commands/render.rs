//! Terminal rendering of parameter trees

use std::fmt::Write;

use console::style;

use calltree_core::{CompletionStats, NodeStatus, ParameterNode, ParameterTree};

/// Print the tree, one node per line, with completion markers
pub fn print_tree(tree: &ParameterTree) {
    print!("{}", render_tree(tree));
}

/// Render the tree as print_tree shows it. Collapsed containers hide their children.
pub fn render_tree(tree: &ParameterTree) -> String {
    let mut out = String::new();
    for node in tree.nodes() {
        render_node(&mut out, node, 1);
    }
    out
}

fn render_node(out: &mut String, node: &ParameterNode, depth: usize) {
    let marker = match node.status {
        Some(NodeStatus::Completed) => style("✓").green(),
        Some(NodeStatus::Error) => style("✗").red(),
        None => style("·").dim(),
    };
    let indent = "  ".repeat(depth);

    // Writing into a String cannot fail
    if node.is_leaf() {
        let _ = writeln!(
            out,
            "{}{} {} {} = {}",
            indent,
            marker,
            node.name,
            style(&node.declared_type).dim(),
            node.value.to_json()
        );
        return;
    }

    let open = node.is_open.unwrap_or(true);
    let _ = writeln!(
        out,
        "{}{} {} {}{}",
        indent,
        marker,
        style(&node.name).bold(),
        style(&node.declared_type).dim(),
        if open { "" } else { " (collapsed)" }
    );
    if !open {
        return;
    }
    for child in node.children() {
        render_node(out, child, depth + 1);
    }
}

/// One-line progress summary
pub fn progress(stats: &CompletionStats) -> String {
    let summary = format!("{}/{} fields", stats.completed, stats.total);
    if stats.is_complete() {
        style(summary).green().to_string()
    } else {
        style(summary).yellow().to_string()
    }
}

#[cfg(test)]
mod tests {
    use calltree_core::{ParamInfo, TreeBuilder};

    use super::*;

    fn lines(tree: &ParameterTree) -> Vec<String> {
        console::strip_ansi_codes(&render_tree(tree))
            .lines()
            .map(|line| line.trim().to_string())
            .collect()
    }

    #[test]
    fn test_collapsed_container_hides_children() {
        let params = [ParamInfo {
            name: "pair".to_string(),
            param_type: "uint256[2]".to_string(),
            components: None,
        }];
        let mut tree = TreeBuilder::new().build(&params).unwrap();
        tree.set_value(&[0, 0], "7").unwrap();

        let open = lines(&tree);
        assert_eq!(open.len(), 3);
        assert!(open[0].ends_with("pair uint256[2]"));
        assert!(open[1].contains("position0 uint256 = 7"));
        assert!(open[2].contains("position1 uint256 = null"));

        tree.toggle(&[0]).unwrap();
        let collapsed = lines(&tree);
        assert_eq!(collapsed.len(), 1);
        assert!(collapsed[0].ends_with("pair uint256[2] (collapsed)"));
    }
}
