use super::node::{NodeStatus, ParameterNode};
use super::{CompletionStats, ParameterTree};

impl ParameterTree {
    /// Recompute completion status for every node and count completed leaves.
    ///
    /// A container flagged as an error stays an error here: only a corrective
    /// edit on the container itself (a toggle or a successful text edit) clears it.
    pub fn annotate(&mut self) -> CompletionStats {
        let mut stats = CompletionStats::default();
        for node in &mut self.nodes {
            annotate_node(node, &mut stats);
        }
        stats
    }
}

fn annotate_node(node: &mut ParameterNode, stats: &mut CompletionStats) -> bool {
    let Some(children) = node.children.as_mut() else {
        stats.total += 1;
        if node.status == Some(NodeStatus::Error) {
            return false;
        }
        let completed = node.is_completed_input();
        if completed {
            stats.completed += 1;
        }
        node.status = completed.then_some(NodeStatus::Completed);
        return completed;
    };

    let mut all_completed = true;
    for child in children.iter_mut() {
        // every child is visited so the counts cover the whole tree
        let completed = annotate_node(child, stats);
        all_completed = all_completed && completed;
    }

    if node.status == Some(NodeStatus::Error) {
        return false;
    }
    node.status = all_completed.then_some(NodeStatus::Completed);
    all_completed
}
