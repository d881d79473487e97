//! Parameter trees
//!
//! A [`ParameterTree`] mirrors the declared argument shape of one contract
//! method. Nodes are addressed by paths of child indices from the root:
//! `[0]` is the first argument, `[0, 1]` the second child of the first
//! argument, and so on.
//!
//! - [`TreeBuilder`] creates a fresh tree from declared arguments
//! - mutations (`set_value`, `toggle`, `grow`, `delete`, `resize`) edit one node
//! - [`ParameterTree::annotate`] recomputes completion status
//! - [`ParameterTree::values`] / [`ParameterTree::apply_values`] convert to and
//!   from the flat text view

mod builder;
mod completion;
mod mutate;
mod node;
mod serialize;

use serde::Serialize;

use crate::error::{Error, Result};

pub use builder::TreeBuilder;
pub use node::{
    position_name, LeafValue, Length, LengthKind, NodeStatus, ParameterNode, ParsedType, TypeKind,
};

/// Result of a mutation that may be unsupported for the addressed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Applied,
    /// The mutation does not apply to this node (e.g. growing a fixed array)
    Ignored,
}

/// Leaf counts for progress display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
}

impl CompletionStats {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Element count any single array may reach unless configured otherwise
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1024;

/// Upper bound on the nodes one tree may hold, however its arrays nest
pub const MAX_TREE_NODES: usize = 1 << 18;

/// Ordered top-level parameters of one method, one per declared argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterTree {
    nodes: Vec<ParameterNode>,
    #[serde(skip)]
    max_array_length: usize,
}

impl Default for ParameterTree {
    fn default() -> Self {
        Self::from_nodes(Vec::new())
    }
}

impl ParameterTree {
    pub fn from_nodes(nodes: Vec<ParameterNode>) -> Self {
        Self {
            nodes,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }

    /// Cap the element count of every array in the tree
    pub fn with_max_array_length(mut self, max: usize) -> Self {
        self.max_array_length = max;
        self
    }

    pub fn max_array_length(&self) -> usize {
        self.max_array_length
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ParameterNode::node_count).sum()
    }

    /// Nodes that may still be added before the tree reaches [`MAX_TREE_NODES`]
    pub(crate) fn node_budget(&self) -> usize {
        MAX_TREE_NODES.saturating_sub(self.node_count())
    }

    pub fn nodes(&self) -> &[ParameterNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the node at `path`
    pub fn get(&self, path: &[usize]) -> Option<&ParameterNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for index in rest {
            node = node.children.as_ref()?.get(*index)?;
        }
        Some(node)
    }

    /// Look up the node at `path` for mutation. Only the addressed branch is visited.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut ParameterNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for index in rest {
            node = node.children.as_mut()?.get_mut(*index)?;
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, path: &[usize]) -> Result<&mut ParameterNode> {
        self.get_mut(path)
            .ok_or_else(|| Error::PathNotFound(path.to_vec()))
    }

    /// True when every top-level argument is completed
    pub fn is_complete(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.status == Some(NodeStatus::Completed))
    }

    /// True when any node carries an error flag
    pub fn has_errors(&self) -> bool {
        fn walk(node: &ParameterNode) -> bool {
            node.status == Some(NodeStatus::Error) || node.children().iter().any(walk)
        }
        self.nodes.iter().any(walk)
    }

    /// Visit every leaf with its path, in declaration order
    pub fn leaves(&self) -> Vec<(Vec<usize>, &ParameterNode)> {
        fn walk<'a>(
            node: &'a ParameterNode,
            path: &mut Vec<usize>,
            out: &mut Vec<(Vec<usize>, &'a ParameterNode)>,
        ) {
            if node.is_leaf() {
                out.push((path.clone(), node));
                return;
            }
            for (index, child) in node.children().iter().enumerate() {
                path.push(index);
                walk(child, path, out);
                path.pop();
            }
        }

        let mut out = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let mut path = vec![index];
            walk(node, &mut path, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ParamInfo;

    fn param(name: &str, ty: &str) -> ParamInfo {
        ParamInfo {
            name: name.to_string(),
            param_type: ty.to_string(),
            components: None,
        }
    }

    #[test]
    fn test_get_follows_path() {
        let params = [param("to", "address"), param("ids", "uint256[2]")];
        let tree = TreeBuilder::new().build(&params).unwrap();

        assert_eq!(tree.get(&[0]).unwrap().name, "to");
        assert_eq!(tree.get(&[1, 1]).unwrap().name, "position1");
        assert!(tree.get(&[1, 2]).is_none());
        assert!(tree.get(&[0, 0]).is_none());
        assert!(tree.get(&[]).is_none());
    }

    #[test]
    fn test_leaves_in_order() {
        let params = [param("ids", "uint256[2]"), param("memo", "string")];
        let tree = TreeBuilder::new().build(&params).unwrap();
        let paths: Vec<Vec<usize>> = tree.leaves().into_iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec![vec![0, 0], vec![0, 1], vec![1]]);
    }
}
