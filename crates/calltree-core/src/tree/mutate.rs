//! Path-addressed edits
//!
//! Every mutation descends exactly one branch of the tree, so editing one
//! field never touches siblings that share its shape.

use tracing::debug;

use crate::error::{Error, Result};
use crate::validate::{parse_boolean, parse_number, validate_address, validate_bytes};

use super::builder::TreeBuilder;
use super::node::{position_name, LeafValue, Length, NodeStatus, ParameterNode, ParsedType};
use super::{Outcome, ParameterTree, MAX_TREE_NODES};

impl ParameterTree {
    /// Set a leaf from user input, validating it for the leaf's type
    pub fn set_value(&mut self, path: &[usize], input: &str) -> Result<Outcome> {
        let node = self.node_mut(path)?;
        if !node.is_leaf() {
            return Err(Error::NotALeaf(path.to_vec()));
        }
        apply_input(node, input);
        debug!(?path, input, status = ?node.status, "set value");
        Ok(Outcome::Applied)
    }

    /// Expand or collapse a container. Clears the container's cached status.
    pub fn toggle(&mut self, path: &[usize]) -> Result<Outcome> {
        let node = self.node_mut(path)?;
        let Some(open) = node.is_open.as_mut() else {
            return Err(Error::NotAContainer(path.to_vec()));
        };
        *open = !*open;
        node.status = None;
        Ok(Outcome::Applied)
    }

    /// Append one element to a dynamic array of composite elements.
    ///
    /// Fixed arrays and dynamic arrays of scalars are left unchanged; the
    /// latter can be sized with [`ParameterTree::resize`].
    pub fn grow(&mut self, path: &[usize]) -> Result<Outcome> {
        let max = self.max_array_length;
        let mut budget = self.node_budget();
        let node = self.node_mut(path)?;
        if !node.is_container() {
            return Err(Error::NotAContainer(path.to_vec()));
        }
        if !node.parsed_type.is_dynamic_array() {
            return Ok(Outcome::Ignored);
        }
        let Some(element) = node.parsed_type.element_template().map(ParameterNode::cleaned) else {
            return Ok(Outcome::Ignored);
        };

        let children = node.children.get_or_insert_with(Vec::new);
        check_length(&node.name, children.len() + 1, max)?;
        reserve_nodes(&node.name, element.node_count(), &mut budget)?;
        children.push(element);
        renumber(children);
        debug!(?path, len = children.len(), "grew array");
        Ok(Outcome::Applied)
    }

    /// Remove the element at the last index of `path` from the dynamic array at `path[..len - 1]`
    pub fn delete(&mut self, path: &[usize]) -> Result<Outcome> {
        let Some((&index, parent_path)) = path.split_last() else {
            return Err(Error::PathNotFound(Vec::new()));
        };
        // Top-level arguments are not array elements
        if parent_path.is_empty() {
            return Ok(Outcome::Ignored);
        }

        let parent = self.node_mut(parent_path)?;
        if !parent.parsed_type.is_dynamic_array() {
            return Ok(Outcome::Ignored);
        }
        let children = parent.children.get_or_insert_with(Vec::new);
        if index >= children.len() {
            return Err(Error::PathNotFound(path.to_vec()));
        }

        children.remove(index);
        renumber(children);
        debug!(?path, len = children.len(), "deleted element");
        Ok(Outcome::Applied)
    }

    /// Set the element count of a dynamic array, stamping clean elements or truncating
    pub fn resize(&mut self, path: &[usize], len: usize) -> Result<Outcome> {
        let max = self.max_array_length;
        let mut budget = self.node_budget();
        let node = self.node_mut(path)?;
        if !node.is_container() {
            return Err(Error::NotAContainer(path.to_vec()));
        }
        resize_array(node, len, max, &mut budget)
    }
}

/// Reject element counts above the tree's array limit
pub(crate) fn check_length(name: &str, len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(Error::InvalidParameter(format!(
            "{} elements requested for '{}', at most {} allowed",
            len, name, max
        )));
    }
    Ok(())
}

/// Take `nodes` from the remaining tree budget, failing when it would run out
pub(crate) fn reserve_nodes(name: &str, nodes: usize, budget: &mut usize) -> Result<()> {
    if nodes > *budget {
        return Err(Error::InvalidParameter(format!(
            "'{}' would grow the tree past {} nodes",
            name, MAX_TREE_NODES
        )));
    }
    *budget -= nodes;
    Ok(())
}

/// Resize primitive shared by the table and text views
pub(crate) fn resize_array(
    node: &mut ParameterNode,
    len: usize,
    max: usize,
    budget: &mut usize,
) -> Result<Outcome> {
    let ParsedType::Array {
        length: Length::Dynamic,
        slice_index,
        element_template,
    } = &node.parsed_type
    else {
        return Ok(Outcome::Ignored);
    };

    let current = node.children().len();
    if current == len {
        return Ok(Outcome::Ignored);
    }
    check_length(&node.name, len, max)?;

    let stamp = match element_template {
        Some(template) => template.cleaned(),
        None => TreeBuilder::scalar_element(&node.declared_type[..*slice_index]),
    };

    if len > current {
        let added = (len - current).saturating_mul(stamp.node_count());
        reserve_nodes(&node.name, added, budget)?;
    }

    let children = node.children.get_or_insert_with(Vec::new);
    if len < current {
        *budget += children[len..].iter().map(ParameterNode::node_count).sum::<usize>();
        children.truncate(len);
    } else {
        children.extend((current..len).map(|_| stamp.clone()));
    }
    renumber(children);
    Ok(Outcome::Applied)
}

/// Apply raw user input to a leaf
pub(crate) fn apply_input(node: &mut ParameterNode, input: &str) {
    let (value, status) = match &node.parsed_type {
        ParsedType::String => (LeafValue::Text(input.to_string()), None),
        ParsedType::Number => match parse_number(input) {
            Ok(Some(n)) => (LeafValue::Integer(n), None),
            Ok(None) => (LeafValue::Null, None),
            Err(_) => (LeafValue::Null, Some(NodeStatus::Error)),
        },
        ParsedType::Boolean => match parse_boolean(input) {
            Ok(Some(b)) => (LeafValue::Bool(b), None),
            Ok(None) => (LeafValue::Null, None),
            Err(_) => (LeafValue::Null, Some(NodeStatus::Error)),
        },
        ParsedType::Bytes { length } => {
            let valid = validate_bytes(input, length.fixed());
            checked_text(input, valid)
        }
        ParsedType::Address => checked_text(input, validate_address(input)),
        ParsedType::Array { .. } | ParsedType::Object => return,
    };
    node.value = value;
    node.status = status;
}

/// Keep what the user typed; flag it unless it is valid or the field was cleared
fn checked_text(input: &str, valid: bool) -> (LeafValue, Option<NodeStatus>) {
    if input.is_empty() {
        (LeafValue::Null, None)
    } else if valid {
        (LeafValue::Text(input.to_string()), None)
    } else {
        (LeafValue::Text(input.to_string()), Some(NodeStatus::Error))
    }
}

fn renumber(children: &mut [ParameterNode]) {
    for (index, child) in children.iter_mut().enumerate() {
        child.name = position_name(index);
    }
}
