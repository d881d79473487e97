//! Conversion between parameter trees and the flat text view
//!
//! The flat view is a JSON array with one entry per argument. Containers
//! become nested arrays in declaration order; leaves become their value or
//! `null`.

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::validate::Integer;

use super::mutate::{apply_input, resize_array};
use super::node::{clean_value, LeafValue, NodeStatus, ParameterNode, ParsedType};
use super::ParameterTree;

impl ParameterNode {
    /// Flat value of this node; no validation is performed
    pub fn to_flat(&self) -> Value {
        match &self.children {
            Some(children) => Value::Array(children.iter().map(Self::to_flat).collect()),
            None => self.value.to_json(),
        }
    }
}

impl ParameterTree {
    /// Flat values of every argument, in declaration order
    pub fn values(&self) -> Vec<Value> {
        self.nodes.iter().map(ParameterNode::to_flat).collect()
    }

    /// Overwrite the tree from flat values (a text-view edit).
    ///
    /// Dynamic arrays are resized to match the incoming lists. A failed edit
    /// leaves the shape the tree had before it. On a shape mismatch every
    /// value is also reset to its clean default and every node is flagged as
    /// an error; other failures leave the tree untouched.
    pub fn apply_values(&mut self, flat: &[Value]) -> Result<()> {
        let before = self.nodes.clone();
        let mut limits = Limits {
            max_array_length: self.max_array_length,
            budget: self.node_budget(),
        };
        let result = apply_nodes(&mut self.nodes, Some(flat), ARGUMENTS, &mut limits);
        if let Err(err) = &result {
            self.nodes = before;
            if err.is_shape_mismatch() {
                self.reject(err);
            }
        }
        result
    }

    /// Same as [`ParameterTree::apply_values`] for a parsed text view that
    /// may not be a list at all
    pub fn apply_json(&mut self, flat: &Value) -> Result<()> {
        match flat {
            Value::Array(items) => self.apply_values(items),
            _ => {
                let err = Error::ExpectedList {
                    node: ARGUMENTS.to_string(),
                };
                self.reject(&err);
                Err(err)
            }
        }
    }

    fn reject(&mut self, err: &Error) {
        warn!(error = %err, "text edit rejected, clearing values");
        for node in &mut self.nodes {
            node.reset(Some(NodeStatus::Error));
        }
    }
}

const ARGUMENTS: &str = "arguments";

struct Limits {
    max_array_length: usize,
    budget: usize,
}

fn apply_nodes(
    nodes: &mut [ParameterNode],
    flat: Option<&[Value]>,
    owner: &str,
    limits: &mut Limits,
) -> Result<()> {
    if let Some(flat) = flat {
        if flat.len() != nodes.len() {
            return Err(Error::ShapeMismatch {
                node: owner.to_string(),
                expected: nodes.len(),
                found: flat.len(),
            });
        }
    }

    for (index, node) in nodes.iter_mut().enumerate() {
        apply_node(node, flat.and_then(|values| values.get(index)), limits)?;
    }
    Ok(())
}

fn apply_node(
    node: &mut ParameterNode,
    incoming: Option<&Value>,
    limits: &mut Limits,
) -> Result<()> {
    if node.is_leaf() {
        assign_leaf(node, incoming);
        return Ok(());
    }

    let items = match incoming {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => {
            resize_array(node, items.len(), limits.max_array_length, &mut limits.budget)?;
            Some(items.as_slice())
        }
        Some(_) => {
            return Err(Error::ExpectedList {
                node: node.name.clone(),
            })
        }
    };

    node.status = None;
    let children = node.children.get_or_insert_with(Vec::new);
    apply_nodes(children, items, &node.name, limits)
}

fn assign_leaf(node: &mut ParameterNode, incoming: Option<&Value>) {
    let incoming = match incoming {
        None | Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) => {
            node.value = clean_value(&node.parsed_type);
            node.status = None;
            return;
        }
        Some(value) => value,
    };

    let (value, status) = match (&node.parsed_type, incoming) {
        (_, Value::String(text)) => {
            apply_input(node, text);
            return;
        }
        (ParsedType::String, other) => (LeafValue::Text(other.to_string()), None),
        (ParsedType::Number, other) => match Integer::from_json(other) {
            Some(n) => (LeafValue::Integer(n), None),
            None => (LeafValue::Null, Some(NodeStatus::Error)),
        },
        (ParsedType::Boolean, Value::Bool(b)) => (LeafValue::Bool(*b), None),
        _ => (LeafValue::Null, Some(NodeStatus::Error)),
    };
    node.value = value;
    node.status = status;
}
