//! Parameter tree node types

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::validate::Integer;

// =============================================================================
// Type classification
// =============================================================================

/// Declared size of an array or byte string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Fixed(usize),
    Dynamic,
}

impl Length {
    pub fn kind(&self) -> LengthKind {
        match self {
            Length::Fixed(_) => LengthKind::Fixed,
            Length::Dynamic => LengthKind::Dynamic,
        }
    }

    pub fn fixed(&self) -> Option<usize> {
        match self {
            Length::Fixed(len) => Some(*len),
            Length::Dynamic => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthKind {
    Fixed,
    Dynamic,
}

/// Semantic tag of a declared type, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Array,
    Object,
    String,
    Number,
    Boolean,
    Bytes,
    Address,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Array => "array",
            TypeKind::Object => "object",
            TypeKind::String => "string",
            TypeKind::Number => "number",
            TypeKind::Boolean => "boolean",
            TypeKind::Bytes => "bytes",
            TypeKind::Address => "address",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of one declared argument type
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedType {
    Array {
        length: Length,
        /// The element type is `declared_type[..slice_index]`
        slice_index: usize,
        /// Clean prototype element, kept only for dynamic arrays of composite elements
        element_template: Option<Box<ParameterNode>>,
    },
    Object,
    String,
    Number,
    Boolean,
    Bytes {
        length: Length,
    },
    Address,
}

impl ParsedType {
    pub fn kind(&self) -> TypeKind {
        match self {
            ParsedType::Array { .. } => TypeKind::Array,
            ParsedType::Object => TypeKind::Object,
            ParsedType::String => TypeKind::String,
            ParsedType::Number => TypeKind::Number,
            ParsedType::Boolean => TypeKind::Boolean,
            ParsedType::Bytes { .. } => TypeKind::Bytes,
            ParsedType::Address => TypeKind::Address,
        }
    }

    pub fn length_kind(&self) -> Option<LengthKind> {
        match self {
            ParsedType::Array { length, .. } | ParsedType::Bytes { length } => {
                Some(length.kind())
            }
            _ => None,
        }
    }

    pub fn length(&self) -> Option<usize> {
        match self {
            ParsedType::Array { length, .. } | ParsedType::Bytes { length } => length.fixed(),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ParsedType::Array { .. } | ParsedType::Object)
    }

    pub fn is_dynamic_array(&self) -> bool {
        matches!(
            self,
            ParsedType::Array {
                length: Length::Dynamic,
                ..
            }
        )
    }

    pub fn element_template(&self) -> Option<&ParameterNode> {
        match self {
            ParsedType::Array {
                element_template, ..
            } => element_template.as_deref(),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ParsedTypeView {
    kind: TypeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_kind: Option<LengthKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
}

// The element template is construction state, not part of the wire shape.
impl Serialize for ParsedType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ParsedTypeView {
            kind: self.kind(),
            length_kind: self.length_kind(),
            length: self.length(),
        }
        .serialize(serializer)
    }
}

// =============================================================================
// Nodes
// =============================================================================

/// Per-node completion flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Completed,
    Error,
}

/// Scalar value held by a leaf
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeafValue {
    /// Never set since the tree was built
    #[default]
    Unset,
    /// Cleared by the user or rejected by validation
    Null,
    Text(String),
    Integer(Integer),
    Bool(bool),
}

impl LeafValue {
    pub fn is_set(&self) -> bool {
        !matches!(self, LeafValue::Unset | LeafValue::Null)
    }

    pub fn to_json(&self) -> Value {
        match self {
            LeafValue::Unset | LeafValue::Null => Value::Null,
            LeafValue::Text(text) => Value::String(text.clone()),
            LeafValue::Integer(n) => n.to_json(),
            LeafValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl Serialize for LeafValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One node of a parameter tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterNode {
    pub name: String,
    pub declared_type: String,
    pub parsed_type: ParsedType,
    pub value: LeafValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ParameterNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl ParameterNode {
    /// Create a leaf holding its clean default value
    pub fn leaf(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        parsed_type: ParsedType,
    ) -> Self {
        let value = clean_value(&parsed_type);
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            parsed_type,
            value,
            children: None,
            is_open: None,
            status: None,
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.parsed_type.kind()
    }

    pub fn is_leaf(&self) -> bool {
        !self.parsed_type.is_container()
    }

    pub fn is_container(&self) -> bool {
        self.parsed_type.is_container()
    }

    pub fn children(&self) -> &[ParameterNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Whether a leaf counts towards completion
    ///
    /// String leaves are complete even when empty; other leaves need a value.
    /// A leaf flagged as an error never counts.
    pub fn is_completed_input(&self) -> bool {
        if self.status == Some(NodeStatus::Error) {
            return false;
        }
        matches!(self.parsed_type, ParsedType::String) || self.value.is_set()
    }

    /// Reset every value in this subtree to its clean default and set `status` on every node
    pub fn reset(&mut self, status: Option<NodeStatus>) {
        self.value = clean_value(&self.parsed_type);
        self.status = status;
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.reset(status);
            }
        }
    }

    /// Number of nodes in this subtree, itself included
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }

    /// Deep copy with values and statuses cleared
    pub fn cleaned(&self) -> Self {
        let mut copy = self.clone();
        copy.reset(None);
        copy
    }
}

/// The value a leaf holds before the user touches it
pub(crate) fn clean_value(parsed_type: &ParsedType) -> LeafValue {
    match parsed_type {
        ParsedType::String => LeafValue::Text(String::new()),
        _ => LeafValue::Unset,
    }
}

/// Synthesized name of an array element
pub fn position_name(index: usize) -> String {
    format!("position{}", index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_type_serializes_flat() {
        let ty = ParsedType::Bytes {
            length: Length::Fixed(32),
        };
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "bytes", "length_kind": "fixed", "length": 32})
        );

        let json = serde_json::to_value(ParsedType::Boolean).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "boolean"}));
    }

    #[test]
    fn test_leaf_defaults() {
        let text = ParameterNode::leaf("memo", "string", ParsedType::String);
        assert_eq!(text.value, LeafValue::Text(String::new()));
        assert!(text.is_completed_input());

        let number = ParameterNode::leaf("amount", "uint256", ParsedType::Number);
        assert_eq!(number.value, LeafValue::Unset);
        assert!(!number.is_completed_input());
    }

    #[test]
    fn test_error_leaf_never_completed() {
        let bytes = ParsedType::Bytes {
            length: Length::Dynamic,
        };
        let mut leaf = ParameterNode::leaf("data", "bytes", bytes);
        leaf.value = LeafValue::Text("0x1".to_string());
        leaf.status = Some(NodeStatus::Error);
        assert!(!leaf.is_completed_input());
    }

    #[test]
    fn test_cleaned_strips_values() {
        let mut leaf = ParameterNode::leaf("flag", "bool", ParsedType::Boolean);
        leaf.value = LeafValue::Bool(true);
        leaf.status = Some(NodeStatus::Completed);

        let clean = leaf.cleaned();
        assert_eq!(clean.value, LeafValue::Unset);
        assert_eq!(clean.status, None);
        assert_eq!(leaf.value, LeafValue::Bool(true));
    }
}
