use crate::abi::ParamInfo;
use crate::classify::classify;
use crate::error::Result;

use super::mutate::{check_length, reserve_nodes};
use super::node::{position_name, LeafValue, Length, ParameterNode, ParsedType};
use super::{ParameterTree, DEFAULT_MAX_ARRAY_LENGTH, MAX_TREE_NODES};

/// Where a node sits while the tree is being built; drives the default-open policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    TopLevel,
    Nested,
    /// Inside a dynamic array's element template, or stamped from one
    Template,
}

/// Builds fresh parameter trees from declared method arguments
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    default_dynamic_length: usize,
    max_array_length: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            default_dynamic_length: 1,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements a dynamic array starts with
    pub fn with_default_dynamic_length(mut self, len: usize) -> Self {
        self.default_dynamic_length = len;
        self
    }

    pub fn default_dynamic_length(&self) -> usize {
        self.default_dynamic_length
    }

    /// Largest element count any array may have, declared or resized
    pub fn with_max_array_length(mut self, max: usize) -> Self {
        self.max_array_length = max;
        self
    }

    pub fn max_array_length(&self) -> usize {
        self.max_array_length
    }

    /// Build the tree for a method's ordered argument list.
    ///
    /// Fails when a declared fixed length, or the default dynamic length,
    /// exceeds the array limit, or when the expanded tree would pass
    /// [`MAX_TREE_NODES`].
    pub fn build(&self, args: &[ParamInfo]) -> Result<ParameterTree> {
        let mut budget = MAX_TREE_NODES;
        let nodes = args
            .iter()
            .map(|arg| {
                self.build_node(
                    &arg.name,
                    &arg.param_type,
                    arg.components.as_deref(),
                    Placement::TopLevel,
                    &mut budget,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ParameterTree::from_nodes(nodes).with_max_array_length(self.max_array_length))
    }

    fn build_node(
        &self,
        name: &str,
        declared: &str,
        components: Option<&[ParamInfo]>,
        placement: Placement,
        budget: &mut usize,
    ) -> Result<ParameterNode> {
        reserve_nodes(name, 1, budget)?;
        let child_placement = match placement {
            Placement::Template => Placement::Template,
            _ => Placement::Nested,
        };

        match classify(declared) {
            ParsedType::Array {
                length,
                slice_index,
                ..
            } => {
                let element_type = &declared[..slice_index];
                let count = match length {
                    Length::Fixed(len) => len,
                    Length::Dynamic => self.default_dynamic_length,
                };
                check_length(name, count, self.max_array_length)?;
                let children = (0..count)
                    .map(|i| {
                        let name = position_name(i);
                        self.build_node(&name, element_type, components, child_placement, budget)
                    })
                    .collect::<Result<Vec<_>>>()?;

                let element_template = match length {
                    Length::Dynamic => {
                        let proto = self.build_node(
                            &position_name(0),
                            element_type,
                            components,
                            Placement::Template,
                            budget,
                        )?;
                        proto.is_container().then(|| Box::new(proto.cleaned()))
                    }
                    Length::Fixed(_) => None,
                };

                // Nested fixed arrays start collapsed; everything else opens.
                let is_open = !matches!(
                    (length, placement),
                    (Length::Fixed(_), Placement::Nested)
                );

                Ok(ParameterNode {
                    name: name.to_string(),
                    declared_type: declared.to_string(),
                    parsed_type: ParsedType::Array {
                        length,
                        slice_index,
                        element_template,
                    },
                    value: LeafValue::Unset,
                    children: Some(children),
                    is_open: Some(is_open),
                    status: None,
                })
            }
            ParsedType::Object => {
                let children = components
                    .unwrap_or_default()
                    .iter()
                    .map(|field| {
                        self.build_node(
                            &field.name,
                            &field.param_type,
                            field.components.as_deref(),
                            child_placement,
                            budget,
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(ParameterNode {
                    name: name.to_string(),
                    declared_type: declared.to_string(),
                    parsed_type: ParsedType::Object,
                    value: LeafValue::Unset,
                    children: Some(children),
                    is_open: Some(true),
                    status: None,
                })
            }
            leaf => Ok(ParameterNode::leaf(name, declared, leaf)),
        }
    }

    /// Fresh element for a dynamic array that keeps no template (scalar elements)
    pub(crate) fn scalar_element(element_type: &str) -> ParameterNode {
        ParameterNode::leaf(&position_name(0), element_type, classify(element_type))
    }
}
