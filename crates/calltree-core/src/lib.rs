pub mod abi;
pub mod classify;
pub mod encode;
pub mod error;
pub mod session;
pub mod tree;
pub mod types;
pub mod validate;

pub use abi::{Abi, FunctionInfo, ParamInfo, ParsedFunctions};
pub use classify::{array_suffix, classify, ArraySuffix};
pub use encode::{decode_call, encode_call, json_to_sol_value, sol_value_to_json};
pub use error::{Error, Result};
pub use session::{CallPayload, FormSession, Snapshot};
pub use tree::{
    CompletionStats, LeafValue, Length, LengthKind, NodeStatus, Outcome, ParameterNode,
    ParameterTree, ParsedType, TreeBuilder, TypeKind, DEFAULT_MAX_ARRAY_LENGTH, MAX_TREE_NODES,
};
pub use types::*;
pub use validate::{parse_boolean, parse_number, validate_address, validate_bytes, Integer};
