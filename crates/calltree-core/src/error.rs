use thiserror::Error;

use crate::tree::TypeKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse ABI: {0}")]
    AbiParse(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("No method selected")]
    NoMethodSelected,

    #[error("No parameter at path {0:?}")]
    PathNotFound(Vec<usize>),

    #[error("Parameter at path {0:?} is not a leaf")]
    NotALeaf(Vec<usize>),

    #[error("Parameter at path {0:?} is not an array or tuple")]
    NotAContainer(Vec<usize>),

    #[error("Shape mismatch at '{node}': expected {expected} values, got {found}")]
    ShapeMismatch {
        node: String,
        expected: usize,
        found: usize,
    },

    #[error("Expected a list of values for '{node}'")]
    ExpectedList { node: String },

    #[error("Invalid {kind} value: '{input}'")]
    InvalidValue { kind: TypeKind, input: String },

    #[error("Arguments incomplete: {completed} of {total} fields filled")]
    Incomplete { completed: usize, total: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("ABI encode error: {0}")]
    AbiEncode(String),

    #[error("ABI decode error: {0}")]
    AbiDecode(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl Error {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::AbiParse(_) => "ABI_PARSE_ERROR",
            Error::Abi(_) => "ABI_ERROR",
            Error::FunctionNotFound(_) => "FUNCTION_NOT_FOUND",
            Error::NoMethodSelected => "NO_METHOD_SELECTED",
            Error::PathNotFound(_) => "PATH_NOT_FOUND",
            Error::NotALeaf(_) | Error::NotAContainer(_) => "WRONG_NODE_KIND",
            Error::ShapeMismatch { .. } | Error::ExpectedList { .. } => "SHAPE_MISMATCH",
            Error::InvalidValue { .. } => "VALIDATION_ERROR",
            Error::Incomplete { .. } => "INCOMPLETE_ARGUMENTS",
            Error::InvalidParameter(_) => "INVALID_PARAMETER",
            Error::AbiEncode(_) => "ABI_ENCODE_ERROR",
            Error::AbiDecode(_) => "ABI_DECODE_ERROR",
            Error::HexDecode(_) => "HEX_DECODE_ERROR",
        }
    }

    /// Returns true for text-view edits whose value count disagrees with the tree
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            Error::ShapeMismatch { .. } | Error::ExpectedList { .. }
        )
    }

    /// Returns true for errors that should not be exposed verbatim to clients
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
