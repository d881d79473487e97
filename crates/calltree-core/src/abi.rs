//! ABI parsing utilities
//!
//! Provides the [`Abi`] struct for declarative access to the callable
//! functions of a contract ABI and the declared shape of their arguments.

use alloy::json_abi::{Function, JsonAbi, Param, StateMutability as AlloyStateMutability};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{CallKind, StateMutability};

// =============================================================================
// Abi Struct
// =============================================================================

/// Wrapper around alloy's JsonAbi providing a declarative interface
/// for method lookup.
#[derive(Debug, Clone)]
pub struct Abi(JsonAbi);

impl Abi {
    /// Parse a JSON ABI string into an Abi struct
    pub fn parse(json: &str) -> Result<Self> {
        let abi: JsonAbi = serde_json::from_str(json).map_err(|e| Error::AbiParse(e.to_string()))?;
        Ok(Self(abi))
    }

    /// Parse from a serde_json::Value
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let abi: JsonAbi =
            serde_json::from_value(value.clone()).map_err(|e| Error::AbiParse(e.to_string()))?;
        Ok(Self(abi))
    }

    /// All functions categorized as read (view/pure) and write (nonpayable/payable)
    pub fn functions(&self) -> ParsedFunctions {
        let (mut read, mut write): (Vec<_>, Vec<_>) = self
            .0
            .functions()
            .map(FunctionInfo::from_abi_function)
            .partition(|f| f.call_kind() == CallKind::Read);

        read.sort_by(|a, b| a.signature.cmp(&b.signature));
        write.sort_by(|a, b| a.signature.cmp(&b.signature));

        ParsedFunctions { read, write }
    }

    /// Look up a function by full signature (`transfer(address,uint256)`) or by
    /// name. A bare name resolves to the first overload.
    pub fn function(&self, name_or_signature: &str) -> Result<&Function> {
        let found = if name_or_signature.contains('(') {
            self.0
                .functions()
                .find(|f| f.signature() == name_or_signature)
        } else {
            self.0
                .functions
                .get(name_or_signature)
                .and_then(|overloads| overloads.first())
        };
        found.ok_or_else(|| Error::FunctionNotFound(name_or_signature.to_string()))
    }

    /// Same lookup as [`Abi::function`], returning the serializable description
    pub fn function_info(&self, name_or_signature: &str) -> Result<FunctionInfo> {
        self.function(name_or_signature)
            .map(FunctionInfo::from_abi_function)
    }
}

// =============================================================================
// Function Types
// =============================================================================

/// Parsed contract functions separated by read/write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFunctions {
    pub read: Vec<FunctionInfo>,
    pub write: Vec<FunctionInfo>,
}

impl ParsedFunctions {
    /// Functions of one kind, sorted by signature
    pub fn of_kind(&self, kind: CallKind) -> &[FunctionInfo] {
        match kind {
            CallKind::Read => &self.read,
            CallKind::Write => &self.write,
        }
    }

    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}

/// Information about a single contract function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub signature: String,
    /// 4-byte selector as 0x-prefixed hex
    pub selector: String,
    pub inputs: Vec<ParamInfo>,
    pub outputs: Vec<ParamInfo>,
    pub state_mutability: StateMutability,
}

impl FunctionInfo {
    /// Create FunctionInfo from an alloy Function
    pub fn from_abi_function(func: &Function) -> Self {
        Self {
            name: func.name.clone(),
            signature: func.signature(),
            selector: format!("0x{}", hex::encode(func.selector())),
            inputs: func.inputs.iter().map(ParamInfo::from_abi_param).collect(),
            outputs: func.outputs.iter().map(ParamInfo::from_abi_param).collect(),
            state_mutability: convert_state_mutability(func.state_mutability),
        }
    }

    pub fn call_kind(&self) -> CallKind {
        self.state_mutability.call_kind()
    }

    /// Declared input types in order, e.g. `["address", "uint256[]"]`
    pub fn input_types(&self) -> Vec<String> {
        self.inputs.iter().map(|p| p.param_type.clone()).collect()
    }
}

// =============================================================================
// Parameter Types
// =============================================================================

/// One declared argument: `{name, type, components?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ParamInfo>>,
}

impl ParamInfo {
    /// Create ParamInfo from an alloy Param
    pub fn from_abi_param(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            param_type: param.ty.clone(),
            components: if param.components.is_empty() {
                None
            } else {
                Some(param.components.iter().map(Self::from_abi_param).collect())
            },
        }
    }
}

fn convert_state_mutability(sm: AlloyStateMutability) -> StateMutability {
    match sm {
        AlloyStateMutability::Pure => StateMutability::Pure,
        AlloyStateMutability::View => StateMutability::View,
        AlloyStateMutability::NonPayable => StateMutability::NonPayable,
        AlloyStateMutability::Payable => StateMutability::Payable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ABI: &str = r#"[
        {
            "type": "constructor",
            "inputs": [{"name": "owner", "type": "address"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "balanceOf",
            "inputs": [{"name": "owner", "type": "address"}],
            "outputs": [{"name": "", "type": "uint256"}],
            "stateMutability": "view"
        },
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"},
                {"name": "memo", "type": "string"}
            ],
            "outputs": [{"name": "", "type": "bool"}],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "fill",
            "inputs": [{
                "name": "orders",
                "type": "tuple[]",
                "components": [
                    {"name": "maker", "type": "address"},
                    {"name": "amounts", "type": "uint256[2]"}
                ]
            }],
            "outputs": [],
            "stateMutability": "payable"
        }
    ]"#;

    #[test]
    fn test_categorize_functions() {
        let abi = Abi::parse(TEST_ABI).unwrap();
        let parsed = abi.functions();

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed.read.len(), 1);
        assert_eq!(parsed.read[0].name, "balanceOf");
        assert_eq!(parsed.read[0].call_kind(), CallKind::Read);
        assert_eq!(parsed.of_kind(CallKind::Write).len(), 3);

        let signatures: Vec<&str> = parsed.write.iter().map(|f| f.signature.as_str()).collect();
        assert_eq!(
            signatures,
            vec![
                "fill((address,uint256[2])[])",
                "transfer(address,uint256)",
                "transfer(address,uint256,string)",
            ]
        );
    }

    #[test]
    fn test_lookup_by_name_and_signature() {
        let abi = Abi::parse(TEST_ABI).unwrap();

        let by_name = abi.function("transfer").unwrap();
        assert_eq!(by_name.inputs.len(), 2);

        let by_signature = abi.function("transfer(address,uint256,string)").unwrap();
        assert_eq!(by_signature.inputs.len(), 3);

        assert!(matches!(
            abi.function("burn"),
            Err(Error::FunctionNotFound(name)) if name == "burn"
        ));
        assert!(abi.function("transfer(address)").is_err());
    }

    #[test]
    fn test_function_info() {
        let abi = Abi::parse(TEST_ABI).unwrap();
        let info = abi.function_info("transfer").unwrap();

        assert_eq!(info.selector, "0xa9059cbb");
        assert_eq!(info.state_mutability, StateMutability::NonPayable);
        assert_eq!(info.input_types(), vec!["address", "uint256"]);
        assert_eq!(info.outputs[0].param_type, "bool");
    }

    #[test]
    fn test_tuple_components() {
        let abi = Abi::parse(TEST_ABI).unwrap();
        let info = abi.function_info("fill").unwrap();

        let orders = &info.inputs[0];
        assert_eq!(orders.param_type, "tuple[]");
        let components = orders.components.as_ref().unwrap();
        assert_eq!(components[0].name, "maker");
        assert_eq!(components[1].param_type, "uint256[2]");
        assert!(info.state_mutability.is_payable());
    }

    #[test]
    fn test_param_info_serde_uses_type_key() {
        let param: ParamInfo =
            serde_json::from_str(r#"{"name": "ids", "type": "uint256[]"}"#).unwrap();
        assert_eq!(param.param_type, "uint256[]");
        assert!(param.components.is_none());

        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json, serde_json::json!({"name": "ids", "type": "uint256[]"}));
    }

    #[test]
    fn test_parse_invalid_abi() {
        assert!(matches!(Abi::parse("not json"), Err(Error::AbiParse(_))));
    }
}
