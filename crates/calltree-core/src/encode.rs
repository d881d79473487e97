//! Hand-off to the ABI encoder
//!
//! Flat values produced by a parameter tree are converted into alloy's
//! dynamic Solidity values using each argument's resolved type, then encoded
//! as call data.

use alloy::dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy::json_abi::Function;
use alloy::primitives::{Address, Bytes, FixedBytes, Sign, I256, U256};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validate::Integer;

/// Encode a call to `function` with one flat value per declared input
pub fn encode_call(function: &Function, values: &[Value]) -> Result<Bytes> {
    if values.len() != function.inputs.len() {
        return Err(Error::InvalidParameter(format!(
            "{} expects {} arguments, got {}",
            function.name,
            function.inputs.len(),
            values.len()
        )));
    }

    let mut sol_values = Vec::with_capacity(values.len());
    for (param, value) in function.inputs.iter().zip(values) {
        let ty = param
            .resolve()
            .map_err(|e| Error::Abi(format!("cannot resolve type '{}': {}", param.ty, e)))?;
        let sol_value = json_to_sol_value(&ty, value)
            .map_err(|e| Error::AbiEncode(format!("{}: {}", param.name, e)))?;
        sol_values.push(sol_value);
    }

    let encoded = function
        .abi_encode_input(&sol_values)
        .map_err(|e| Error::AbiEncode(e.to_string()))?;
    Ok(Bytes::from(encoded))
}

/// Decode selector-prefixed call data back into flat values
pub fn decode_call(function: &Function, data: &[u8]) -> Result<Vec<Value>> {
    let Some((selector, args)) = data.split_first_chunk::<4>() else {
        return Err(Error::AbiDecode("call data shorter than a selector".to_string()));
    };
    if *selector != function.selector().0 {
        return Err(Error::AbiDecode(format!(
            "selector 0x{} does not match {}",
            hex::encode(selector),
            function.signature()
        )));
    }

    let decoded = function
        .abi_decode_input(args)
        .map_err(|e| Error::AbiDecode(e.to_string()))?;
    Ok(decoded.iter().map(sol_value_to_json).collect())
}

/// Convert one flat value into a Solidity value of type `ty`
pub fn json_to_sol_value(
    ty: &DynSolType,
    value: &Value,
) -> std::result::Result<DynSolValue, String> {
    match ty {
        DynSolType::Address => {
            let text = value.as_str().ok_or("expected string for address")?;
            let address: Address = text
                .parse()
                .map_err(|e| format!("invalid address '{}': {}", text, e))?;
            Ok(DynSolValue::Address(address))
        }
        DynSolType::Bool => {
            let b = value.as_bool().ok_or("expected boolean")?;
            Ok(DynSolValue::Bool(b))
        }
        DynSolType::Uint(bits) => {
            let n = integer(value)?;
            if n.is_negative() {
                return Err(format!("negative value {} for uint{}", n, bits));
            }
            if n.magnitude().bit_len() > *bits {
                return Err(format!("{} does not fit in uint{}", n, bits));
            }
            Ok(DynSolValue::Uint(n.magnitude(), *bits))
        }
        DynSolType::Int(bits) => {
            let n = integer(value)?;
            Ok(DynSolValue::Int(to_i256(&n, *bits)?, *bits))
        }
        DynSolType::Bytes => Ok(DynSolValue::Bytes(hex_bytes(value)?)),
        DynSolType::FixedBytes(size) => {
            let bytes = hex_bytes(value)?;
            if bytes.len() != *size {
                return Err(format!("expected {} bytes, got {}", size, bytes.len()));
            }
            Ok(DynSolValue::FixedBytes(
                FixedBytes::<32>::right_padding_from(&bytes),
                *size,
            ))
        }
        DynSolType::String => {
            let s = value.as_str().ok_or("expected string")?;
            Ok(DynSolValue::String(s.to_string()))
        }
        DynSolType::Array(inner) => {
            let items = value.as_array().ok_or("expected array")?;
            let values = items
                .iter()
                .map(|item| json_to_sol_value(inner, item))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Array(values))
        }
        DynSolType::FixedArray(inner, len) => {
            let items = value.as_array().ok_or("expected array")?;
            if items.len() != *len {
                return Err(format!("expected {} elements, got {}", len, items.len()));
            }
            let values = items
                .iter()
                .map(|item| json_to_sol_value(inner, item))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::FixedArray(values))
        }
        DynSolType::Tuple(fields) => {
            let items = value.as_array().ok_or("expected array for tuple")?;
            if items.len() != fields.len() {
                return Err(format!(
                    "expected {} tuple fields, got {}",
                    fields.len(),
                    items.len()
                ));
            }
            let values = fields
                .iter()
                .zip(items)
                .map(|(field, item)| json_to_sol_value(field, item))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(DynSolValue::Tuple(values))
        }
        other => Err(format!("unsupported type: {}", other)),
    }
}

/// Render a decoded Solidity value in the flat-view format
pub fn sol_value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Uint(n, _) => Integer::new(false, *n).to_json(),
        DynSolValue::Int(n, _) => Integer::new(n.is_negative(), n.unsigned_abs()).to_json(),
        DynSolValue::Bytes(b) => Value::String(format!("0x{}", hex::encode(b))),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word[..*size])))
        }
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(sol_value_to_json).collect())
        }
        _ => Value::Null,
    }
}

fn integer(value: &Value) -> std::result::Result<Integer, String> {
    Integer::from_json(value).ok_or_else(|| format!("expected integer, got {}", value))
}

fn hex_bytes(value: &Value) -> std::result::Result<Vec<u8>, String> {
    let text = value.as_str().ok_or("expected hex string")?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| format!("invalid hex '{}': {}", text, e))
}

fn to_i256(n: &Integer, bits: usize) -> std::result::Result<I256, String> {
    let limit = U256::from(1u8) << (bits - 1);
    let in_range = if n.is_negative() {
        n.magnitude() <= limit
    } else {
        n.magnitude() < limit
    };
    if !in_range {
        return Err(format!("{} does not fit in int{}", n, bits));
    }

    let sign = if n.is_negative() {
        Sign::Negative
    } else {
        Sign::Positive
    };
    I256::checked_from_sign_and_abs(sign, n.magnitude())
        .ok_or_else(|| format!("{} does not fit in int{}", n, bits))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::abi::Abi;

    const ABI: &str = r#"[
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
            "name": "submit",
            "inputs": [
                {
                    "name": "order",
                    "type": "tuple",
                    "components": [
                        {"name": "salt", "type": "bytes4"},
                        {"name": "delta", "type": "int64"},
                        {"name": "legs", "type": "uint8[2]"}
                    ]
                },
                {"name": "c", "type": "uint256[][]"},
                {"name": "note", "type": "string"},
                {"name": "data", "type": "bytes"}
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    const ONE: &str = "0x0000000000000000000000000000000000000001";

    #[test]
    fn test_encode_transfer() {
        let abi = Abi::parse(ABI).unwrap();
        let function = abi.function("transfer").unwrap();

        let data = encode_call(function, &[json!(ONE), json!(1000)]).unwrap();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data[4 + 31], 1);
        assert_eq!(&data[4 + 62..], &[0x03, 0xe8]);
    }

    #[test]
    fn test_encode_decode_nested() {
        let abi = Abi::parse(ABI).unwrap();
        let function = abi.function("submit").unwrap();
        let values = vec![
            json!(["0x686f6c61", -5, [1, 2]]),
            json!([[16, 12], []]),
            json!("hola"),
            json!("0xdeadbeef"),
        ];

        let data = encode_call(function, &values).unwrap();
        let decoded = decode_call(function, &data).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_large_uint_as_string() {
        let abi = Abi::parse(ABI).unwrap();
        let function = abi.function("transfer").unwrap();
        let max = U256::MAX.to_string();

        let data = encode_call(function, &[json!(ONE), json!(max)]).unwrap();
        let decoded = decode_call(function, &data).unwrap();
        assert_eq!(decoded[1], json!(max));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let abi = Abi::parse(ABI).unwrap();
        let function = abi.function("transfer").unwrap();
        assert!(matches!(
            encode_call(function, &[json!(ONE)]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(json_to_sol_value(&DynSolType::Uint(8), &json!(256)).is_err());
        assert!(json_to_sol_value(&DynSolType::Uint(256), &json!(-1)).is_err());
        assert!(json_to_sol_value(&DynSolType::Int(8), &json!(-128)).is_ok());
        assert!(json_to_sol_value(&DynSolType::Int(8), &json!(128)).is_err());
        assert!(json_to_sol_value(&DynSolType::FixedBytes(4), &json!("0x6869")).is_err());
        assert!(json_to_sol_value(&DynSolType::Address, &json!(null)).is_err());
        assert!(json_to_sol_value(&DynSolType::Bool, &json!("true")).is_err());
    }

    #[test]
    fn test_decode_wrong_selector() {
        let abi = Abi::parse(ABI).unwrap();
        let function = abi.function("transfer").unwrap();
        assert!(matches!(
            decode_call(function, &[0, 0, 0, 0]),
            Err(Error::AbiDecode(_))
        ));
        assert!(decode_call(function, &[0xa9]).is_err());
    }
}
