//! Declared type classification
//!
//! Maps Solidity type strings such as `uint256`, `bytes32` or
//! `uint256[][2][]` onto a [`ParsedType`]. Classification never fails:
//! anything unrecognized is treated as a free-form string.

use tracing::debug;

use crate::tree::{Length, ParsedType};

/// Outermost array suffix of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySuffix {
    pub length: Length,
    /// Byte offset of the suffix's `[`; the element type is everything before it
    pub slice_index: usize,
}

/// Locate the outermost (last) array suffix of a declared type.
///
/// `uint256[][2][]` yields a dynamic suffix whose element type is
/// `uint256[][2]`. Returns `None` when the type is not an array or the size
/// between the brackets is not a number.
pub fn array_suffix(declared: &str) -> Option<ArraySuffix> {
    let inner = declared.trim_end().strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let size = inner[open + 1..].trim();

    let length = if size.is_empty() {
        Length::Dynamic
    } else {
        Length::Fixed(size.parse().ok()?)
    };

    Some(ArraySuffix {
        length,
        slice_index: open,
    })
}

/// Classify a declared argument type
pub fn classify(declared: &str) -> ParsedType {
    if let Some(suffix) = array_suffix(declared) {
        return ParsedType::Array {
            length: suffix.length,
            slice_index: suffix.slice_index,
            element_template: None,
        };
    }

    let name = declared.trim();
    if name == "tuple" {
        ParsedType::Object
    } else if name.contains("int") {
        ParsedType::Number
    } else if name.contains("bool") {
        ParsedType::Boolean
    } else if name.contains("address") {
        ParsedType::Address
    } else if let Some(pos) = name.find("bytes") {
        let length = name[pos + "bytes".len()..]
            .parse()
            .map_or(Length::Dynamic, Length::Fixed);
        ParsedType::Bytes { length }
    } else {
        if name != "string" {
            debug!(declared, "unrecognized type, treating as string");
        }
        ParsedType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{LengthKind, TypeKind};

    fn shape(declared: &str) -> (TypeKind, Option<LengthKind>, Option<usize>) {
        let ty = classify(declared);
        (ty.kind(), ty.length_kind(), ty.length())
    }

    #[test]
    fn test_classify_table() {
        use LengthKind::{Dynamic, Fixed};

        let cases = [
            ("bytes", (TypeKind::Bytes, Some(Dynamic), None)),
            ("bytes3", (TypeKind::Bytes, Some(Fixed), Some(3))),
            ("bytes32", (TypeKind::Bytes, Some(Fixed), Some(32))),
            ("bool", (TypeKind::Boolean, None, None)),
            ("bool[2]", (TypeKind::Array, Some(Fixed), Some(2))),
            ("uint256[]", (TypeKind::Array, Some(Dynamic), None)),
            ("bool[2][]", (TypeKind::Array, Some(Dynamic), None)),
            ("tuple", (TypeKind::Object, None, None)),
            ("uint256", (TypeKind::Number, None, None)),
            ("int8", (TypeKind::Number, None, None)),
            ("string", (TypeKind::String, None, None)),
            ("address", (TypeKind::Address, None, None)),
            ("function", (TypeKind::String, None, None)),
        ];

        for (declared, expected) in cases {
            assert_eq!(shape(declared), expected, "classify({declared})");
        }
    }

    #[test]
    fn test_array_suffix_is_outermost() {
        let suffix = array_suffix("uint256[][2][]").unwrap();
        assert_eq!(suffix.length, Length::Dynamic);
        assert_eq!(&"uint256[][2][]"[..suffix.slice_index], "uint256[][2]");

        let suffix = array_suffix("uint256[][2]").unwrap();
        assert_eq!(suffix.length, Length::Fixed(2));
        assert_eq!(&"uint256[][2]"[..suffix.slice_index], "uint256[]");
    }

    #[test]
    fn test_tuple_array() {
        let suffix = array_suffix("tuple[3]").unwrap();
        assert_eq!(suffix.length, Length::Fixed(3));
        assert_eq!(suffix.slice_index, 5);
    }

    #[test]
    fn test_non_array() {
        assert!(array_suffix("uint256").is_none());
        assert!(array_suffix("uint256[n]").is_none());
    }
}
