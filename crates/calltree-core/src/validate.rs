//! Per-type acceptance rules for user-entered leaf values
//!
//! Bytes and addresses are validated but stored as the text the user typed.
//! Numbers and booleans are parsed into typed values.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde_json::Value;

use crate::error::Error;
use crate::tree::TypeKind;

/// Check a `0x`-prefixed hex byte string.
///
/// With an expected byte length the digit count must be exactly twice that
/// length, otherwise it only has to be even.
pub fn validate_bytes(value: &str, expected_len: Option<usize>) -> bool {
    let Some(digits) = value.strip_prefix("0x") else {
        return false;
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    match expected_len {
        Some(len) => digits.len() == len * 2,
        None => digits.len() % 2 == 0,
    }
}

/// Check a 20-byte hex address (`0x` followed by 40 hex digits)
pub fn validate_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|digits| digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Parse number input. Empty input clears the field.
pub fn parse_number(input: &str) -> Result<Option<Integer>, Error> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input.parse().map(Some)
}

/// Parse boolean input. Only the literals `true` and `false` set a value.
pub fn parse_boolean(input: &str) -> Result<Option<bool>, Error> {
    match input {
        "" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        other => Err(Error::InvalidValue {
            kind: TypeKind::Boolean,
            input: other.to_string(),
        }),
    }
}

// =============================================================================
// Integer
// =============================================================================

/// Signed 256-bit-magnitude integer held by number leaves
///
/// Covers the full `uint256` range as well as negative `int` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    magnitude: U256,
}

impl Integer {
    pub fn new(negative: bool, magnitude: U256) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Render as a JSON number when it fits in 64 bits, as a decimal string otherwise
    pub fn to_json(&self) -> Value {
        if self.magnitude.bit_len() <= 64 {
            let small = self.magnitude.as_limbs()[0];
            if !self.negative {
                return Value::from(small);
            }
            if small <= i64::MAX as u64 + 1 {
                return Value::from((-(small as i128)) as i64);
            }
        }
        Value::String(self.to_string())
    }

    /// Read a JSON number or numeric string. Fractions are truncated.
    ///
    /// JSON numbers beyond 64 bits arrive as floats and are only accepted
    /// while every integer digit is exact (below 2^53). Larger values must be
    /// given as strings.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Some(u.into())
                } else if let Some(i) = n.as_i64() {
                    Some(i.into())
                } else {
                    n.as_f64().and_then(Self::from_float)
                }
            }
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn from_float(value: f64) -> Option<Self> {
        let whole = value.trunc();
        if !whole.is_finite() || whole.abs() >= MAX_EXACT_FLOAT {
            return None;
        }
        Some(Self::new(whole < 0.0, U256::from(whole.abs() as u64)))
    }
}

/// 2^53; integral floats at or above this may have lost digits
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::new(false, U256::from(value))
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value < 0, U256::from(value.unsigned_abs()))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl FromStr for Integer {
    type Err = Error;

    /// Lenient integer parsing: reads the leading integer and ignores the rest,
    /// so `"12.9"` is `12`. A `0x` prefix switches to hex digits.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidValue {
            kind: TypeKind::Number,
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (digits, radix) = match unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            Some(hex) => (leading(hex, |c| c.is_ascii_hexdigit()), 16),
            None => (leading(unsigned, |c| c.is_ascii_digit()), 10),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let magnitude = U256::from_str_radix(digits, radix).map_err(|_| invalid())?;
        Ok(Self::new(negative, magnitude))
    }
}

fn leading(s: &str, accept: impl Fn(char) -> bool) -> &str {
    let end = s.find(|c: char| !accept(c)).unwrap_or(s.len());
    &s[..end]
}
