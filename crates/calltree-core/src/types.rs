use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Domain Enums
// =============================================================================

/// Whether a method only reads chain state or submits a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Read,
    Write,
}

impl CallKind {
    pub const ALL: [CallKind; 2] = [CallKind::Read, CallKind::Write];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Read => "read",
            CallKind::Write => "write",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State mutability of a contract function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    /// Returns true if this function does not modify state
    pub fn is_read_only(&self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }

    /// Returns true if this function can receive ETH
    pub fn is_payable(&self) -> bool {
        matches!(self, StateMutability::Payable)
    }

    pub fn call_kind(&self) -> CallKind {
        if self.is_read_only() {
            CallKind::Read
        } else {
            CallKind::Write
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
