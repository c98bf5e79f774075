use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON-RPC 2.0 error object as returned by a wallet provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorObject {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexValueError {
    #[error("{kind} must start with 0x: {value}")]
    MissingPrefix { kind: &'static str, value: String },
    #[error("{kind} must have {expected} hex digits, got {actual}")]
    WrongLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{kind} contains invalid hex: {reason}")]
    InvalidDigits { kind: &'static str, reason: String },
}
