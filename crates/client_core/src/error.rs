use shared::{domain::TxHash, error::RpcErrorObject};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("wallet provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("wallet provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed contract response: {0}")]
    Decode(String),
    #[error("wallet provider exposed no account to sign with")]
    NoSigner,
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
    #[error("wallet provider returned no result for {method}")]
    MissingResult { method: String },
}

impl EndpointError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    /// True when the user declined the request in their wallet.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code: 4001, .. })
    }

    /// True for a mined revert and for the node's `3` execution-reverted error.
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted { .. } | Self::Rpc { code: 3, .. })
    }
}

impl From<RpcErrorObject> for EndpointError {
    fn from(value: RpcErrorObject) -> Self {
        Self::Rpc {
            code: value.code,
            message: value.message,
        }
    }
}
