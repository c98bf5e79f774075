use serde::{Deserialize, Serialize};

use crate::{
    domain::{Address, TxHash},
    error::RpcErrorObject,
};

pub const JSONRPC_VERSION: &str = "2.0";

/// Published interface description of the price consumer contract.
pub const PRICE_CONSUMER_ABI: &str = r#"[
  {"type":"constructor","inputs":[{"name":"_priceFeed","type":"address","internalType":"address"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"getDecimals","inputs":[],"outputs":[{"name":"","type":"uint8","internalType":"uint8"}],"stateMutability":"view"},
  {"type":"function","name":"getLatestPrice","inputs":[],"outputs":[{"name":"","type":"int256","internalType":"int256"}],"stateMutability":"view"},
  {"type":"function","name":"getLatestStoredPrice","inputs":[],"outputs":[{"name":"","type":"int256","internalType":"int256"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"priceFeed","inputs":[],"outputs":[{"name":"","type":"address","internalType":"contract AggregatorV3Interface"}],"stateMutability":"view"},
  {"type":"function","name":"storedPrice","inputs":[],"outputs":[{"name":"","type":"int256","internalType":"int256"}],"stateMutability":"view"}
]"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiOutput {
    Uint8,
    Int256,
    Address,
}

impl AbiOutput {
    pub fn type_name(self) -> &'static str {
        match self {
            AbiOutput::Uint8 => "uint8",
            AbiOutput::Int256 => "int256",
            AbiOutput::Address => "address",
        }
    }
}

/// Functions of the price consumer contract this client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceConsumerFunction {
    GetDecimals,
    GetLatestPrice,
    GetLatestStoredPrice,
    PriceFeed,
    StoredPrice,
}

impl PriceConsumerFunction {
    pub const ALL: [PriceConsumerFunction; 5] = [
        PriceConsumerFunction::GetDecimals,
        PriceConsumerFunction::GetLatestPrice,
        PriceConsumerFunction::GetLatestStoredPrice,
        PriceConsumerFunction::PriceFeed,
        PriceConsumerFunction::StoredPrice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PriceConsumerFunction::GetDecimals => "getDecimals",
            PriceConsumerFunction::GetLatestPrice => "getLatestPrice",
            PriceConsumerFunction::GetLatestStoredPrice => "getLatestStoredPrice",
            PriceConsumerFunction::PriceFeed => "priceFeed",
            PriceConsumerFunction::StoredPrice => "storedPrice",
        }
    }

    /// Canonical signature hashed into the function selector.
    pub fn signature(self) -> String {
        format!("{}()", self.name())
    }

    pub fn state_mutability(self) -> StateMutability {
        match self {
            PriceConsumerFunction::GetLatestStoredPrice => StateMutability::Nonpayable,
            _ => StateMutability::View,
        }
    }

    pub fn output(self) -> AbiOutput {
        match self {
            PriceConsumerFunction::GetDecimals => AbiOutput::Uint8,
            PriceConsumerFunction::PriceFeed => AbiOutput::Address,
            PriceConsumerFunction::GetLatestPrice
            | PriceConsumerFunction::GetLatestStoredPrice
            | PriceConsumerFunction::StoredPrice => AbiOutput::Int256,
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(
            self.state_mutability(),
            StateMutability::View | StateMutability::Pure
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: serde_json::Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

/// Parameters shared by `eth_call` and `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` on success, `0x0` when the transaction reverted.
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}
