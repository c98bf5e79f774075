//! JSON-RPC client for the externally supplied wallet provider.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::{
    domain::{Address, TxHash},
    protocol::{RpcRequest, RpcResponse, TransactionReceipt, TransactionRequest},
};
use tracing::{debug, info};
use url::Url;

use crate::error::EndpointError;

pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct WalletProvider {
    http: Client,
    url: Url,
    signer: Option<Address>,
    poll_interval: Duration,
    next_id: AtomicU64,
}

impl WalletProvider {
    pub fn new(url: Url) -> Self {
        Self {
            http: Client::new(),
            url,
            signer: None,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
        }
    }

    /// Pins the sending account instead of asking the provider for its first account.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn request_raw(&self, method: &str, params: Value) -> Result<Option<Value>, EndpointError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        debug!(method, id, "sending wallet provider request");

        let body = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let response: RpcResponse = serde_json::from_slice(&body)
            .map_err(|err| EndpointError::decode(format!("{method} response: {err}")))?;

        if let Some(err) = response.error {
            return Err(err.into());
        }
        Ok(response.result.filter(|value| !value.is_null()))
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, EndpointError> {
        let value = self
            .request_raw(method, params)
            .await?
            .ok_or_else(|| EndpointError::MissingResult {
                method: method.to_string(),
            })?;
        serde_json::from_value(value)
            .map_err(|err| EndpointError::decode(format!("{method} result: {err}")))
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, EndpointError> {
        self.request("eth_accounts", json!([])).await
    }

    /// Account used to send transactions: the pinned signer, else the provider's first account.
    pub async fn signer(&self) -> Result<Address, EndpointError> {
        if let Some(signer) = self.signer {
            return Ok(signer);
        }
        self.accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(EndpointError::NoSigner)
    }

    pub async fn call(&self, to: Address, data: String) -> Result<String, EndpointError> {
        let request = TransactionRequest {
            from: None,
            to,
            data,
        };
        self.request("eth_call", json!([request, "latest"])).await
    }

    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, EndpointError> {
        self.request("eth_sendTransaction", json!([request])).await
    }

    pub async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, EndpointError> {
        let Some(value) = self
            .request_raw("eth_getTransactionReceipt", json!([tx_hash]))
            .await?
        else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| EndpointError::decode(format!("eth_getTransactionReceipt result: {err}")))
    }

    /// Polls until the transaction is mined. There is no timeout.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> Result<TransactionReceipt, EndpointError> {
        loop {
            if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                if !receipt.succeeded() {
                    return Err(EndpointError::Reverted { tx_hash });
                }
                info!(
                    tx_hash = %tx_hash,
                    block = receipt.block_number.as_deref().unwrap_or("pending"),
                    "transaction confirmed"
                );
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
