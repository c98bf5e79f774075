use async_trait::async_trait;
use shared::{
    domain::{Address, StoredPrice, TxHash},
    protocol::{PriceConsumerFunction, TransactionRequest},
};
use tracing::info;

use crate::{
    abi::{decode_address, decode_int256, decode_uint8, encode_call},
    config::ProviderConfig,
    error::EndpointError,
    provider::WalletProvider,
    ContractEndpoint,
};

/// Price consumer contract bound to a wallet provider handle.
pub struct PriceConsumerContract {
    provider: WalletProvider,
    address: Address,
}

impl PriceConsumerContract {
    pub fn new(provider: WalletProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut provider = WalletProvider::new(config.provider_url.clone())
            .with_poll_interval(config.receipt_poll_interval);
        if let Some(from) = config.from_address {
            provider = provider.with_signer(from);
        }
        Self::new(provider, config.contract_address)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &WalletProvider {
        &self.provider
    }

    async fn read(&self, function: PriceConsumerFunction) -> Result<String, EndpointError> {
        debug_assert!(function.is_read_only());
        self.provider
            .call(self.address, encode_call(function))
            .await
    }
}

#[async_trait]
impl ContractEndpoint for PriceConsumerContract {
    async fn stored_price(&self) -> Result<StoredPrice, EndpointError> {
        let data = self.read(PriceConsumerFunction::StoredPrice).await?;
        decode_int256(&data).map(StoredPrice::from_raw)
    }

    async fn refresh_stored_price(&self) -> Result<TxHash, EndpointError> {
        let from = self.provider.signer().await?;
        let request = TransactionRequest {
            from: Some(from),
            to: self.address,
            data: encode_call(PriceConsumerFunction::GetLatestStoredPrice),
        };
        let tx_hash = self.provider.send_transaction(request).await?;
        info!(tx_hash = %tx_hash, from = %from, "submitted stored price refresh");
        self.provider.wait_for_confirmation(tx_hash).await?;
        Ok(tx_hash)
    }

    async fn decimals(&self) -> Result<u8, EndpointError> {
        let data = self.read(PriceConsumerFunction::GetDecimals).await?;
        decode_uint8(&data)
    }

    async fn latest_price(&self) -> Result<i128, EndpointError> {
        let data = self.read(PriceConsumerFunction::GetLatestPrice).await?;
        decode_int256(&data)
    }

    async fn price_feed(&self) -> Result<Address, EndpointError> {
        let data = self.read(PriceConsumerFunction::PriceFeed).await?;
        decode_address(&data)
    }
}

#[cfg(test)]
#[path = "tests/contract_tests.rs"]
mod tests;
