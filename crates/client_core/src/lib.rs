use async_trait::async_trait;
use shared::domain::{Address, ContractDetails, StoredPrice, TxHash};
use tracing::{error, info};

pub mod abi;
pub mod config;
pub mod contract;
pub mod error;
pub mod provider;

pub use config::{load_settings, ProviderConfig, Settings};
pub use contract::PriceConsumerContract;
pub use error::EndpointError;
pub use provider::WalletProvider;

/// Remote price consumer contract as seen by the display controller.
#[async_trait]
pub trait ContractEndpoint: Send + Sync {
    async fn stored_price(&self) -> Result<StoredPrice, EndpointError>;
    /// Submits the state-changing refresh and resolves once it is confirmed.
    async fn refresh_stored_price(&self) -> Result<TxHash, EndpointError>;
    async fn decimals(&self) -> Result<u8, EndpointError>;
    async fn latest_price(&self) -> Result<i128, EndpointError>;
    async fn price_feed(&self) -> Result<Address, EndpointError>;
}

/// Surface for failures the user must acknowledge before continuing.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Latest known stored price, empty until the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceDisplay {
    stored_price: Option<StoredPrice>,
}

impl PriceDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_price(&self) -> Option<StoredPrice> {
        self.stored_price
    }

    pub fn value(&self) -> Option<f64> {
        self.stored_price.map(|price| price.as_decimal())
    }

    pub fn record(&mut self, price: StoredPrice) {
        self.stored_price = Some(price);
    }

    pub fn render_value(&self) -> String {
        self.stored_price
            .map(|price| price.to_string())
            .unwrap_or_default()
    }

    pub fn render_label(&self, pair_label: &str) -> String {
        format!("Stored {pair_label} Price: {}", self.render_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub tx_hash: TxHash,
    /// Result of the follow-up fetch; `None` when that read failed.
    pub refreshed: Option<StoredPrice>,
}

/// Reads the stored price. Failures are logged and reported as `None`.
pub async fn fetch_stored_value<E>(endpoint: &E) -> Option<StoredPrice>
where
    E: ContractEndpoint + ?Sized,
{
    match endpoint.stored_price().await {
        Ok(price) => {
            info!(raw = price.raw, price = %price, "fetched stored price");
            Some(price)
        }
        Err(err) => {
            error!("fetch stored price failed: {err}");
            None
        }
    }
}

/// Submits the refresh transaction, waits for it, then fetches the stored price once.
pub async fn request_update<E>(endpoint: &E) -> Result<UpdateOutcome, EndpointError>
where
    E: ContractEndpoint + ?Sized,
{
    info!("requesting stored price refresh");
    let tx_hash = endpoint.refresh_stored_price().await.map_err(|err| {
        error!("stored price refresh failed: {err}");
        err
    })?;
    let refreshed = fetch_stored_value(endpoint).await;
    Ok(UpdateOutcome { tx_hash, refreshed })
}

pub async fn contract_details<E>(endpoint: &E) -> Result<ContractDetails, EndpointError>
where
    E: ContractEndpoint + ?Sized,
{
    let (decimals, latest_price, stored_price, price_feed) = futures::try_join!(
        endpoint.decimals(),
        endpoint.latest_price(),
        endpoint.stored_price(),
        endpoint.price_feed(),
    )?;
    Ok(ContractDetails {
        decimals,
        latest_price,
        stored_price,
        price_feed,
    })
}

/// Owns the display state and drives it through one endpoint and one alert sink.
pub struct PriceDisplayController<E, A> {
    endpoint: E,
    alerts: A,
    display: PriceDisplay,
}

impl<E, A> PriceDisplayController<E, A>
where
    E: ContractEndpoint,
    A: AlertSink,
{
    pub fn new(endpoint: E, alerts: A) -> Self {
        Self {
            endpoint,
            alerts,
            display: PriceDisplay::new(),
        }
    }

    pub fn display(&self) -> &PriceDisplay {
        &self.display
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub async fn fetch_stored_value(&mut self) -> Option<StoredPrice> {
        let price = fetch_stored_value(&self.endpoint).await?;
        self.display.record(price);
        Some(price)
    }

    pub async fn request_update(&mut self) -> Option<UpdateOutcome> {
        match request_update(&self.endpoint).await {
            Ok(outcome) => {
                if let Some(price) = outcome.refreshed {
                    self.display.record(price);
                }
                Some(outcome)
            }
            Err(err) => {
                self.alerts.alert(&err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
