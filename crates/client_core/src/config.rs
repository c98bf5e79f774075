use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use shared::domain::{Address, DEFAULT_CONTRACT_ADDRESS, DEFAULT_PAIR_LABEL};
use url::Url;

pub const SETTINGS_FILE: &str = "price_client.toml";
const ENV_PREFIX: &str = "PRICE_CLIENT__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub provider_url: String,
    pub contract_address: String,
    pub from_address: Option<String>,
    pub receipt_poll_ms: u64,
    pub pair_label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider_url: "http://127.0.0.1:1248".into(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.into(),
            from_address: None,
            receipt_poll_ms: 1000,
            pair_label: DEFAULT_PAIR_LABEL.into(),
        }
    }
}

/// Validated settings ready to bind a provider handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider_url: Url,
    pub contract_address: Address,
    pub from_address: Option<Address>,
    pub receipt_poll_interval: Duration,
    pub pair_label: String,
}

impl Settings {
    pub fn resolve(&self) -> anyhow::Result<ProviderConfig> {
        let provider_url = Url::parse(self.provider_url.trim())
            .with_context(|| format!("invalid provider url '{}'", self.provider_url))?;
        let contract_address = self
            .contract_address
            .parse::<Address>()
            .with_context(|| format!("invalid contract address '{}'", self.contract_address))?;
        let from_address = self
            .from_address
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<Address>()
                    .with_context(|| format!("invalid from address '{raw}'"))
            })
            .transpose()?;

        Ok(ProviderConfig {
            provider_url,
            contract_address,
            from_address,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_ms.max(1)),
            pair_label: self.pair_label.clone(),
        })
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Layers the optional settings file and then environment overrides over the defaults.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<toml::Table>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, &file_cfg),
            Err(err) => tracing::warn!("ignoring unreadable {}: {err}", path.display()),
        }
    }

    let var = |key: &str| env(&format!("{ENV_PREFIX}{key}")).filter(|v| !v.trim().is_empty());

    if let Some(v) = var("PROVIDER_URL") {
        settings.provider_url = v;
    }
    if let Some(v) = var("CONTRACT_ADDRESS") {
        settings.contract_address = v;
    }
    if let Some(v) = var("FROM_ADDRESS") {
        settings.from_address = Some(v);
    }
    if let Some(v) = var("RECEIPT_POLL_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.receipt_poll_ms = parsed;
        }
    }
    if let Some(v) = var("PAIR_LABEL") {
        settings.pair_label = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &toml::Table) {
    let text = |key: &str| file_cfg.get(key).and_then(toml::Value::as_str);

    if let Some(v) = text("provider_url") {
        settings.provider_url = v.to_string();
    }
    if let Some(v) = text("contract_address") {
        settings.contract_address = v.to_string();
    }
    if let Some(v) = text("from_address") {
        settings.from_address = Some(v.to_string());
    }
    if let Some(v) = file_cfg
        .get("receipt_poll_ms")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
    {
        settings.receipt_poll_ms = v;
    }
    if let Some(v) = text("pair_label") {
        settings.pair_label = v.to_string();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
