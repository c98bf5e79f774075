//! UI/backend events and error modeling for desktop GUI controller.

use client_core::EndpointError;
use shared::domain::{StoredPrice, TxHash};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    StoredPriceLoaded(StoredPrice),
    UpdateConfirmed { tx_hash: TxHash },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    UserRejected,
    Signer,
    Reverted,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    UpdatePrice,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_endpoint(context: UiErrorContext, err: &EndpointError) -> Self {
        let category = match err {
            err if err.is_user_rejection() => UiErrorCategory::UserRejected,
            err if err.is_revert() => UiErrorCategory::Reverted,
            EndpointError::NoSigner => UiErrorCategory::Signer,
            EndpointError::Transport(_) => UiErrorCategory::Transport,
            _ => UiErrorCategory::Unknown,
        };

        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Errors raised outside any endpoint call, such as backend startup.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
        }
    }

    /// Update failures are the only errors the user must acknowledge.
    pub fn requires_alert(&self) -> bool {
        self.context == UiErrorContext::UpdatePrice
    }

    pub fn status_line(&self) -> String {
        let prefix = match self.category() {
            UiErrorCategory::UserRejected => "Request rejected in wallet",
            UiErrorCategory::Signer => "Wallet has no signing account",
            UiErrorCategory::Reverted => "Transaction reverted",
            UiErrorCategory::Transport => "Wallet provider unreachable",
            UiErrorCategory::Unknown => "Error",
        };
        format!("{prefix}: {}", self.message)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
