//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    fetch_stored_value, request_update, ContractEndpoint, PriceConsumerContract, ProviderConfig,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::runtime::Handle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(config: ProviderConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                emit(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let endpoint = Arc::new(PriceConsumerContract::from_config(&config));
        tracing::info!(
            provider = %config.provider_url,
            contract = %config.contract_address,
            "backend worker ready"
        );
        emit(
            &ui_tx,
            UiEvent::Info(format!("Wallet provider: {}", config.provider_url)),
        );

        serve_commands(runtime.handle(), endpoint, cmd_rx, ui_tx);
    });
}

/// Runs every queued command as its own task until the UI drops its sender.
pub fn serve_commands<E>(
    handle: &Handle,
    endpoint: Arc<E>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) where
    E: ContractEndpoint + 'static,
{
    while let Ok(cmd) = cmd_rx.recv() {
        let endpoint = Arc::clone(&endpoint);
        let ui_tx = ui_tx.clone();
        handle.spawn(async move {
            run_command(endpoint.as_ref(), cmd, &ui_tx).await;
        });
    }
    tracing::info!("ui command queue closed; backend worker exiting");
}

async fn run_command<E>(endpoint: &E, cmd: BackendCommand, ui_tx: &Sender<UiEvent>)
where
    E: ContractEndpoint + ?Sized,
{
    match cmd {
        BackendCommand::FetchStoredPrice => {
            if let Some(price) = fetch_stored_value(endpoint).await {
                emit(ui_tx, UiEvent::StoredPriceLoaded(price));
            }
        }
        BackendCommand::RequestUpdate => match request_update(endpoint).await {
            Ok(outcome) => {
                emit(
                    ui_tx,
                    UiEvent::UpdateConfirmed {
                        tx_hash: outcome.tx_hash,
                    },
                );
                if let Some(price) = outcome.refreshed {
                    emit(ui_tx, UiEvent::StoredPriceLoaded(price));
                }
            }
            Err(err) => {
                deliver(
                    ui_tx,
                    UiEvent::Error(UiError::from_endpoint(UiErrorContext::UpdatePrice, &err)),
                )
                .await
            }
        },
    }
}

fn emit(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            tracing::warn!("ui event queue full; dropping {event:?}");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event queue closed");
        }
    }
}

/// Waits for room in the UI queue; used for events the user must see.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let ui_tx = ui_tx.clone();
    match tokio::task::spawn_blocking(move || ui_tx.send(event)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => tracing::debug!("ui event queue closed"),
        Err(err) => tracing::error!("ui event delivery task failed: {err}"),
    }
}
