mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::{load_settings, AlertSink, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{DialogAlert, PriceClientApp};

#[derive(Parser, Debug)]
struct Args {
    /// JSON-RPC url of the wallet provider.
    #[arg(long)]
    provider_url: Option<String>,
    #[arg(long)]
    contract: Option<String>,
    #[arg(long)]
    from: Option<String>,
}

impl Args {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(v) = self.provider_url {
            settings.provider_url = v;
        }
        if let Some(v) = self.contract {
            settings.contract_address = v;
        }
        if let Some(v) = self.from {
            settings.from_address = Some(v);
        }
        settings
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Args::parse().apply(load_settings());
    let config = match settings.resolve() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid settings: {err:#}");
            DialogAlert.alert(&format!("{err:#}"));
            return Err(err);
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let pair_label = config.pair_label.clone();
    backend_bridge::runtime::launch(config, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{pair_label} Stored Price"))
            .with_inner_size([640.0, 220.0])
            .with_min_inner_size([420.0, 180.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Stored Price",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PriceClientApp::new(
                cmd_tx,
                ui_rx,
                Box::new(DialogAlert),
                pair_label,
            )))
        }),
    )
    .map_err(|err| anyhow!("failed to run window: {err}"))
}
