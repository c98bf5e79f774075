use chrono::{DateTime, Local};
use client_core::{AlertSink, PriceDisplay};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiEvent, UiErrorContext},
    orchestration::dispatch_backend_command,
};

/// Native message box; `show` blocks the UI thread until dismissed.
pub struct DialogAlert;

impl AlertSink for DialogAlert {
    fn alert(&self, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Update failed")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

pub struct PriceClientApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    alerts: Box<dyn AlertSink>,
    pair_label: String,
    display: PriceDisplay,
    last_loaded_at: Option<DateTime<Local>>,
    updates_in_flight: usize,
    status: String,
}

impl PriceClientApp {
    /// Queues the initial fetch so the window opens with the stored value.
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        alerts: Box<dyn AlertSink>,
        pair_label: impl Into<String>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            alerts,
            pair_label: pair_label.into(),
            display: PriceDisplay::new(),
            last_loaded_at: None,
            updates_in_flight: 0,
            status: "Loading stored price...".to_string(),
        };
        dispatch_backend_command(
            &app.cmd_tx,
            BackendCommand::FetchStoredPrice,
            &mut app.status,
        );
        app
    }

    pub fn display(&self) -> &PriceDisplay {
        &self.display
    }

    fn request_update(&mut self) {
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::RequestUpdate, &mut self.status)
        {
            self.updates_in_flight += 1;
            self.status = "Waiting for wallet confirmation...".to_string();
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::StoredPriceLoaded(price) => {
                    self.display.record(price);
                    self.last_loaded_at = Some(Local::now());
                }
                UiEvent::UpdateConfirmed { tx_hash } => {
                    self.updates_in_flight = self.updates_in_flight.saturating_sub(1);
                    self.status = format!("Transaction confirmed: {tx_hash}");
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                    if err.context() == UiErrorContext::UpdatePrice {
                        self.updates_in_flight = self.updates_in_flight.saturating_sub(1);
                    }
                    if err.requires_alert() {
                        self.alerts.alert(err.message());
                    }
                }
            }
        }
    }

    fn show_price_columns(&mut self, ui: &mut egui::Ui) {
        let mut update_clicked = false;
        ui.columns(2, |columns| {
            columns[0].heading("Stored Price");
            columns[0].label(self.display.render_label(&self.pair_label));
            if let Some(loaded_at) = self.last_loaded_at {
                columns[0].weak(format!("Last read at {}", loaded_at.format("%H:%M:%S")));
            }

            columns[1].heading("Update Price");
            columns[1].horizontal(|ui| {
                update_clicked = ui.button("Update").clicked();
                if self.updates_in_flight > 0 {
                    ui.spinner();
                }
            });
        });
        if update_clicked {
            self.request_update();
        }
    }
}

impl eframe::App for PriceClientApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(24.0);
            self.show_price_columns(ui);
        });

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
