use std::sync::mpsc;

use eframe::egui::{self, Color32, RichText};

use crate::data::loader::{self, LoadError};
use crate::data::model::Record;
use crate::state::AppState;
use crate::ui::{charts, panels};

type LoadResult = Result<Vec<Record>, LoadError>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DisasterChartsApp {
    pub state: AppState,
    load_rx: mpsc::Receiver<LoadResult>,
}

impl DisasterChartsApp {
    /// Start the one-shot background fetch and return the app shell.  The
    /// UI thread never blocks on the network; the result arrives over the
    /// channel and is picked up in [`Self::update`].
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let ctx = cc.egui_ctx.clone();
        let source = loader::source_from_env();

        std::thread::spawn(move || {
            log::info!("loading declarations from {source}");
            let result = loader::load(&source);
            if let Err(e) = &result {
                log::error!("load failed: {e}");
            }
            let _ = tx.send(result);
            ctx.request_repaint();
        });

        Self {
            state: AppState::default(),
            load_rx: rx,
        }
    }

    /// Poll the loader channel while the fetch is in flight.
    fn poll_load(&mut self) {
        if !self.state.loading {
            return;
        }
        match self.load_rx.try_recv() {
            Ok(Ok(records)) => self.state.set_records(records),
            Ok(Err(e)) => self.state.set_load_error(e.to_string()),
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => self
                .state
                .set_load_error("data loader stopped unexpectedly".to_string()),
        }
    }
}

impl eframe::App for DisasterChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart, or the load error in its place ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(msg) = &self.state.error_message {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.label(
                        RichText::new(format!("Error loading data\n{msg}"))
                            .color(Color32::RED)
                            .heading(),
                    );
                });
            } else if self.state.loading {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.spinner();
                });
            } else {
                charts::chart_view(ui, &mut self.state);
            }
        });
    }
}
