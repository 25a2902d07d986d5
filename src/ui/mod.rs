mod comparison_view;
pub(crate) mod config;
mod race_pace;
mod tire_degradation;
mod track_status;

use std::sync::{
    Arc,
    mpsc::{Receiver, Sender},
};
use std::time::Duration;

use egui::{
    Color32, CornerRadius, Frame, Margin, RichText, ScrollArea, Ui, Visuals, style::Widgets,
};
use log::{error, warn};

use crate::api::TelemetryApiClient;
use crate::comparison::ComparisonViewModel;
use crate::errors::LapdeckError;
use config::AppConfig;

const REFRESH_RATE_MS: u64 = 100;

// dashboard palette, lifted from the session branding
pub(crate) const PALETTE_NIGHT: Color32 = Color32::from_rgb(16, 16, 26);
pub(crate) const PALETTE_CARD: Color32 = Color32::from_rgb(30, 30, 46);
pub(crate) const PALETTE_INSET: Color32 = Color32::from_rgb(20, 20, 30);
pub(crate) const PALETTE_RED: Color32 = Color32::from_rgb(225, 6, 0);
pub(crate) const PALETTE_TEAL: Color32 = Color32::from_rgb(0, 210, 190);
pub(crate) const PALETTE_AZURE: Color32 = Color32::from_rgb(0, 144, 255);
pub(crate) const PALETTE_MINT: Color32 = Color32::from_rgb(0, 224, 172);
pub(crate) const PALETTE_GOLD: Color32 = Color32::from_rgb(255, 215, 0);
pub(crate) const PALETTE_EMBER: Color32 = Color32::from_rgb(255, 51, 51);

const CARD_CORNER_RADIUS: u8 = 12;

/// `DashboardApp` renders the session dashboard: the static cards plus the
/// driver comparison view. All comparison traffic goes through the
/// view-model; the UI itself never talks to the comparison endpoint.
pub struct DashboardApp {
    comparison: ComparisonViewModel,
    client: Arc<TelemetryApiClient>,
    sessions: Vec<String>,
    session_listing_error: Option<String>,
    sessions_tx: Sender<Result<Vec<String>, LapdeckError>>,
    sessions_rx: Receiver<Result<Vec<String>, LapdeckError>>,
    app_config: AppConfig,
}

impl DashboardApp {
    pub fn new(
        comparison: ComparisonViewModel,
        client: Arc<TelemetryApiClient>,
        sessions_tx: Sender<Result<Vec<String>, LapdeckError>>,
        sessions_rx: Receiver<Result<Vec<String>, LapdeckError>>,
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_RED,
            faint_bg_color: PALETTE_CARD,
            extreme_bg_color: PALETTE_INSET,
            panel_fill: PALETTE_NIGHT,
            window_fill: PALETTE_CARD,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        Self {
            comparison,
            client,
            sessions: Vec::new(),
            session_listing_error: None,
            sessions_tx,
            sessions_rx,
            app_config,
        }
    }

    fn drain_session_listing(&mut self) {
        while let Ok(result) = self.sessions_rx.try_recv() {
            match result {
                Ok(sessions) => {
                    self.sessions = sessions;
                    self.session_listing_error = None;
                }
                Err(e) => {
                    warn!("Could not list sessions: {}", e);
                    self.session_listing_error = Some(e.to_string());
                }
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.comparison.poll();
        self.drain_session_listing();

        egui::TopBottomPanel::top("header")
            .frame(
                Frame::new()
                    .fill(PALETTE_NIGHT)
                    .inner_margin(Margin::same(16)),
            )
            .show(ctx, |ui| {
                ui.heading(
                    RichText::new("F1 TELEMETRY DASHBOARD")
                        .color(Color32::WHITE)
                        .size(26.),
                );
                ui.label(RichText::new("Monaco 2024 Analysis").color(Color32::GRAY));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                card(ui, |ui| self.track_status_view(ui));
                card(ui, |ui| self.comparison_view(ui));
                card(ui, |ui| self.race_pace_view(ui));
                card(ui, |ui| self.tire_degradation_view(ui));
            });
        });

        let window = ctx.input(|i| i.screen_rect().size());
        self.app_config.window_width = window.x;
        self.app_config.window_height = window.y;

        ctx.request_repaint_after(Duration::from_millis(REFRESH_RATE_MS));
    }
}

fn card(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    Frame::new()
        .fill(PALETTE_CARD)
        .corner_radius(CornerRadius::same(CARD_CORNER_RADIUS))
        .inner_margin(Margin::same(16))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
    ui.add_space(16.);
}

pub(crate) fn section_title(ui: &mut Ui, title: &str) {
    ui.label(
        RichText::new(title.to_uppercase())
            .color(Color32::WHITE)
            .size(18.),
    );
    ui.add_space(10.);
}
