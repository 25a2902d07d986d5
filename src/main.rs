mod api;
mod comparison;
mod errors;
mod ui;

use std::sync::{Arc, mpsc};
use std::thread;

use clap::Parser;
use egui::Vec2;

use api::{TelemetryApiClient, spawn_session_listing};
use comparison::ComparisonViewModel;
use comparison::fetcher::{ComparisonSource, run_fetch_dispatcher};
use errors::LapdeckError;
use ui::DashboardApp;
use ui::config::AppConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the telemetry API service
    #[arg(short, long)]
    server: Option<String>,
}

fn run_dashboard(server_url: String, app_config: AppConfig) -> Result<(), LapdeckError> {
    let client = Arc::new(TelemetryApiClient::new(server_url));

    // comparison fetches run off the UI thread; the view-model pushes tagged
    // queries to the dispatcher and drains outcomes every frame
    let (request_tx, request_rx) = mpsc::channel();
    let (outcome_tx, outcome_rx) = mpsc::channel();
    {
        let source: Arc<dyn ComparisonSource> = client.clone();
        thread::spawn(move || run_fetch_dispatcher(source, request_rx, outcome_tx));
    }
    let view_model = ComparisonViewModel::new(request_tx, outcome_rx);

    let (sessions_tx, sessions_rx) = mpsc::channel();
    spawn_session_listing(Arc::clone(&client), sessions_tx.clone());

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options.viewport.with_inner_size(Vec2::new(
        app_config.window_width,
        app_config.window_height,
    ));

    eframe::run_native(
        "Lapdeck",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(DashboardApp::new(
                view_model,
                client,
                sessions_tx,
                sessions_rx,
                app_config,
                cc,
            )))
        }),
    )
    .expect("could not start app");
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let app_config = AppConfig::from_local_file().unwrap_or_default();
    let server_url = cli
        .server
        .unwrap_or_else(|| app_config.server_url.clone());
    run_dashboard(server_url, app_config).expect("Error while running the dashboard");
}
