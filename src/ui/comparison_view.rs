use std::sync::Arc;

use egui::{Color32, ComboBox, RichText, Ui};
use egui_plot::{Legend, Line, PlotPoints, Points};
use itertools::Itertools;

use super::{DashboardApp, PALETTE_AZURE, PALETTE_MINT, section_title};
use crate::api::{ComparisonResult, LapRecord, spawn_session_listing};
use crate::comparison::ComparisonState;

/// Drivers offered by the comparison selectors. Codes are passed to the
/// service as-is; an unknown or duplicated code is the service's problem.
const DRIVER_ROSTER: [(&str, &str); 4] = [
    ("VER", "Max Verstappen"),
    ("HAM", "Lewis Hamilton"),
    ("LEC", "Charles Leclerc"),
    ("PER", "Sergio Perez"),
];

const NO_SESSION_LABEL: &str = "no session";

fn driver_name(code: &str) -> &str {
    DRIVER_ROSTER
        .iter()
        .find(|(roster_code, _)| *roster_code == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

impl DashboardApp {
    pub(crate) fn comparison_view(&mut self, ui: &mut Ui) {
        section_title(ui, "Driver Comparison");

        self.session_selector(ui);
        ui.add_space(6.);
        self.driver_selectors(ui);
        ui.add_space(12.);

        let mut retry_clicked = false;
        match self.comparison.state() {
            ComparisonState::Idle => {
                ui.label(
                    RichText::new("Select a session to compare lap times.").color(Color32::GRAY),
                );
            }
            ComparisonState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading telemetry data...").color(Color32::GRAY));
                });
            }
            ComparisonState::Failed(e) => {
                ui.label(RichText::new(format!("{}", e)).color(Color32::RED));
                retry_clicked = ui.button("Retry").clicked();
            }
            ComparisonState::Ready(result) => comparison_plot(ui, result),
        }
        if retry_clicked {
            self.comparison.retry();
        }
    }

    fn session_selector(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Session: ").color(Color32::WHITE));

            let mut selected = self.comparison.selection().session_id.clone();
            ComboBox::from_id_salt("session_selector")
                .selected_text(selected.as_deref().unwrap_or(NO_SESSION_LABEL).to_owned())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, None, NO_SESSION_LABEL);
                    for session in &self.sessions {
                        ui.selectable_value(&mut selected, Some(session.clone()), session);
                    }
                });
            self.comparison.set_session(selected);
        });

        let mut reload_clicked = false;
        if let Some(message) = &self.session_listing_error {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(Color32::RED));
                reload_clicked = ui.button("Reload sessions").clicked();
            });
        }
        if reload_clicked {
            self.session_listing_error = None;
            spawn_session_listing(Arc::clone(&self.client), self.sessions_tx.clone());
        }
    }

    fn driver_selectors(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let mut driver_a = self.comparison.selection().driver_a.clone();
            ComboBox::from_id_salt("driver_a_selector")
                .selected_text(driver_name(&driver_a).to_owned())
                .show_ui(ui, |ui| {
                    for (code, name) in DRIVER_ROSTER {
                        ui.selectable_value(&mut driver_a, code.to_string(), name);
                    }
                });

            ui.label(RichText::new("VS").color(Color32::GRAY));

            let mut driver_b = self.comparison.selection().driver_b.clone();
            ComboBox::from_id_salt("driver_b_selector")
                .selected_text(driver_name(&driver_b).to_owned())
                .show_ui(ui, |ui| {
                    for (code, name) in DRIVER_ROSTER {
                        ui.selectable_value(&mut driver_b, code.to_string(), name);
                    }
                });

            self.comparison.set_driver_a(driver_a);
            self.comparison.set_driver_b(driver_b);
        });
    }
}

fn comparison_plot(ui: &mut Ui, result: &ComparisonResult) {
    if result.laps.is_empty() {
        ui.label(RichText::new("No timed laps for this selection.").color(Color32::GRAY));
        return;
    }

    let a_segments = time_segments(&result.laps, |record| record.driver_a_time);
    let b_segments = time_segments(&result.laps, |record| record.driver_b_time);
    let a_markers = a_segments.iter().flatten().copied().collect_vec();
    let b_markers = b_segments.iter().flatten().copied().collect_vec();

    egui_plot::Plot::new("driver_comparison")
        .height(340.)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .x_axis_label("Lap Number")
        .y_axis_label("Lap Time (s)")
        .show(ui, |plot_ui| {
            for segment in &a_segments {
                plot_ui.line(
                    Line::new(result.query.driver_a.clone(), PlotPoints::new(segment.clone()))
                        .color(PALETTE_AZURE)
                        .width(2.),
                );
            }
            for segment in &b_segments {
                plot_ui.line(
                    Line::new(result.query.driver_b.clone(), PlotPoints::new(segment.clone()))
                        .color(PALETTE_MINT)
                        .width(2.),
                );
            }
            plot_ui.points(
                Points::new(result.query.driver_a.clone(), PlotPoints::new(a_markers))
                    .color(PALETTE_AZURE)
                    .radius(3.),
            );
            plot_ui.points(
                Points::new(result.query.driver_b.clone(), PlotPoints::new(b_markers))
                    .color(PALETTE_MINT)
                    .radius(3.),
            );
        });
}

/// Splits one driver's lap times into contiguous runs of consecutive laps.
/// A lap the driver has no time for (or a hole in the lap sequence) ends
/// the current run, so the chart shows a gap instead of a line bridging it.
fn time_segments(
    laps: &[LapRecord],
    time: fn(&LapRecord) -> Option<f64>,
) -> Vec<Vec<[f64; 2]>> {
    let mut segments: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    let mut previous_lap: Option<u32> = None;

    for record in laps {
        let contiguous = previous_lap.is_none_or(|prev| record.lap == prev + 1);
        previous_lap = Some(record.lap);
        match time(record) {
            Some(seconds) => {
                if !contiguous && !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                current.push([record.lap as f64, seconds]);
            }
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
