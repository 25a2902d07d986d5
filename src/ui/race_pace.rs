use egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend};
use itertools::Itertools;

use super::{DashboardApp, PALETTE_RED, PALETTE_TEAL, section_title};

struct PaceEntry {
    driver: &'static str,
    avg_lap_time: f64,
    fastest_lap: f64,
}

// session aggregates, precomputed upstream
const RACE_PACE: [PaceEntry; 4] = [
    PaceEntry {
        driver: "VER",
        avg_lap_time: 74.23,
        fastest_lap: 73.65,
    },
    PaceEntry {
        driver: "HAM",
        avg_lap_time: 74.89,
        fastest_lap: 74.43,
    },
    PaceEntry {
        driver: "LEC",
        avg_lap_time: 75.12,
        fastest_lap: 74.87,
    },
    PaceEntry {
        driver: "PER",
        avg_lap_time: 75.45,
        fastest_lap: 75.01,
    },
];

impl DashboardApp {
    pub(crate) fn race_pace_view(&mut self, ui: &mut Ui) {
        section_title(ui, "Race Pace Overview");

        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(80.))
            .column(Column::auto().at_least(120.))
            .column(Column::remainder())
            .header(22., |mut header| {
                header.col(|ui| {
                    ui.strong("Driver");
                });
                header.col(|ui| {
                    ui.strong("Avg Pace");
                });
                header.col(|ui| {
                    ui.strong("Fastest Lap");
                });
            })
            .body(|mut body| {
                for entry in &RACE_PACE {
                    body.row(20., |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(entry.driver).color(Color32::WHITE));
                        });
                        row.col(|ui| {
                            ui.monospace(format!("{:.3}s", entry.avg_lap_time));
                        });
                        row.col(|ui| {
                            ui.monospace(format!("{:.3}s", entry.fastest_lap));
                        });
                    });
                }
            });

        ui.add_space(12.);

        let avg_bars = RACE_PACE
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64 - 0.2, entry.avg_lap_time)
                    .width(0.35)
                    .name(entry.driver)
            })
            .collect_vec();
        let fastest_bars = RACE_PACE
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Bar::new(i as f64 + 0.2, entry.fastest_lap)
                    .width(0.35)
                    .name(entry.driver)
            })
            .collect_vec();

        egui_plot::Plot::new("race_pace")
            .height(220.)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .legend(Legend::default())
            .include_y(73.)
            .include_y(76.)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new("Avg Lap", avg_bars).color(PALETTE_RED));
                plot_ui.bar_chart(BarChart::new("Fastest", fastest_bars).color(PALETTE_TEAL));
            });
    }
}
