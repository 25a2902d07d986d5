use egui::{Color32, CornerRadius, Frame, Margin, RichText, Ui};
use egui_plot::{Legend, Line, PlotPoints};
use itertools::Itertools;

use super::{DashboardApp, PALETTE_EMBER, PALETTE_INSET, section_title};

struct TireWearPoint {
    lap: u32,
    degradation_pct: f64,
}

// wear curve for the current stint, precomputed upstream
const TIRE_WEAR: [TireWearPoint; 10] = [
    TireWearPoint { lap: 1, degradation_pct: 0. },
    TireWearPoint { lap: 2, degradation_pct: 2. },
    TireWearPoint { lap: 3, degradation_pct: 4. },
    TireWearPoint { lap: 4, degradation_pct: 6. },
    TireWearPoint { lap: 5, degradation_pct: 9. },
    TireWearPoint { lap: 6, degradation_pct: 12. },
    TireWearPoint { lap: 7, degradation_pct: 15. },
    TireWearPoint { lap: 8, degradation_pct: 19. },
    TireWearPoint { lap: 9, degradation_pct: 23. },
    TireWearPoint { lap: 10, degradation_pct: 28. },
];

impl DashboardApp {
    pub(crate) fn tire_degradation_view(&mut self, ui: &mut Ui) {
        section_title(ui, "Tire Degradation Analysis");

        let stint = &TIRE_WEAR[TIRE_WEAR.len() - 1];
        ui.horizontal(|ui| {
            badge(ui, "Compound:", "SOFT");
            badge(ui, "Tire Age:", &format!("{} laps", stint.lap));
            badge(ui, "Degradation:", &format!("{:.0}%", stint.degradation_pct));
        });
        ui.add_space(12.);

        let wear_curve = TIRE_WEAR
            .iter()
            .map(|point| [point.lap as f64, point.degradation_pct])
            .collect_vec();

        egui_plot::Plot::new("tire_degradation")
            .height(240.)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .legend(Legend::default())
            .x_axis_label("Lap Number")
            .y_axis_label("Degradation %")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("Tire Degradation %", PlotPoints::new(wear_curve))
                        .color(PALETTE_EMBER)
                        .width(3.),
                );
            });
    }
}

fn badge(ui: &mut Ui, label: &str, value: &str) {
    Frame::new()
        .fill(PALETTE_INSET)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(label).color(Color32::GRAY));
                ui.label(RichText::new(value).color(Color32::WHITE).strong());
            });
        });
}
