use egui::{Color32, Grid, RichText, Ui};

use super::{DashboardApp, PALETTE_AZURE, PALETTE_GOLD, PALETTE_RED, PALETTE_TEAL, section_title};

const STATUS_ITEMS: [(&str, &str, Color32); 6] = [
    ("Session", "Race", PALETTE_RED),
    ("Circuit", "Monaco", PALETTE_TEAL),
    ("Weather", "Sunny", PALETTE_GOLD),
    ("Track Temp", "52°C", Color32::from_rgb(255, 140, 0)),
    ("Air Temp", "28°C", PALETTE_AZURE),
    ("Track Status", "Green", Color32::GREEN),
];

impl DashboardApp {
    pub(crate) fn track_status_view(&mut self, ui: &mut Ui) {
        section_title(ui, "Track Status");

        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(Color32::GREEN));
            ui.label(RichText::new("LIVE SESSION").color(Color32::GREEN).small());
        });
        ui.add_space(8.);

        Grid::new("track_status_grid")
            .num_columns(STATUS_ITEMS.len())
            .spacing([24., 6.])
            .show(ui, |ui| {
                for (label, _, _) in STATUS_ITEMS {
                    ui.label(RichText::new(label.to_uppercase()).color(Color32::GRAY).small());
                }
                ui.end_row();
                for (_, value, color) in STATUS_ITEMS {
                    ui.label(RichText::new(value).color(color).size(16.));
                }
                ui.end_row();
            });
    }
}
