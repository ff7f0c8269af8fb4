// src/gui/components/tabs.rs
//
// Top bar: page tabs on the left, the season box on the right.

use eframe::egui;

use crate::gui::{app::App, router};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let cur = app.current_index();
        for (idx, page) in router::all_pages().iter().enumerate() {
            let selected = idx == cur;
            if ui.selectable_label(selected, page.label()).clicked() && !selected {
                app.set_current_index(idx);
            }
        }

        ui.separator();
        ui.label("Season:");
        let resp = ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.season_text)
                .desired_width(56.0)
                .font(egui::TextStyle::Monospace),
        );
        if resp.lost_focus() {
            app.commit_season_text();
        }
    });
}
