// src/gui/components/export_bar.rs

use eframe::egui;

use crate::{config::options::ExportFormat, file, games, gui::app::App, runner};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let season = app.season();
    {
        let export = &mut app.state.options.export;
        let prev_fmt = export.format;

        ui.horizontal(|ui| {
            ui.label("Format:");
            ui.selectable_value(&mut export.format, ExportFormat::Csv, "CSV");
            ui.selectable_value(&mut export.format, ExportFormat::Tsv, "TSV");

            let before_headers = export.include_headers;
            ui.checkbox(&mut export.include_headers, "Include headers");
            if export.include_headers != before_headers {
                logf!("UI: Include_headers → {}", export.include_headers);
            }
        });

        if export.format != prev_fmt {
            logf!("UI: Export format → {:?}", export.format);
            if !app.out_path_dirty {
                app.out_path_text = export.out_path(season).to_string_lossy().into_owned();
            }
        }
    }

    ui.horizontal(|ui| {
        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text).font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) → {}", app.out_path_text);
        }

        if ui.button("Copy").clicked() {
            let sorted = games::sorted(&app.games, season);
            if sorted.is_empty() {
                app.status("Nothing to copy");
            } else {
                let export = &app.state.options.export;
                let txt = file::export_string(&sorted, export.include_headers, export.delim());
                ui.ctx().copy_text(txt);
                logf!("Copy: {} games", sorted.len());
                app.status(format!("Copied {} to clipboard", plural!(sorted.len(), "game")));
            }
        }

        if ui.button("Export").clicked() {
            if app.out_path_dirty {
                app.state.options.export.set_path(&app.out_path_text);
                app.out_path_text = app.state.options.export.out_path(season).to_string_lossy().into_owned();
                app.out_path_dirty = false;
            }
            match runner::export_bracket(season, &app.state.options.export, &app.store) {
                Ok(path) => app.status(format!("Exported {}", path.display())),
                Err(e) => {
                    loge!("Export: Error: {}", e);
                    app.status(format!("Export error: {e}"));
                }
            }
        }
    });
}
