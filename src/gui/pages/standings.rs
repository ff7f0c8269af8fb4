// src/gui/pages/standings.rs
//
// Fetch (or import) seeded playoff teams, look them over, then either hand
// them to the seeding page or save them straight to the store.

use std::path::PathBuf;

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::{
    config::options::{MergeMode, Source},
    gui::{app::App, progress::GuiProgress},
    import,
    roster::Roster,
    runner, scrape,
};

use super::Page;

pub struct StandingsPage;
pub static PAGE: StandingsPage = StandingsPage;

impl Page for StandingsPage {
    fn label(&self) -> &'static str { "Standings" }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        source_controls(ui, app);
        ui.separator();
        standings_table(ui, app);
        ui.separator();
        apply_controls(ui, app);
    }
}

fn source_controls(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.label("Source:");
        let source = &mut app.state.options.populate.source;
        for s in [Source::Espn, Source::Nfl] {
            ui.selectable_value(source, s, s.label());
        }

        ui.label("Saved page:");
        ui.add(
            egui::TextEdit::singleline(&mut app.html_file_text)
                .hint_text("optional .html")
                .desired_width(220.0),
        );

        if ui.button("Fetch").clicked() {
            fetch(app);
        }
    });

    ui.horizontal(|ui| {
        ui.label("Teams file:");
        ui.add(
            egui::TextEdit::singleline(&mut app.teams_file_text)
                .hint_text(".json or .csv")
                .desired_width(300.0),
        );
        if ui.button("Import").clicked() {
            import_file(app);
        }
    });
}

fn fetch(app: &mut App) {
    let source = app.state.options.populate.source;
    let season = app.season();
    let html = app.html_file_text.trim();
    let html = (!html.is_empty()).then(|| PathBuf::from(html));

    logf!("UI: Fetch {} for {} (saved page: {:?})", source.label(), season, html);
    let mut prog = GuiProgress::new(app.status.clone());
    match scrape::fetch_standings(source, season, html.as_deref(), &app.store, Some(&mut prog)) {
        Ok(teams) => {
            app.status(format!("{}: {}", source.label(), plural!(teams.len(), "seeded team")));
            app.standings = teams;
        }
        Err(e) => {
            loge!("Scrape: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}

fn import_file(app: &mut App) {
    let path = PathBuf::from(app.teams_file_text.trim());
    if path.as_os_str().is_empty() {
        app.status("Enter a teams file path first");
        return;
    }
    match import::load_teams_file(&path) {
        Ok(teams) => {
            app.status(format!("Imported {} from {}", plural!(teams.len(), "team"), path.display()));
            app.standings = teams;
        }
        Err(e) => {
            loge!("Import: {}: {e}", path.display());
            app.status(format!("Import error: {e}"));
        }
    }
}

fn standings_table(ui: &mut egui::Ui, app: &App) {
    if app.standings.is_empty() {
        ui.weak("No standings loaded. Fetch a page or import a file.");
        return;
    }
    TableBuilder::new(ui)
        .id_salt("standings")
        .striped(true)
        .max_scroll_height(320.0)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for h in ["Conference", "Seed", "Abbr", "Team"] {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|mut body| {
            for t in &app.standings {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(t.conference.as_str());
                    });
                    row.col(|ui| {
                        ui.label(t.seed.to_string());
                    });
                    row.col(|ui| {
                        ui.monospace(&t.team_abbreviation);
                    });
                    row.col(|ui| {
                        ui.label(&t.team_name);
                    });
                });
            }
        });
}

fn apply_controls(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        ui.label("Save mode:");
        let mode = &mut app.state.options.populate.mode;
        ui.radio_value(mode, MergeMode::Replace, "Replace season");
        ui.radio_value(mode, MergeMode::Update, "Update seeds");
    });

    ui.horizontal(|ui| {
        let has_rows = !app.standings.is_empty();

        if ui.add_enabled(has_rows, egui::Button::new("Use for seeding")).clicked() {
            match Roster::from_teams(app.season(), app.standings.clone()) {
                Ok(r) => {
                    logf!("UI: Standings → seeding draft ({} teams)", r.len());
                    app.roster = r;
                    app.status("Seeding draft replaced; review it on the Seeding tab");
                }
                Err(e) => app.status(format!("Cannot use standings: {e}")),
            }
        }

        if ui.add_enabled(has_rows, egui::Button::new("Save to store")).clicked() {
            save(app);
        }
    });
}

/// Clicking Save is the approval, so the preview prompt is skipped.
fn save(app: &mut App) {
    let mut opts = app.state.options.clone();
    opts.populate.skip_approval = true;
    match runner::populate_with(&opts, app.standings.clone(), &app.store, &mut |_| true) {
        Ok(out) => {
            if let Some(r) = out.report {
                app.status(format!(
                    "Saved {}: {} inserted, {} updated, {} removed",
                    opts.season, r.inserted, r.updated, r.removed
                ));
            }
            app.reload_season();
        }
        Err(e) => {
            loge!("Populate: {e}");
            app.status(format!("Save error: {e}"));
        }
    }
}
