// src/gui/pages/seeding.rs
//
// Seven seed slots per conference. Each slot only offers teams that are not
// already seeded elsewhere; the roster rejects anything else anyway.

use eframe::egui;

use crate::{
    config::{consts::{MAX_SEED, MIN_SEED}, options::MergeMode},
    gui::app::App,
    league::Conference,
    roster::Roster,
};

use super::Page;

pub struct SeedingPage;
pub static PAGE: SeedingPage = SeedingPage;

enum Edit {
    Assign(Conference, u8, &'static str),
    Clear(Conference, u8),
}

impl Page for SeedingPage {
    fn label(&self) -> &'static str { "Seeding" }

    fn on_enter(&self, app: &mut App) {
        // Keep an unsaved draft (e.g. from the Standings tab).
        if app.roster.is_empty() {
            app.reload_season();
        }
    }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        let mut edits: Vec<Edit> = Vec::new();

        let roster = &app.roster;
        ui.columns(2, |cols| {
            for (ui, conf) in cols.iter_mut().zip(Conference::BOTH) {
                conference_grid(ui, roster, conf, &mut edits);
            }
        });

        for edit in edits {
            apply(app, edit);
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Save mode:");
            let mode = &mut app.state.options.populate.mode;
            ui.radio_value(mode, MergeMode::Replace, "Replace season");
            ui.radio_value(mode, MergeMode::Update, "Update seeds");
        });

        ui.horizontal(|ui| {
            if ui.button("Save seeding").clicked() {
                save(app);
            }
            if ui.button("Reload from store").clicked() {
                app.reload_season();
                app.status(format!("Reloaded {} seeded teams", app.roster.len()));
            }
            ui.label(format!(
                "AFC {}/7 · NFC {}/7",
                app.roster.conference_len(Conference::Afc),
                app.roster.conference_len(Conference::Nfc)
            ));
        });
    }
}

fn conference_grid(ui: &mut egui::Ui, roster: &Roster, conf: Conference, edits: &mut Vec<Edit>) {
    ui.strong(conf.as_str());
    egui::Grid::new(("seeds", conf.as_str()))
        .num_columns(3)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for seed in MIN_SEED..=MAX_SEED {
                ui.label(format!("#{seed}"));

                let current = roster.get(conf, seed).map(|t| t.team_name.as_str());
                egui::ComboBox::from_id_salt(("seed", conf.as_str(), seed))
                    .selected_text(current.unwrap_or("(open)"))
                    .width(210.0)
                    .show_ui(ui, |ui| {
                        for team in roster.available_teams(conf, seed) {
                            let selected = current == Some(team.name);
                            if ui.selectable_label(selected, team.name).clicked() && !selected {
                                edits.push(Edit::Assign(conf, seed, team.name));
                            }
                        }
                    });

                if ui.add_enabled(current.is_some(), egui::Button::new("Clear")).clicked() {
                    edits.push(Edit::Clear(conf, seed));
                }
                ui.end_row();
            }
        });
}

fn apply(app: &mut App, edit: Edit) {
    match edit {
        Edit::Assign(conf, seed, name) => match app.roster.assign(conf, seed, name) {
            Ok(prev) => {
                logf!("UI: {conf} #{seed} → {name} (was {:?})", prev.map(|t| t.team_name));
                app.status(format!("{conf} #{seed}: {name}"));
            }
            Err(e) => app.status(format!("Cannot seed {name}: {e}")),
        },
        Edit::Clear(conf, seed) => {
            if let Some(t) = app.roster.clear(conf, seed) {
                logf!("UI: {conf} #{seed} cleared ({})", t.team_name);
                app.status(format!("{conf} #{seed} cleared"));
            }
        }
    }
}

fn save(app: &mut App) {
    if app.roster.is_empty() {
        app.status("Nothing to save");
        return;
    }
    if let Err(e) = app.roster.validate() {
        app.status(format!("Seeding invalid: {e}"));
        return;
    }
    let mode = app.state.options.populate.mode;
    match app.store.save_roster(&app.roster, mode) {
        Ok(r) => app.status(format!(
            "Saved {}: {} inserted, {} updated, {} removed",
            app.season(), r.inserted, r.updated, r.removed
        )),
        Err(e) => {
            loge!("Store: save seeding failed: {e}");
            app.status(format!("Save error: {e}"));
        }
    }
}
