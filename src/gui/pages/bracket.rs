// src/gui/pages/bracket.rs
//
// One round at a time: generate it from the stored seeding and prior
// winners, confirm the preview, then click the winner of each game.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::{
    bracket::{Game, Round},
    games,
    gui::{app::App, components::export_bar},
    runner,
    scrape::{EspnScoreboard, GameIdLookup},
};

use super::Page;

pub struct BracketPage;
pub static PAGE: BracketPage = BracketPage;

impl Page for BracketPage {
    fn label(&self) -> &'static str { "Bracket" }

    fn on_enter(&self, app: &mut App) {
        app.reload_games();
        app.state.gui.bracket_round = runner::current_round(&app.games, app.season());
    }

    fn draw(&self, ui: &mut egui::Ui, app: &mut App) {
        round_controls(ui, app);

        let warn = ui.visuals().warn_fg_color;
        for issue in &app.issues {
            ui.colored_label(warn, format!("! {issue}"));
        }
        ui.separator();

        if app.pending.is_some() {
            confirm_panel(ui, app);
            ui.separator();
        }

        let picks = game_table(ui, app);
        for (id, team) in picks {
            pick_winner(app, &id, &team);
        }

        ui.separator();
        egui::CollapsingHeader::new("Summary")
            .default_open(false)
            .show(ui, |ui| {
                ui.monospace(games::bracket_summary(&app.games, app.season()));
            });

        ui.separator();
        export_bar::draw(ui, app);
    }
}

fn round_controls(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        let round = &mut app.state.gui.bracket_round;
        for r in Round::ALL {
            ui.selectable_value(round, r, r.label());
        }

        ui.separator();
        if ui.button("Generate").clicked() {
            generate(app);
        }
        ui.checkbox(&mut app.state.options.espn_game_ids, "ESPN game ids");
        ui.checkbox(&mut app.state.gui.bracket_show_ids, "Show ids");
    });
}

/// Pair the round and hold it for confirmation; nothing is written here.
fn generate(app: &mut App) {
    let season = app.season();
    let round = app.state.gui.bracket_round;
    logf!("UI: Generate {round} for {season}");
    let lookup = EspnScoreboard;
    let ids = app.state.options.espn_game_ids.then_some(&lookup as &dyn GameIdLookup);
    match runner::plan_round(season, round, &app.store, ids) {
        Ok(plan) => {
            app.issues = plan.outcome.issues.clone();
            if plan.outcome.games.is_empty() {
                app.status(format!("{round}: no games generated"));
                app.pending = None;
            } else {
                app.status(format!(
                    "{round}: {} ready, {} with ESPN ids; confirm to save",
                    plural!(plan.outcome.games.len(), "game"),
                    plan.feed_ids
                ));
                app.pending = Some(plan);
            }
        }
        Err(e) => {
            loge!("Generate: {e}");
            app.issues.clear();
            app.pending = None;
            app.status(format!("Error: {e}"));
        }
    }
}

fn confirm_panel(ui: &mut egui::Ui, app: &mut App) {
    let Some(plan) = &app.pending else { return };
    ui.strong(format!("{} {} preview", plan.season, plan.round));
    ui.monospace(&plan.preview);

    let mut save = false;
    let mut cancel = false;
    ui.horizontal(|ui| {
        save = ui.button("Save games").clicked();
        cancel = ui.button("Cancel").clicked();
    });

    if cancel {
        logf!("UI: Generate cancelled");
        app.pending = None;
        app.status("Nothing saved.");
    } else if save {
        confirm(app);
    }
}

fn confirm(app: &mut App) {
    let Some(plan) = app.pending.take() else { return };
    match runner::commit_round(&plan, &app.store) {
        Ok(r) => {
            app.status(format!(
                "{}: {} inserted, {} updated, {} unchanged, {} stale removed",
                plan.round, r.inserted, r.updated, r.unchanged, r.removed
            ));
            app.reload_games();
        }
        Err(e) => {
            loge!("Generate: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}

fn pick_winner(app: &mut App, id: &str, team: &str) {
    match runner::record_winner(app.season(), id, team, &app.store) {
        Ok(g) => {
            logf!("UI: Winner {id} → {team}");
            app.status(format!("Recorded: {g}"));
            app.reload_games();
        }
        Err(e) => {
            loge!("Winner: {e}");
            app.status(format!("Error: {e}"));
        }
    }
}

/// Draws the round's games; returns the winner buttons clicked this frame.
fn game_table(ui: &mut egui::Ui, app: &App) -> Vec<(String, String)> {
    let round = app.state.gui.bracket_round;
    let show_ids = app.state.gui.bracket_show_ids;
    let rows = games::in_round(&app.games, app.season(), round);
    let mut picks = Vec::new();

    if rows.is_empty() {
        ui.weak(format!("{round} not generated yet."));
        return picks;
    }

    let mut headers = vec!["Conf", "Away", "Home", "Winner"];
    if show_ids {
        headers.push("Id");
    }

    TableBuilder::new(ui)
        .id_salt(("games", round.week()))
        .striped(true)
        .column(Column::auto().at_least(48.0))
        .columns(Column::auto().at_least(180.0), 2)
        .column(Column::remainder().at_least(140.0))
        .columns(Column::auto(), usize::from(show_ids))
        .header(20.0, |mut header| {
            for h in &headers {
                header.col(|ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|mut body| {
            for g in rows {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(g.conference.as_str());
                    });
                    row.col(|ui| side_button(ui, g, &g.away_team, g.away_seed, &mut picks));
                    row.col(|ui| side_button(ui, g, &g.home_team, g.home_seed, &mut picks));
                    row.col(|ui| {
                        match &g.winner {
                            Some(w) => ui.strong(w),
                            None => ui.weak("undecided"),
                        };
                    });
                    if show_ids {
                        row.col(|ui| {
                            ui.monospace(&g.id);
                        });
                    }
                });
            }
        });
    picks
}

fn side_button(ui: &mut egui::Ui, g: &Game, team: &str, seed: Option<u8>, picks: &mut Vec<(String, String)>) {
    let text = match seed {
        Some(s) => format!("({s}) {team}"),
        None => s!(team),
    };
    let won = g.winner.as_deref() == Some(team);
    if ui.selectable_label(won, text).clicked() && !won {
        picks.push((g.id.clone(), s!(team)));
    }
}
