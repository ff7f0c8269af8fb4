// src/runner.rs
//
// Operator workflows shared by the CLI and the GUI. Each one reads from the
// store, computes, shows a preview, and writes only after approval.

use std::error::Error;
use std::path::PathBuf;

use crate::bracket::{generate_round, Game, Round, RoundOutcome};
use crate::config::options::{AppOptions, ExportOptions, Source};
use crate::file;
use crate::games::{self, UpsertReport};
use crate::import;
use crate::progress::Progress;
use crate::roster::{MergeReport, Roster, SeededTeam};
use crate::scrape::{self, GameIdLookup};
use crate::store::Store;

/// Asked with the preview text; `true` means go ahead and write.
pub type Approve<'a> = &'a mut dyn FnMut(&str) -> bool;

/* ---------------- Populate ---------------- */

pub struct PopulateOutcome {
    pub roster: Roster,
    pub preview: String,
    pub preview_path: Option<PathBuf>,
    /// `None` when the operator declined.
    pub report: Option<MergeReport>,
}

/// Teams from the configured input: `--teams-file`, then `--teams`, then the
/// standings page of `source`.
pub fn gather_teams(
    opts: &AppOptions,
    store: &Store,
    progress: Option<&mut dyn Progress>,
) -> Result<Vec<SeededTeam>, Box<dyn Error>> {
    let p = &opts.populate;
    if let Some(path) = &p.teams_file {
        return import::load_teams_file(path);
    }
    if let Some(text) = &p.teams_inline {
        let teams = import::teams_from_json(text).map_err(|e| format!("Error parsing JSON teams: {e}"))?;
        logf!("Import: {} teams from inline JSON", teams.len());
        return Ok(teams);
    }
    match p.source {
        Source::Espn | Source::Nfl => {
            scrape::fetch_standings(p.source, opts.season, p.html_file.as_deref(), store, progress)
        }
        Source::File => Err("Source 'file' needs --teams-file <path>".into()),
        Source::Manual => Err("Source 'manual' needs --teams '<json>'".into()),
    }
}

/// Validate, preview, ask, then persist with the configured merge mode.
pub fn populate_with(
    opts: &AppOptions,
    teams: Vec<SeededTeam>,
    store: &Store,
    approve: Approve,
) -> Result<PopulateOutcome, Box<dyn Error>> {
    if teams.is_empty() {
        return Err("No teams to insert".into());
    }
    let roster = Roster::from_teams(opts.season, teams)?;
    let preview = roster.preview();

    let preview_path = if opts.populate.save_preview {
        let teams: Vec<&SeededTeam> = roster.teams().collect();
        Some(store.save_preview(opts.season, &teams)?)
    } else {
        None
    };

    if !opts.populate.skip_approval && !approve(&preview) {
        logf!("Populate: {} cancelled by operator", opts.season);
        return Ok(PopulateOutcome { roster, preview, preview_path, report: None });
    }

    let report = store.save_roster(&roster, opts.populate.mode)?;
    Ok(PopulateOutcome { roster, preview, preview_path, report: Some(report) })
}

pub fn populate(
    opts: &AppOptions,
    store: &Store,
    approve: Approve,
    progress: Option<&mut dyn Progress>,
) -> Result<PopulateOutcome, Box<dyn Error>> {
    let teams = gather_teams(opts, store, progress)?;
    populate_with(opts, teams, store, approve)
}

/* ---------------- Generate ---------------- */

/// A generated round waiting for approval. Nothing is written yet.
pub struct GeneratePlan {
    pub season: u16,
    pub round: Round,
    pub outcome: RoundOutcome,
    pub preview: String,
    /// Games that took an id from the scoreboard feed.
    pub feed_ids: usize,
}

pub struct GenerateOutcome {
    pub outcome: RoundOutcome,
    pub preview: String,
    /// `None` when nothing was produced or the operator declined.
    pub report: Option<UpsertReport>,
}

/// Pair `round` from the stored roster and prior winners, then look up feed
/// ids when `ids` is given. A failed lookup keeps the composite ids.
pub fn plan_round(
    season: u16,
    round: Round,
    store: &Store,
    ids: Option<&dyn GameIdLookup>,
) -> Result<GeneratePlan, Box<dyn Error>> {
    let roster = store.load_roster(season)?;
    if roster.is_empty() {
        return Err(format!("No seeded teams stored for {season}; populate the season first").into());
    }
    let existing = store.load_games(season)?;
    let mut outcome = generate_round(round, &roster, &existing);
    for issue in &outcome.issues {
        logw!("Generate {season} {round}: {issue}");
    }

    let mut feed_ids = 0;
    if let (Some(lookup), false) = (ids, outcome.games.is_empty()) {
        match lookup.scheduled(season, round) {
            Ok(scheduled) => {
                feed_ids = games::assign_external_ids(&mut outcome.games, &scheduled);
                logf!("Generate {season} {round}: {feed_ids}/{} games matched feed ids", outcome.games.len());
            }
            Err(e) => logw!("Generate {season} {round}: game id lookup failed, keeping composite ids: {e}"),
        }
    }

    let preview = games::preview(&outcome.games);
    Ok(GeneratePlan { season, round, outcome, preview, feed_ids })
}

/// Write an approved plan.
pub fn commit_round(plan: &GeneratePlan, store: &Store) -> Result<UpsertReport, Box<dyn Error>> {
    if plan.outcome.games.is_empty() {
        return Err(format!("No {} games to save for {}", plan.round, plan.season).into());
    }
    store.replace_round_games(plan.outcome.games.clone())
}

/// `plan_round`, ask with the preview, `commit_round` on approval.
pub fn generate(
    season: u16,
    round: Round,
    store: &Store,
    ids: Option<&dyn GameIdLookup>,
    approve: Approve,
) -> Result<GenerateOutcome, Box<dyn Error>> {
    let plan = plan_round(season, round, store, ids)?;
    if plan.outcome.games.is_empty() || !approve(&plan.preview) {
        return Ok(GenerateOutcome { outcome: plan.outcome, preview: plan.preview, report: None });
    }
    let report = commit_round(&plan, store)?;
    Ok(GenerateOutcome { outcome: plan.outcome, preview: plan.preview, report: Some(report) })
}

/// First round that still has work: not generated yet, or with open games.
pub fn current_round(games: &[Game], season: u16) -> Round {
    for round in Round::ALL {
        let rg = games::in_round(games, season, round);
        if rg.is_empty() || rg.iter().any(|g| g.winner.is_none()) {
            return round;
        }
    }
    Round::SuperBowl
}

/* ---------------- Winners / reports ---------------- */

pub fn record_winner(season: u16, game_id: &str, team: &str, store: &Store) -> Result<Game, Box<dyn Error>> {
    store.record_winner(season, game_id, team)
}

pub fn bracket_summary(season: u16, store: &Store) -> Result<String, Box<dyn Error>> {
    let games = store.load_games(season)?;
    Ok(games::bracket_summary(&games, season))
}

pub fn export_bracket(season: u16, export: &ExportOptions, store: &Store) -> Result<PathBuf, Box<dyn Error>> {
    let games = store.load_games(season)?;
    let sorted = games::sorted(&games, season);
    if sorted.is_empty() {
        return Err(format!("No games stored for {season}").into());
    }
    file::write_bracket_export(export, season, &sorted)
}
