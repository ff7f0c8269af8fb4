// tests/store_upsert.rs
use std::fs;
use std::path::PathBuf;

use nfl_bracket::bracket::{Game, GameConference, Round};
use nfl_bracket::config::options::{AppOptions, ExportFormat, MergeMode};
use nfl_bracket::league::Conference::{Afc, Nfc};
use nfl_bracket::roster::{Roster, SeededTeam};
use nfl_bracket::runner;
use nfl_bracket::scrape::GameIdLookup;
use nfl_bracket::specs::espn::{self, ScheduledGame};
use nfl_bracket::store::Store;

const AFC: [&str; 7] = [
    "Kansas City Chiefs", "Buffalo Bills", "Baltimore Ravens", "Houston Texans",
    "Los Angeles Chargers", "Pittsburgh Steelers", "Denver Broncos",
];
const NFC: [&str; 7] = [
    "Detroit Lions", "Philadelphia Eagles", "Tampa Bay Buccaneers", "Los Angeles Rams",
    "Minnesota Vikings", "Washington Commanders", "Green Bay Packers",
];

fn tmp_store(name: &str) -> (Store, PathBuf) {
    let mut p = std::env::temp_dir();
    p.push(format!("nfl_bracket_store_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    (Store::at(&p), p)
}

fn full_roster(season: u16) -> Roster {
    let teams = AFC
        .iter()
        .enumerate()
        .map(|(i, n)| SeededTeam::new(n, None, Afc, i as u8 + 1))
        .chain(NFC.iter().enumerate().map(|(i, n)| SeededTeam::new(n, None, Nfc, i as u8 + 1)));
    Roster::from_teams(season, teams).unwrap()
}

fn yes(_: &str) -> bool {
    true
}

/// Scoreboard lookup backed by the saved fixture.
struct SavedScoreboard;

impl GameIdLookup for SavedScoreboard {
    fn scheduled(&self, _: u16, _: Round) -> Result<Vec<ScheduledGame>, Box<dyn std::error::Error>> {
        let doc = serde_json::from_str(include_str!("fixtures/espn_scoreboard.json"))?;
        Ok(espn::parse_scoreboard(&doc))
    }
}

struct Offline;

impl GameIdLookup for Offline {
    fn scheduled(&self, _: u16, _: Round) -> Result<Vec<ScheduledGame>, Box<dyn std::error::Error>> {
        Err("network unreachable".into())
    }
}

fn seeded_store(name: &str) -> (Store, PathBuf) {
    let (store, dir) = tmp_store(name);
    store.save_roster(&full_roster(2024), MergeMode::Replace).unwrap();
    (store, dir)
}

/// Generate `round` and record every home team as the winner.
fn play_round_home_wins(store: &Store, round: Round) -> Vec<Game> {
    let out = runner::generate(2024, round, store, None, &mut yes).unwrap();
    assert!(out.report.is_some(), "{round}: {:?}", out.outcome.issues);
    for g in &out.outcome.games {
        runner::record_winner(2024, &g.id, &g.home_team, store).unwrap();
    }
    out.outcome.games
}

fn week(store: &Store, w: u8) -> Vec<Game> {
    store.load_games(2024).unwrap().into_iter().filter(|g| g.week == w).collect()
}

#[test]
fn roster_save_keeps_other_seasons() {
    let (store, _dir) = tmp_store("seasons");
    store.save_roster(&full_roster(2023), MergeMode::Replace).unwrap();
    store.save_roster(&full_roster(2024), MergeMode::Replace).unwrap();

    let mut smaller = Roster::new(2024);
    smaller.assign(Afc, 1, "Kansas City Chiefs").unwrap();
    let report = store.save_roster(&smaller, MergeMode::Replace).unwrap();
    assert_eq!((report.inserted, report.removed), (1, 14));

    assert_eq!(store.load_roster(2023).unwrap().len(), 14);
    assert_eq!(store.load_roster(2024).unwrap().len(), 1);
}

#[test]
fn update_mode_upserts_by_seed() {
    let (store, _dir) = tmp_store("update");
    store.save_roster(&full_roster(2024), MergeMode::Replace).unwrap();

    let mut change = Roster::new(2024);
    change.assign(Nfc, 7, "Seattle Seahawks").unwrap();
    let report = store.save_roster(&change, MergeMode::Update).unwrap();
    assert_eq!((report.inserted, report.updated, report.removed), (0, 1, 0));

    let r = store.load_roster(2024).unwrap();
    assert_eq!(r.len(), 14);
    assert_eq!(r.get(Nfc, 7).unwrap().team_name, "Seattle Seahawks");
    assert_eq!(r.get(Nfc, 7).unwrap().team_abbreviation, "SEA");
}

#[test]
fn same_games_upserted_twice_insert_once_and_keep_winners() {
    let (store, _dir) = tmp_store("games");
    let game = Game::new(
        2024,
        Round::WildCard,
        GameConference::Afc,
        ("Buffalo Bills", Some(2)),
        ("Denver Broncos", Some(7)),
    );

    let first = store.upsert_games(vec![game.clone()]).unwrap();
    assert_eq!((first.inserted, first.unchanged), (1, 0));

    store.record_winner(2024, &game.id, "buffalo bills").unwrap();

    let second = store.upsert_games(vec![game.clone()]).unwrap();
    assert_eq!((second.inserted, second.updated, second.unchanged), (0, 0, 1));

    let stored = store.load_games(2024).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].winner.as_deref(), Some("Buffalo Bills"));
}

#[test]
fn record_winner_rejects_outsiders_and_unknown_ids() {
    let (store, _dir) = tmp_store("winner");
    let game = Game::new(
        2024,
        Round::WildCard,
        GameConference::Nfc,
        ("Philadelphia Eagles", Some(2)),
        ("Green Bay Packers", Some(7)),
    );
    store.upsert_games(vec![game.clone()]).unwrap();

    let err = store.record_winner(2024, &game.id, "Dallas Cowboys").unwrap_err();
    assert!(err.to_string().contains("did not play"));
    assert!(store.record_winner(2024, "no-such-game", "Green Bay Packers").is_err());
    assert!(store.record_winner(2023, &game.id, "Green Bay Packers").is_err());
    assert_eq!(store.load_games(2024).unwrap()[0].winner, None);
}

#[test]
fn game_ids_are_deterministic() {
    let a = Game::composite_id(2024, 1, "Buffalo Bills", "Denver Broncos");
    let b = Game::composite_id(2024, 1, "Buffalo Bills", "Denver Broncos");
    assert_eq!(a, b);
    assert_ne!(a, Game::composite_id(2024, 1, "Denver Broncos", "Buffalo Bills"));
    assert!(a.starts_with("2024-1-"));

    let g = Game::new(2024, Round::WildCard, GameConference::Afc, ("Buffalo Bills", Some(2)), ("Denver Broncos", Some(7)));
    assert_eq!(g.clone().with_external_id("  ").id, a);
    assert_eq!(g.with_external_id("401671789").id, "401671789");
}

#[test]
fn full_season_through_the_runner() {
    let (store, dir) = tmp_store("season");
    let mut opts = AppOptions::default();
    opts.season = 2024;
    opts.populate.save_preview = true;

    let teams: Vec<SeededTeam> = full_roster(2024).teams().cloned().collect();
    let out = runner::populate_with(&opts, teams, &store, &mut yes).unwrap();
    assert_eq!(out.report.map(|r| r.inserted), Some(14));
    assert!(out.preview.contains("Total: 14 teams (7 AFC, 7 NFC)"));
    assert!(out.preview_path.is_some_and(|p| p.ends_with("playoff-teams-2024-preview.json")));

    // Divisional before any wild card winners: nothing to pair yet.
    let early = runner::generate(2024, Round::Divisional, &store, None, &mut yes).unwrap();
    assert!(early.outcome.games.is_empty());
    assert!(early.report.is_none());

    let mut declined = |_: &str| false;
    let wc = runner::generate(2024, Round::WildCard, &store, None, &mut declined).unwrap();
    assert_eq!(wc.outcome.games.len(), 6);
    assert!(wc.report.is_none());
    assert!(store.load_games(2024).unwrap().is_empty());

    for round in Round::ALL {
        let out = runner::generate(2024, round, &store, None, &mut yes).unwrap();
        assert!(out.report.is_some(), "{round}: {:?}", out.outcome.issues);
        for g in &out.outcome.games {
            runner::record_winner(2024, &g.id, &g.home_team, &store).unwrap();
        }
        assert_eq!(runner::current_round(&store.load_games(2024).unwrap(), 2024), Round::from_week(round.week() + 1).unwrap_or(Round::SuperBowl));
    }

    let games = store.load_games(2024).unwrap();
    assert_eq!(games.len(), 6 + 4 + 2 + 1);
    let sb = games.iter().find(|g| g.week == 4).unwrap();
    assert_eq!((sb.home_team.as_str(), sb.away_team.as_str()), ("Detroit Lions", "Kansas City Chiefs"));

    let summary = runner::bracket_summary(2024, &store).unwrap();
    assert!(summary.contains("Week 4: Super Bowl (1/1 decided)"));

    opts.export.set_path(dir.join("bracket").to_str().unwrap());
    opts.export.format = ExportFormat::Tsv;
    let path = runner::export_bracket(2024, &opts.export, &store).unwrap();
    assert!(path.ends_with("bracket-2024.tsv"));
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().count(), 14);
    assert!(text.starts_with("Week\tRound\tConference"));
}

#[test]
fn generate_without_roster_is_an_error() {
    let (store, _dir) = tmp_store("empty");
    assert!(runner::generate(2024, Round::WildCard, &store, None, &mut yes).is_err());
    assert!(runner::export_bracket(2024, &AppOptions::default().export, &store).is_err());
}

#[test]
fn corrected_winner_replaces_the_next_round() {
    let (store, _dir) = seeded_store("correct");
    let wild_card = play_round_home_wins(&store, Round::WildCard);
    play_round_home_wins(&store, Round::Divisional);
    play_round_home_wins(&store, Round::ConferenceChampionship);
    assert_eq!(week(&store, 3).len(), 2);

    let bills = wild_card.iter().find(|g| g.home_team == "Buffalo Bills").unwrap();
    runner::record_winner(2024, &bills.id, "Denver Broncos", &store).unwrap();

    let out = runner::generate(2024, Round::Divisional, &store, None, &mut yes).unwrap();
    let r = out.report.unwrap();
    // 2 stale AFC divisional games + the AFC championship built on them
    assert_eq!((r.inserted, r.unchanged, r.removed), (2, 2, 3));

    let divisional = week(&store, 2);
    assert_eq!(divisional.len(), 4);
    let afc: Vec<String> = divisional
        .iter()
        .filter(|g| g.conference == GameConference::Afc)
        .map(|g| g.matchup())
        .collect();
    assert_eq!(afc.len(), 2);
    assert!(afc.contains(&"Denver Broncos @ Kansas City Chiefs".to_string()));
    assert!(afc.contains(&"Houston Texans @ Baltimore Ravens".to_string()));
    assert!(!divisional.iter().any(|g| g.id == Game::composite_id(2024, 2, "Buffalo Bills", "Baltimore Ravens")));

    // NFC side is untouched and keeps its winners
    let nfc_decided = divisional
        .iter()
        .filter(|g| g.conference == GameConference::Nfc && g.winner.is_some())
        .count();
    assert_eq!(nfc_decided, 2);
    let championship = week(&store, 3);
    assert_eq!(championship.len(), 1);
    assert_eq!(championship[0].conference, GameConference::Nfc);
    assert!(championship[0].winner.is_some());

    for g in divisional.iter().filter(|g| g.conference == GameConference::Afc) {
        runner::record_winner(2024, &g.id, &g.home_team, &store).unwrap();
    }
    let cc = runner::generate(2024, Round::ConferenceChampionship, &store, None, &mut yes).unwrap();
    assert!(cc.outcome.issues.is_empty(), "{:?}", cc.outcome.issues);
    assert_eq!(week(&store, 3).len(), 2);
    let nfc_cc = week(&store, 3).into_iter().find(|g| g.conference == GameConference::Nfc).unwrap();
    assert!(nfc_cc.winner.is_some());
}

#[test]
fn regenerating_an_unchanged_round_keeps_later_rounds() {
    let (store, _dir) = seeded_store("unchanged");
    play_round_home_wins(&store, Round::WildCard);
    play_round_home_wins(&store, Round::Divisional);

    let out = runner::generate(2024, Round::WildCard, &store, None, &mut yes).unwrap();
    let r = out.report.unwrap();
    assert_eq!((r.inserted, r.updated, r.unchanged, r.removed), (0, 0, 6, 0));
    assert_eq!(week(&store, 2).len(), 4);
    assert!(week(&store, 1).iter().all(|g| g.winner.is_some()));
}

#[test]
fn scoreboard_ids_replace_composite_ids_where_matched() {
    let (store, _dir) = seeded_store("feed_ids");
    let out = runner::generate(2024, Round::WildCard, &store, Some(&SavedScoreboard), &mut yes).unwrap();
    assert_eq!(out.report.map(|r| r.inserted), Some(6));

    let games = week(&store, 1);
    let bills = games.iter().find(|g| g.home_team == "Buffalo Bills").unwrap();
    assert_eq!(bills.id, "401671789");
    let texans = games.iter().find(|g| g.home_team == "Houston Texans").unwrap();
    assert_eq!(texans.id, "401671790");
    let ravens = games.iter().find(|g| g.home_team == "Baltimore Ravens").unwrap();
    assert_eq!(ravens.id, Game::composite_id(2024, 1, "Baltimore Ravens", "Pittsburgh Steelers"));

    // the winner follows the matchup when the id changes back
    runner::record_winner(2024, "401671789", "Buffalo Bills", &store).unwrap();
    let again = runner::generate(2024, Round::WildCard, &store, Some(&Offline), &mut yes).unwrap();
    let r = again.report.unwrap();
    assert_eq!((r.inserted, r.removed), (2, 2));
    let bills = week(&store, 1).into_iter().find(|g| g.home_team == "Buffalo Bills").unwrap();
    assert_eq!(bills.id, Game::composite_id(2024, 1, "Buffalo Bills", "Denver Broncos"));
    assert_eq!(bills.winner.as_deref(), Some("Buffalo Bills"));
    assert_eq!(week(&store, 1).len(), 6);
}

#[test]
fn planned_round_writes_only_on_commit() {
    let (store, _dir) = seeded_store("plan");
    let plan = runner::plan_round(2024, Round::WildCard, &store, None).unwrap();
    assert_eq!(plan.outcome.games.len(), 6);
    assert!(plan.preview.contains("(7) Denver Broncos @ (2) Buffalo Bills"));
    assert!(store.load_games(2024).unwrap().is_empty());

    let r = runner::commit_round(&plan, &store).unwrap();
    assert_eq!(r.inserted, 6);
    assert_eq!(week(&store, 1).len(), 6);

    let nothing = runner::plan_round(2024, Round::SuperBowl, &store, None).unwrap();
    assert!(nothing.outcome.games.is_empty());
    assert!(runner::commit_round(&nothing, &store).is_err());
}
