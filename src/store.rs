// src/store.rs
//
// Local table store under `.store/`: one CSV per table, every season in the
// same file. Writes rewrite the whole file; rows of other seasons are carried
// through untouched.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bracket::{Game, GameConference};
use crate::config::consts::{GAMES_FILE, PLAYOFF_TEAMS_FILE, STORE_DIR};
use crate::config::options::MergeMode;
use crate::csv::{self, Table};
use crate::games::{self, UpsertReport};
use crate::league::Conference;
use crate::roster::{MergeReport, Roster, SeededTeam};

const TEAM_HEADERS: [&str; 5] = ["season", "conference", "seed", "team_name", "team_abbreviation"];
const GAME_HEADERS: [&str; 9] = [
    "id", "season", "week", "conference", "home_team", "away_team", "home_seed", "away_seed", "winner",
];

type Res<T> = Result<T, Box<dyn Error>>;

#[derive(Clone, Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Default for Store {
    fn default() -> Self {
        Store::at(STORE_DIR)
    }
}

impl Store {
    pub fn at<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /* ---------------- Playoff teams ---------------- */

    fn read_teams(&self) -> Res<Vec<(u16, SeededTeam)>> {
        let Some(table) = read_table(&self.path(PLAYOFF_TEAMS_FILE))? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(table.rows.len());
        for (i, row) in table.rows.iter().enumerate() {
            match team_from_row(&table, row) {
                Some(t) => out.push(t),
                None => logw!("Store: skipping malformed team row {}: {:?}", i + 2, row),
            }
        }
        Ok(out)
    }

    pub fn load_roster(&self, season: u16) -> Res<Roster> {
        let teams = self
            .read_teams()?
            .into_iter()
            .filter(|(s, _)| *s == season)
            .map(|(_, t)| t);
        let roster = Roster::from_teams(season, teams)?;
        logd!("Store: loaded {} seeded teams for {}", roster.len(), season);
        Ok(roster)
    }

    /// Persist `roster` for its season. Replace drops the season's rows first;
    /// Update upserts by (conference, seed).
    pub fn save_roster(&self, roster: &Roster, mode: MergeMode) -> Res<MergeReport> {
        roster.validate()?;
        let season = roster.season();
        let all = self.read_teams()?;

        let mut current = Roster::from_teams(
            season,
            all.iter().filter(|(s, _)| *s == season).map(|(_, t)| t.clone()),
        )?;
        let report = current.merge(roster, mode)?;

        let mut rows: Vec<Vec<String>> = all
            .iter()
            .filter(|(s, _)| *s != season)
            .map(|(s, t)| team_row(*s, t))
            .collect();
        rows.extend(current.teams().map(|t| team_row(season, t)));
        rows.sort_by(|a, b| a[0].cmp(&b[0]));

        write_table(&self.path(PLAYOFF_TEAMS_FILE), &TEAM_HEADERS, &rows)?;
        logf!(
            "Store: saved {season} roster ({:?}): {} inserted, {} updated, {} removed",
            mode, report.inserted, report.updated, report.removed
        );
        Ok(report)
    }

    /* ---------------- Games ---------------- */

    fn read_games(&self) -> Res<Vec<Game>> {
        let Some(table) = read_table(&self.path(GAMES_FILE))? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(table.rows.len());
        for (i, row) in table.rows.iter().enumerate() {
            match game_from_row(&table, row) {
                Some(g) => out.push(g),
                None => logw!("Store: skipping malformed game row {}: {:?}", i + 2, row),
            }
        }
        Ok(out)
    }

    fn write_games(&self, games: &[Game]) -> Res<()> {
        let rows: Vec<Vec<String>> = games.iter().map(game_row).collect();
        write_table(&self.path(GAMES_FILE), &GAME_HEADERS, &rows)
    }

    pub fn load_games(&self, season: u16) -> Res<Vec<Game>> {
        Ok(self.read_games()?.into_iter().filter(|g| g.season == season).collect())
    }

    /// Upsert by id; an existing winner survives regeneration.
    pub fn upsert_games(&self, incoming: Vec<Game>) -> Res<UpsertReport> {
        let mut all = self.read_games()?;
        let report = games::upsert(&mut all, incoming);
        if report.inserted + report.updated > 0 {
            self.write_games(&all)?;
        }
        logf!(
            "Store: games upsert: {} inserted, {} updated, {} unchanged",
            report.inserted, report.updated, report.unchanged
        );
        Ok(report)
    }

    /// Install a regenerated round: stale games of that round go, and so do
    /// later rounds paired from matchups that changed. Winners of surviving
    /// matchups are kept.
    pub fn replace_round_games(&self, incoming: Vec<Game>) -> Res<UpsertReport> {
        let mut all = self.read_games()?;
        let report = games::replace_round(&mut all, incoming);
        if report.inserted + report.updated + report.removed > 0 {
            self.write_games(&all)?;
        }
        logf!(
            "Store: round replace: {} inserted, {} updated, {} unchanged, {} removed",
            report.inserted, report.updated, report.unchanged, report.removed
        );
        Ok(report)
    }

    pub fn record_winner(&self, season: u16, game_id: &str, team: &str) -> Res<Game> {
        let (mut this_season, others): (Vec<Game>, Vec<Game>) =
            self.read_games()?.into_iter().partition(|g| g.season == season);
        let game = games::set_winner(&mut this_season, game_id, team)?.clone();

        let mut all = others;
        all.extend(this_season);
        self.write_games(&all)?;
        logf!("Store: {} won {} ({})", game.winner.as_deref().unwrap_or(""), game.matchup(), game.id);
        Ok(game)
    }

    /* ---------------- Side files ---------------- */

    /// Raw fetched page, kept for offline re-parsing.
    pub fn save_response(&self, source_key: &str, season: u16, body: &str) -> Res<PathBuf> {
        let path = self.path(&format!("{source_key}-response-{season}.html"));
        ensure_parent(&path)?;
        fs::write(&path, body)?;
        logd!("Store: saved raw response ({} bytes) to {}", body.len(), path.display());
        Ok(path)
    }

    pub fn save_preview<T: Serialize + ?Sized>(&self, season: u16, value: &T) -> Res<PathBuf> {
        let path = self.path(&format!("playoff-teams-{season}-preview.json"));
        ensure_parent(&path)?;
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }
}

/* ---------------- Row mapping ---------------- */

fn team_row(season: u16, t: &SeededTeam) -> Vec<String> {
    vec![
        season.to_string(),
        s!(t.conference.as_str()),
        t.seed.to_string(),
        t.team_name.clone(),
        t.team_abbreviation.clone(),
    ]
}

fn team_from_row(table: &Table, row: &[String]) -> Option<(u16, SeededTeam)> {
    let season = table.cell(row, "season").parse().ok()?;
    let conference: Conference = table.cell(row, "conference").parse().ok()?;
    let seed = table.cell(row, "seed").parse().ok()?;
    let name = table.cell(row, "team_name");
    if name.is_empty() {
        return None;
    }
    let abbr = table.cell(row, "team_abbreviation");
    Some((season, SeededTeam::new(name, Some(abbr), conference, seed)))
}

fn opt_cell<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|x| x.to_string()).unwrap_or_default()
}

fn game_row(g: &Game) -> Vec<String> {
    vec![
        g.id.clone(),
        g.season.to_string(),
        g.week.to_string(),
        s!(g.conference.as_str()),
        g.home_team.clone(),
        g.away_team.clone(),
        opt_cell(&g.home_seed),
        opt_cell(&g.away_seed),
        opt_cell(&g.winner),
    ]
}

fn game_from_row(table: &Table, row: &[String]) -> Option<Game> {
    let non_empty = |name: &str| {
        let v = table.cell(row, name);
        (!v.is_empty()).then(|| s!(v))
    };
    Some(Game {
        id: non_empty("id")?,
        season: table.cell(row, "season").parse().ok()?,
        week: table.cell(row, "week").parse::<u8>().ok().filter(|w| (1..=4).contains(w))?,
        conference: table.cell(row, "conference").parse::<GameConference>().ok()?,
        home_team: non_empty("home_team")?,
        away_team: non_empty("away_team")?,
        home_seed: table.cell(row, "home_seed").parse().ok(),
        away_seed: table.cell(row, "away_seed").parse().ok(),
        winner: non_empty("winner"),
    })
}

/* ---------------- Files ---------------- */

fn ensure_parent(path: &Path) -> Res<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn read_table(path: &Path) -> Res<Option<Table>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(Table::parse(&text, ','))
}

fn write_table(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Res<()> {
    ensure_parent(path)?;
    let headers: Vec<String> = headers.iter().map(|h| s!(*h)).collect();
    let text = csv::rows_to_string(rows, Some(&headers), ',');
    // write-then-rename: a failed write leaves the previous table in place
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::Round;

    #[test]
    fn game_row_round_trips_optional_cells() {
        let g = Game::new(
            2024,
            Round::SuperBowl,
            GameConference::SuperBowl,
            ("Philadelphia Eagles", None),
            ("Kansas City Chiefs", None),
        );
        let headers: Vec<String> = GAME_HEADERS.iter().map(|h| s!(*h)).collect();
        let table = Table { headers, rows: vec![game_row(&g)] };
        let back = game_from_row(&table, &table.rows[0]).unwrap();
        assert_eq!(back, g);
    }
}
