// src/games.rs
//
// Game records after generation: upsert by id, recording winners, text views.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;

use thiserror::Error;

use crate::bracket::{Game, GameConference, Round};
use crate::specs::espn::ScheduledGame;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("No game with id '{0}'")]
    UnknownGame(String),

    #[error("'{team}' did not play in {matchup}")]
    NotInGame { team: String, matchup: String },
}

/// Counts from one upsert pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpsertReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
}

impl UpsertReport {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}

/// Merge `incoming` into `existing` by id.
/// A regenerated game never clears a winner already on record.
pub fn upsert(existing: &mut Vec<Game>, incoming: Vec<Game>) -> UpsertReport {
    let mut report = UpsertReport::default();
    for mut g in incoming {
        match existing.iter_mut().find(|e| e.id == g.id) {
            Some(e) => {
                if g.winner.is_none() {
                    g.winner = e.winner.clone();
                }
                if *e == g {
                    report.unchanged += 1;
                } else {
                    *e = g;
                    report.updated += 1;
                }
            }
            None => {
                existing.push(g);
                report.inserted += 1;
            }
        }
    }
    report
}

/// Install a regenerated round (all of `incoming` shares one season and week).
///
/// Per conference present in `incoming`, stored games of that round the new
/// set does not hold are dropped. A stored game with the same matchup under
/// another id hands its winner over. When a conference's matchups changed,
/// its later rounds are dropped too, along with the Super Bowl.
pub fn replace_round(existing: &mut Vec<Game>, mut incoming: Vec<Game>) -> UpsertReport {
    let Some(first) = incoming.first() else {
        return UpsertReport::default();
    };
    let (season, week) = (first.season, first.week);
    let confs: BTreeSet<GameConference> = incoming.iter().map(|g| g.conference).collect();
    let same_slot = |g: &Game| g.season == season && g.week == week && confs.contains(&g.conference);
    let same_matchup = |a: &Game, b: &Game| a.home_team == b.home_team && a.away_team == b.away_team;

    let mut changed: BTreeSet<GameConference> = BTreeSet::new();
    for g in incoming.iter_mut() {
        match existing.iter().find(|e| same_slot(e) && same_matchup(e, &*g)) {
            Some(old) if g.winner.is_none() => g.winner = old.winner.clone(),
            Some(_) => {}
            None => {
                changed.insert(g.conference);
            }
        }
    }
    for e in existing.iter().filter(|e| same_slot(e)) {
        if !incoming.iter().any(|g| same_matchup(e, g)) {
            changed.insert(e.conference);
        }
    }

    let ids: HashSet<String> = incoming.iter().map(|g| g.id.clone()).collect();
    let before = existing.len();
    existing.retain(|e| !(same_slot(e) && !ids.contains(&e.id)));
    if !changed.is_empty() {
        existing.retain(|e| {
            let later = e.season == season && e.week > week;
            !(later && (changed.contains(&e.conference) || e.conference == GameConference::SuperBowl))
        });
    }
    let removed = before - existing.len();

    let mut report = upsert(existing, incoming);
    report.removed = removed;
    report
}

/// Attach feed ids to games whose home and away teams match a scheduled
/// game; the rest keep their composite id. Returns how many matched.
pub fn assign_external_ids(games: &mut [Game], scheduled: &[ScheduledGame]) -> usize {
    let mut matched = 0;
    for g in games.iter_mut() {
        let hit = scheduled.iter().find(|s| {
            s.home_team.eq_ignore_ascii_case(&g.home_team) && s.away_team.eq_ignore_ascii_case(&g.away_team)
        });
        if let Some(s) = hit {
            *g = g.clone().with_external_id(&s.id);
            matched += 1;
        }
    }
    matched
}

/// Set the winner of game `id`. `team` may be given loosely (any case);
/// the stored name is the game's own spelling.
pub fn set_winner<'a>(games: &'a mut [Game], id: &str, team: &str) -> Result<&'a Game, GameError> {
    let g = games
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| GameError::UnknownGame(s!(id)))?;
    let wanted = team.trim();
    let name = [&g.home_team, &g.away_team]
        .into_iter()
        .find(|n| n.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| GameError::NotInGame { team: s!(wanted), matchup: g.matchup() })?;
    g.winner = Some(name);
    Ok(g)
}

/// Season games sorted for display: week, then AFC/NFC/Super Bowl, then best home seed.
pub fn sorted(games: &[Game], season: u16) -> Vec<&Game> {
    let mut out: Vec<&Game> = games.iter().filter(|g| g.season == season).collect();
    out.sort_by_key(|g| (g.week, g.conference, g.home_seed.unwrap_or(0), g.id.clone()));
    out
}

pub fn in_round(games: &[Game], season: u16, round: Round) -> Vec<&Game> {
    sorted(games, season)
        .into_iter()
        .filter(|g| g.week == round.week())
        .collect()
}

/// "Away @ Home" lines for a confirmation prompt.
pub fn preview(games: &[Game]) -> String {
    let mut out = s!();
    for g in games {
        let _ = writeln!(out, "  [{}] {}", g.conference, g);
    }
    out
}

/// Every round of a season, with winners and what is still open.
pub fn bracket_summary(games: &[Game], season: u16) -> String {
    let mut out = s!();
    let _ = writeln!(out, "NFL Playoff Bracket {season}");
    for round in Round::ALL {
        let rg = in_round(games, season, round);
        let decided = rg.iter().filter(|g| g.winner.is_some()).count();
        let _ = writeln!(out, "\nWeek {}: {} ({}/{} decided)", round.week(), round, decided, rg.len());
        if rg.is_empty() {
            let _ = writeln!(out, "  (not generated)");
            continue;
        }
        let mut last: Option<GameConference> = None;
        for g in rg {
            if last != Some(g.conference) && round != Round::SuperBowl {
                let _ = writeln!(out, "  {}", g.conference);
                last = Some(g.conference);
            }
            let _ = writeln!(out, "    {g}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wc(home: &str, away: &str, hs: u8, aws: u8) -> Game {
        Game::new(2024, Round::WildCard, GameConference::Afc, (home, Some(hs)), (away, Some(aws)))
    }

    #[test]
    fn upsert_keeps_recorded_winner() {
        let mut stored = vec![wc("Buffalo Bills", "Denver Broncos", 2, 7)];
        stored[0].winner = Some(s!("Buffalo Bills"));
        let report = upsert(&mut stored, vec![wc("Buffalo Bills", "Denver Broncos", 2, 7)]);
        assert_eq!(report, UpsertReport { inserted: 0, updated: 0, unchanged: 1, removed: 0 });
        assert_eq!(stored[0].winner.as_deref(), Some("Buffalo Bills"));
    }

    #[test]
    fn set_winner_matches_case_insensitively() {
        let mut games = vec![wc("Buffalo Bills", "Denver Broncos", 2, 7)];
        let id = games[0].id.clone();
        let g = set_winner(&mut games, &id, "denver broncos").unwrap();
        assert_eq!(g.winner.as_deref(), Some("Denver Broncos"));
        assert!(matches!(
            set_winner(&mut games, &id, "Miami Dolphins"),
            Err(GameError::NotInGame { .. })
        ));
        assert!(matches!(set_winner(&mut games, "nope", "x"), Err(GameError::UnknownGame(_))));
    }

    #[test]
    fn summary_marks_open_rounds() {
        let games = vec![wc("Buffalo Bills", "Denver Broncos", 2, 7)];
        let text = bracket_summary(&games, 2024);
        assert!(text.contains("Week 1: Wild Card (0/1 decided)"));
        assert!(text.contains("(7) Denver Broncos @ (2) Buffalo Bills"));
        assert!(text.contains("Week 4: Super Bowl (0/0 decided)\n  (not generated)"));
    }
}
