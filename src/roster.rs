// src/roster.rs
//
// Seeded playoff teams for one season.
//
// Invariants held by `Roster` at all times:
// - seeds are 1..=7;
// - one team per (conference, seed);
// - a team name holds at most one seed across both conferences;
// - a team from the reference list sits in its own conference.
//
// Seeding may be partial. Everything that enters a roster (operator picks,
// scraped standings, import files, the local store) goes through `assign`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::consts::{MAX_SEED, MIN_SEED};
use crate::config::options::MergeMode;
use crate::league::{self, Conference, Team};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team_name: String,
    pub team_abbreviation: String,
    pub conference: Conference,
    pub seed: u8,
}

impl SeededTeam {
    /// Abbreviation filled from the league table when not given.
    pub fn new(team_name: &str, abbreviation: Option<&str>, conference: Conference, seed: u8) -> Self {
        let team_name = team_name.trim().to_string();
        let team_abbreviation = match abbreviation.map(str::trim) {
            Some(a) if !a.is_empty() => a.to_string(),
            _ => league::abbreviation_for(&team_name),
        };
        Self { team_name, team_abbreviation, conference, seed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("{conference} seed {seed} is out of range (1-7)")]
    SeedOutOfRange { conference: Conference, seed: u8 },

    #[error("{conference} seed {seed} assigned twice ({first} and {second})")]
    DuplicateSeed { conference: Conference, seed: u8, first: String, second: String },

    #[error("{team} already holds {conference} seed {seed}")]
    DuplicateTeam { team: String, conference: Conference, seed: u8 },

    #[error("{team} plays in the {expected}, not the {found}")]
    WrongConference { team: String, expected: Conference, found: Conference },

    #[error("{conference} seed {seed} has an empty team name")]
    EmptyName { conference: Conference, seed: u8 },
}

/// Counts from folding one roster into another.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    season: u16,
    by_seed: BTreeMap<(Conference, u8), SeededTeam>,
}

impl Roster {
    pub fn new(season: u16) -> Self {
        Self { season, by_seed: BTreeMap::new() }
    }

    /// Build from loose records (scrape/import/store), rejecting the first
    /// record that breaks an invariant. An identical repeat is not an error.
    pub fn from_teams<I>(season: u16, teams: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = SeededTeam>,
    {
        let mut roster = Roster::new(season);
        for t in teams {
            if let Some(existing) = roster.get(t.conference, t.seed) {
                if existing.team_name == t.team_name {
                    continue;
                }
                return Err(RosterError::DuplicateSeed {
                    conference: t.conference,
                    seed: t.seed,
                    first: existing.team_name.clone(),
                    second: t.team_name,
                });
            }
            roster.insert_checked(t)?;
        }
        Ok(roster)
    }

    pub fn season(&self) -> u16 { self.season }
    pub fn len(&self) -> usize { self.by_seed.len() }
    pub fn is_empty(&self) -> bool { self.by_seed.is_empty() }

    pub fn conference_len(&self, conference: Conference) -> usize {
        self.by_seed.keys().filter(|(c, _)| *c == conference).count()
    }

    pub fn get(&self, conference: Conference, seed: u8) -> Option<&SeededTeam> {
        self.by_seed.get(&(conference, seed))
    }

    /// Sorted by (conference, seed); AFC first.
    pub fn teams(&self) -> impl Iterator<Item = &SeededTeam> {
        self.by_seed.values()
    }

    /// Put `team_name` at (conference, seed). Returns the team it replaced.
    /// Moving a team to a new seed is done by clearing its old seed first.
    pub fn assign(
        &mut self,
        conference: Conference,
        seed: u8,
        team_name: &str,
    ) -> Result<Option<SeededTeam>, RosterError> {
        let entry = SeededTeam::new(team_name, None, conference, seed);
        let previous = self.by_seed.remove(&(conference, seed));
        match self.insert_checked(entry) {
            Ok(()) => Ok(previous),
            Err(e) => {
                if let Some(p) = previous {
                    self.by_seed.insert((conference, seed), p);
                }
                Err(e)
            }
        }
    }

    pub fn clear(&mut self, conference: Conference, seed: u8) -> Option<SeededTeam> {
        self.by_seed.remove(&(conference, seed))
    }

    fn insert_checked(&mut self, t: SeededTeam) -> Result<(), RosterError> {
        let (conference, seed) = (t.conference, t.seed);
        if !(MIN_SEED..=MAX_SEED).contains(&seed) {
            return Err(RosterError::SeedOutOfRange { conference, seed });
        }
        if t.team_name.is_empty() {
            return Err(RosterError::EmptyName { conference, seed });
        }
        if let Some(known) = league::find(&t.team_name) {
            if known.conference != conference {
                return Err(RosterError::WrongConference {
                    team: t.team_name,
                    expected: known.conference,
                    found: conference,
                });
            }
        }
        if let Some((c, s)) = self.seed_of(&t.team_name) {
            return Err(RosterError::DuplicateTeam { team: t.team_name, conference: c, seed: s });
        }
        self.by_seed.insert((conference, seed), t);
        Ok(())
    }

    /// Re-check every invariant over the whole roster. Rosters loaded from
    /// disk or merged from another source go through this before a write.
    pub fn validate(&self) -> Result<(), RosterError> {
        Roster::from_teams(self.season, self.by_seed.values().cloned()).map(|_| ())
    }

    /// Where a team is seeded, if anywhere.
    pub fn seed_of(&self, team_name: &str) -> Option<(Conference, u8)> {
        self.by_seed
            .iter()
            .find(|(_, t)| t.team_name == team_name)
            .map(|(k, _)| *k)
    }

    /// Seed → team name for one conference; the engine's input shape.
    pub fn teams_by_seed(&self, conference: Conference) -> BTreeMap<u8, String> {
        self.by_seed
            .iter()
            .filter(|((c, _), _)| *c == conference)
            .map(|((_, s), t)| (*s, t.team_name.clone()))
            .collect()
    }

    /// Reference teams an operator may pick for (conference, seed): the
    /// conference's teams not seeded anywhere else, plus the current holder.
    pub fn available_teams(&self, conference: Conference, seed: u8) -> Vec<&'static Team> {
        let current = self.get(conference, seed).map(|t| t.team_name.as_str());
        league::conference_teams(conference)
            .filter(|t| Some(t.name) == current || self.seed_of(t.name).is_none())
            .collect()
    }

    /// One past the highest assigned seed, capped at 8 (= conference full).
    pub fn next_open_seed(&self, conference: Conference) -> u8 {
        self.by_seed
            .keys()
            .filter(|(c, _)| *c == conference)
            .map(|(_, s)| s + 1)
            .max()
            .unwrap_or(MIN_SEED)
            .min(MAX_SEED + 1)
    }

    /// Fold `incoming` into `self`.
    /// - Replace: `self` becomes `incoming`.
    /// - Update: upsert by (conference, seed). A team that moved seeds is
    ///   removed from its old seed.
    pub fn merge(&mut self, incoming: &Roster, mode: MergeMode) -> Result<MergeReport, RosterError> {
        let mut report = MergeReport::default();
        match mode {
            MergeMode::Replace => {
                report.removed = self.by_seed.len();
                report.inserted = incoming.len();
                self.by_seed = incoming.by_seed.clone();
            }
            MergeMode::Update => {
                let mut next = self.by_seed.clone();
                for (key, t) in &incoming.by_seed {
                    let stale: Vec<(Conference, u8)> = next
                        .iter()
                        .filter(|(k, e)| *k != key && e.team_name == t.team_name && !incoming.by_seed.contains_key(*k))
                        .map(|(k, _)| *k)
                        .collect();
                    for k in stale {
                        next.remove(&k);
                        report.removed += 1;
                    }
                    match next.insert(*key, t.clone()) {
                        Some(old) if old == *t => {}
                        Some(_) => report.updated += 1,
                        None => report.inserted += 1,
                    }
                }
                // Re-run the invariants over the result before committing.
                let merged = Roster::from_teams(self.season, next.into_values())?;
                self.by_seed = merged.by_seed;
            }
        }
        Ok(report)
    }

    /// Operator preview: seeds per conference and a totals line.
    pub fn preview(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = s!();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "PREVIEW: Playoff Teams for Season {}", self.season);
        let _ = writeln!(out, "{rule}");
        for conf in Conference::BOTH {
            if self.conference_len(conf) == 0 {
                continue;
            }
            let _ = writeln!(out, "\n{conf} Teams:");
            for t in self.teams().filter(|t| t.conference == conf) {
                let _ = writeln!(out, "  Seed {:2}: {:30} ({})", t.seed, t.team_name, t.team_abbreviation);
            }
        }
        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "Total: {} teams ({} AFC, {} NFC)",
            self.len(),
            self.conference_len(Conference::Afc),
            self.conference_len(Conference::Nfc)
        );
        let _ = write!(out, "{rule}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Conference::{Afc, Nfc};

    #[test]
    fn assign_replaces_and_returns_previous() {
        let mut r = Roster::new(2024);
        r.assign(Afc, 1, "Kansas City Chiefs").unwrap();
        let prev = r.assign(Afc, 1, "Buffalo Bills").unwrap();
        assert_eq!(prev.map(|t| t.team_name), Some(s!("Kansas City Chiefs")));
        assert_eq!(r.get(Afc, 1).unwrap().team_abbreviation, "BUF");
    }

    #[test]
    fn failed_assign_keeps_previous_holder() {
        let mut r = Roster::new(2024);
        r.assign(Afc, 1, "Kansas City Chiefs").unwrap();
        r.assign(Afc, 2, "Buffalo Bills").unwrap();
        let err = r.assign(Afc, 2, "Kansas City Chiefs").unwrap_err();
        assert!(matches!(err, RosterError::DuplicateTeam { seed: 1, .. }));
        assert_eq!(r.get(Afc, 2).unwrap().team_name, "Buffalo Bills");
    }

    #[test]
    fn next_open_seed_caps_at_eight() {
        let mut r = Roster::new(2024);
        assert_eq!(r.next_open_seed(Nfc), 1);
        r.assign(Nfc, 3, "Detroit Lions").unwrap();
        assert_eq!(r.next_open_seed(Nfc), 4);
        r.assign(Nfc, 7, "Green Bay Packers").unwrap();
        assert_eq!(r.next_open_seed(Nfc), 8);
    }

    #[test]
    fn preview_lists_both_conferences() {
        let mut r = Roster::new(2024);
        r.assign(Afc, 1, "Kansas City Chiefs").unwrap();
        r.assign(Nfc, 1, "Detroit Lions").unwrap();
        let text = r.preview();
        assert!(text.contains("AFC Teams:"));
        assert!(text.contains("Seed  1: Detroit Lions"));
        assert!(text.contains("Total: 2 teams (1 AFC, 1 NFC)"));
    }
}
