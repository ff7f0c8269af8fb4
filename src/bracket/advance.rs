// src/bracket/advance.rs
//
// Per-round driver: picks the prior round's winners out of stored games,
// runs the engine for each conference and says why a conference got no game.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::league::Conference;
use crate::roster::Roster;

use super::engine;
use super::{Game, GameConference, Round};

/// Why a conference (or the Super Bowl) produced no game this round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvanceIssue {
    #[error("{0}: no seeded pairing is complete (seed both sides of a matchup first)")]
    MissingSeeds(Conference),

    #[error("{0}: no #1 seed on the roster")]
    MissingSeedOne(Conference),

    #[error("{conference}: no {round} winners recorded yet")]
    NoWinners { conference: Conference, round: Round },

    #[error("{conference}: {round} incomplete ({decided} of {total} games decided)")]
    PriorRoundIncomplete { conference: Conference, round: Round, decided: usize, total: usize },

    #[error("{conference}: winner '{team}' is not seeded")]
    UnknownWinner { conference: Conference, team: String },

    #[error("{conference}: expected {expected} winners, found {found}")]
    WinnerCount { conference: Conference, expected: usize, found: usize },

    #[error("Super Bowl: {0} champion not yet determined")]
    ChampionMissing(Conference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: Round,
    pub games: Vec<Game>,
    pub issues: Vec<AdvanceIssue>,
}

impl RoundOutcome {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Games of `round` for the roster's season.
///
/// Rounds after the Wild Card need every prior-round game of the conference
/// decided; a half-finished round is reported instead of paired.
pub fn generate_round(round: Round, roster: &Roster, prior_games: &[Game]) -> RoundOutcome {
    let season = roster.season();
    let mut games = Vec::new();
    let mut issues = Vec::new();

    let prior: Vec<&Game> = match round.previous() {
        Some(p) => prior_games
            .iter()
            .filter(|g| g.season == season && g.week == p.week())
            .collect(),
        None => Vec::new(),
    };

    if round == Round::SuperBowl {
        let mut champions = BTreeMap::new();
        for conf in Conference::BOTH {
            match conference_winners(&prior, conf, Round::ConferenceChampionship) {
                Ok(w) if w.len() == 1 => {
                    champions.insert(conf, w[0].clone());
                }
                Ok(w) if w.len() > 1 => issues.push(AdvanceIssue::WinnerCount {
                    conference: conf,
                    expected: 1,
                    found: w.len(),
                }),
                _ => issues.push(AdvanceIssue::ChampionMissing(conf)),
            }
        }
        games.extend(engine::generate_super_bowl(season, &champions));
        return RoundOutcome { round, games, issues };
    }

    for conf in Conference::BOTH {
        let teams_by_seed = roster.teams_by_seed(conf);

        let produced = match round {
            Round::WildCard => {
                let g = engine::generate_wild_card(season, conf, &teams_by_seed);
                if g.is_empty() {
                    issues.push(AdvanceIssue::MissingSeeds(conf));
                }
                g
            }
            Round::Divisional | Round::ConferenceChampionship => {
                let prev = match round.previous() {
                    Some(p) => p,
                    None => continue,
                };
                let winners = match conference_winners(&prior, conf, prev) {
                    Ok(w) => w,
                    Err(issue) => {
                        issues.push(issue);
                        continue;
                    }
                };
                let g = if round == Round::Divisional {
                    engine::generate_divisional(season, conf, &teams_by_seed, &winners)
                } else {
                    engine::generate_conference_championship(season, conf, &teams_by_seed, &winners)
                };
                if g.is_empty() {
                    issues.push(explain(round, conf, &teams_by_seed, &winners));
                }
                g
            }
            Round::SuperBowl => Vec::new(),
        };
        games.extend(produced);
    }

    RoundOutcome { round, games, issues }
}

/// Winners of `round` in one conference, or the reason they can't be used.
fn conference_winners(
    prior: &[&Game],
    conference: Conference,
    round: Round,
) -> Result<Vec<String>, AdvanceIssue> {
    let tag = GameConference::from(conference);
    let in_conf: Vec<&&Game> = prior.iter().filter(|g| g.conference == tag).collect();
    let decided: Vec<String> = in_conf.iter().filter_map(|g| g.winner.clone()).collect();

    if decided.is_empty() {
        return Err(AdvanceIssue::NoWinners { conference, round });
    }
    if decided.len() < in_conf.len() {
        return Err(AdvanceIssue::PriorRoundIncomplete {
            conference,
            round,
            decided: decided.len(),
            total: in_conf.len(),
        });
    }
    Ok(decided)
}

fn explain(
    round: Round,
    conference: Conference,
    teams_by_seed: &BTreeMap<u8, String>,
    winners: &[String],
) -> AdvanceIssue {
    if round == Round::Divisional && !teams_by_seed.contains_key(&super::BYE_SEED) {
        return AdvanceIssue::MissingSeedOne(conference);
    }
    if let Some(team) = winners.iter().find(|w| !teams_by_seed.values().any(|t| t == *w)) {
        return AdvanceIssue::UnknownWinner { conference, team: team.clone() };
    }
    let expected = match round {
        Round::Divisional => super::WILD_CARD_PAIRS.len(),
        _ => 2,
    };
    AdvanceIssue::WinnerCount { conference, expected, found: winners.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_roster() -> Roster {
        let mut r = Roster::new(2024);
        let afc = [
            "Kansas City Chiefs", "Buffalo Bills", "Baltimore Ravens", "Houston Texans",
            "Los Angeles Chargers", "Pittsburgh Steelers", "Denver Broncos",
        ];
        let nfc = [
            "Detroit Lions", "Philadelphia Eagles", "Tampa Bay Buccaneers", "Los Angeles Rams",
            "Minnesota Vikings", "Washington Commanders", "Green Bay Packers",
        ];
        for (i, (a, n)) in afc.iter().zip(nfc.iter()).enumerate() {
            r.assign(Conference::Afc, i as u8 + 1, a).unwrap();
            r.assign(Conference::Nfc, i as u8 + 1, n).unwrap();
        }
        r
    }

    fn decide(games: &mut [Game], pick_home: bool) {
        for g in games {
            g.winner = Some(if pick_home { g.home_team.clone() } else { g.away_team.clone() });
        }
    }

    #[test]
    fn wild_card_full_roster_six_games() {
        let out = generate_round(Round::WildCard, &full_roster(), &[]);
        assert_eq!(out.games.len(), 6);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn divisional_waits_for_every_wild_card_result() {
        let roster = full_roster();
        let mut wc = generate_round(Round::WildCard, &roster, &[]).games;
        decide(&mut wc[..2], true);
        let out = generate_round(Round::Divisional, &roster, &wc);
        assert!(out.games.is_empty());
        assert!(matches!(
            out.issues.as_slice(),
            [
                AdvanceIssue::PriorRoundIncomplete { conference: Conference::Afc, decided: 2, total: 3, .. },
                AdvanceIssue::NoWinners { conference: Conference::Nfc, .. },
            ]
        ));
    }

    #[test]
    fn full_run_reaches_super_bowl() {
        let roster = full_roster();
        let mut all = generate_round(Round::WildCard, &roster, &[]).games;
        decide(&mut all, true);
        for round in [Round::Divisional, Round::ConferenceChampionship, Round::SuperBowl] {
            let mut out = generate_round(round, &roster, &all);
            assert!(out.issues.is_empty(), "{round}: {:?}", out.issues);
            decide(&mut out.games, true);
            all.extend(out.games);
        }
        let sb = all.last().unwrap();
        assert_eq!(sb.conference, GameConference::SuperBowl);
        assert_eq!(sb.home_team, "Detroit Lions");
        assert_eq!(sb.away_team, "Kansas City Chiefs");
    }

    #[test]
    fn super_bowl_reports_missing_champion() {
        let out = generate_round(Round::SuperBowl, &full_roster(), &[]);
        assert!(out.games.is_empty());
        assert_eq!(out.issues.len(), 2);
        assert_eq!(out.issues[0].to_string(), "Super Bowl: AFC champion not yet determined");
    }
}
